use clap::Parser;

use super::*;

#[derive(Parser, Debug)]
struct Harness {
    #[command(flatten)]
    config: ConfigArgs,
}

fn args(extra: &[&str]) -> ConfigArgs {
    let argv = std::iter::once("roverdeck").chain(extra.iter().copied());
    Harness::try_parse_from(argv).expect("parse").config
}

fn base() -> ConfigArgs {
    ConfigArgs {
        base_url: "http://rover.local:8000".to_owned(),
        maze_variant: MazeVariant::Grid,
        cell_size: 2.0,
        log_capacity: 10,
        reconnect_attempts: 3,
        http_timeout_secs: 5,
    }
}

// =============================================================
// Stream URL
// =============================================================

#[test]
fn http_maps_to_ws() {
    assert_eq!(ws_url("http://127.0.0.1:8000").as_deref(), Ok("ws://127.0.0.1:8000/ws/frontend"));
}

#[test]
fn https_maps_to_wss_and_trailing_slash_is_ignored() {
    assert_eq!(ws_url("https://rover.example.com/").as_deref(), Ok("wss://rover.example.com/ws/frontend"));
}

#[test]
fn other_schemes_are_rejected() {
    assert_eq!(ws_url("ftp://rover"), Err(ConfigError::InvalidBaseUrl("ftp://rover".to_owned())));
    assert!(ws_url("rover.local:8000").is_err());
    assert!(ws_url("http://").is_err());
}

// =============================================================
// Resolve
// =============================================================

#[test]
fn resolve_builds_typed_config() {
    let config = base().resolve().expect("valid");
    assert_eq!(config.base_url, "http://rover.local:8000");
    assert_eq!(config.ws_url, "ws://rover.local:8000/ws/frontend");
    assert_eq!(config.variant, MazeVariant::Grid);
    assert_eq!(config.log_capacity, 10);
    assert_eq!(config.reconnect.attempts, 3);
    assert_eq!(config.http_timeout, Duration::from_secs(5));
}

#[test]
fn resolve_rejects_bad_values() {
    let mut raw = base();
    raw.cell_size = 0.0;
    assert_eq!(raw.resolve(), Err(ConfigError::InvalidCellSize(0.0)));

    let mut raw = base();
    raw.cell_size = f64::NAN;
    assert!(matches!(raw.resolve(), Err(ConfigError::InvalidCellSize(_))));

    let mut raw = base();
    raw.log_capacity = 0;
    assert_eq!(raw.resolve(), Err(ConfigError::ZeroLogCapacity));

    let mut raw = base();
    raw.http_timeout_secs = 0;
    assert_eq!(raw.resolve(), Err(ConfigError::ZeroHttpTimeout));
}

#[test]
fn flags_parse_with_defaults() {
    let raw = args(&["--base-url", "https://rover.example.com", "--maze-variant", "Graph"]);
    assert_eq!(raw.maze_variant, MazeVariant::Graph);
    assert!((raw.cell_size - DEFAULT_CELL_SIZE).abs() < f64::EPSILON);
    assert_eq!(raw.log_capacity, DEFAULT_LOG_CAPACITY);
    assert_eq!(raw.reconnect_attempts, DEFAULT_RECONNECT_ATTEMPTS);
}

#[test]
fn unknown_variant_flag_is_a_parse_error() {
    let argv = ["roverdeck", "--maze-variant", "hex"];
    assert!(Harness::try_parse_from(argv).is_err());
}

// =============================================================
// Reconnect policy
// =============================================================

#[test]
fn backoff_doubles_then_caps() {
    let policy = ReconnectPolicy::new(6);
    let delays: Vec<_> = (0..6).filter_map(|retry| policy.delay(retry)).collect();
    assert_eq!(
        delays,
        [1, 2, 4, 8, 10, 10].map(Duration::from_secs).to_vec()
    );
    assert_eq!(policy.delay(6), None);
}

#[test]
fn zero_attempts_disables_reconnect() {
    assert_eq!(ReconnectPolicy::new(0).delay(0), None);
}

#[test]
fn huge_retry_index_does_not_overflow() {
    let policy = ReconnectPolicy::new(u32::MAX);
    assert_eq!(policy.delay(40), Some(Duration::from_secs(10)));
}
