use time::macros::datetime;

use super::*;

#[test]
fn pads_single_digit_fields() {
    assert_eq!(format_hms(datetime!(2024-03-01 07:05:09 UTC)), "07:05:09");
}

#[test]
fn uses_the_offset_carried_by_the_timestamp() {
    assert_eq!(format_hms(datetime!(2024-03-01 23:59:59 +02:00)), "23:59:59");
    assert_eq!(format_hms(datetime!(2024-03-01 00:00:00 -05:00)), "00:00:00");
}

#[test]
fn now_is_always_eight_characters() {
    let now = now_hms();
    assert_eq!(now.len(), 8);
    assert_eq!(now.as_bytes()[2], b':');
    assert_eq!(now.as_bytes()[5], b':');
}
