use super::*;

const HOUR: i64 = 3_600_000;

#[test]
fn sub_hour_stay_bills_one_hour() {
    // arrival 10:00, checkout 10:45
    let arrival = 1_000 * HOUR;
    let departure = arrival + 45 * 60_000;
    assert_eq!(billable_hours(arrival, departure), 1);
    assert_eq!(compute_fee(arrival, departure, 50.0), 50.0);
}

#[test]
fn partial_hours_round_up() {
    // arrival 10:00, checkout 12:15 -> 3 billed hours
    let arrival = 1_000 * HOUR;
    let departure = arrival + 2 * HOUR + 15 * 60_000;
    assert_eq!(billable_hours(arrival, departure), 3);
    assert_eq!(compute_fee(arrival, departure, 50.0), 150.0);
}

#[test]
fn exact_hours_do_not_round_up() {
    let arrival = 0;
    let departure = 2 * HOUR;
    assert_eq!(billable_hours(arrival, departure), 2);
    assert_eq!(compute_fee(arrival, departure, 50.0), 100.0);
}

#[test]
fn checkout_before_arrival_bills_the_minimum() {
    let arrival = 10 * HOUR;
    let departure = 9 * HOUR;
    assert_eq!(billable_hours(arrival, departure), 1);
    assert_eq!(compute_fee(arrival, departure, 50.0), 50.0);
}

#[test]
fn zero_duration_bills_the_minimum() {
    assert_eq!(billable_hours(500, 500), 1);
}

#[test]
fn negative_rate_is_clamped() {
    assert_eq!(compute_fee(0, HOUR, -10.0), 0.0);
}

#[test]
fn fractional_rates_keep_cents() {
    assert_eq!(compute_fee(0, 2 * HOUR, 12.5), 25.0);
    assert_eq!(compute_fee(0, HOUR, 49.99), 49.99);
}
