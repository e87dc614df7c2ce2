//! Fee Calculator
//!
//! Pure time-based pricing: no state, no side effects. Boundaries use this
//! to pre-compute the amount shown at checkout.

#[cfg(test)]
mod tests;

const MS_PER_HOUR: i64 = 3_600_000;

/// Billed hours between arrival and `as_of`.
///
/// 不足一小时按一小时计；最低计费一小时（负时长同样按一小时）。
pub fn billable_hours(arrival_millis: i64, as_of_millis: i64) -> i64 {
    let elapsed = (as_of_millis - arrival_millis).max(0);
    // `i64::div_ceil` is still unstable (int_roundings); for elapsed >= 0 and a
    // positive divisor this is the exact equivalent.
    ((elapsed + MS_PER_HOUR - 1) / MS_PER_HOUR).max(1)
}

/// Fee for a stay from `arrival_millis` to `as_of_millis` at the given
/// hourly rate, rounded to two decimals. Never negative.
pub fn compute_fee(arrival_millis: i64, as_of_millis: i64, rate_per_hour: f64) -> f64 {
    let hours = billable_hours(arrival_millis, as_of_millis) as f64;
    let amount = hours * rate_per_hour.max(0.0);
    (amount * 100.0).round() / 100.0
}
