//! 租金按比例计费。
//!
//! 算法：
//! 1. `duration_hours = (end - start) / 3600s`（实数，不截断）
//! 2. `full_days = floor(duration_hours / 24)`
//! 3. `remainder_hours = duration_hours - full_days * 24`，取值 `[0, 24)`
//! 4. `remainder_cost = min(ceil(remainder_hours) * hourly_rate, daily_rate)`
//! 5. `total = full_days * daily_rate + remainder_cost`，四舍五入到 2 位小数（远离零）
//!
//! 负时长（时钟回拨）按 0 计。

const MS_PER_HOUR: f64 = 3_600_000.0;
const HOURS_PER_DAY: f64 = 24.0;

/// 单个费率的上限。保证任意时长下总费用仍为有限数。
pub const MAX_RATE: f64 = 1_000_000_000.0;

/// 计费明细。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingBreakdown {
    pub duration_hours: f64,
    pub full_days: f64,
    pub remainder_hours: f64,
    pub remainder_cost: f64,
    pub total_cost: f64,
}

/// 计算完整计费明细。
pub fn breakdown(start_ms: i64, end_ms: i64, hourly_rate: f64, daily_rate: f64) -> BillingBreakdown {
    let elapsed_ms = end_ms.saturating_sub(start_ms).max(0);
    let duration_hours = elapsed_ms as f64 / MS_PER_HOUR;
    let full_days = (duration_hours / HOURS_PER_DAY).floor();
    let remainder_hours = duration_hours - full_days * HOURS_PER_DAY;
    let remainder_cost = (remainder_hours.ceil() * hourly_rate).min(daily_rate);
    let total_cost = round_cents(full_days * daily_rate + remainder_cost);
    BillingBreakdown {
        duration_hours,
        full_days,
        remainder_hours,
        remainder_cost,
        total_cost,
    }
}

/// 计算租金总额（已保留两位小数）。
pub fn rental_cost(start_ms: i64, end_ms: i64, hourly_rate: f64, daily_rate: f64) -> f64 {
    breakdown(start_ms, end_ms, hourly_rate, daily_rate).total_cost
}

/// 保留两位小数；`f64::round` 为远离零舍入。
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    fn cost_for_hours(hours: f64) -> f64 {
        let end = (hours * HOUR as f64) as i64;
        rental_cost(0, end, 10.0, 70.0)
    }

    #[test]
    fn five_hours_billed_hourly() {
        assert_eq!(cost_for_hours(5.0), 50.0);
    }

    #[test]
    fn thirty_hours_is_day_plus_six_hours() {
        assert_eq!(cost_for_hours(30.0), 130.0);
    }

    #[test]
    fn twenty_five_hours_is_day_plus_one_hour() {
        assert_eq!(cost_for_hours(25.0), 80.0);
    }

    #[test]
    fn zero_duration_is_free() {
        assert_eq!(cost_for_hours(0.0), 0.0);
    }

    #[test]
    fn exact_day_boundary_has_no_remainder() {
        let detail = breakdown(0, 24 * HOUR, 10.0, 70.0);
        assert_eq!(detail.full_days, 1.0);
        assert_eq!(detail.remainder_hours, 0.0);
        assert_eq!(detail.total_cost, 70.0);
    }

    #[test]
    fn partial_hour_rounds_up() {
        // 1 分钟也按 1 小时计
        assert_eq!(rental_cost(0, 60_000, 10.0, 70.0), 10.0);
    }

    #[test]
    fn remainder_capped_at_daily_rate() {
        // 23 小时 * 10 = 230 > 70
        assert_eq!(cost_for_hours(23.0), 70.0);
        assert_eq!(cost_for_hours(47.5), 140.0);
    }

    #[test]
    fn negative_duration_clamped() {
        assert_eq!(rental_cost(10 * HOUR, 0, 10.0, 70.0), 0.0);
    }

    #[test]
    fn fractional_rates_rounded_to_cents() {
        // 1 小时 * 0.125 = 0.125 → 0.13
        assert_eq!(rental_cost(0, HOUR, 0.125, 100.0), 0.13);
    }
}
