//! Closed-form amortization: monthly payment, total payable and total interest.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct LoanInputs {
    pub home_price: f64,
    /// `None` behaves exactly like a zero down payment.
    pub down_payment: Option<f64>,
    pub annual_interest_rate_percent: f64,
    pub loan_term_years: f64,
}

/// Result of one submission. Every field is rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
}

impl LoanInputs {
    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment.unwrap_or(0.0)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_interest_rate_percent / 100.0 / 12.0
    }

    pub fn months(&self) -> f64 {
        self.loan_term_years * 12.0
    }
}

/// Standard mortgage formula. Zero rate or zero term are not special-cased
/// and come out as NaN or infinity.
pub fn calculate(inputs: &LoanInputs) -> LoanResult {
    let loan_amount = inputs.loan_amount();
    let r = inputs.monthly_rate();
    let n = inputs.months();

    let growth = (1.0 + r).powf(n);
    let monthly_payment = round_cents(loan_amount * r * growth / (growth - 1.0));
    let total_payable = round_cents(monthly_payment * n);
    let total_interest = round_cents(total_payable - loan_amount);

    LoanResult {
        monthly_payment,
        total_payable,
        total_interest,
    }
}

/// Rounds the exact decimal value of `value` to two fraction digits, with
/// exact ties going away from zero. Non-finite values pass through.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // An exact tie is an odd number of half-cents with no product error.
    let half_cents = value * 200.0;
    let exact = value.mul_add(200.0, -half_cents) == 0.0;
    if exact && half_cents.fract() == 0.0 && half_cents.abs() % 2.0 == 1.0 {
        let cents = (half_cents.abs() + 1.0) / 2.0;
        return (cents / 100.0).copysign(value);
    }

    // Fixed-precision formatting rounds the exact binary value, not value * 100.
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Parses the longest numeric prefix of `text`, exponent included, the way a
/// browser's `parseFloat` does. No numeric prefix gives NaN; overflow gives
/// an infinity.
pub fn parse_amount(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while matches!(bytes.get(exp_end), Some(b'0'..=b'9')) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Two fraction digits; non-finite values use the names a browser would print.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(price: f64, down: Option<f64>, rate: f64, years: f64) -> LoanInputs {
        LoanInputs {
            home_price: price,
            down_payment: down,
            annual_interest_rate_percent: rate,
            loan_term_years: years,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 0.01 + 1e-9
    }

    #[test]
    fn thirty_year_fixed_example() {
        let loan = inputs(300_000.0, Some(60_000.0), 6.0, 30.0);
        assert_eq!(loan.loan_amount(), 240_000.0);
        assert!((loan.monthly_rate() - 0.005).abs() < 1e-12);
        assert_eq!(loan.months(), 360.0);

        let result = calculate(&loan);
        assert_eq!(result.monthly_payment, 1438.92);
        assert_eq!(result.total_payable, 518_011.2);
        assert_eq!(result.total_interest, 278_011.2);
    }

    proptest! {
        #[test]
        fn totals_are_consistent_with_payment(
            price in 10_000.0f64..5_000_000.0,
            down_share in 0.0f64..=0.9,
            rate in 0.05f64..25.0,
            years in 1.0f64..40.0,
        ) {
            let down = price * down_share;
            let result = calculate(&inputs(price, Some(down), rate, years));
            prop_assert!(result.monthly_payment > 0.0);
            prop_assert!(close(result.total_payable, result.monthly_payment * years * 12.0));
            prop_assert!(close(result.total_interest, result.total_payable - (price - down)));
        }

        #[test]
        fn missing_down_payment_is_zero(
            price in 1_000.0f64..5_000_000.0,
            rate in 0.05f64..25.0,
            years in 1u32..=40,
        ) {
            let years = f64::from(years);
            let without = calculate(&inputs(price, None, rate, years));
            let with_zero = calculate(&inputs(price, Some(0.0), rate, years));
            prop_assert_eq!(without, with_zero);
        }
    }

    #[test]
    fn zero_rate_is_nan() {
        let result = calculate(&inputs(300_000.0, Some(60_000.0), 0.0, 30.0));
        assert!(result.monthly_payment.is_nan());
        assert!(result.total_payable.is_nan());
        assert!(result.total_interest.is_nan());
    }

    #[test]
    fn zero_term_is_not_finite() {
        let result = calculate(&inputs(300_000.0, Some(60_000.0), 6.0, 0.0));
        assert!(result.monthly_payment.is_infinite());
        assert!(!result.total_interest.is_finite());
    }

    #[test]
    fn down_payment_above_price_flows_through() {
        let result = calculate(&inputs(100_000.0, Some(150_000.0), 5.0, 10.0));
        assert!(result.monthly_payment < 0.0);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(1.005_000_1), 1.01);
        assert_eq!(round_cents(2.344), 2.34);
        assert_eq!(round_cents(-2.346), -2.35);
        assert!(round_cents(f64::NAN).is_nan());
        assert_eq!(round_cents(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn rounds_the_stored_value_not_the_scaled_product() {
        // 0.015 and 1.005 are stored just below the half cent.
        assert_eq!(round_cents(0.015), 0.01);
        assert_eq!(round_cents(1.005), 1.0);
        assert_eq!(round_cents(1438.921_260_366_616_7), 1438.92);
        // 0.125 is an exact tie and goes away from zero.
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(2.5), 2.5);
    }

    #[test]
    fn parses_leniently() {
        assert_eq!(parse_amount("250000"), 250_000.0);
        assert_eq!(parse_amount(" 6.5 "), 6.5);
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("1.2.3"), 1.2);
        assert_eq!(parse_amount("-40"), -40.0);
        assert_eq!(parse_amount(".5"), 0.5);
        assert!(parse_amount("abc").is_nan());
        assert!(parse_amount(".").is_nan());
        assert!(parse_amount("-").is_nan());
    }

    #[test]
    fn parses_exponents_and_overflow() {
        assert_eq!(parse_amount("2e5"), 200_000.0);
        assert_eq!(parse_amount("2e5x"), 200_000.0);
        assert_eq!(parse_amount("2.5E-1"), 0.25);
        assert_eq!(parse_amount("3e"), 3.0);
        assert_eq!(parse_amount("3e+"), 3.0);
        assert_eq!(parse_amount("1e400"), f64::INFINITY);
        assert_eq!(parse_amount("-1e400"), f64::NEG_INFINITY);
        assert_eq!(parse_amount("Infinity"), f64::INFINITY);
        assert_eq!(parse_amount("-Infinityabc"), f64::NEG_INFINITY);
        assert!(parse_amount("inf").is_nan());
        assert!(parse_amount("NaN").is_nan());
    }

    #[test]
    fn formats_non_finite_values() {
        assert_eq!(format_amount(1438.92), "1438.92");
        assert_eq!(format_amount(518_011.2), "518011.20");
        assert_eq!(format_amount(f64::NAN), "NaN");
        assert_eq!(format_amount(f64::INFINITY), "Infinity");
        assert_eq!(format_amount(f64::NEG_INFINITY), "-Infinity");
    }
}
