//! Brazilian-locale number formatting for reports
//!
//! Thousands separator `.` and decimal separator `,`, e.g. `R$ 1.234,56`
//! or `0,5000%`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format `value` with `places` decimals in Brazilian notation.
///
/// # Examples
/// ```
/// use poupanca::utils::format_decimal_br;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_decimal_br(dec!(1234.5), 2), "1.234,50");
/// assert_eq!(format_decimal_br(dec!(-0.12345), 4), "-0,1235");
/// ```
pub fn format_decimal_br(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;
    let formatted = format!("{:.*}", places as usize, rounded.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    match decimal_part {
        Some(decimals) => format!("{}{},{}", sign, with_separators, decimals),
        None => format!("{}{}", sign, with_separators),
    }
}

/// Format as Brazilian Real: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use poupanca::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1005.5075)), "R$ 1.005,51");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value, 2))
}

/// Monthly rate as published by BCB, four decimals: "0,5000%"
pub fn format_rate(value: Decimal) -> String {
    format!("{}%", format_decimal_br(value, 4))
}

/// Growth factor shown as accumulated percentage: 1.0055075 -> "0,5508%"
pub fn format_factor_as_percent(factor: Decimal) -> String {
    format_rate((factor - Decimal::ONE) * Decimal::ONE_HUNDRED)
}
