use std::fmt::Write;

use rust_decimal::Decimal;

use super::form::{TransitionRejected, VisibilityPolicy};
use super::pricing::{round_money, Quote, QuoteLineItem};

/// Format an amount as US dollars with thousands separators, e.g. `$1,206.90`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{cents}")
}

pub fn display_amount(line: &QuoteLineItem) -> String {
    if line.included {
        "Included".to_string()
    } else {
        format_money(line.amount)
    }
}

pub fn render_quote(quote: &Quote) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", quote.service_label);

    if quote.is_empty() {
        let _ = writeln!(output, "  Choose a service to see pricing.");
    }

    let width = quote
        .lines
        .iter()
        .map(|line| line.label.len())
        .max()
        .unwrap_or(0)
        .max("Total".len());

    for line in &quote.lines {
        let _ = writeln!(
            output,
            "  {:<width$}  {:>12}",
            line.label,
            display_amount(line),
        );
    }
    let _ = writeln!(
        output,
        "  {:<width$}  {:>12}",
        "Total",
        format_money(quote.total),
    );
    output
}

pub fn render_visibility(policy: &VisibilityPolicy) -> String {
    let mut output = String::new();
    for group in policy.visible_groups() {
        let marker = if policy.is_enforced(group) { " *" } else { "" };
        let _ = writeln!(output, "  - {}{}", group.label(), marker);
    }
    output
}

pub fn render_rejection(rejection: &TransitionRejected) -> String {
    match rejection {
        TransitionRejected::MissingFields(fields) => {
            let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
            format!("Please complete: {}", labels.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_is_grouped_and_fixed_to_cents() {
        assert_eq!(format_money(dec!(0)), "$0.00");
        assert_eq!(format_money(dec!(15)), "$15.00");
        assert_eq!(format_money(dec!(759.9)), "$759.90");
        assert_eq!(format_money(dec!(1206.9)), "$1,206.90");
        assert_eq!(format_money(dec!(1234567.005)), "$1,234,567.01");
        assert_eq!(format_money(dec!(-42.5)), "-$42.50");
    }
}
