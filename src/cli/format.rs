//! Text rendering for amounts, progress and goal names.

use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use savings_domain::Goal;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" | "CNY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// `1234.5` in USD renders as `$1,234.50`; unknown codes are used as a prefix.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{} {grouped}.{fraction}", currency.to_ascii_uppercase()),
    }
}

/// One decimal place, e.g. `37.5%`.
pub fn format_percentage(percentage: Decimal) -> String {
    format!("{:.1}%", percentage.round_dp(1))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Fixed-width bar for a `0..=100` percentage.
pub fn progress_bar(percentage: Decimal, width: usize) -> String {
    let clamped = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar.push(']');
    bar
}

/// Goal name tinted with its palette color.
pub fn paint_goal_name(goal: &Goal) -> String {
    let (r, g, b) = goal.color.rgb();
    goal.name.truecolor(r, g, b).bold().to_string()
}

/// Short id form shown next to contributions.
pub fn short_id(id: uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
