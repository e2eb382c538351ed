// =============================================================================
// Text rendering of a QuoteSummary
// =============================================================================
//
// Absent values always render as "N/A", never as 0.

use std::fmt::Write as _;

use crate::quote::QuoteSummary;

const NA: &str = "N/A";

/// Render the quote as a plain-text card (price, RSI, EMA sections).
pub fn render_quote(q: &QuoteSummary) -> String {
    let ind = &q.indicators;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "== Price Data ==");
    let _ = writeln!(out, "Symbol         {}", q.symbol);
    let _ = writeln!(out, "Current Price  ${}", group_thousands(q.current_price));
    let _ = writeln!(out, "24h Change     {}", format_change(q.change_24h));
    let _ = writeln!(out);
    let _ = writeln!(out, "== RSI Indicator ==");
    let _ = writeln!(out, "RSI (14)       {}", format_plain(ind.rsi14));
    let _ = writeln!(out, "Status         {}", display_or_na(ind.rsi_status()));
    let _ = writeln!(out);
    let _ = writeln!(out, "== EMA Indicators ==");
    let _ = writeln!(out, "EMA (9)        {}", format_price(ind.ema9));
    let _ = writeln!(out, "EMA (21)       {}", format_price(ind.ema21));
    let _ = writeln!(out, "EMA (50)       {}", format_price(ind.ema50));
    let _ = writeln!(out, "Trend          {}", display_or_na(ind.trend()));

    out
}

/// `▲ 1.23%` / `▼ 4.56%`; the arrow carries the sign.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c >= 0.0 => format!("▲ {:.2}%", c),
        Some(c) => format!("▼ {:.2}%", c.abs()),
        None => NA.to_string(),
    }
}

fn format_plain(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.2}"))
}

fn format_price(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("${v:.2}"))
}

fn display_or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

/// Two-decimal formatting with `,` thousands separators, e.g. `67,123.45`.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
