//! Display formatting for dashboard figures
//!
//! Money and counts use Brazilian conventions (`.` groups thousands, `,`
//! separates decimals). Percentages and fixed decimals keep a `.` point.
//! Non-finite inputs format as zero.

/// Round half away from zero to `places` decimals
fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Group an integer with `.` every three digits
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

/// `R$ 1.234,56`
///
/// # Examples
///
/// ```
/// use dineboard_core::format::format_currency;
///
/// assert_eq!(format_currency(1234.56), "R$ 1.234,56");
/// assert_eq!(format_currency(0.0), "R$ 0,00");
/// ```
pub fn format_currency(value: f64) -> String {
    let value = finite(value);
    let cents = (value.abs() * 100.0).round() as u64;
    let rounded_sign = if cents == 0 { "" } else { sign(value) };
    format!(
        "{}R$ {},{:02}",
        rounded_sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

/// `R$ 1.235` (no cents)
pub fn format_currency_whole(value: f64) -> String {
    let value = finite(value);
    let whole = value.abs().round() as u64;
    let rounded_sign = if whole == 0 { "" } else { sign(value) };
    format!("{}R$ {}", rounded_sign, group_thousands(whole))
}

/// Grouped number with up to three decimals, trailing zeros dropped
///
/// `1234` → `1.234`, `2.5` → `2,5`
pub fn format_number(value: f64) -> String {
    let value = round_to(finite(value), 3);
    let millis = (value.abs() * 1000.0).round() as u64;
    let whole = millis / 1000;
    let frac = millis % 1000;
    let rounded_sign = if millis == 0 { "" } else { sign(value) };

    if frac == 0 {
        return format!("{}{}", rounded_sign, group_thousands(whole));
    }
    let frac = format!("{:03}", frac);
    format!(
        "{}{},{}",
        rounded_sign,
        group_thousands(whole),
        frac.trim_end_matches('0')
    )
}

/// Grouped integer count
pub fn format_count(value: u64) -> String {
    group_thousands(value)
}

/// Fixed decimals with a `.` point (`2.35`, 1 → `2.4`)
pub fn format_decimal(value: f64, places: u32) -> String {
    let value = round_to(finite(value), places);
    format!("{:.*}", places as usize, value)
}

/// Fraction as percent: `0.123` → `12.3%`
pub fn format_ratio_percent(ratio: f64) -> String {
    format_percent(finite(ratio) * 100.0)
}

/// Value already in percent: `12.34` → `12.3%`
pub fn format_percent(percent: f64) -> String {
    format!("{}%", format_decimal(percent, 1))
}

/// Seconds as whole minutes, rounded down: `1260` → `21min`
pub fn format_minutes(seconds: f64) -> String {
    let seconds = finite(seconds);
    if seconds <= 0.0 {
        return "0min".to_string();
    }
    format!("{}min", (seconds / 60.0).floor() as u64)
}

/// Growth indicator: `↑ 5.2%` or `↓ 3.0%`
pub fn format_growth(percent: f64) -> String {
    let percent = finite(percent);
    let arrow = if percent >= 0.0 { '↑' } else { '↓' };
    format!("{} {}%", arrow, format_decimal(percent.abs(), 1))
}

/// Chart axis label: thousands collapse to `k` (`12500` → `13k`)
pub fn format_axis_thousands(value: f64) -> String {
    let value = finite(value);
    if value >= 1000.0 {
        format!("{}k", (value / 1000.0).round() as u64)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
