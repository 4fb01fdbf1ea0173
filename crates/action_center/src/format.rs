//! French-locale number formatting shared by the plan export and the page
//! renderers.

/// Formats `value` with `decimals` fraction digits, a space as thousands
/// separator and a comma as decimal mark.
pub fn fr_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// kg → tonnes with one decimal, e.g. `15,4t`.
pub fn tonnes(kg: f64) -> String {
    format!("{}t", fr_number(kg / 1000.0, 1))
}

/// Euros → thousands without decimals, e.g. `50k€`.
pub fn kilo_euros(euros: f64) -> String {
    format!("{}k€", fr_number(euros / 1000.0, 0))
}

/// Ratio in [0,1] → whole percent, e.g. `85%`.
pub fn percent(ratio: f64) -> String {
    format!("{}%", fr_number(ratio * 100.0, 0))
}
