fn group_thousands(int_part: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a float as a rupee amount with thousands separators: ₹1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let with_commas = group_thousands(int_part);

    if negative {
        format!("-₹{with_commas}.{dec_part}")
    } else {
        format!("₹{with_commas}.{dec_part}")
    }
}

/// Compact amount for chart labels: ₹950, ₹1.2k, ₹3M
pub fn compact(val: f64) -> String {
    let abs = val.abs();
    let sign = if val < 0.0 { "-" } else { "" };
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 1000.0 {
        (abs / 1000.0, "k")
    } else {
        return format!("{sign}₹{}", abs.round() as u64);
    };
    if scaled == scaled.floor() {
        format!("{sign}₹{}{suffix}", scaled as u64)
    } else {
        format!("{sign}₹{scaled:.1}{suffix}")
    }
}

/// Ratio as a percentage with one decimal: 0.8 -> "80.0%"
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
