//! Number formatting for progress output.

/// Format a ZEC amount with thousands separators and two decimals,
/// e.g. `1234567.891` → `1,234,567.89 ZEC`.
pub fn zec(amount: f64) -> String {
    format!("{} ZEC", with_separators(&format!("{amount:.2}")))
}

/// Insert comma separators into the integer part of a formatted number.
fn with_separators(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
