/// Header key used for column lookup: BOM and zero-width characters removed,
/// whitespace collapsed, lowercased.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Cell text with surrounding whitespace and embedded quotes removed.
pub(crate) fn clean_text(value: &str) -> String {
    value.trim().replace('"', "")
}

/// Lenient decimal parse for prices and areas: `"$1,250.50"` -> `1250.5`.
/// Blank or unparseable cells read as zero.
pub(crate) fn parse_amount(value: &str) -> f64 {
    let cleaned: String = clean_text(value)
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => 0.0,
    }
}

/// Lenient whole-number parse; fractional input is truncated and negatives
/// read as zero.
pub(crate) fn parse_count(value: &str) -> u32 {
    let amount = parse_amount(value);
    if amount <= 0.0 {
        0
    } else if amount >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        amount.trunc() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_ignore_bom_spacing_and_case() {
        assert_eq!(normalize_header("\u{feff}List   Price "), "list price");
        assert_eq!(normalize_header("DAYS ON\tMARKET"), "days on market");
    }

    #[test]
    fn amounts_strip_currency_noise() {
        assert_eq!(parse_amount("$1,250.50"), 1_250.5);
        assert_eq!(parse_amount("\"189,900\""), 189_900.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("call agent"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
    }

    #[test]
    fn counts_truncate_fractions() {
        assert_eq!(parse_count("3.0"), 3);
        assert_eq!(parse_count("2.5"), 2);
        assert_eq!(parse_count("1,024"), 1_024);
        assert_eq!(parse_count("-4"), 0);
        assert_eq!(parse_count("n/a"), 0);
    }
}
