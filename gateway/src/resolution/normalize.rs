//! Deterministic, pure text-normalization functions (§4.5).
//!
//! Applied to a product's `name` on every write so that `normalized_name`,
//! `extracted_volume_ml`, and `extracted_weight_g` stay consistent with it
//! (§8 invariant).

const FILLER_TOKENS: &[&str] = &[
    "soft", "drink", "bottle", "pack", "packet", "box", "can", "tin", "jar", "pouch",
];

/// Lower-case, collapse non-alphanumeric runs to single spaces, drop filler
/// tokens, canonicalize unit spellings, collapse whitespace, trim.
pub fn normalize_name(s: &str) -> String {
    let lowered = s.to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut last_was_space = true;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            collapsed.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            collapsed.push(' ');
            last_was_space = true;
        }
    }

    let tokens: Vec<String> = collapsed
        .split_whitespace()
        .filter(|t| !FILLER_TOKENS.contains(t))
        .map(canonicalize_unit_token)
        .collect();

    tokens.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonicalize_unit_token(token: &str) -> String {
    match token {
        "litre" | "liter" | "ltr" | "lt" => "l".to_string(),
        "millilitre" | "milliliter" | "milli" => "ml".to_string(),
        "kilogram" | "kilo" => "kg".to_string(),
        "gram" | "gm" => "g".to_string(),
        other => other.to_string(),
    }
}

/// Parse a trailing/leading volume expression and return it in millilitres.
/// `<number>(l|ltr|lt|litre|liter)` → ml × 1000; `<number>(ml|millilitre|milliliter)` → ml.
pub fn extract_volume_ml(s: &str) -> Option<f64> {
    let lowered = s.to_lowercase();
    if let Some((n, _)) = extract_number_before_unit(&lowered, &["l", "ltr", "lt", "litre", "liter"]) {
        return Some(n * 1000.0);
    }
    if let Some((n, _)) = extract_number_before_unit(&lowered, &["ml", "millilitre", "milliliter"]) {
        return Some(n);
    }
    None
}

/// Parse a trailing/leading weight expression and return it in grams.
/// `<number>(kg|kilogram|kilo)` → g × 1000; `<number>(g|gram|gm)` → g.
pub fn extract_weight_g(s: &str) -> Option<f64> {
    let lowered = s.to_lowercase();
    if let Some((n, _)) = extract_number_before_unit(&lowered, &["kg", "kilogram", "kilo"]) {
        return Some(n * 1000.0);
    }
    if let Some((n, _)) = extract_number_before_unit(&lowered, &["g", "gram", "gm"]) {
        return Some(n);
    }
    None
}

/// Scan for `<number><optional space><unit>` where `unit` is one of `units`,
/// longest unit first so e.g. `"kg"` is tried before `"g"`.
fn extract_number_before_unit(s: &str, units: &[&str]) -> Option<(f64, &'static str)> {
    let mut sorted_units: Vec<&str> = units.to_vec();
    sorted_units.sort_by_key(|u| std::cmp::Reverse(u.len()));

    let bytes: Vec<char> = s.chars().collect();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            let mut end = i;
            let mut seen_dot = false;
            while end < bytes.len()
                && (bytes[end].is_ascii_digit() || (bytes[end] == '.' && !seen_dot))
            {
                if bytes[end] == '.' {
                    seen_dot = true;
                }
                end += 1;
            }
            let number_str: String = bytes[start..end].iter().collect();
            let mut rest = end;
            while rest < bytes.len() && bytes[rest] == ' ' {
                rest += 1;
            }
            for unit in &sorted_units {
                let unit_chars: Vec<char> = unit.chars().collect();
                if rest + unit_chars.len() <= bytes.len() {
                    let candidate: String = bytes[rest..rest + unit_chars.len()].iter().collect();
                    if candidate == *unit {
                        let boundary_ok = rest + unit_chars.len() == bytes.len()
                            || !bytes[rest + unit_chars.len()].is_alphanumeric();
                        if boundary_ok {
                            if let Ok(n) = number_str.parse::<f64>() {
                                return Some((n, ""));
                            }
                        }
                    }
                }
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_filler_tokens_and_canonicalizes_units() {
        assert_eq!(
            normalize_name("Coca-Cola Soft Drink 1 Litre Bottle"),
            "coca cola 1 l"
        );
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_name("  Coke   1000ML "), "coke 1000ml");
    }

    #[test]
    fn extract_volume_handles_litres() {
        assert_eq!(extract_volume_ml("Coca-Cola 1 Litre"), Some(1000.0));
    }

    #[test]
    fn extract_volume_handles_millilitres() {
        assert_eq!(extract_volume_ml("Coke 1000ml"), Some(1000.0));
    }

    #[test]
    fn extract_volume_returns_none_when_absent() {
        assert_eq!(extract_volume_ml("Plain Widget"), None);
    }

    #[test]
    fn extract_weight_handles_kilograms() {
        assert_eq!(extract_weight_g("Rice 2kg"), Some(2000.0));
    }

    #[test]
    fn extract_weight_handles_grams() {
        assert_eq!(extract_weight_g("Sugar 500g"), Some(500.0));
    }
}
