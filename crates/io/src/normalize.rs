//! Defensive field normalization.
//!
//! The engine expects identity fields already coerced: uppercase names,
//! normalized house numbers, non-negative ages with 0 for unknown. Roll
//! sheets come out of OCR and manual transcription, so every parser here
//! degrades to a default instead of failing.

use std::sync::OnceLock;

use regex::Regex;

use rollscope_engine::model::Gender;

/// Digits and slashes with at most one trailing letter, e.g. `12/5A`.
fn house_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9/]+)([A-Za-z]?)$").expect("static pattern"))
}

/// Normalize a raw house number.
///
/// Commas are dropped, `-` becomes `/` (so `12-5` and `12/5` group
/// together), repeated slashes collapse, and a single trailing letter is
/// uppercased. Anything not matching the digits/slashes shape normalizes to
/// empty, which downstream grouping treats as "no house number".
pub fn normalize_house_no(raw: &str) -> String {
    let mut house = raw.trim().replace(',', "").replace('-', "/");
    while house.contains("//") {
        house = house.replace("//", "/");
    }

    match house_pattern().captures(&house) {
        Some(caps) => format!("{}{}", &caps[1], caps[2].to_uppercase()),
        None => String::new(),
    }
}

/// Collapse runs of whitespace, strip trailing OCR artifacts, uppercase.
pub fn clean_name(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    joined
        .trim_end_matches(['-', '~'])
        .trim()
        .to_uppercase()
}

/// Age parser that accepts integer and spreadsheet-float forms.
/// Negative, non-numeric, or absent values coerce to 0 (unknown).
pub fn parse_age(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n as u32,
        _ => 0,
    }
}

pub fn parse_gender(raw: &str) -> Gender {
    match raw.trim().to_uppercase().as_str() {
        "M" | "MALE" => Gender::Male,
        "F" | "FEMALE" => Gender::Female,
        _ => Gender::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_numbers_normalize() {
        assert_eq!(normalize_house_no("12/5"), "12/5");
        assert_eq!(normalize_house_no(" 12-5 "), "12/5");
        assert_eq!(normalize_house_no("12//5"), "12/5");
        assert_eq!(normalize_house_no("1,234"), "1234");
        assert_eq!(normalize_house_no("12/5a"), "12/5A");
        assert_eq!(normalize_house_no("7"), "7");
    }

    #[test]
    fn invalid_house_numbers_become_empty() {
        assert_eq!(normalize_house_no(""), "");
        assert_eq!(normalize_house_no("A12"), "");
        assert_eq!(normalize_house_no("12 B 5"), "");
        assert_eq!(normalize_house_no("N/A"), "");
        assert_eq!(normalize_house_no("12AB"), "");
    }

    #[test]
    fn names_are_cleaned_and_uppercased() {
        assert_eq!(clean_name("  raj   kumar "), "RAJ KUMAR");
        assert_eq!(clean_name("SELVI AMMAL-~"), "SELVI AMMAL");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn ages_coerce_to_zero_on_garbage() {
        assert_eq!(parse_age("52"), 52);
        assert_eq!(parse_age("52.0"), 52);
        assert_eq!(parse_age(" 18 "), 18);
        assert_eq!(parse_age("-3"), 0);
        assert_eq!(parse_age("abc"), 0);
        assert_eq!(parse_age(""), 0);
    }

    #[test]
    fn genders_parse_loosely() {
        assert_eq!(parse_gender("Male"), Gender::Male);
        assert_eq!(parse_gender("f"), Gender::Female);
        assert_eq!(parse_gender("FEMALE"), Gender::Female);
        assert_eq!(parse_gender("third"), Gender::Unknown);
        assert_eq!(parse_gender(""), Gender::Unknown);
    }
}
