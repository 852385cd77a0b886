//! Pure request-type and option matching logic.
//!
//! Everything here is deterministic string matching with no DOM access, so
//! it is the one part of the pipeline that can be tested without a browser.
//! The matching chain mirrors how an operator reads the portal: known phrase
//! first, then individual trigger words, then raw text, then loose word
//! overlap.

use optout_browser::OptionLabel;

/// Keywords for delete/erasure requests.
pub const DELETE_KEYWORDS: &[&str] = &["delete", "removal", "erase", "remove"];

/// Keywords for copy/access requests.
pub const COPY_KEYWORDS: &[&str] = &["copy", "access", "download", "obtain"];

/// Keywords for account closure requests.
pub const CLOSE_KEYWORDS: &[&str] = &["close", "deactivate", "cancel", "account"];

/// Keywords for sale/sharing opt-out requests.
pub const OPT_OUT_KEYWORDS: &[&str] = &["opt", "sell", "sale", "share"];

/// Keywords for correction requests.
pub const CORRECT_KEYWORDS: &[&str] = &["correct", "update", "rectify", "change"];

/// Known request-type phrases mapped to their keyword sets.
///
/// Scanned in order; the first phrase contained in the normalized request
/// string wins.
const PHRASE_TABLE: &[(&str, &[&str])] = &[
    ("request to delete my data", DELETE_KEYWORDS),
    ("delete my data", DELETE_KEYWORDS),
    ("request a copy of my data", COPY_KEYWORDS),
    ("copy of my data", COPY_KEYWORDS),
    ("close my account", CLOSE_KEYWORDS),
    ("do not sell", OPT_OUT_KEYWORDS),
    ("opt out of sale", OPT_OUT_KEYWORDS),
    ("correct my data", CORRECT_KEYWORDS),
];

/// Words too generic to drive fuzzy option matching.
const STOPWORDS: &[&str] = &[
    "data", "request", "please", "information", "would", "like", "want", "your", "that", "this",
    "from", "with", "about",
];

/// Derive the keyword set for a free-text request type.
///
/// Normalizes to lowercase, scans the static phrase table for a contained
/// phrase (first hit wins), then falls through a chain of single-word
/// heuristics. Anything unrecognized defaults to the copy keywords.
#[must_use]
pub fn derive_keywords(request_type: &str) -> &'static [&'static str] {
    let normalized = request_type.trim().to_lowercase();

    for (phrase, keywords) in PHRASE_TABLE {
        if normalized.contains(phrase) {
            return keywords;
        }
    }

    if normalized.contains("delete") || normalized.contains("remov") || normalized.contains("erase")
    {
        DELETE_KEYWORDS
    } else if normalized.contains("close")
        || normalized.contains("deactivate")
        || normalized.contains("cancel")
        || normalized.contains("account")
    {
        CLOSE_KEYWORDS
    } else if normalized.contains("copy")
        || normalized.contains("access")
        || normalized.contains("download")
    {
        COPY_KEYWORDS
    } else if normalized.contains("opt")
        || normalized.contains("sell")
        || normalized.contains("sale")
    {
        OPT_OUT_KEYWORDS
    } else if normalized.contains("correct")
        || normalized.contains("update")
        || normalized.contains("rectify")
    {
        CORRECT_KEYWORDS
    } else {
        COPY_KEYWORDS
    }
}

/// Decide whether a sub-option cell value means "select this option".
///
/// Empty and no-like values skip the option; yes-like values and any other
/// non-empty string (e.g. "Student data (if any)") select it.
#[must_use]
pub fn should_select_option(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    !matches!(
        normalized.as_str(),
        "" | "nan" | "none" | "no" | "false" | "0" | "n"
    )
}

/// Split a request-type string into its meaningful words: longer than three
/// characters and not a stopword.
#[must_use]
pub fn meaningful_words(request_type: &str) -> Vec<String> {
    request_type
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(w))
        .map(ToString::to_string)
        .collect()
}

/// Pick the on-page option matching a request type.
///
/// Three escalating strategies, first element match wins in each:
/// 1. label contains one of the derived keywords
/// 2. label and raw request-type text contain each other
/// 3. label contains one of the request type's meaningful words
///
/// Returns the matched option's harvest index.
#[must_use]
pub fn match_option(options: &[OptionLabel], request_type: &str) -> Option<usize> {
    let keywords = derive_keywords(request_type);
    for option in options {
        let label = option.label.to_lowercase();
        if keywords.iter().any(|k| label.contains(k)) {
            return Some(option.index);
        }
    }

    let normalized = request_type.trim().to_lowercase();
    if !normalized.is_empty() {
        for option in options {
            let label = option.label.to_lowercase();
            if !label.is_empty() && (label.contains(&normalized) || normalized.contains(&label)) {
                return Some(option.index);
            }
        }
    }

    let words = meaningful_words(request_type);
    for option in options {
        let label = option.label.to_lowercase();
        if words.iter().any(|w| label.contains(w)) {
            return Some(option.index);
        }
    }

    None
}

/// Pick the on-page option for a sub-option keyword set.
#[must_use]
pub fn match_sub_option(options: &[OptionLabel], keywords: &[String]) -> Option<usize> {
    for option in options {
        let label = option.label.to_lowercase();
        if keywords.iter().any(|k| label.contains(&k.to_lowercase())) {
            return Some(option.index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(index: usize, label: &str) -> OptionLabel {
        OptionLabel {
            index,
            label: label.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_phrase_table_delete() {
        assert_eq!(
            derive_keywords("Request to delete my data"),
            &["delete", "removal", "erase", "remove"]
        );
    }

    #[test]
    fn test_phrase_table_copy() {
        assert_eq!(
            derive_keywords("Request a copy of my data"),
            COPY_KEYWORDS
        );
    }

    #[test]
    fn test_phrase_table_close() {
        assert_eq!(derive_keywords("Close my account"), CLOSE_KEYWORDS);
    }

    #[test]
    fn test_close_word_fallback() {
        // Contains close-family words but matches no table phrase
        for input in [
            "please close everything",
            "deactivate it",
            "cancel the subscription",
            "my account should go",
        ] {
            assert_eq!(derive_keywords(input), CLOSE_KEYWORDS, "input: {input}");
        }
    }

    #[test]
    fn test_delete_word_fallback() {
        assert_eq!(derive_keywords("erase everything now"), DELETE_KEYWORDS);
        assert_eq!(derive_keywords("removal of records"), DELETE_KEYWORDS);
    }

    #[test]
    fn test_opt_out_fallback() {
        assert_eq!(derive_keywords("do not sell my info"), OPT_OUT_KEYWORDS);
    }

    #[test]
    fn test_default_is_copy() {
        assert_eq!(derive_keywords(""), COPY_KEYWORDS);
        assert_eq!(derive_keywords("something unrelated"), COPY_KEYWORDS);
    }

    #[test]
    fn test_should_select_option_falsy() {
        for input in ["", "nan", "none", "no", "false", "0", "n", "NaN", "NO", "  n  "] {
            assert!(!should_select_option(input), "input: {input:?}");
        }
    }

    #[test]
    fn test_should_select_option_truthy() {
        for input in ["yes", "true", "1", "y", "YES", "Y"] {
            assert!(should_select_option(input), "input: {input:?}");
        }
    }

    #[test]
    fn test_should_select_option_other_non_empty() {
        for input in ["Student data (if any)", "parent records", "x"] {
            assert!(should_select_option(input), "input: {input:?}");
        }
    }

    #[test]
    fn test_meaningful_words() {
        let words = meaningful_words("Request to delete my data immediately");
        assert_eq!(words, vec!["delete", "immediately"]);
    }

    #[test]
    fn test_match_option_by_keyword() {
        let options = vec![
            option(0, "Request a copy of my personal data"),
            option(1, "Delete my personal data"),
        ];
        assert_eq!(match_option(&options, "Request to delete my data"), Some(1));
    }

    #[test]
    fn test_match_option_exact_fallback() {
        // No keyword hit, but the label contains the raw request text
        let options = vec![option(0, "Portability: export everything")];
        assert_eq!(match_option(&options, "portability"), Some(0));
    }

    #[test]
    fn test_match_option_fuzzy_fallback() {
        let options = vec![
            option(0, "Something else entirely"),
            option(1, "Restrict processing of records"),
        ];
        // "restrict" survives the stopword filter and hits option 1
        assert_eq!(
            match_option(&options, "I would like you to restrict things"),
            Some(1)
        );
    }

    #[test]
    fn test_match_option_none() {
        let options = vec![option(0, "Unrelated choice")];
        assert_eq!(match_option(&options, "zzzz"), None);
    }

    #[test]
    fn test_match_option_first_wins() {
        let options = vec![
            option(3, "Delete student data"),
            option(7, "Delete parent data"),
        ];
        assert_eq!(match_option(&options, "Request to delete my data"), Some(3));
    }

    #[test]
    fn test_match_sub_option() {
        let options = vec![
            option(0, "Student data (if any)"),
            option(1, "Parent data (if any)"),
        ];
        let keywords = vec!["parent".to_string()];
        assert_eq!(match_sub_option(&options, &keywords), Some(1));
        assert_eq!(match_sub_option(&options, &["educator".to_string()]), None);
    }
}
