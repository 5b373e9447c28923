//! Watermark matchers.

use lazy_static::lazy_static;
use regex::Regex;

/// The marketing phrase the source site injects into page text.
pub const WATERMARK_PHRASE: &str = "OceanofPDF.com";

lazy_static! {
    /// Case-insensitive match of the phrase with zero-or-more whitespace
    /// between every character, defeating watermarks that space the letters
    /// out to dodge exact-string search.
    pub static ref TEXT_PATTERN: Regex =
        Regex::new(&spaced_pattern(WATERMARK_PHRASE)).unwrap();

    static ref URI_NEEDLE: String = WATERMARK_PHRASE.to_lowercase();
}

fn spaced_pattern(phrase: &str) -> String {
    let letters: Vec<String> = phrase
        .chars()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect();
    format!("(?i){}", letters.join(r"\s*"))
}

/// Whether a hyperlink target points at the watermark domain.
pub fn uri_matches(uri: &str) -> bool {
    uri.to_lowercase().contains(URI_NEEDLE.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_plain_phrase() {
        assert!(TEXT_PATTERN.is_match("OceanofPDF.com"));
        assert!(TEXT_PATTERN.is_match("oceanofpdf.com"));
        assert!(TEXT_PATTERN.is_match("OCEANOFPDF.COM"));
    }

    #[test]
    fn matches_spaced_out_variants() {
        assert!(TEXT_PATTERN.is_match("O c e a n o f P D F . c o m"));
        assert!(TEXT_PATTERN.is_match("Ocean ofPDF.c om"));
        assert!(TEXT_PATTERN.is_match("O\tc\te\ta\tn\to\tf\tP\tD\tF\t.\tc\to\tm"));
    }

    #[test]
    fn dot_is_literal() {
        assert!(!TEXT_PATTERN.is_match("OceanofPDFxcom"));
    }

    #[test]
    fn ignores_unrelated_text() {
        assert!(!TEXT_PATTERN.is_match("The Great Gatsby, Chapter 1"));
        assert!(!TEXT_PATTERN.is_match(""));
    }

    #[test]
    fn uri_matching_is_case_insensitive_containment() {
        assert!(uri_matches("https://OceanofPDF.com/book"));
        assert!(uri_matches("HTTP://OCEANOFPDF.COM"));
        assert!(!uri_matches("https://example.com"));
        assert!(!uri_matches(""));
    }
}
