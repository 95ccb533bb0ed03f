//! Field cleanup and derivation.
//!
//! The cleanups are deliberately narrow: the upstream markup pads some badges
//! with one leading space (`" Episode 12"`), and only that first space is
//! dropped. Inner whitespace is left alone.

use std::sync::LazyLock;

use regex::Regex;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("float prefix pattern compiles")
});

/// Derives the slug of a detail-page link.
///
/// Strips the `<base_url>anime/` prefix, then at most one trailing slash.
/// Links that do not start with the prefix keep their full text, and a slug
/// that is already derived comes back unchanged.
///
/// ```rust
/// use kaede_core::normalize::derive_id;
///
/// let base = "https://otakudesu.best/";
/// assert_eq!(derive_id("https://otakudesu.best/anime/naruto-sub-indo/", base), "naruto-sub-indo");
/// assert_eq!(derive_id("naruto-sub-indo", base), "naruto-sub-indo");
/// ```
pub fn derive_id(link: &str, base_url: &str) -> String {
    let prefix = format!("{base_url}anime/");
    let slug = link.strip_prefix(prefix.as_str()).unwrap_or(link);
    slug.strip_suffix('/').unwrap_or(slug).to_string()
}

/// Removes the first literal space, and only that one.
pub fn drop_first_space(text: &str) -> String {
    text.replacen(' ', "", 1)
}

/// Parses the leading decimal number of `text`.
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so `"8.52 / 10"` parses as `8.52`. Text with no numeric prefix yields
/// `f64::NAN` rather than an error.
pub fn parse_score(text: &str) -> f64 {
    FLOAT_PREFIX
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Parses a page path segment: its leading digits, with 1 for anything that
/// does not name a positive page.
///
/// Numbers too large for a `u64` saturate instead of falling back to 1, so an
/// oversized page is still requested and comes back empty.
pub fn parse_page(raw: &str) -> u64 {
    let page = raw
        .trim()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| acc.saturating_mul(10).saturating_add(u64::from(digit - b'0')));
    page.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BASE: &str = "https://otakudesu.best/";

    #[rstest]
    #[case("https://otakudesu.best/anime/one-piece-sub-indo/", "one-piece-sub-indo")]
    #[case("https://otakudesu.best/anime/one-piece-sub-indo", "one-piece-sub-indo")]
    #[case("https://mirror.example/anime/one-piece/", "https://mirror.example/anime/one-piece")]
    #[case("", "")]
    fn test_derive_id(#[case] link: &str, #[case] expected: &str) {
        assert_eq!(derive_id(link, BASE), expected);
    }

    #[rstest]
    #[case("https://otakudesu.best/anime/bleach/")]
    #[case("https://otakudesu.best/anime/spy-x-family-season-2-sub-indo/")]
    #[case("kimetsu")]
    fn test_derive_id_is_idempotent(#[case] link: &str) {
        let once = derive_id(link, BASE);
        assert_eq!(derive_id(&once, BASE), once);
    }

    #[test]
    fn test_drop_first_space_only_touches_first() {
        assert_eq!(drop_first_space(" Episode 12"), "Episode 12");
        assert_eq!(drop_first_space("Episode 12 "), "Episode12 ");
        assert_eq!(drop_first_space("Minggu"), "Minggu");
    }

    #[rstest]
    #[case("8.52", 8.52)]
    #[case(" 7", 7.0)]
    #[case("6.9 / 10", 6.9)]
    #[case("-1.5e1", -15.0)]
    #[case(".5", 0.5)]
    fn test_parse_score(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_score(text), expected);
    }

    #[rstest]
    #[case("")]
    #[case("N/A")]
    #[case("   ")]
    #[case("score 8")]
    fn test_parse_score_nan(#[case] text: &str) {
        assert!(parse_score(text).is_nan());
    }

    #[rstest]
    #[case("1", 1)]
    #[case("12", 12)]
    #[case("3abc", 3)]
    #[case("0", 1)]
    #[case("abc", 1)]
    #[case("-2", 1)]
    #[case("", 1)]
    #[case("4294967296", 4_294_967_296)]
    #[case("99999999999999999999999", u64::MAX)]
    fn test_parse_page(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_page(raw), expected);
    }
}
