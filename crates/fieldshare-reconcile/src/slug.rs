//! Path-safe file name slugs.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\-_.~]+").unwrap();
    static ref UNDERSCORES: Regex = Regex::new(r"_+").unwrap();
}

/// Turn a provider file or folder name into a path-safe slug: lower-cased,
/// whitespace as single underscores, restricted to `a-z 0-9 - _ . ~`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let underscored = WHITESPACE.replace_all(&lowered, "_");
    let stripped = DISALLOWED.replace_all(&underscored, "");
    let collapsed = UNDERSCORES.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Red Fox 2020.jpg", "red_fox_2020.jpg"; "spaces and case")]
    #[test_case("IMG_0001 (copy)", "img_0001_copy"; "punctuation stripped")]
    #[test_case("  edge  ", "edge"; "trimmed underscores")]
    #[test_case("a__b", "a_b"; "collapsed underscores")]
    fn slugs(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }
}
