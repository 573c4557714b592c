use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::errors::Result;

/// A regular expression matched against the whole of a node name.
///
/// `NamePattern::new("item|entry")` matches `item` and `entry` but not
/// `items`, unlike a plain [`Regex::is_match`].
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// # Errors
    ///
    /// `Error::Pattern` if `pattern` is not a valid regular expression on its
    /// own, e.g. `a)|(?:b`, which only parses once wrapped in a group.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)?;
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as written, without the anchoring.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for NamePattern {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rstest::rstest;

    #[rstest]
    #[case("item", "item", true)]
    #[case("item", "items", false)]
    #[case("item", "an_item", false)]
    #[case("item|entry", "entry", true)]
    #[case("item|entry", "entry_x", false)]
    #[case("h[1-6]", "h3", true)]
    #[case("h[1-6]", "h7", false)]
    #[case("#.*", "#text", true)]
    #[case(".*", "", true)]
    fn test_full_name_match(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        let pattern = NamePattern::new(pattern).unwrap();
        assert_eq!(pattern.matches(name), expected);
    }

    #[rstest]
    #[case("item(")]
    #[case("a)|(?:b")]
    #[case("x)(y")]
    fn test_invalid_pattern(#[case] pattern: &str) {
        let result = NamePattern::new(pattern);
        assert!(matches!(result.unwrap_err(), Error::Pattern(_)));
    }

    #[test]
    fn test_from_str_keeps_source() {
        let pattern: NamePattern = "a|b".parse().unwrap();
        assert_eq!(pattern.as_str(), "a|b");
        assert_eq!(pattern.to_string(), "a|b");
    }
}
