//! Expected body pattern, matched from the first byte of the response.

use regex::bytes::Regex;

/// A regular expression that must match at offset 0 of the response body.
///
/// The match does not have to consume the whole body: `ok` matches
/// `"okay, proceeding"` but not `"not ok"`. Use `.*ok` to search anywhere.
#[derive(Debug, Clone)]
pub struct BodyPattern {
    source: String,
    anchored: Regex,
}

impl BodyPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Compile the bare pattern first so an unbalanced `)` cannot escape
        // the anchoring group below.
        Regex::new(pattern)?;
        let anchored = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            anchored,
        })
    }

    /// True if the pattern matches starting at the beginning of `body`.
    pub fn matches_start(&self, body: &[u8]) -> bool {
        self.anchored.is_match(body)
    }

    /// The pattern as configured, without the anchor.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
