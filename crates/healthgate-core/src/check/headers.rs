//! Request headers sent with every attempt.

use super::error::ConfigError;

/// Ordered header map with case-insensitive names. Inserting a name that is
/// already present replaces its value (last write wins) but keeps the
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a header, replacing any existing value for `name`.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let name = name.trim();
        let value = value.trim();
        if !is_token(name) {
            return Err(ConfigError::InvalidHeaderName(name.to_string()));
        }
        if value.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
            return Err(ConfigError::InvalidHeaderValue(name.to_string()));
        }
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Split a `Name: value` line as given on a command line.
    pub fn parse_line(line: &str) -> Result<(String, String), ConfigError> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedHeader(line.to_string()))?;
        Ok((name.trim().to_string(), value.trim().to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Header lines in the form libcurl expects. `Name:` with nothing after
    /// the colon tells curl to drop the header, so empty values use `Name;`.
    pub(crate) fn curl_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(k, v)| {
            if v.is_empty() {
                format!("{};", k)
            } else {
                format!("{}: {}", k, v)
            }
        })
    }
}

/// RFC 9110 token characters.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
