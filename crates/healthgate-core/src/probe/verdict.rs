//! Success predicate applied to a received response.

use crate::check::BodyPattern;

use super::error::AttemptError;

/// Compare a response against the expected status and optional body pattern.
/// Status is checked first; the body is only looked at when it matches.
pub fn judge(
    status: u32,
    body: &[u8],
    expected_status: u32,
    pattern: Option<&BodyPattern>,
) -> Result<(), AttemptError> {
    if status != expected_status {
        return Err(AttemptError::StatusMismatch {
            expected: expected_status,
            actual: status,
        });
    }
    if let Some(p) = pattern {
        if !p.matches_start(body) {
            return Err(AttemptError::BodyMismatch);
        }
    }
    Ok(())
}
