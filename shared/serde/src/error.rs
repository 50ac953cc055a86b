use thiserror::Error;

/// The bit stream could not be decoded: it ended early, or a value was outside
/// the range its encoding allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed or truncated bit stream")]
pub struct SerdeErr;
