use thiserror::Error;

use perch_serde::SerdeErr;

/// Errors raised while building a property registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Kind names take part in the schema fingerprint and must be non-empty
    #[error("Object kind name must not be empty")]
    EmptyKindName,

    /// Two attributes on one kind were registered under the same name
    #[error("Attribute `{name}` registered twice on kind `{kind}`")]
    DuplicateAttribute { kind: &'static str, name: &'static str },

    /// Attribute indices are a single byte on the wire
    #[error("Kind `{kind}` registers {count} attributes, at most 255 are supported")]
    TooManyAttributes { kind: &'static str, count: usize },
}

/// Errors raised while decoding a diff or a full snapshot.
///
/// Every variant means the two peers disagree about an object's layout or the
/// stream is corrupt. None are recoverable: the object, and usually the whole
/// connection, must be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// A diff index did not strictly increase over its predecessor
    #[error("Diff index {index} does not follow previous index {previous}")]
    IndexNotIncreasing { previous: u8, index: u8 },

    /// A diff index pointed past the last network-visible attribute
    #[error("Diff index {index} exceeds last network index {last}")]
    IndexOutOfRange { index: u32, last: u8 },

    /// A diff claimed more changed attributes than the kind has
    #[error("Diff count {count} exceeds network attribute count {limit}")]
    CountOutOfRange { count: u32, limit: u8 },

    /// The underlying bit stream was malformed
    #[error("Malformed attribute stream: {0}")]
    Serde(#[from] SerdeErr),
}
