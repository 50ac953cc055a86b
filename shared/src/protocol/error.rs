use thiserror::Error;

/// Errors that can occur while building a Protocol or creating objects from it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// The same Rust type was registered as an object kind twice
    #[error("Object kind `{name}` is already registered")]
    DuplicateKind { name: &'static str },

    /// An object of a type that was never registered
    #[error("Object type `{type_name}` is not registered with the Protocol")]
    UnknownKind { type_name: &'static str },

    /// An incoming net id that doesn't map to any registered kind
    #[error("No object kind is registered under net id {net_id}")]
    UnknownNetId { net_id: u16 },

    /// The sender built a different attribute layout for this kind
    #[error("Attribute layout of `{kind}` differs between peers: local fingerprint {local:08x}, remote {remote:08x}")]
    SchemaMismatch {
        kind: &'static str,
        local: u32,
        remote: u32,
    },
}
