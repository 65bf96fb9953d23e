use thiserror::Error;

/// Errors from document store operations (used by the trait definitions in
/// docstate-core).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The liveness probe failed before any mutation was attempted.
    ///
    /// The message is part of the host-facing contract and must render
    /// exactly as "Server not available".
    #[error("Server not available")]
    Unavailable,

    /// A find/insert/delete failed after a successful probe. Not retried;
    /// fatal for the current reconciliation.
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors from host-boundary parameter validation. Callers catch these
/// before a reconcile call is ever constructed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("document must not be empty")]
    EmptyDocument,

    #[error("document must be a mapping, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid state '{0}', expected 'present' or 'absent'")]
    InvalidState(String),
}

/// Errors from the text cipher filter pair.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("input is not valid base64: {0}")]
    Base64(String),

    #[error("ciphertext too short to contain an initialization vector")]
    CiphertextTooShort,

    #[error("ciphertext length is not a multiple of the cipher block size")]
    NotBlockAligned,

    #[error("padding invalid after decryption (wrong key or corrupted input)")]
    BadPadding,

    #[error("decrypted data is not valid UTF-8")]
    NotUtf8,
}
