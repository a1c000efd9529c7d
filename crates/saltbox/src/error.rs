//! Secret-box error types.

use thiserror::Error;

/// Errors returned by secret-box operations.
///
/// Error payloads never carry key material, plaintext, or tag bytes; lengths
/// are the only data reported. Allocation failure is not represented here:
/// scratch allocations are small and bounded, and failure to allocate aborts
/// through the global allocation handler.
#[derive(Debug, Error)]
pub enum Error {
    /// Tag verification failed during `open`; no plaintext was released and
    /// the scratch buffer was wiped before this error propagated
    #[error("ciphertext authentication failed")]
    AuthFailure,

    /// A fixed-size input or output had the wrong length
    #[error("size mismatch for {what}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Which input or output failed validation
        what: &'static str,
        /// Required length in bytes (the minimum, for embedded-nonce inputs)
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}
