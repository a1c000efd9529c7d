//! # Saltbox
//!
//! NaCl secret box with caller-controlled buffer lifetimes.
//!
//! This crate provides:
//! - `XSalsa20-Poly1305` secret-box encryption (`pack`) and authenticated
//!   decryption (`open`), plus variants that carry the nonce inline
//! - A secure buffer arena that allocates, recycles, and deterministically
//!   erases every scratch buffer that touches key material or plaintext
//! - Constant-time tag comparison
//!
//! Key distribution and nonce uniqueness are the caller's responsibility:
//! this crate never generates randomness, derives keys, or persists anything.
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Security Level |
//! |----------|-----------|----------------|
//! | Stream Cipher | XSalsa20 | 256-bit key |
//! | One-Time Authenticator | Poly1305 | 128-bit tag |
//! | Tag Verification | Constant-time comparison | N/A |
//!
//! ## Buffer Discipline
//!
//! Every operation routes its scratch allocation through a caller-supplied
//! [`arena::SecureArena`] and returns an [`arena::BufferView`] aliasing the
//! tail of the scratch buffer. The view hides the construction's zero-padding
//! prefix; wiping the view through the arena erases the whole backing buffer,
//! hidden prefix included, and makes it available for reuse.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod arena;
pub mod constant_time;
pub mod error;
pub mod secret_box;

pub use error::Error;
