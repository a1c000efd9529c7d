//! `XSalsa20-Poly1305` secret box.
//!
//! Authenticated symmetric encryption for a single message under a 32-byte
//! key and a 24-byte nonce. Features include:
//! - 16 bytes of ciphertext overhead (the Poly1305 tag), and nothing else
//! - A zero-padding construction that derives the one-time authenticator key
//!   from the cipher's own keystream, so no separate key-derivation buffer
//!   is ever allocated
//! - Scratch buffers allocated from a caller-supplied arena and returned as
//!   pad-hiding views, so the caller controls when sensitive bytes die
//! - Variants that carry the nonce inline in the emitted bytes
//!
//! ## Wire Layout
//!
//! - [`pack`] output: `tag(16) ‖ body(N)`
//! - [`pack_with_nonce_into`] output: `nonce(24) ‖ tag(16) ‖ body(N)`
//! - [`open`] / [`open_with_nonce`] accept the mirror images
//!
//! ## Construction
//!
//! The message is laid into a scratch buffer behind 32 zero bytes and the
//! whole buffer is XORed with the XSalsa20 keystream. The keystream over the
//! zero block *is* the one-time Poly1305 key; the tag is computed over the
//! encrypted body with that key and placed directly in front of the body,
//! leaving a 16-byte zero prefix that the returned view hides. Decryption
//! recomputes the one-time key from the same keystream, verifies the tag in
//! constant time over the still-encrypted body, and only then recovers the
//! plaintext.
//!
//! ## Usage
//!
//! ```ignore
//! use saltbox::arena::SecureArena;
//! use saltbox::secret_box;
//!
//! let mut arena = SecureArena::new();
//! let ciphertext = secret_box::pack(b"attack at dawn", &nonce, &key, &mut arena)?;
//! let plaintext = secret_box::open(&ciphertext, &nonce, &key, &mut arena)?;
//! arena.wipe_all([ciphertext, plaintext]);
//! ```

use poly1305::Poly1305;
use poly1305::universal_hash::KeyInit;
use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::{XNonce, XSalsa20};

use crate::arena::{BufferView, SecureArena};
use crate::constant_time;
use crate::error::Error;

/// Secret key size (32 bytes / 256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce size (24 bytes / 192 bits). Uniqueness per key is the caller's
/// obligation; it is not enforced here.
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// Zero padding prepended to the message before streaming. The keystream
/// over this block becomes the one-time Poly1305 key.
const ZEROBYTES: usize = 32;

/// Zero prefix remaining in front of the tag in the padded ciphertext.
const BOXZEROBYTES: usize = 16;

/// Encrypt and authenticate `message` under `key` and `nonce`.
///
/// Returns a view of `message.len() + 16` bytes laid out as
/// `tag(16) ‖ body(N)`. The view's backing buffer keeps a hidden 16-byte
/// zero prefix in front of the tag; wiping the view through `arena` erases
/// the prefix together with the visible bytes.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] if `key` is not 32 bytes or `nonce` is
/// not 24 bytes.
pub fn pack(
    message: &[u8],
    nonce: &[u8],
    key: &[u8],
    arena: &mut SecureArena,
) -> Result<BufferView, Error> {
    check_key_nonce(key, nonce)?;

    let mut view = arena.allocate(ZEROBYTES + message.len());
    let buf = view.backing_mut();
    buf[ZEROBYTES..].copy_from_slice(message);
    seal_in_place(buf, nonce, key);

    Ok(view.with_offset(BOXZEROBYTES))
}

/// Verify and decrypt a `tag(16) ‖ body(N)` ciphertext.
///
/// Returns a view of `ciphertext.len() - 16` bytes holding the recovered
/// message behind a hidden 32-byte zero prefix.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] for a bad key/nonce length or a
/// ciphertext shorter than the 16-byte tag, and [`Error::AuthFailure`] when
/// tag verification fails. On authentication failure the scratch buffer is
/// wiped before the error propagates; no plaintext bytes, partial or
/// otherwise, survive.
pub fn open(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8],
    arena: &mut SecureArena,
) -> Result<BufferView, Error> {
    check_key_nonce(key, nonce)?;
    if ciphertext.len() < TAG_SIZE {
        return Err(Error::SizeMismatch {
            what: "ciphertext",
            expected: TAG_SIZE,
            actual: ciphertext.len(),
        });
    }

    let (tag, body) = ciphertext.split_at(TAG_SIZE);
    let mut supplied = [0u8; TAG_SIZE];
    supplied.copy_from_slice(tag);

    let mut view = arena.allocate(ZEROBYTES + body.len());
    let buf = view.backing_mut();
    buf[ZEROBYTES..].copy_from_slice(body);

    if !open_in_place(buf, &supplied, nonce, key) {
        arena.wipe(view);
        return Err(Error::AuthFailure);
    }

    Ok(view.with_offset(ZEROBYTES))
}

/// Encrypt `message` and write `nonce(24) ‖ tag(16) ‖ body(N)` into `dst`.
///
/// `dst` must be exactly `24 + 16 + message.len()` bytes. The intermediate
/// scratch buffer is wiped back into `arena` before returning, so nothing
/// sensitive outlives the call except `dst` itself.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] for a bad key/nonce length or a `dst` of
/// any other length.
pub fn pack_with_nonce_into(
    dst: &mut [u8],
    message: &[u8],
    nonce: &[u8],
    key: &[u8],
    arena: &mut SecureArena,
) -> Result<(), Error> {
    check_key_nonce(key, nonce)?;
    let needed = NONCE_SIZE + TAG_SIZE + message.len();
    if dst.len() != needed {
        return Err(Error::SizeMismatch {
            what: "output buffer",
            expected: needed,
            actual: dst.len(),
        });
    }

    let ciphertext = pack(message, nonce, key, arena)?;
    dst[..NONCE_SIZE].copy_from_slice(nonce);
    dst[NONCE_SIZE..].copy_from_slice(&ciphertext);
    arena.wipe(ciphertext);

    Ok(())
}

/// Decrypt an input laid out as `nonce(24) ‖ tag(16) ‖ body(N)`.
///
/// Reads the nonce from the first 24 bytes and behaves as [`open`] on the
/// remainder.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] if the input is shorter than 40 bytes or
/// the key length is wrong, and [`Error::AuthFailure`] on tag mismatch.
pub fn open_with_nonce(
    input: &[u8],
    key: &[u8],
    arena: &mut SecureArena,
) -> Result<BufferView, Error> {
    if input.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::SizeMismatch {
            what: "input",
            expected: NONCE_SIZE + TAG_SIZE,
            actual: input.len(),
        });
    }

    let (nonce, ciphertext) = input.split_at(NONCE_SIZE);
    open(ciphertext, nonce, key, arena)
}

/// Seal construction over a padded scratch buffer.
///
/// On entry `buf` is `32 + N` bytes: 32 zeros, then the message. On exit it
/// is `0(16) ‖ tag(16) ‖ body(N)`; the one-time key bytes are gone.
fn seal_in_place(buf: &mut [u8], nonce: &[u8], key: &[u8]) {
    let mut cipher = xsalsa20(key, nonce);
    cipher.apply_keystream(buf);

    let (head, body) = buf.split_at_mut(ZEROBYTES);
    let mac = Poly1305::new(poly1305::Key::from_slice(head));
    let tag: [u8; TAG_SIZE] = mac.compute_unpadded(body).into();

    head[BOXZEROBYTES..].copy_from_slice(&tag);
    head[..BOXZEROBYTES].fill(0);
}

/// Open construction over a padded scratch buffer.
///
/// On entry `buf` is `32 + N` bytes: 32 zeros, then the encrypted body.
/// Returns `false` without decrypting anything if `tag` does not match; on
/// success `buf` is `0(32) ‖ message(N)`.
fn open_in_place(buf: &mut [u8], tag: &[u8; TAG_SIZE], nonce: &[u8], key: &[u8]) -> bool {
    let mut cipher = xsalsa20(key, nonce);
    let (head, body) = buf.split_at_mut(ZEROBYTES);

    // Keystream over the zero block recovers the one-time key.
    cipher.apply_keystream(head);
    let mac = Poly1305::new(poly1305::Key::from_slice(head));
    let expected: [u8; TAG_SIZE] = mac.compute_unpadded(body).into();

    if !constant_time::verify_16(&expected, tag) {
        return false;
    }

    // The cipher position is already past the key block; the keystream
    // continues seamlessly over the body, short final block included.
    cipher.apply_keystream(body);
    head.fill(0);

    true
}

fn xsalsa20(key: &[u8], nonce: &[u8]) -> XSalsa20 {
    XSalsa20::new(salsa20::Key::from_slice(key), XNonce::from_slice(nonce))
}

fn check_key_nonce(key: &[u8], nonce: &[u8]) -> Result<(), Error> {
    if key.len() != KEY_SIZE {
        return Err(Error::SizeMismatch {
            what: "key",
            expected: KEY_SIZE,
            actual: key.len(),
        });
    }
    if nonce.len() != NONCE_SIZE {
        return Err(Error::SizeMismatch {
            what: "nonce",
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }
    Ok(())
}
