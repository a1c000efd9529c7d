//! Property-based tests for the secret box.
//!
//! Exercises the construction over arbitrary keys, nonces, and messages,
//! with message lengths chosen to straddle the 64-byte cipher-block
//! boundary and the 32-byte padding boundary.

use proptest::prelude::*;
use saltbox::arena::SecureArena;
use saltbox::secret_box::{self, NONCE_SIZE, TAG_SIZE};

proptest! {
    #[test]
    fn prop_roundtrip(
        message in proptest::collection::vec(any::<u8>(), 0..300),
        key in proptest::array::uniform32(any::<u8>()),
        nonce in proptest::array::uniform24(any::<u8>()),
    ) {
        let mut arena = SecureArena::new();

        let ciphertext = secret_box::pack(&message, &nonce, &key, &mut arena).unwrap();
        prop_assert_eq!(ciphertext.len(), message.len() + TAG_SIZE);

        let plaintext = secret_box::open(&ciphertext, &nonce, &key, &mut arena).unwrap();
        prop_assert_eq!(&*plaintext, message.as_slice());
    }

    #[test]
    fn prop_tamper_rejected(
        message in proptest::collection::vec(any::<u8>(), 1..128),
        key in proptest::array::uniform32(any::<u8>()),
        nonce in proptest::array::uniform24(any::<u8>()),
        flip_index: prop::sample::Index,
        flip_bit in 0u8..8,
    ) {
        let mut arena = SecureArena::new();

        let ciphertext = secret_box::pack(&message, &nonce, &key, &mut arena).unwrap();
        let mut forged = ciphertext.to_vec();
        let i = flip_index.index(forged.len());
        forged[i] ^= 1 << flip_bit;

        prop_assert!(secret_box::open(&forged, &nonce, &key, &mut arena).is_err());
    }

    #[test]
    fn prop_wrong_nonce_rejected(
        message in proptest::collection::vec(any::<u8>(), 0..128),
        key in proptest::array::uniform32(any::<u8>()),
        nonce in proptest::array::uniform24(any::<u8>()),
        other_nonce in proptest::array::uniform24(any::<u8>()),
    ) {
        prop_assume!(nonce != other_nonce);
        let mut arena = SecureArena::new();

        let ciphertext = secret_box::pack(&message, &nonce, &key, &mut arena).unwrap();
        prop_assert!(secret_box::open(&ciphertext, &other_nonce, &key, &mut arena).is_err());
    }

    #[test]
    fn prop_embedded_nonce_roundtrip(
        message in proptest::collection::vec(any::<u8>(), 0..128),
        key in proptest::array::uniform32(any::<u8>()),
        nonce in proptest::array::uniform24(any::<u8>()),
    ) {
        let mut arena = SecureArena::new();

        let mut wire = vec![0u8; NONCE_SIZE + TAG_SIZE + message.len()];
        secret_box::pack_with_nonce_into(&mut wire, &message, &nonce, &key, &mut arena).unwrap();

        let plaintext = secret_box::open_with_nonce(&wire, &key, &mut arena).unwrap();
        prop_assert_eq!(&*plaintext, message.as_slice());
    }

    #[test]
    fn prop_arena_reuse_does_not_corrupt(
        first in proptest::collection::vec(any::<u8>(), 0..96),
        second in proptest::collection::vec(any::<u8>(), 0..96),
        key in proptest::array::uniform32(any::<u8>()),
        nonce in proptest::array::uniform24(any::<u8>()),
    ) {
        // Run two pack/open cycles through one arena so the second cycle
        // lands on recycled storage.
        let mut arena = SecureArena::new();

        let c1 = secret_box::pack(&first, &nonce, &key, &mut arena).unwrap();
        let p1 = secret_box::open(&c1, &nonce, &key, &mut arena).unwrap();
        prop_assert_eq!(&*p1, first.as_slice());
        arena.wipe_all([c1, p1]);

        let c2 = secret_box::pack(&second, &nonce, &key, &mut arena).unwrap();
        let p2 = secret_box::open(&c2, &nonce, &key, &mut arena).unwrap();
        prop_assert_eq!(&*p2, second.as_slice());
    }
}
