//! Property-based tests for XAES-256-GCM
//!
//! These tests verify the fundamental invariants of the construction:
//!
//! 1. **Round-trip**: decrypt(encrypt(m)) == m for all inputs
//! 2. **Composition**: XAES-256-GCM equals AES-256-GCM under the derived
//!    subkey and the nonce suffix
//! 3. **Determinism**: subkey depends only on (key, nonce prefix)
//! 4. **Tamper sensitivity**: any single bit flip fails authentication and
//!    leaves the plaintext buffer zeroed
//! 5. **Size enforcement**: off-by-one and empty buffers are rejected

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use proptest::prelude::*;
use xaes_gcm::{
    KEY_SIZE, NONCE_PREFIX_SIZE, NONCE_SIZE, SizeRequirement, TAG_SIZE, XaesError, decrypt,
    derive_subkey, encrypt,
};

fn seal(plaintext: &[u8], nonce: &[u8], key: &[u8], aad: &[u8]) -> Vec<u8> {
    let mut ciphertext = vec![0u8; plaintext.len() + TAG_SIZE];
    encrypt(&mut ciphertext, plaintext, nonce, key, aad).unwrap();
    ciphertext
}

/// Decrypt into a buffer pre-filled with garbage so zeroing is observable.
fn open(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8],
    aad: &[u8],
) -> (Result<(), XaesError>, Vec<u8>) {
    let mut plaintext = vec![0xEEu8; ciphertext.len().saturating_sub(TAG_SIZE)];
    let result = decrypt(&mut plaintext, ciphertext, nonce, key, aad);
    (result, plaintext)
}

fn prefix(nonce: &[u8; NONCE_SIZE]) -> [u8; NONCE_PREFIX_SIZE] {
    let mut out = [0u8; NONCE_PREFIX_SIZE];
    out.copy_from_slice(&nonce[..NONCE_PREFIX_SIZE]);
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
        aad in prop::collection::vec(any::<u8>(), 0..100),
    ) {
        let ciphertext = seal(&plaintext, &nonce, &key, &aad);
        prop_assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);

        let (result, decrypted) = open(&ciphertext, &nonce, &key, &aad);
        prop_assert_eq!(result, Ok(()));
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn prop_matches_aes_gcm_under_derived_subkey(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        aad in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let subkey = derive_subkey(&prefix(&nonce), &key);
        let cipher = Aes256Gcm::new((&*subkey).into());
        let suffix = Nonce::from_slice(&nonce[NONCE_PREFIX_SIZE..]);
        let expected = cipher.encrypt(suffix, Payload { msg: &plaintext, aad: &aad }).unwrap();

        prop_assert_eq!(seal(&plaintext, &nonce, &key, &aad), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_derivation_deterministic(
        key in any::<[u8; KEY_SIZE]>(),
        nonce_prefix in any::<[u8; NONCE_PREFIX_SIZE]>(),
    ) {
        let a = derive_subkey(&nonce_prefix, &key);
        let b = derive_subkey(&nonce_prefix, &key);
        prop_assert_eq!(*a, *b);
    }

    #[test]
    fn prop_subkey_ignores_nonce_suffix(
        key in any::<[u8; KEY_SIZE]>(),
        nonce_a in any::<[u8; NONCE_SIZE]>(),
        suffix_b in any::<[u8; NONCE_SIZE - NONCE_PREFIX_SIZE]>(),
    ) {
        let mut nonce_b = nonce_a;
        nonce_b[NONCE_PREFIX_SIZE..].copy_from_slice(&suffix_b);

        let a = derive_subkey(&prefix(&nonce_a), &key);
        let b = derive_subkey(&prefix(&nonce_b), &key);
        prop_assert_eq!(*a, *b);
    }

    #[test]
    fn prop_ciphertext_bit_flip_fails(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..128),
        bit in any::<prop::sample::Index>(),
    ) {
        let mut ciphertext = seal(&plaintext, &nonce, &key, b"");
        let bit = bit.index(ciphertext.len() * 8);
        ciphertext[bit / 8] ^= 1u8 << (bit % 8);

        let (result, decrypted) = open(&ciphertext, &nonce, &key, b"");
        prop_assert_eq!(result, Err(XaesError::AuthenticationFailed));
        prop_assert!(decrypted.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_nonce_bit_flip_fails(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        bit in 0usize..NONCE_SIZE * 8,
    ) {
        let ciphertext = seal(&plaintext, &nonce, &key, b"");
        let mut tampered = nonce;
        tampered[bit / 8] ^= 1u8 << (bit % 8);

        let (result, decrypted) = open(&ciphertext, &tampered, &key, b"");
        prop_assert_eq!(result, Err(XaesError::AuthenticationFailed));
        prop_assert!(decrypted.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_key_bit_flip_fails(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        bit in 0usize..KEY_SIZE * 8,
    ) {
        let ciphertext = seal(&plaintext, &nonce, &key, b"");
        let mut tampered = key;
        tampered[bit / 8] ^= 1u8 << (bit % 8);

        let (result, decrypted) = open(&ciphertext, &nonce, &tampered, b"");
        prop_assert_eq!(result, Err(XaesError::AuthenticationFailed));
        prop_assert!(decrypted.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_aad_bit_flip_fails(
        key in any::<[u8; KEY_SIZE]>(),
        nonce in any::<[u8; NONCE_SIZE]>(),
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        aad in prop::collection::vec(any::<u8>(), 1..64),
        bit in any::<prop::sample::Index>(),
    ) {
        let ciphertext = seal(&plaintext, &nonce, &key, &aad);
        let mut tampered = aad.clone();
        let bit = bit.index(tampered.len() * 8);
        tampered[bit / 8] ^= 1u8 << (bit % 8);

        let (result, decrypted) = open(&ciphertext, &nonce, &key, &tampered);
        prop_assert_eq!(result, Err(XaesError::AuthenticationFailed));
        prop_assert!(decrypted.iter().all(|&b| b == 0));
    }
}

#[test]
fn empty_and_missing_aad_are_equivalent() {
    let key = [0x11u8; KEY_SIZE];
    let nonce = [0x22u8; NONCE_SIZE];

    let with_empty = seal(b"message", &nonce, &key, b"");
    let with_empty_vec = seal(b"message", &nonce, &key, &Vec::new());

    assert_eq!(with_empty, with_empty_vec);
}

#[test]
fn encrypt_rejects_nonce_boundaries() {
    let key = [0u8; KEY_SIZE];
    for len in [0, NONCE_SIZE - 1, NONCE_SIZE + 1] {
        let nonce = vec![0u8; len];
        let mut ciphertext = [0u8; TAG_SIZE];

        let result = encrypt(&mut ciphertext, b"", &nonce, &key, b"");
        assert_eq!(
            result,
            Err(XaesError::InvalidSize {
                parameter: "nonce",
                expected: SizeRequirement::Exactly(NONCE_SIZE),
                actual: len,
            }),
            "nonce length {len}"
        );
    }
}

#[test]
fn encrypt_rejects_key_boundaries() {
    let nonce = [0u8; NONCE_SIZE];
    for len in [0, KEY_SIZE - 1, KEY_SIZE + 1] {
        let key = vec![0u8; len];
        let mut ciphertext = [0u8; TAG_SIZE];

        let result = encrypt(&mut ciphertext, b"", &nonce, &key, b"");
        assert_eq!(
            result,
            Err(XaesError::InvalidSize {
                parameter: "key",
                expected: SizeRequirement::Exactly(KEY_SIZE),
                actual: len,
            }),
            "key length {len}"
        );
    }
}

#[test]
fn encrypt_rejects_ciphertext_boundaries() {
    let key = [0u8; KEY_SIZE];
    let nonce = [0u8; NONCE_SIZE];
    let plaintext = [0u8; 10];
    let required = plaintext.len() + TAG_SIZE;

    for len in [0, required - 1, required + 1] {
        let mut ciphertext = vec![0u8; len];

        let result = encrypt(&mut ciphertext, &plaintext, &nonce, &key, b"");
        assert_eq!(
            result,
            Err(XaesError::InvalidSize {
                parameter: "ciphertext",
                expected: SizeRequirement::Exactly(required),
                actual: len,
            }),
            "ciphertext length {len}"
        );
    }
}

#[test]
fn decrypt_rejects_nonce_and_key_boundaries() {
    let ciphertext = seal(b"data", &[0u8; NONCE_SIZE], &[0u8; KEY_SIZE], b"");
    let mut plaintext = [0u8; 4];

    for len in [0, NONCE_SIZE - 1, NONCE_SIZE + 1] {
        let result = decrypt(&mut plaintext, &ciphertext, &vec![0u8; len], &[0u8; KEY_SIZE], b"");
        assert!(
            matches!(result, Err(XaesError::InvalidSize { parameter: "nonce", actual, .. }) if actual == len)
        );
    }

    for len in [0, KEY_SIZE - 1, KEY_SIZE + 1] {
        let result = decrypt(&mut plaintext, &ciphertext, &[0u8; NONCE_SIZE], &vec![0u8; len], b"");
        assert!(
            matches!(result, Err(XaesError::InvalidSize { parameter: "key", actual, .. }) if actual == len)
        );
    }
}

#[test]
fn decrypt_rejects_ciphertext_and_plaintext_boundaries() {
    let key = [0u8; KEY_SIZE];
    let nonce = [0u8; NONCE_SIZE];

    for len in [0, TAG_SIZE - 1] {
        let mut plaintext = [0u8; 0];
        let result = decrypt(&mut plaintext, &vec![0u8; len], &nonce, &key, b"");
        assert_eq!(
            result,
            Err(XaesError::InvalidSize {
                parameter: "ciphertext",
                expected: SizeRequirement::AtLeast(TAG_SIZE),
                actual: len,
            })
        );
    }

    let ciphertext = seal(b"0123456789", &nonce, &key, b"");
    for len in [0, 9, 11] {
        let mut plaintext = vec![0u8; len];
        let result = decrypt(&mut plaintext, &ciphertext, &nonce, &key, b"");
        assert_eq!(
            result,
            Err(XaesError::InvalidSize {
                parameter: "plaintext",
                expected: SizeRequirement::Exactly(10),
                actual: len,
            })
        );
    }
}

#[test]
fn tag_only_ciphertext_with_wrong_tag_fails() {
    let mut plaintext = [0u8; 0];
    let result = decrypt(&mut plaintext, &[0u8; TAG_SIZE], &[0u8; NONCE_SIZE], &[0u8; KEY_SIZE], b"");
    assert_eq!(result, Err(XaesError::AuthenticationFailed));
}
