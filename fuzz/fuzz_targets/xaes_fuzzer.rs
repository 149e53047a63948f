//! Fuzz target for XAES-256-GCM
//!
//! Drives subkey derivation, encryption and decryption with adversarial
//! inputs.
//!
//! # Strategy
//!
//! - Arbitrary nonce and key lengths (valid and invalid)
//! - Arbitrary plaintext and associated data
//! - Arbitrary ciphertext fed straight into decrypt
//! - Single-bit corruption of valid ciphertexts
//!
//! # Invariants
//!
//! - No operation panics
//! - Derivation is deterministic
//! - Encrypt/decrypt roundtrip succeeds for valid sizes
//! - Size errors are reported for invalid sizes, never authentication errors
//! - Corrupted ciphertext fails authentication and yields a zeroed buffer

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xaes_gcm::{
    decrypt, derive_subkey, encrypt, XaesError, KEY_SIZE, NONCE_PREFIX_SIZE, NONCE_SIZE, TAG_SIZE,
};

#[derive(Debug, Clone, Arbitrary)]
struct XaesScenario {
    /// Key material; only the valid-length variant reaches the cipher
    key: KeyMaterial,
    /// Nonce bytes (arbitrary length)
    nonce: Vec<u8>,
    /// Message to seal
    plaintext: Vec<u8>,
    /// Associated data
    associated_data: Vec<u8>,
    /// Raw bytes handed to decrypt as if they were a ciphertext
    forged: Vec<u8>,
    /// Bit position to flip in the sealed message
    flip: u16,
}

#[derive(Debug, Clone, Arbitrary)]
enum KeyMaterial {
    Valid([u8; KEY_SIZE]),
    Arbitrary(Vec<u8>),
}

impl KeyMaterial {
    fn as_bytes(&self) -> &[u8] {
        match self {
            KeyMaterial::Valid(b) => b,
            KeyMaterial::Arbitrary(b) => b,
        }
    }
}

fuzz_target!(|scenario: XaesScenario| {
    let key = scenario.key.as_bytes();
    let sizes_valid = key.len() == KEY_SIZE && scenario.nonce.len() == NONCE_SIZE;

    // INVARIANT 1: Derivation is deterministic
    if let (Ok(prefix), Ok(key)) = (
        <&[u8; NONCE_PREFIX_SIZE]>::try_from(scenario.nonce.get(..NONCE_PREFIX_SIZE).unwrap_or(&[])),
        <&[u8; KEY_SIZE]>::try_from(key),
    ) {
        assert_eq!(*derive_subkey(prefix, key), *derive_subkey(prefix, key));
    }

    // INVARIANT 2: Encrypt never panics; size errors only for invalid sizes
    let mut ciphertext = vec![0u8; scenario.plaintext.len() + TAG_SIZE];
    let sealed = encrypt(
        &mut ciphertext,
        &scenario.plaintext,
        &scenario.nonce,
        key,
        &scenario.associated_data,
    );
    match sealed {
        Ok(()) => assert!(sizes_valid, "invalid sizes must be rejected"),
        Err(XaesError::InvalidSize { .. }) => assert!(!sizes_valid),
        Err(e) => panic!("unexpected encrypt error: {e}"),
    }

    // INVARIANT 3: Decrypt of arbitrary bytes never panics
    let mut scratch = vec![0xAAu8; scenario.forged.len().saturating_sub(TAG_SIZE)];
    if let Err(XaesError::AuthenticationFailed) =
        decrypt(&mut scratch, &scenario.forged, &scenario.nonce, key, &scenario.associated_data)
    {
        assert!(scratch.iter().all(|&b| b == 0), "failed decrypt must zero output");
    }

    if !sizes_valid {
        return;
    }

    // INVARIANT 4: Roundtrip succeeds
    let mut plaintext = vec![0u8; scenario.plaintext.len()];
    decrypt(&mut plaintext, &ciphertext, &scenario.nonce, key, &scenario.associated_data)
        .expect("decryption of valid ciphertext must succeed");
    assert_eq!(plaintext, scenario.plaintext, "decrypted message must match original");

    // INVARIANT 5: Single-bit corruption fails authentication
    let bit = usize::from(scenario.flip) % (ciphertext.len() * 8);
    ciphertext[bit / 8] ^= 1u8 << (bit % 8);

    let mut plaintext = vec![0xAAu8; scenario.plaintext.len()];
    let result =
        decrypt(&mut plaintext, &ciphertext, &scenario.nonce, key, &scenario.associated_data);
    assert_eq!(result, Err(XaesError::AuthenticationFailed));
    assert!(plaintext.iter().all(|&b| b == 0), "failed decrypt must zero output");
});
