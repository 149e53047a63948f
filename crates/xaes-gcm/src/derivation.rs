//! Per-message subkey derivation
//!
//! ```text
//! L   = AES-256_K(0^128)
//! K1  = dbl(L)
//! M1  = 0x00 || 0x01 || 'X' || 0x00 || N[0..12]
//! M2  = 0x00 || 0x02 || 'X' || 0x00 || N[0..12]
//! Kx  = AES-256_K(M1 ^ K1) || AES-256_K(M2 ^ K1)
//! ```
//!
//! This is one step of AES-CMAC over a single full block, run twice with a
//! counter byte. The output depends only on the long-term key and the nonce
//! prefix.

use aes::{
    Aes256,
    cipher::{BlockEncrypt, KeyInit},
};
use zeroize::Zeroizing;

use crate::{
    KEY_SIZE, NONCE_PREFIX_SIZE,
    secret::{BLOCK_SIZE, DerivationScratch, Wiped},
};

/// Domain separation tag identifying XAES-256-GCM
const DOMAIN_TAG: u8 = b'X';

/// Reduction constant for doubling in GF(2^128) (x^128 + x^7 + x^2 + x + 1)
const REDUCTION: u8 = 0x87;

/// Derive the 32-byte AES-256-GCM subkey for a nonce prefix.
///
/// Returns the subkey wrapped in [`Zeroizing`] so it is wiped when dropped.
///
/// # Security
///
/// - Deterministic: same (key, prefix) always gives the same subkey
/// - Does not depend on the nonce suffix, plaintext, or associated data
/// - All intermediates are zeroed before returning
pub fn derive_subkey(
    nonce_prefix: &[u8; NONCE_PREFIX_SIZE],
    key: &[u8; KEY_SIZE],
) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut subkey = Zeroizing::new([0u8; KEY_SIZE]);
    let mut scratch = DerivationScratch::default();
    derive_into(&mut subkey, &mut scratch, nonce_prefix, key);
    subkey
}

/// Derive a subkey into `subkey`, using `scratch` for intermediates.
///
/// `scratch` is zeroed on return.
pub(crate) fn derive_into(
    subkey: &mut [u8; KEY_SIZE],
    scratch: &mut DerivationScratch,
    nonce_prefix: &[u8; NONCE_PREFIX_SIZE],
    key: &[u8; KEY_SIZE],
) {
    let mut guard = Wiped::new(scratch);
    let scratch = &mut *guard;
    let cipher = Aes256::new(key.into());

    scratch.k1 = [0u8; BLOCK_SIZE];
    cipher.encrypt_block((&mut scratch.k1).into());
    double(&mut scratch.k1);

    message_block(&mut scratch.m1, 0x01, nonce_prefix);
    message_block(&mut scratch.m2, 0x02, nonce_prefix);

    xor_in_place(&mut scratch.m1, &scratch.k1);
    xor_in_place(&mut scratch.m2, &scratch.k1);

    cipher.encrypt_block((&mut scratch.m1).into());
    cipher.encrypt_block((&mut scratch.m2).into());

    subkey[..BLOCK_SIZE].copy_from_slice(&scratch.m1);
    subkey[BLOCK_SIZE..].copy_from_slice(&scratch.m2);
}

/// Multiply a block by x in GF(2^128), as in CMAC subkey generation.
///
/// The block is a big-endian 128-bit integer. It is shifted left by one bit
/// and, if the bit shifted out was set, the last byte is XORed with `0x87`.
/// The reduction is applied with a mask rather than a branch.
pub(crate) fn double(block: &mut [u8; BLOCK_SIZE]) {
    let msb = block[0] >> 7;

    for i in 0..BLOCK_SIZE - 1 {
        block[i] = (block[i] << 1) | (block[i + 1] >> 7);
    }

    block[BLOCK_SIZE - 1] = (block[BLOCK_SIZE - 1] << 1) ^ (REDUCTION & msb.wrapping_neg());
}

/// Build a derivation input block.
///
/// Layout:
/// - byte 0: 0x00
/// - byte 1: counter (0x01 or 0x02)
/// - byte 2: 'X'
/// - byte 3: 0x00
/// - bytes 4-15: nonce prefix
fn message_block(
    block: &mut [u8; BLOCK_SIZE],
    counter: u8,
    nonce_prefix: &[u8; NONCE_PREFIX_SIZE],
) {
    block[0] = 0x00;
    block[1] = counter;
    block[2] = DOMAIN_TAG;
    block[3] = 0x00;
    block[4..].copy_from_slice(nonce_prefix);
}

fn xor_in_place(block: &mut [u8; BLOCK_SIZE], mask: &[u8; BLOCK_SIZE]) {
    for (b, m) in block.iter_mut().zip(mask) {
        *b ^= m;
    }
}
