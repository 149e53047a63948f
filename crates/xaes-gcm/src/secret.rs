//! Scoped secret buffers
//!
//! Every secret produced while sealing or opening a message lives in a
//! [`SecretWorkspace`] on the caller's stack. The workspace is borrowed
//! through a [`Wiped`] guard, so it is zeroed when the guard leaves scope on
//! any path: success, rejected sizes, failed authentication, or unwinding.

use std::ops::{Deref, DerefMut};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::KEY_SIZE;

/// AES block size in bytes
pub(crate) const BLOCK_SIZE: usize = 16;

/// Scratch blocks used by one subkey derivation.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub(crate) struct DerivationScratch {
    /// Zero block, encrypted in place to `L`, then doubled in place to `K1`
    pub(crate) k1: [u8; BLOCK_SIZE],
    /// First derivation block, masked with `K1` and encrypted in place
    pub(crate) m1: [u8; BLOCK_SIZE],
    /// Second derivation block, masked with `K1` and encrypted in place
    pub(crate) m2: [u8; BLOCK_SIZE],
}

/// All secret material touched by a single encrypt or decrypt call.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub(crate) struct SecretWorkspace {
    /// Per-message AES-256-GCM key
    pub(crate) subkey: [u8; KEY_SIZE],
    /// Derivation intermediates
    pub(crate) scratch: DerivationScratch,
}

#[cfg(test)]
impl DerivationScratch {
    pub(crate) fn filled(byte: u8) -> Self {
        Self { k1: [byte; BLOCK_SIZE], m1: [byte; BLOCK_SIZE], m2: [byte; BLOCK_SIZE] }
    }

    pub(crate) fn is_zeroed(&self) -> bool {
        self.k1.iter().chain(&self.m1).chain(&self.m2).all(|&b| b == 0)
    }
}

#[cfg(test)]
impl SecretWorkspace {
    pub(crate) fn filled(byte: u8) -> Self {
        Self { subkey: [byte; KEY_SIZE], scratch: DerivationScratch::filled(byte) }
    }

    pub(crate) fn is_zeroed(&self) -> bool {
        self.subkey.iter().all(|&b| b == 0) && self.scratch.is_zeroed()
    }
}

/// Mutable borrow of a secret that is zeroed when the guard is dropped.
pub(crate) struct Wiped<'a, T: Zeroize>(&'a mut T);

impl<'a, T: Zeroize> Wiped<'a, T> {
    pub(crate) fn new(secret: &'a mut T) -> Self {
        Self(secret)
    }
}

impl<T: Zeroize> Deref for Wiped<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

impl<T: Zeroize> DerefMut for Wiped<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.0
    }
}

impl<T: Zeroize> Drop for Wiped<'_, T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
