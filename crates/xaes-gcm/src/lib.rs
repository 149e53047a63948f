//! XAES-256-GCM
//!
//! Extended-nonce authenticated encryption built on AES-256-GCM. Callers use
//! a 24-byte nonce, large enough to be chosen at random for every message,
//! while the AEAD underneath stays standard AES-256-GCM.
//!
//! # Construction
//!
//! ```text
//! 24-byte nonce N, 32-byte key K
//!        │
//!        ├── N[0..12] ──▶ CMAC-style derivation under K ──▶ subkey Kx
//!        │
//!        └── N[12..24] ─┐
//!                       ▼
//!          AES-256-GCM(Kx, N[12..24], plaintext, aad)
//!                       │
//!                       ▼
//!          ciphertext || 16-byte tag
//! ```
//!
//! The subkey is computed fresh for each call and zeroed before the call
//! returns, on success and on every error path.
//!
//! # Security
//!
//! Nonce Handling:
//! - A (key, nonce) pair MUST never repeat; uniqueness is the caller's job
//! - 24 random bytes make collisions negligible for any realistic volume
//!
//! Authenticity:
//! - Any change to ciphertext, tag, nonce, key or associated data fails
//!   authentication
//! - Failed authentication leaves the plaintext buffer all-zero
//!
//! Secret Hygiene:
//! - Derived subkey and derivation scratch are wiped on every exit path
//! - AES key schedules are wiped when dropped

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead;
mod derivation;
mod error;
mod platform;
mod secret;

pub use aead::{decrypt, encrypt};
pub use derivation::derive_subkey;
pub use error::{SizeRequirement, XaesError};
pub use platform::is_supported;

/// Size of the long-term key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of the extended nonce in bytes
pub const NONCE_SIZE: usize = 24;

/// Size of the nonce prefix used for subkey derivation
pub const NONCE_PREFIX_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;
