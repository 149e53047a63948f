//! Error types for XAES-256-GCM operations

use std::fmt;

use thiserror::Error;

/// Length a buffer must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequirement {
    /// Buffer must be exactly this many bytes
    Exactly(usize),
    /// Buffer must be at least this many bytes
    AtLeast(usize),
    /// Buffer must be at most this many bytes
    AtMost(usize),
}

impl SizeRequirement {
    /// Whether `len` satisfies the requirement.
    pub fn is_met_by(self, len: usize) -> bool {
        match self {
            Self::Exactly(n) => len == n,
            Self::AtLeast(n) => len >= n,
            Self::AtMost(n) => len <= n,
        }
    }
}

impl fmt::Display for SizeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n} bytes"),
            Self::AtLeast(n) => write!(f, "at least {n} bytes"),
            Self::AtMost(n) => write!(f, "at most {n} bytes"),
        }
    }
}

/// Errors from XAES-256-GCM encryption and decryption
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XaesError {
    /// The AES-GCM primitive is not available on this platform
    #[error("AES-GCM is not supported on this platform")]
    UnsupportedPlatform,

    /// A buffer has the wrong length
    #[error("invalid {parameter} size: expected {expected}, got {actual}")]
    InvalidSize {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Length the parameter must satisfy
        expected: SizeRequirement,
        /// Length that was supplied
        actual: usize,
    },

    /// Authentication tag did not verify
    ///
    /// The plaintext output buffer has been zeroed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl XaesError {
    /// Returns true if the ciphertext, nonce, key or associated data was
    /// rejected by tag verification.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }

    /// Returns true if the error was caused by caller-supplied buffer sizes.
    ///
    /// These are programming errors and will fail identically on retry.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::InvalidSize { .. } => true,

            Self::UnsupportedPlatform => false,
            Self::AuthenticationFailed => false,
        }
    }
}
