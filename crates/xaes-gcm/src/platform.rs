//! AES-GCM capability probe

/// Source of truth for whether the AES-GCM primitive can run.
///
/// Encrypt and decrypt consult this before touching any buffer. Tests inject
/// their own implementation to exercise the unsupported path.
pub(crate) trait Platform {
    /// Whether AES-256-GCM is available.
    fn supports_aes_gcm(&self) -> bool;
}

/// The platform this crate was compiled for.
///
/// The `aes` backend selects AES-NI or ARMv8 instructions at runtime and
/// otherwise falls back to a constant-time software implementation, so
/// AES-GCM is always available.
pub(crate) struct NativePlatform;

impl Platform for NativePlatform {
    fn supports_aes_gcm(&self) -> bool {
        true
    }
}

/// Returns true if XAES-256-GCM can be used on this platform.
pub fn is_supported() -> bool {
    NativePlatform.supports_aes_gcm()
}
