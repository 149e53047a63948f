//! Message encryption using XAES-256-GCM
//!
//! The 24-byte nonce is split in two. The first 12 bytes select a
//! per-message subkey (see [`crate::derive_subkey`]); the last 12 bytes are
//! the AES-256-GCM nonce under that subkey.
//!
//! Callers provide the output buffer. Sizes are validated before any
//! cryptographic work, and the subkey is wiped on every exit path.

use aes_gcm::{
    Aes256Gcm,
    aead::{AeadInPlace, KeyInit},
};
use zeroize::Zeroize;

use crate::{
    KEY_SIZE, NONCE_PREFIX_SIZE, NONCE_SIZE, TAG_SIZE,
    derivation::derive_into,
    error::{SizeRequirement, XaesError},
    platform::{NativePlatform, Platform},
    secret::{SecretWorkspace, Wiped},
};

/// Size of the AES-256-GCM nonce carried in the last half of the nonce
const NONCE_SUFFIX_SIZE: usize = NONCE_SIZE - NONCE_PREFIX_SIZE;

/// Largest plaintext or associated data AES-GCM accepts (bytes)
const GCM_MAX_INPUT: u64 = 1 << 36;

/// Encrypt `plaintext` into `ciphertext` using XAES-256-GCM.
///
/// `ciphertext` must be exactly `plaintext.len() + TAG_SIZE` bytes. The
/// encrypted bytes are written to the front and the 16-byte tag to the end.
/// Pass an empty slice when there is no associated data.
///
/// # Security
///
/// - Nonce MUST be unique per key; 24 random bytes are safe to use
/// - Derived subkey is zeroed before returning, including on error
///
/// # Errors
///
/// - `UnsupportedPlatform`: AES-GCM is unavailable
/// - `InvalidSize`: `nonce`, `key` or `ciphertext` has the wrong length
pub fn encrypt(
    ciphertext: &mut [u8],
    plaintext: &[u8],
    nonce: &[u8],
    key: &[u8],
    associated_data: &[u8],
) -> Result<(), XaesError> {
    let mut workspace = SecretWorkspace::default();
    encrypt_with(&NativePlatform, &mut workspace, ciphertext, plaintext, nonce, key, associated_data)
}

/// Decrypt `ciphertext` into `plaintext` using XAES-256-GCM.
///
/// `ciphertext` is the encrypted bytes followed by the 16-byte tag;
/// `plaintext` must be exactly `ciphertext.len() - TAG_SIZE` bytes.
///
/// # Errors
///
/// - `UnsupportedPlatform`: AES-GCM is unavailable
/// - `InvalidSize`: `nonce`, `key`, `ciphertext` or `plaintext` has the wrong
///   length
/// - `AuthenticationFailed`: tag, ciphertext, nonce, key or associated data
///   do not match. `plaintext` is left all-zero.
pub fn decrypt(
    plaintext: &mut [u8],
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8],
    associated_data: &[u8],
) -> Result<(), XaesError> {
    let mut workspace = SecretWorkspace::default();
    decrypt_with(&NativePlatform, &mut workspace, plaintext, ciphertext, nonce, key, associated_data)
}

/// Encrypt with an explicit platform and secret workspace.
///
/// `workspace` is zeroed on return.
pub(crate) fn encrypt_with<P: Platform>(
    platform: &P,
    workspace: &mut SecretWorkspace,
    ciphertext: &mut [u8],
    plaintext: &[u8],
    nonce: &[u8],
    key: &[u8],
    associated_data: &[u8],
) -> Result<(), XaesError> {
    let mut guard = Wiped::new(workspace);
    ensure_supported(platform)?;

    let nonce = SplitNonce::parse(nonce)?;
    let key = exact::<KEY_SIZE>("key", key)?;
    require("ciphertext", SizeRequirement::Exactly(plaintext.len() + TAG_SIZE), ciphertext.len())?;
    require("plaintext", gcm_input_limit(0), plaintext.len())?;
    require("associated data", gcm_input_limit(0), associated_data.len())?;

    let secrets = &mut *guard;
    derive_into(&mut secrets.subkey, &mut secrets.scratch, &nonce.prefix, key);
    let cipher = Aes256Gcm::new((&secrets.subkey).into());

    let (body, tag_out) = ciphertext.split_at_mut(plaintext.len());
    body.copy_from_slice(plaintext);

    let Ok(tag) = cipher.encrypt_in_place_detached((&nonce.suffix).into(), associated_data, body)
    else {
        unreachable!("AES-GCM encryption cannot fail for inputs within its length limits");
    };
    tag_out.copy_from_slice(&tag);

    tracing::trace!(
        plaintext_len = plaintext.len(),
        associated_data_len = associated_data.len(),
        "sealed message"
    );

    Ok(())
}

/// Decrypt with an explicit platform and secret workspace.
///
/// `workspace` is zeroed on return.
pub(crate) fn decrypt_with<P: Platform>(
    platform: &P,
    workspace: &mut SecretWorkspace,
    plaintext: &mut [u8],
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8],
    associated_data: &[u8],
) -> Result<(), XaesError> {
    let mut guard = Wiped::new(workspace);
    ensure_supported(platform)?;

    let nonce = SplitNonce::parse(nonce)?;
    let key = exact::<KEY_SIZE>("key", key)?;
    let Some((body, tag)) = ciphertext.split_last_chunk::<TAG_SIZE>() else {
        return Err(rejected("ciphertext", SizeRequirement::AtLeast(TAG_SIZE), ciphertext.len()));
    };
    require("plaintext", SizeRequirement::Exactly(body.len()), plaintext.len())?;
    require("ciphertext", gcm_input_limit(TAG_SIZE), ciphertext.len())?;
    require("associated data", gcm_input_limit(0), associated_data.len())?;

    let secrets = &mut *guard;
    derive_into(&mut secrets.subkey, &mut secrets.scratch, &nonce.prefix, key);
    let cipher = Aes256Gcm::new((&secrets.subkey).into());

    plaintext.copy_from_slice(body);

    let verified = cipher.decrypt_in_place_detached(
        (&nonce.suffix).into(),
        associated_data,
        plaintext,
        tag.into(),
    );
    if verified.is_err() {
        plaintext.zeroize();
        tracing::debug!(
            ciphertext_len = ciphertext.len(),
            associated_data_len = associated_data.len(),
            "authentication failed"
        );
        return Err(XaesError::AuthenticationFailed);
    }

    tracing::trace!(
        plaintext_len = plaintext.len(),
        associated_data_len = associated_data.len(),
        "opened message"
    );

    Ok(())
}

/// A validated 24-byte nonce, split into its derivation prefix and GCM
/// suffix.
struct SplitNonce {
    prefix: [u8; NONCE_PREFIX_SIZE],
    suffix: [u8; NONCE_SUFFIX_SIZE],
}

impl SplitNonce {
    fn parse(nonce: &[u8]) -> Result<Self, XaesError> {
        let nonce = exact::<NONCE_SIZE>("nonce", nonce)?;

        let mut prefix = [0u8; NONCE_PREFIX_SIZE];
        let mut suffix = [0u8; NONCE_SUFFIX_SIZE];
        prefix.copy_from_slice(&nonce[..NONCE_PREFIX_SIZE]);
        suffix.copy_from_slice(&nonce[NONCE_PREFIX_SIZE..]);

        Ok(Self { prefix, suffix })
    }
}

fn ensure_supported<P: Platform>(platform: &P) -> Result<(), XaesError> {
    if platform.supports_aes_gcm() {
        return Ok(());
    }

    tracing::debug!("AES-GCM unavailable on this platform");
    Err(XaesError::UnsupportedPlatform)
}

/// View `bytes` as a fixed-size array, or reject it as `parameter`.
fn exact<'a, const N: usize>(
    parameter: &'static str,
    bytes: &'a [u8],
) -> Result<&'a [u8; N], XaesError> {
    let Ok(array) = <&[u8; N]>::try_from(bytes) else {
        return Err(rejected(parameter, SizeRequirement::Exactly(N), bytes.len()));
    };
    Ok(array)
}

fn require(
    parameter: &'static str,
    expected: SizeRequirement,
    actual: usize,
) -> Result<(), XaesError> {
    if expected.is_met_by(actual) {
        return Ok(());
    }
    Err(rejected(parameter, expected, actual))
}

fn rejected(parameter: &'static str, expected: SizeRequirement, actual: usize) -> XaesError {
    tracing::debug!(parameter, %expected, actual, "rejected buffer size");
    XaesError::InvalidSize { parameter, expected, actual }
}

/// AES-GCM input limit plus `overhead` bytes.
///
/// On targets where the limit does not fit in `usize`, no slice can reach it.
fn gcm_input_limit(overhead: usize) -> SizeRequirement {
    let max = usize::try_from(GCM_MAX_INPUT).unwrap_or(usize::MAX);
    SizeRequirement::AtMost(max.saturating_add(overhead))
}
