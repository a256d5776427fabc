//! Link encryption key provisioning
//!
//! The radio encrypts frames in hardware; this module only builds the
//! 16-byte pre-shared key handed to the chip. Keys come either from a
//! short passphrase compiled into the firmware or from persisted
//! configuration through a [`KeyStore`]. A [`PresharedKey`] wipes itself
//! when dropped, so the key material does not outlive provisioning.

#![allow(unsafe_code)]

use core::convert::Infallible;
use core::sync::atomic::{compiler_fence, Ordering};

/// AES-128 key length in bytes
pub const KEY_LEN: usize = 16;

/// Source of the persisted encryption key
pub trait KeyStore {
    /// Error reading the configuration storage
    type Error;

    /// Read the stored key into `key`
    fn read_key(&mut self, key: &mut [u8; KEY_LEN]) -> Result<(), Self::Error>;
}

/// Placeholder store for configurations that never read a stored key
pub enum NoKeyStore {}

impl KeyStore for NoKeyStore {
    type Error = Infallible;

    fn read_key(&mut self, _key: &mut [u8; KEY_LEN]) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// Pre-shared AES key, erased on drop
pub struct PresharedKey([u8; KEY_LEN]);

impl PresharedKey {
    /// Use `bytes` as the key
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a key from a passphrase
    ///
    /// The passphrase bytes up to the first NUL are used, truncated to
    /// [`KEY_LEN`] and right-padded with zeros.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut key = [0u8; KEY_LEN];
        let bytes = passphrase.as_bytes();
        let len = bytes
            .iter()
            .take(KEY_LEN)
            .position(|&b| b == 0)
            .unwrap_or_else(|| bytes.len().min(KEY_LEN));
        key[..len].copy_from_slice(&bytes[..len]);
        Self(key)
    }

    /// Read the key from persisted configuration
    pub fn load<S: KeyStore>(store: &mut S) -> Result<Self, S::Error> {
        let mut key = Self([0u8; KEY_LEN]);
        store.read_key(&mut key.0)?;
        Ok(key)
    }

    /// Key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for PresharedKey {
    fn drop(&mut self) {
        for byte in self.0.iter_mut() {
            // SAFETY: `byte` is a valid, exclusive reference into our array
            unsafe { core::ptr::write_volatile(byte, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}
