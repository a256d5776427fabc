//! Transport configuration
//!
//! This module contains the build-time settings of the radio link:
//! - Carrier frequency and network id
//! - Node or gateway role
//! - Automatic transmit-power control target
//! - Link encryption key source

/// Transport settings
pub mod transport;

pub use transport::{Encryption, TransportConfig};
