/// 433 MHz band carrier frequency in Hz
pub const FREQUENCY_433MHZ: u32 = 433_000_000;
/// 868 MHz band carrier frequency in Hz
pub const FREQUENCY_868MHZ: u32 = 868_000_000;
/// 915 MHz band carrier frequency in Hz
pub const FREQUENCY_915MHZ: u32 = 915_000_000;

/// Default network id shared by all nodes of one mesh
pub const DEFAULT_NETWORK_ID: u8 = 100;
/// Default ATC target RSSI in dBm
pub const DEFAULT_ATC_TARGET_RSSI: i16 = -80;
/// Address of a node still waiting for one to be assigned
pub const AUTO_ADDRESS: u8 = 255;
/// Address of the gateway
pub const GATEWAY_ADDRESS: u8 = 0;

/// Where the link encryption key comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Encryption {
    /// Frames are sent in the clear
    Disabled,
    /// Key derived from a short passphrase (padded or truncated to 16 bytes)
    Passphrase(&'static str),
    /// Key read from persisted configuration at init
    Stored,
}

/// Radio link configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    /// Network id; nodes only hear frames of their own network
    pub network_id: u8,
    /// Initial node address
    pub address: u8,
    /// Whether this node is the network coordinator
    pub gateway: bool,
    /// ATC target RSSI in dBm, `None` disables ATC
    pub atc_target_rssi: Option<i16>,
    /// Encryption key source
    pub encryption: Encryption,
}

impl TransportConfig {
    /// Configuration for a sensor node
    pub fn node() -> Self {
        Self {
            frequency_hz: FREQUENCY_868MHZ,
            network_id: DEFAULT_NETWORK_ID,
            address: AUTO_ADDRESS,
            gateway: false,
            atc_target_rssi: Some(DEFAULT_ATC_TARGET_RSSI),
            encryption: Encryption::Disabled,
        }
    }

    /// Configuration for the network coordinator
    pub fn gateway() -> Self {
        Self {
            address: GATEWAY_ADDRESS,
            gateway: true,
            ..Self::node()
        }
    }

    /// Use another carrier frequency
    pub fn with_frequency(mut self, frequency_hz: u32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// Use another network id
    pub fn with_network_id(mut self, network_id: u8) -> Self {
        self.network_id = network_id;
        self
    }

    /// Start with a fixed node address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Enable ATC towards `target_rssi` dBm
    pub fn with_atc_target(mut self, target_rssi: i16) -> Self {
        self.atc_target_rssi = Some(target_rssi);
        self
    }

    /// Disable ATC
    pub fn without_atc(mut self) -> Self {
        self.atc_target_rssi = None;
        self
    }

    /// Select the encryption key source
    pub fn with_encryption(mut self, encryption: Encryption) -> Self {
        self.encryption = encryption;
        self
    }

    /// ATC target actually in effect; gateways never run ATC
    pub fn atc_target(&self) -> Option<i16> {
        if self.gateway {
            None
        } else {
            self.atc_target_rssi
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::node()
    }
}
