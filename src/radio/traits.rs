use crate::crypto::KEY_LEN;

/// Retry policy for an acknowledged send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Retries {
    /// Number of retransmissions after the first attempt
    pub count: u8,
    /// Time to wait for an acknowledgment per attempt in milliseconds
    pub timeout_ms: u16,
}

impl Retries {
    /// Single attempt, no waiting for an acknowledgment
    pub const NONE: Retries = Retries {
        count: 0,
        timeout_ms: 0,
    };
}

/// Radio chip driver used by the transport
///
/// Register access, the ATC algorithm and the retry/backoff timing all live
/// behind this trait. Methods for features an older driver generation lacks
/// have defaults that report the feature as unsupported.
pub trait RadioDriver {
    /// Error type for radio operations
    type Error;

    /// Bring the chip up at `frequency_hz`
    ///
    /// Returns `Ok(false)` when the chip does not respond or cannot be
    /// configured.
    fn initialise(
        &mut self,
        frequency_hz: u32,
        address: u8,
        network_id: u8,
    ) -> Result<bool, Self::Error>;

    /// Route the chip's data-ready signal to the receive interrupt
    fn set_receive_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Interrupt housekeeping: read and clear the chip's IRQ flags,
    /// answer protocol-level ACKs.
    ///
    /// Returns whether a complete data frame is ready to be read.
    fn service_interrupt(&mut self) -> Result<bool, Self::Error>;

    /// Read the pending frame out of the chip FIFO and clear data-ready
    ///
    /// With `None` the frame is drained and discarded. Returns the frame
    /// length.
    fn read_frame(&mut self, buffer: Option<&mut [u8]>) -> Result<usize, Self::Error>;

    /// Send `data` to node `to`, waiting for an acknowledgment
    ///
    /// `None` selects the driver's own retry policy. Returns whether the
    /// frame was acknowledged.
    fn send_with_retry(
        &mut self,
        to: u8,
        data: &[u8],
        retries: Option<Retries>,
    ) -> Result<bool, Self::Error>;

    /// Polled receive: whether a frame has been received into the chip's
    /// receive buffer
    fn receive_done(&mut self) -> Result<bool, Self::Error>;

    /// Payload of the frame last reported by [`receive_done`](Self::receive_done)
    fn received_data(&self) -> &[u8];

    /// Whether the frame last received asked for an acknowledgment
    fn ack_requested(&self) -> bool;

    /// Acknowledge the frame last received
    fn send_ack(&mut self) -> Result<(), Self::Error>;

    /// Set the node address used for filtering
    fn set_address(&mut self, address: u8) -> Result<(), Self::Error>;

    /// Put the radio into sleep mode
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Put the radio into standby mode
    fn stand_by(&mut self) -> Result<(), Self::Error>;

    /// Cut power to the radio
    fn power_down(&mut self) -> Result<(), Self::Error>;

    /// Restore power to the radio
    fn power_up(&mut self) -> Result<(), Self::Error>;

    /// Load an AES key into the chip, or disable encryption with `None`
    fn encrypt(&mut self, key: Option<&[u8; KEY_LEN]>) -> Result<(), Self::Error>;

    /// Check the chip still answers on its control bus
    fn sanity_check(&mut self) -> Result<bool, Self::Error>;

    /// Enable automatic transmit-power control towards `target_rssi` dBm,
    /// or disable it with `None`
    fn set_atc(&mut self, target_rssi: Option<i16>) -> Result<(), Self::Error> {
        let _ = target_rssi;
        Ok(())
    }

    /// Set the transmit power level (0..=23)
    fn set_tx_power_level(&mut self, level: u8) -> Result<bool, Self::Error> {
        let _ = level;
        Ok(false)
    }

    /// Current transmit power level
    fn tx_power_level(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(None)
    }

    /// Set the transmit power in percent of the maximum
    fn set_tx_power_percent(&mut self, percent: u8) -> Result<bool, Self::Error> {
        let _ = percent;
        Ok(false)
    }

    /// Current transmit power in percent of the maximum
    fn tx_power_percent(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(None)
    }

    /// RSSI of our last frame as reported back by the receiver, in dBm
    fn sending_rssi(&mut self) -> Result<Option<i16>, Self::Error> {
        Ok(None)
    }

    /// RSSI of the last received frame in dBm
    fn receiving_rssi(&mut self) -> Result<Option<i16>, Self::Error> {
        Ok(None)
    }

    /// SNR of our last frame as reported back by the receiver, in dB
    fn sending_snr(&mut self) -> Result<Option<i16>, Self::Error> {
        Ok(None)
    }

    /// SNR of the last received frame in dB
    fn receiving_snr(&mut self) -> Result<Option<i16>, Self::Error> {
        Ok(None)
    }
}
