//! Radio operating mode shared between the interrupt and main contexts

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Operating mode of the radio chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RadioMode {
    /// Listening for frames
    Rx = 0,
    /// Transmitting a frame
    Tx = 1,
    /// Sleeping, oscillator off
    Sleep = 2,
    /// Standby, oscillator on
    StandBy = 3,
    /// Powered down
    PowerDown = 4,
}

impl RadioMode {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RadioMode::Rx,
            1 => RadioMode::Tx,
            2 => RadioMode::Sleep,
            3 => RadioMode::StandBy,
            _ => RadioMode::PowerDown,
        }
    }

    /// Whether the chip is in one of its low-power states
    pub fn is_low_power(self) -> bool {
        matches!(
            self,
            RadioMode::Sleep | RadioMode::StandBy | RadioMode::PowerDown
        )
    }
}

/// Mode flag and transmit-complete flag, written from both contexts
///
/// The main context moves the radio into TX and the low-power states; the
/// interrupt handler moves it back to RX when a transmission completes.
#[derive(Debug)]
pub struct RadioState {
    mode: AtomicU8,
    tx_complete: AtomicBool,
}

impl RadioState {
    /// Create the state for a radio that has not been initialised yet
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(RadioMode::StandBy as u8),
            tx_complete: AtomicBool::new(false),
        }
    }

    /// Current mode
    pub fn mode(&self) -> RadioMode {
        RadioMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Switch to `mode`
    pub fn set_mode(&self, mode: RadioMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Enter TX and clear the transmit-complete flag
    pub fn begin_transmit(&self) {
        self.tx_complete.store(false, Ordering::Release);
        self.set_mode(RadioMode::Tx);
    }

    /// Mark the pending transmission complete and go back to RX
    pub fn complete_transmit(&self) {
        self.tx_complete.store(true, Ordering::Release);
        self.set_mode(RadioMode::Rx);
    }

    /// Whether the last transmission has completed
    pub fn tx_complete(&self) -> bool {
        self.tx_complete.load(Ordering::Acquire)
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new()
    }
}
