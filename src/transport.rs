//! Transport façade used by the mesh protocol layer
//!
//! The façade owns the radio driver and exposes send/receive/power control
//! with plain boolean and length results. Each fallible operation also has
//! a `try_` form returning [`TransportError`].
//!
//! How frames are received is chosen once, when the transport is built,
//! through [`ReceivePath`]:
//! - [`ReceivePath::Buffered`]: a real interrupt runs the
//!   [`RxInterruptHandler`], the façade drains the queue. Both reach the
//!   chip through a [`SharedRadio`](crate::radio::SharedRadio)
//! - [`ReceivePath::Polled`]: the platform cannot run the handler from an
//!   interrupt, so [`Transport::available`] polls the IRQ line and runs it
//! - [`ReceivePath::Direct`]: no queue, frames are read from the chip on
//!   demand

use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;

use crate::config::{Encryption, TransportConfig};
use crate::crypto::{KeyStore, NoKeyStore, PresharedKey};
use crate::frame::MAX_FRAME_LEN;
use crate::interrupt::RxInterruptHandler;
use crate::queue::Consumer;
use crate::radio::{RadioDriver, RadioMode, RadioState, Retries};

/// Highest transmit power level accepted by [`Transport::set_tx_power_level`]
pub const MAX_TX_POWER_LEVEL: u8 = 23;
/// Highest transmit power percentage
pub const MAX_TX_POWER_PERCENT: u8 = 100;

/// Transport error type
#[derive(Debug, PartialEq)]
pub enum TransportError<E> {
    /// Radio driver error
    Radio(E),
    /// The chip did not come up at the configured frequency
    InitFailed,
    /// Encryption needs a stored key but none could be read
    KeyUnavailable,
    /// The frame was not acknowledged
    NoAck,
    /// Payload longer than [`MAX_FRAME_LEN`]
    FrameTooLong,
    /// The radio is in a low-power mode
    InvalidMode(RadioMode),
}

/// IRQ line for receive paths that never poll one
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIrq;

impl InputPin for NoIrq {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Receive strategy of a transport
pub enum ReceivePath<'q, P, const N: usize> {
    /// Frames are queued by an interrupt handler running elsewhere
    Buffered {
        /// Consumer half of the receive queue
        frames: Consumer<'q, N>,
    },
    /// Frames are queued by a handler polled from `available`
    Polled {
        /// Consumer half of the receive queue
        frames: Consumer<'q, N>,
        /// Handler owning the producer half
        handler: RxInterruptHandler<'q, N>,
        /// Radio interrupt line, high while work is pending
        irq: P,
    },
    /// Frames are read from the chip on demand
    Direct,
}

/// Radio transport
pub struct Transport<'q, R: RadioDriver, P, const N: usize> {
    radio: R,
    config: TransportConfig,
    state: &'q RadioState,
    rx: ReceivePath<'q, P, N>,
    address: u8,
}

impl<'q, R: RadioDriver> Transport<'q, R, NoIrq, 0> {
    /// Transport reading frames straight from the chip
    pub fn direct(radio: R, config: TransportConfig, state: &'q RadioState) -> Self {
        Self::new(radio, config, state, ReceivePath::Direct)
    }
}

impl<'q, R: RadioDriver, const N: usize> Transport<'q, R, NoIrq, N> {
    /// Transport draining a queue filled from the radio interrupt
    pub fn buffered(
        radio: R,
        config: TransportConfig,
        state: &'q RadioState,
        frames: Consumer<'q, N>,
    ) -> Self {
        Self::new(radio, config, state, ReceivePath::Buffered { frames })
    }
}

impl<'q, R, P, const N: usize> Transport<'q, R, P, N>
where
    R: RadioDriver,
    P: InputPin,
{
    /// Transport running `handler` whenever `irq` is found high
    pub fn polled(
        radio: R,
        config: TransportConfig,
        handler: RxInterruptHandler<'q, N>,
        frames: Consumer<'q, N>,
        irq: P,
    ) -> Self {
        let state = handler.state();
        Self::new(
            radio,
            config,
            state,
            ReceivePath::Polled {
                frames,
                handler,
                irq,
            },
        )
    }

    /// Create a transport with an explicit receive path
    pub fn new(
        radio: R,
        config: TransportConfig,
        state: &'q RadioState,
        rx: ReceivePath<'q, P, N>,
    ) -> Self {
        let address = config.address;
        Self {
            radio,
            config,
            state,
            rx,
            address,
        }
    }

    /// Initialise the radio; returns `false` if the chip fails to come up
    pub fn init(&mut self) -> bool {
        self.try_init::<NoKeyStore>(None).is_ok()
    }

    /// Initialise the radio, reading a stored encryption key from `keys`
    pub fn init_with_keys<S: KeyStore>(&mut self, keys: &mut S) -> bool {
        self.try_init(Some(keys)).is_ok()
    }

    /// Initialise the radio
    ///
    /// Configures the carrier frequency, enables ATC on non-gateway nodes
    /// and loads the encryption key. The key is erased from memory once the
    /// chip has it. On success the radio listens (RX).
    pub fn try_init<S: KeyStore>(
        &mut self,
        keys: Option<&mut S>,
    ) -> Result<(), TransportError<R::Error>> {
        if !matches!(self.rx, ReceivePath::Direct) {
            self.radio
                .set_receive_interrupt(true)
                .map_err(TransportError::Radio)?;
        }

        let up = self
            .radio
            .initialise(self.config.frequency_hz, self.address, self.config.network_id)
            .map_err(TransportError::Radio)?;
        if !up {
            warn!("radio init failed at {} Hz", self.config.frequency_hz);
            return Err(TransportError::InitFailed);
        }

        if let Some(target) = self.config.atc_target() {
            self.radio
                .set_atc(Some(target))
                .map_err(TransportError::Radio)?;
        }

        match self.config.encryption {
            Encryption::Disabled => {}
            Encryption::Passphrase(passphrase) => {
                let key = PresharedKey::from_passphrase(passphrase);
                self.radio
                    .encrypt(Some(key.as_bytes()))
                    .map_err(TransportError::Radio)?;
            }
            Encryption::Stored => {
                let store = keys.ok_or(TransportError::KeyUnavailable)?;
                let key = PresharedKey::load(store).map_err(|_| TransportError::KeyUnavailable)?;
                self.radio
                    .encrypt(Some(key.as_bytes()))
                    .map_err(TransportError::Radio)?;
            }
        }

        self.state.set_mode(RadioMode::Rx);
        debug!("radio up, address {}", self.address);
        Ok(())
    }

    /// Set the node address
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
        if self.radio.set_address(address).is_err() {
            warn!("radio rejected address {}", address);
        }
    }

    /// Node address
    pub fn get_address(&self) -> u8 {
        self.address
    }

    /// Send `data` to node `to`
    ///
    /// With `no_ack` a single attempt is made and the call always reports
    /// success. Otherwise returns whether the frame was acknowledged within
    /// the driver's retry policy.
    pub fn send(&mut self, to: u8, data: &[u8], no_ack: bool) -> bool {
        if no_ack {
            let _ = self.transmit(to, data, Some(Retries::NONE));
            return true;
        }
        self.try_send(to, data).is_ok()
    }

    /// Send `data` to node `to` and wait for its acknowledgment
    pub fn try_send(&mut self, to: u8, data: &[u8]) -> Result<(), TransportError<R::Error>> {
        if self.transmit(to, data, None)? {
            Ok(())
        } else {
            Err(TransportError::NoAck)
        }
    }

    fn transmit(
        &mut self,
        to: u8,
        data: &[u8],
        retries: Option<Retries>,
    ) -> Result<bool, TransportError<R::Error>> {
        if data.len() > MAX_FRAME_LEN {
            warn!("frame of {} bytes too long", data.len());
            return Err(TransportError::FrameTooLong);
        }
        let mode = self.state.mode();
        if mode.is_low_power() {
            warn!("send while in {}", mode);
            return Err(TransportError::InvalidMode(mode));
        }

        trace!("send {} bytes to {}", data.len(), to);
        self.state.begin_transmit();
        let result = self.radio.send_with_retry(to, data, retries);
        if result.is_err() {
            // Nothing went on air, so no TX-done interrupt will follow
            warn!("send to {} failed", to);
            self.state.set_mode(RadioMode::Rx);
        }

        match &mut self.rx {
            ReceivePath::Direct => self.state.set_mode(RadioMode::Rx),
            ReceivePath::Polled { handler, irq, .. } => {
                if irq.is_high().unwrap_or(false) {
                    handler.on_interrupt(&mut self.radio);
                }
            }
            ReceivePath::Buffered { .. } => {}
        }

        result.map_err(TransportError::Radio)
    }

    /// Whether a received frame is waiting
    pub fn available(&mut self) -> bool {
        match &mut self.rx {
            ReceivePath::Buffered { frames } => !frames.is_empty(),
            ReceivePath::Polled {
                frames,
                handler,
                irq,
            } => {
                if irq.is_high().unwrap_or(false) {
                    handler.on_interrupt(&mut self.radio);
                }
                !frames.is_empty()
            }
            ReceivePath::Direct => self.radio.receive_done().unwrap_or(false),
        }
    }

    /// Copy the next received frame into `buffer` and return its length
    ///
    /// Returns 0 when nothing was received. `buffer` should hold
    /// [`MAX_FRAME_LEN`] bytes; longer frames are cut to its size.
    pub fn receive(&mut self, buffer: &mut [u8]) -> usize {
        match &mut self.rx {
            ReceivePath::Buffered { frames } | ReceivePath::Polled { frames, .. } => frames
                .pop()
                .map_or(0, |frame| frame.copy_to(buffer)),
            ReceivePath::Direct => {
                let data = self.radio.received_data();
                let len = data.len().min(MAX_FRAME_LEN).min(buffer.len());
                buffer[..len].copy_from_slice(&data[..len]);
                if self.radio.ack_requested() && self.radio.send_ack().is_err() {
                    warn!("ack failed");
                }
                len
            }
        }
    }

    /// Frames dropped because the receive queue was full
    pub fn lost_frames(&self) -> u8 {
        match &self.rx {
            ReceivePath::Buffered { frames } | ReceivePath::Polled { frames, .. } => {
                frames.lost_frames()
            }
            ReceivePath::Direct => 0,
        }
    }

    /// Current radio mode
    pub fn radio_mode(&self) -> RadioMode {
        self.state.mode()
    }

    /// Put the radio to sleep
    pub fn sleep(&mut self) -> bool {
        self.enter(RadioMode::Sleep, R::sleep)
    }

    /// Put the radio into standby
    pub fn stand_by(&mut self) -> bool {
        self.enter(RadioMode::StandBy, R::stand_by)
    }

    /// Power the radio down
    pub fn power_down(&mut self) -> bool {
        self.enter(RadioMode::PowerDown, R::power_down)
    }

    /// Power the radio up and resume listening
    pub fn power_up(&mut self) -> bool {
        self.enter(RadioMode::Rx, R::power_up)
    }

    fn enter(&mut self, mode: RadioMode, op: fn(&mut R) -> Result<(), R::Error>) -> bool {
        match op(&mut self.radio) {
            Ok(()) => {
                self.state.set_mode(mode);
                true
            }
            Err(_) => {
                warn!("radio failed to enter {}", mode);
                false
            }
        }
    }

    /// Check the radio still responds
    pub fn sanity_check(&mut self) -> bool {
        self.radio.sanity_check().unwrap_or(false)
    }

    /// Set the transmit power level (0..=23)
    pub fn set_tx_power_level(&mut self, level: u8) -> bool {
        if level > MAX_TX_POWER_LEVEL {
            return false;
        }
        self.radio.set_tx_power_level(level).unwrap_or(false)
    }

    /// Transmit power level, `None` if the hardware cannot tell
    pub fn get_tx_power_level(&mut self) -> Option<u8> {
        self.radio.tx_power_level().ok().flatten()
    }

    /// Set the transmit power in percent (0..=100)
    pub fn set_tx_power_percent(&mut self, percent: u8) -> bool {
        if percent > MAX_TX_POWER_PERCENT {
            return false;
        }
        self.radio.set_tx_power_percent(percent).unwrap_or(false)
    }

    /// Transmit power in percent, `None` if the hardware cannot tell
    pub fn get_tx_power_percent(&mut self) -> Option<u8> {
        self.radio.tx_power_percent().ok().flatten()
    }

    /// Retarget ATC; ignored on gateways and when ATC is off
    pub fn set_target_rssi(&mut self, target_rssi: i16) {
        if self.config.atc_target().is_none() {
            return;
        }
        self.config.atc_target_rssi = Some(target_rssi);
        if self.radio.set_atc(Some(target_rssi)).is_err() {
            warn!("ATC retarget failed");
        }
    }

    /// RSSI of our last frame at the receiver in dBm
    pub fn get_sending_rssi(&mut self) -> Option<i16> {
        self.radio.sending_rssi().ok().flatten()
    }

    /// RSSI of the last received frame in dBm
    pub fn get_receiving_rssi(&mut self) -> Option<i16> {
        self.radio.receiving_rssi().ok().flatten()
    }

    /// SNR of our last frame at the receiver in dB
    pub fn get_sending_snr(&mut self) -> Option<i16> {
        self.radio.sending_snr().ok().flatten()
    }

    /// SNR of the last received frame in dB
    pub fn get_receiving_snr(&mut self) -> Option<i16> {
        self.radio.receiving_snr().ok().flatten()
    }

    /// Radio driver
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Mutable radio driver, for platform interrupt glue
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }
}
