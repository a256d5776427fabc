//! Radio driver shared between the main loop and the radio interrupt
//!
//! On the buffered receive path the transport and the interrupt handler
//! both talk to the same chip. [`SharedRadio`] keeps the driver behind a
//! blocking mutex: the interrupt runs the handler inside
//! [`SharedRadio::lock`], the transport owns a [`SharedRadioHandle`].
//!
//! Each driver call made through a handle holds the lock for the whole
//! call. A radio interrupt raised during a blocking send is serviced as
//! soon as the send returns.
//!
//! The default [`CriticalSectionRawMutex`] needs a `critical-section`
//! implementation, usually provided by the platform HAL.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{
    raw::{CriticalSectionRawMutex, RawMutex},
    Mutex,
};
use heapless::Vec;

use super::traits::{RadioDriver, Retries};
use crate::crypto::KEY_LEN;
use crate::frame::MAX_FRAME_LEN;

/// Radio driver reachable from both the main context and the interrupt
pub struct SharedRadio<R, M: RawMutex = CriticalSectionRawMutex> {
    inner: Mutex<M, RefCell<R>>,
}

impl<R, M: RawMutex> SharedRadio<R, M> {
    /// Wrap `radio`; usable in a `static`
    pub const fn new(radio: R) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(radio)),
        }
    }

    /// Run `f` with exclusive access to the driver
    ///
    /// This is how the radio interrupt reaches the chip:
    /// `shared.lock(|radio| handler.on_interrupt(radio))`.
    ///
    /// # Panics
    ///
    /// If called again from inside `f`.
    pub fn lock<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        self.inner.lock(|radio| f(&mut *radio.borrow_mut()))
    }

    /// Driver handle for the transport
    pub fn handle(&self) -> SharedRadioHandle<'_, R, M> {
        SharedRadioHandle {
            shared: self,
            received: Vec::new(),
            ack_requested: false,
        }
    }
}

/// [`RadioDriver`] forwarding every call to a [`SharedRadio`]
///
/// The payload reported by `receive_done` is copied out of the driver while
/// the lock is held, so `received_data` never borrows across the lock.
pub struct SharedRadioHandle<'a, R, M: RawMutex = CriticalSectionRawMutex> {
    shared: &'a SharedRadio<R, M>,
    received: Vec<u8, MAX_FRAME_LEN>,
    ack_requested: bool,
}

impl<'a, R, M: RawMutex> SharedRadioHandle<'a, R, M> {
    /// The shared driver behind this handle
    pub fn shared(&self) -> &'a SharedRadio<R, M> {
        self.shared
    }
}

impl<'a, R: RadioDriver, M: RawMutex> RadioDriver for SharedRadioHandle<'a, R, M> {
    type Error = R::Error;

    fn initialise(
        &mut self,
        frequency_hz: u32,
        address: u8,
        network_id: u8,
    ) -> Result<bool, Self::Error> {
        self.shared
            .lock(|radio| radio.initialise(frequency_hz, address, network_id))
    }

    fn set_receive_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.set_receive_interrupt(enabled))
    }

    fn service_interrupt(&mut self) -> Result<bool, Self::Error> {
        self.shared.lock(|radio| radio.service_interrupt())
    }

    fn read_frame(&mut self, buffer: Option<&mut [u8]>) -> Result<usize, Self::Error> {
        self.shared.lock(|radio| radio.read_frame(buffer))
    }

    fn send_with_retry(
        &mut self,
        to: u8,
        data: &[u8],
        retries: Option<Retries>,
    ) -> Result<bool, Self::Error> {
        self.shared
            .lock(|radio| radio.send_with_retry(to, data, retries))
    }

    fn receive_done(&mut self) -> Result<bool, Self::Error> {
        let Self {
            shared,
            received,
            ack_requested,
        } = self;
        shared.lock(|radio| match radio.receive_done() {
            Ok(true) => {
                let data = radio.received_data();
                let len = data.len().min(MAX_FRAME_LEN);
                received.clear();
                // Cannot fail, `len` is capped at the capacity
                let _ = received.extend_from_slice(&data[..len]);
                *ack_requested = radio.ack_requested();
                Ok(true)
            }
            other => other,
        })
    }

    fn received_data(&self) -> &[u8] {
        &self.received
    }

    fn ack_requested(&self) -> bool {
        self.ack_requested
    }

    fn send_ack(&mut self) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.send_ack())?;
        self.ack_requested = false;
        Ok(())
    }

    fn set_address(&mut self, address: u8) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.set_address(address))
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.sleep())
    }

    fn stand_by(&mut self) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.stand_by())
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.power_down())
    }

    fn power_up(&mut self) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.power_up())
    }

    fn encrypt(&mut self, key: Option<&[u8; KEY_LEN]>) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.encrypt(key))
    }

    fn sanity_check(&mut self) -> Result<bool, Self::Error> {
        self.shared.lock(|radio| radio.sanity_check())
    }

    fn set_atc(&mut self, target_rssi: Option<i16>) -> Result<(), Self::Error> {
        self.shared.lock(|radio| radio.set_atc(target_rssi))
    }

    fn set_tx_power_level(&mut self, level: u8) -> Result<bool, Self::Error> {
        self.shared.lock(|radio| radio.set_tx_power_level(level))
    }

    fn tx_power_level(&mut self) -> Result<Option<u8>, Self::Error> {
        self.shared.lock(|radio| radio.tx_power_level())
    }

    fn set_tx_power_percent(&mut self, percent: u8) -> Result<bool, Self::Error> {
        self.shared.lock(|radio| radio.set_tx_power_percent(percent))
    }

    fn tx_power_percent(&mut self) -> Result<Option<u8>, Self::Error> {
        self.shared.lock(|radio| radio.tx_power_percent())
    }

    fn sending_rssi(&mut self) -> Result<Option<i16>, Self::Error> {
        self.shared.lock(|radio| radio.sending_rssi())
    }

    fn receiving_rssi(&mut self) -> Result<Option<i16>, Self::Error> {
        self.shared.lock(|radio| radio.receiving_rssi())
    }

    fn sending_snr(&mut self) -> Result<Option<i16>, Self::Error> {
        self.shared.lock(|radio| radio.sending_snr())
    }

    fn receiving_snr(&mut self) -> Result<Option<i16>, Self::Error> {
        self.shared.lock(|radio| radio.receiving_snr())
    }
}
