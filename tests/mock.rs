#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::digital::v2::InputPin;
use rfm69_transport::{
    crypto::KEY_LEN,
    radio::{RadioDriver, Retries},
    MAX_FRAME_LEN,
};

/// Mock radio error type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockError {
    /// Control bus did not respond
    Bus,
}

/// One call to `send_with_retry`
#[derive(Debug, Clone, PartialEq)]
pub struct SentFrame {
    pub to: u8,
    pub data: heapless::Vec<u8, MAX_FRAME_LEN>,
    pub retries: Option<Retries>,
}

/// Interrupt line driven by the mock radio
pub struct MockIrq(Arc<AtomicBool>);

impl InputPin for MockIrq {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.0.load(Ordering::SeqCst))
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.0.load(Ordering::SeqCst))
    }
}

/// Mock radio for testing
pub struct MockRadio {
    /// Result of `initialise`
    pub init_ok: bool,
    /// Every call fails with a bus error
    pub broken: bool,
    /// Whether sends get acknowledged
    pub ack: bool,
    /// Result of `sanity_check`
    pub sane: bool,
    /// Transmit power level, `None` when the hardware has no levels
    pub tx_power_level: Option<u8>,
    /// RSSI of the last received frame
    pub rssi: Option<i16>,

    pub sent: heapless::Vec<SentFrame, 16>,
    pub initialised_with: Option<(u32, u8, u8)>,
    pub receive_interrupt: bool,
    pub housekeeping: usize,
    pub discarded: usize,
    pub acks_sent: usize,
    pub key: Option<[u8; KEY_LEN]>,
    pub atc: Option<i16>,
    pub address: Option<u8>,
    pub power_calls: Vec<&'static str>,

    inbound: VecDeque<(Vec<u8>, bool)>,
    current: Vec<u8>,
    current_ack: bool,
    irq: Arc<AtomicBool>,
}

impl MockRadio {
    /// Create new mock radio
    pub fn new() -> Self {
        Self {
            init_ok: true,
            broken: false,
            ack: true,
            sane: true,
            tx_power_level: Some(13),
            rssi: Some(-70),
            sent: heapless::Vec::new(),
            initialised_with: None,
            receive_interrupt: false,
            housekeeping: 0,
            discarded: 0,
            acks_sent: 0,
            key: None,
            atc: None,
            address: None,
            power_calls: Vec::new(),
            inbound: VecDeque::new(),
            current: Vec::new(),
            current_ack: false,
            irq: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Interrupt line of this radio
    pub fn irq_line(&self) -> MockIrq {
        MockIrq(self.irq.clone())
    }

    /// A frame arrives over the air
    pub fn deliver(&mut self, data: &[u8], ack_requested: bool) {
        self.inbound.push_back((data.to_vec(), ack_requested));
        self.irq.store(true, Ordering::SeqCst);
    }

    /// Frames still sitting in the chip
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    fn bus(&self) -> Result<(), MockError> {
        if self.broken {
            Err(MockError::Bus)
        } else {
            Ok(())
        }
    }

    fn update_irq(&self) {
        self.irq.store(!self.inbound.is_empty(), Ordering::SeqCst);
    }
}

impl RadioDriver for MockRadio {
    type Error = MockError;

    fn initialise(
        &mut self,
        frequency_hz: u32,
        address: u8,
        network_id: u8,
    ) -> Result<bool, Self::Error> {
        self.bus()?;
        self.initialised_with = Some((frequency_hz, address, network_id));
        Ok(self.init_ok)
    }

    fn set_receive_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.bus()?;
        self.receive_interrupt = enabled;
        Ok(())
    }

    fn service_interrupt(&mut self) -> Result<bool, Self::Error> {
        self.bus()?;
        self.housekeeping += 1;
        self.update_irq();
        Ok(!self.inbound.is_empty())
    }

    fn read_frame(&mut self, buffer: Option<&mut [u8]>) -> Result<usize, Self::Error> {
        self.bus()?;
        let Some((data, _)) = self.inbound.pop_front() else {
            return Ok(0);
        };
        self.update_irq();
        match buffer {
            Some(buf) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => {
                self.discarded += 1;
                Ok(data.len())
            }
        }
    }

    fn send_with_retry(
        &mut self,
        to: u8,
        data: &[u8],
        retries: Option<Retries>,
    ) -> Result<bool, Self::Error> {
        self.bus()?;
        let frame = SentFrame {
            to,
            data: heapless::Vec::from_slice(data).unwrap(),
            retries,
        };
        self.sent.push(frame).unwrap();
        // TX done raises the interrupt line
        self.irq.store(true, Ordering::SeqCst);
        Ok(self.ack)
    }

    fn receive_done(&mut self) -> Result<bool, Self::Error> {
        self.bus()?;
        match self.inbound.pop_front() {
            Some((data, ack)) => {
                self.current = data;
                self.current_ack = ack;
                self.update_irq();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn received_data(&self) -> &[u8] {
        &self.current
    }

    fn ack_requested(&self) -> bool {
        self.current_ack
    }

    fn send_ack(&mut self) -> Result<(), Self::Error> {
        self.bus()?;
        self.acks_sent += 1;
        self.current_ack = false;
        Ok(())
    }

    fn set_address(&mut self, address: u8) -> Result<(), Self::Error> {
        self.bus()?;
        self.address = Some(address);
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.bus()?;
        self.power_calls.push("sleep");
        Ok(())
    }

    fn stand_by(&mut self) -> Result<(), Self::Error> {
        self.bus()?;
        self.power_calls.push("stand_by");
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.bus()?;
        self.power_calls.push("power_down");
        Ok(())
    }

    fn power_up(&mut self) -> Result<(), Self::Error> {
        self.bus()?;
        self.power_calls.push("power_up");
        Ok(())
    }

    fn encrypt(&mut self, key: Option<&[u8; KEY_LEN]>) -> Result<(), Self::Error> {
        self.bus()?;
        self.key = key.copied();
        Ok(())
    }

    fn sanity_check(&mut self) -> Result<bool, Self::Error> {
        self.bus()?;
        Ok(self.sane)
    }

    fn set_atc(&mut self, target_rssi: Option<i16>) -> Result<(), Self::Error> {
        self.bus()?;
        self.atc = target_rssi;
        Ok(())
    }

    fn set_tx_power_level(&mut self, level: u8) -> Result<bool, Self::Error> {
        self.bus()?;
        match self.tx_power_level {
            Some(_) => {
                self.tx_power_level = Some(level);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn tx_power_level(&mut self) -> Result<Option<u8>, Self::Error> {
        self.bus()?;
        Ok(self.tx_power_level)
    }

    fn receiving_rssi(&mut self) -> Result<Option<i16>, Self::Error> {
        self.bus()?;
        Ok(self.rssi)
    }
}
