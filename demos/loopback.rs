//! Host loopback demo
//!
//! Runs the transport on the polled receive path against a simulated radio
//! whose transmissions come straight back as received frames. Shows:
//! - Transport initialisation with a passphrase key
//! - Acknowledged and unacknowledged sends
//! - Queue overflow and the lost-frame counter
//! - Power state changes
//!
//! Run with `cargo run --example loopback --features std`.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::InputPin;
use rfm69_transport::{
    config::{Encryption, TransportConfig},
    crypto::KEY_LEN,
    queue::FrameQueue,
    radio::{RadioDriver, RadioState, Retries},
    telemetry::{self, INVALID_SNR},
    RxInterruptHandler, Transport, MAX_FRAME_LEN,
};

/// Interrupt line of the simulated radio
struct SimIrq(Rc<Cell<bool>>);

impl InputPin for SimIrq {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

/// Radio that hears its own transmissions
struct LoopbackRadio {
    fifo: VecDeque<Vec<u8>>,
    last: Vec<u8>,
    irq: Rc<Cell<bool>>,
}

impl LoopbackRadio {
    fn new() -> Self {
        Self {
            fifo: VecDeque::new(),
            last: Vec::new(),
            irq: Rc::new(Cell::new(false)),
        }
    }

    fn irq_line(&self) -> SimIrq {
        SimIrq(self.irq.clone())
    }
}

impl RadioDriver for LoopbackRadio {
    type Error = Infallible;

    fn initialise(&mut self, frequency_hz: u32, _address: u8, network_id: u8) -> Result<bool, Infallible> {
        println!("radio: {} Hz, network {}", frequency_hz, network_id);
        Ok(true)
    }

    fn set_receive_interrupt(&mut self, _enabled: bool) -> Result<(), Infallible> {
        Ok(())
    }

    fn service_interrupt(&mut self) -> Result<bool, Infallible> {
        self.irq.set(!self.fifo.is_empty());
        Ok(!self.fifo.is_empty())
    }

    fn read_frame(&mut self, buffer: Option<&mut [u8]>) -> Result<usize, Infallible> {
        let data = self.fifo.pop_front().unwrap_or_default();
        self.irq.set(!self.fifo.is_empty());
        if let Some(buf) = buffer {
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            return Ok(len);
        }
        Ok(data.len())
    }

    fn send_with_retry(&mut self, to: u8, data: &[u8], retries: Option<Retries>) -> Result<bool, Infallible> {
        println!("radio: {} bytes to {} ({:?})", data.len(), to, retries);
        self.fifo.push_back(data.to_vec());
        self.irq.set(true);
        Ok(true)
    }

    fn receive_done(&mut self) -> Result<bool, Infallible> {
        match self.fifo.pop_front() {
            Some(data) => {
                self.last = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn received_data(&self) -> &[u8] {
        &self.last
    }

    fn ack_requested(&self) -> bool {
        false
    }

    fn send_ack(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_address(&mut self, _address: u8) -> Result<(), Infallible> {
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn stand_by(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn power_up(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn encrypt(&mut self, key: Option<&[u8; KEY_LEN]>) -> Result<(), Infallible> {
        println!("radio: encryption {}", if key.is_some() { "on" } else { "off" });
        Ok(())
    }

    fn sanity_check(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }
}

fn main() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let state = RadioState::new();
    let (producer, consumer) = queue.split();

    let radio = LoopbackRadio::new();
    let irq = radio.irq_line();
    let handler = RxInterruptHandler::new(producer, &state);
    let config = TransportConfig::node()
        .with_address(1)
        .with_encryption(Encryption::Passphrase("loopback"));
    let mut transport = Transport::polled(radio, config, handler, consumer, irq);

    if !transport.init() {
        eprintln!("radio init failed");
        return;
    }
    println!("mode after init: {:?}", transport.radio_mode());

    transport.send(2, b"hello", false);
    transport.send(2, b"fire and forget", true);

    let mut buf = [0u8; MAX_FRAME_LEN];
    while transport.available() {
        let len = transport.receive(&mut buf);
        println!("received {:?}", String::from_utf8_lossy(&buf[..len]));
    }

    // More frames than the queue holds, nobody reading in between
    for i in 0..6u8 {
        transport.send(2, &[i; 3], true);
    }
    while transport.radio().fifo.len() > 0 {
        transport.available();
    }
    println!("lost frames: {}", transport.lost_frames());

    transport.sleep();
    println!("mode: {:?}", transport.radio_mode());
    println!(
        "receiving SNR: {}",
        telemetry::raw(transport.get_receiving_snr(), INVALID_SNR)
    );
    transport.power_up();
    println!("mode: {:?}", transport.radio_mode());
}
