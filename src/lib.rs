//! RFM69 packet radio transport in Rust
//!
//! This crate provides the hardware transport of a wireless sensor mesh:
//! a uniform send/receive/power-control interface over a packet radio,
//! hiding chip registers and timing behind a driver trait.
//!
//! # Features
//! - Interrupt-buffered receive through a lock-free SPSC frame queue
//! - Polled and direct receive paths for platforms without a usable IRQ
//! - Radio mode tracking (RX/TX/sleep/standby/power-down)
//! - Pre-shared key provisioning with key erasure
//! - Optional `defmt` logging
//!
//! # Example
//! The driver sits in a [`SharedRadio`](radio::SharedRadio): the transport
//! owns a handle to it, the radio interrupt locks it to run the
//! [`RxInterruptHandler`].
//! ```no_run
//! use rfm69_transport::{
//!     config::TransportConfig,
//!     frame::MAX_FRAME_LEN,
//!     queue::FrameQueue,
//!     radio::{RadioDriver, RadioState, SharedRadio},
//!     transport::Transport,
//!     RxInterruptHandler,
//! };
//!
//! /// Called from the platform's radio interrupt vector
//! fn radio_interrupt<R: RadioDriver>(
//!     radio: &SharedRadio<R>,
//!     handler: &mut RxInterruptHandler<'_, 8>,
//! ) {
//!     radio.lock(|radio| handler.on_interrupt(radio));
//! }
//!
//! fn run<R: RadioDriver>(radio: &SharedRadio<R>) {
//!     let mut queue: FrameQueue<8> = FrameQueue::new();
//!     let state = RadioState::new();
//!     let (producer, consumer) = queue.split();
//!     // Handed to the interrupt context, which calls `radio_interrupt`
//!     let mut handler = RxInterruptHandler::new(producer, &state);
//!     # radio_interrupt(radio, &mut handler);
//!
//!     let mut transport = Transport::buffered(radio.handle(), TransportConfig::node(), &state, consumer);
//!     if !transport.init() {
//!         return;
//!     }
//!     transport.send(0, b"hello", false);
//!
//!     let mut buf = [0u8; MAX_FRAME_LEN];
//!     while transport.available() {
//!         let len = transport.receive(&mut buf);
//!         // hand &buf[..len] to the protocol layer
//!         # let _ = len;
//!     }
//! }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

/// Transport configuration
pub mod config;

/// Encryption key provisioning
pub mod crypto;

/// Raw radio frames
pub mod frame;

/// Radio interrupt handler
pub mod interrupt;

/// Receive queue
pub mod queue;

/// Radio driver abstraction
pub mod radio;

/// Telemetry sentinels
pub mod telemetry;

/// Transport façade
pub mod transport;

pub use frame::{Frame, MAX_FRAME_LEN};
pub use interrupt::RxInterruptHandler;
pub use queue::FrameQueue;
pub use radio::{RadioDriver, RadioMode, RadioState, SharedRadio};
pub use transport::{ReceivePath, Transport, TransportError};
