//! Radio interrupt handler
//!
//! Runs on every data-ready interrupt of the radio. In RX it drains the
//! received frame into the next queue slot; when the queue is full the
//! frame is still read out of the chip (clearing the interrupt condition)
//! and counted as lost. In TX the interrupt signals the end of a
//! transmission and the radio goes back to RX.
//!
//! The handler never blocks, allocates or sends acknowledgments itself.

use crate::queue::Producer;
use crate::radio::{RadioDriver, RadioMode, RadioState};

/// Producer side of the receive path
pub struct RxInterruptHandler<'q, const N: usize> {
    frames: Producer<'q, N>,
    state: &'q RadioState,
}

impl<'q, const N: usize> RxInterruptHandler<'q, N> {
    /// Create a handler pushing into `frames`
    pub fn new(frames: Producer<'q, N>, state: &'q RadioState) -> Self {
        Self { frames, state }
    }

    /// Shared radio state this handler drives
    pub fn state(&self) -> &'q RadioState {
        self.state
    }

    /// Frames dropped because the queue was full
    pub fn lost_frames(&self) -> u8 {
        self.frames.lost_frames()
    }

    /// Handle one radio interrupt
    pub fn on_interrupt<R: RadioDriver>(&mut self, radio: &mut R) {
        match self.state.mode() {
            RadioMode::Rx => self.receive(radio),
            RadioMode::Tx => {
                trace!("irq: transmit complete");
                self.state.complete_transmit();
            }
            // The chip raises no interrupts in the low-power states
            _ => {}
        }
    }

    fn receive<R: RadioDriver>(&mut self, radio: &mut R) {
        match radio.service_interrupt() {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) => {
                warn!("irq: housekeeping failed");
                return;
            }
        }

        let mut read_failed = false;
        let stored = self.frames.push_with(|frame| {
            read_failed = frame.fill(|buf| radio.read_frame(Some(buf))).is_err();
            !read_failed
        });
        if stored {
            trace!("irq: queued frame");
            return;
        }
        if read_failed {
            warn!("irq: frame read failed");
            return;
        }

        // Queue full, the frame still has to leave the FIFO
        if radio.read_frame(None).is_err() {
            warn!("irq: discard failed");
        }
        debug!("irq: queue full, lost {}", self.frames.lost_frames());
    }
}
