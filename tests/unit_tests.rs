use rfm69_transport::{
    queue::FrameQueue,
    radio::{RadioMode, RadioState},
    RxInterruptHandler,
};

mod mock;
use mock::MockRadio;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (len * 16 + i) as u8).collect()
}

#[test]
fn test_handler_queues_frames_in_order() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, mut consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    radio.deliver(b"first", false);
    radio.deliver(b"second", false);
    handler.on_interrupt(&mut radio);
    handler.on_interrupt(&mut radio);

    assert_eq!(consumer.pop().unwrap().as_slice(), b"first");
    assert_eq!(consumer.pop().unwrap().as_slice(), b"second");
    assert!(consumer.pop().is_none());
    assert_eq!(radio.housekeeping, 2);
    assert_eq!(radio.pending(), 0);
}

#[test]
fn test_handler_overflow_drains_and_counts() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, mut consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    for len in 1..=5 {
        radio.deliver(&payload(len), false);
        handler.on_interrupt(&mut radio);
    }

    // The fifth frame left the chip but was not queued
    assert_eq!(radio.pending(), 0);
    assert_eq!(radio.discarded, 1);
    assert_eq!(handler.lost_frames(), 1);
    assert_eq!(consumer.len(), 4);

    for len in 1..=4 {
        let frame = consumer.pop().unwrap();
        assert_eq!(frame.len(), len);
        assert_eq!(frame.as_slice(), payload(len).as_slice());
    }
    assert!(consumer.is_empty());
}

#[test]
fn test_handler_lost_counter_saturates() {
    let mut queue: FrameQueue<1> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    for _ in 0..300 {
        radio.deliver(b"x", false);
        handler.on_interrupt(&mut radio);
    }

    assert_eq!(radio.discarded, 299);
    assert_eq!(consumer.lost_frames(), 255);
    assert_eq!(consumer.len(), 1);
}

#[test]
fn test_transmit_complete_returns_to_rx() {
    let mut queue: FrameQueue<2> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    state.begin_transmit();
    assert_eq!(state.mode(), RadioMode::Tx);
    handler.on_interrupt(&mut radio);

    assert_eq!(state.mode(), RadioMode::Rx);
    assert!(state.tx_complete());
    // TX completion does not touch the receive side
    assert_eq!(radio.housekeeping, 0);
    assert!(consumer.is_empty());
}

#[test]
fn test_low_power_interrupt_is_ignored() {
    let mut queue: FrameQueue<2> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Sleep);
    let (producer, consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    radio.deliver(b"late", false);
    handler.on_interrupt(&mut radio);

    assert_eq!(state.mode(), RadioMode::Sleep);
    assert_eq!(radio.pending(), 1);
    assert!(consumer.is_empty());
}

#[test]
fn test_spurious_interrupt_queues_nothing() {
    let mut queue: FrameQueue<2> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    handler.on_interrupt(&mut radio);

    assert_eq!(radio.housekeeping, 1);
    assert!(consumer.is_empty());
    assert_eq!(consumer.lost_frames(), 0);
}

#[test]
fn test_bus_error_is_absorbed() {
    let mut queue: FrameQueue<2> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    radio.deliver(b"frame", false);
    radio.broken = true;
    handler.on_interrupt(&mut radio);

    assert!(consumer.is_empty());
    assert_eq!(consumer.lost_frames(), 0);
    assert_eq!(state.mode(), RadioMode::Rx);
}

// Whether a frame dropped on overflow still gets acknowledged is up to the
// driver's housekeeping; the handler itself never acknowledges.
#[test]
fn test_discarded_frame_not_acked_by_handler() {
    let mut queue: FrameQueue<1> = FrameQueue::new();
    let state = RadioState::new();
    state.set_mode(RadioMode::Rx);
    let (producer, _consumer) = queue.split();
    let mut handler = RxInterruptHandler::new(producer, &state);
    let mut radio = MockRadio::new();

    radio.deliver(b"kept", true);
    radio.deliver(b"dropped", true);
    handler.on_interrupt(&mut radio);
    handler.on_interrupt(&mut radio);

    assert_eq!(radio.discarded, 1);
    assert_eq!(radio.acks_sent, 0);
}
