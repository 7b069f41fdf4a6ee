//! Packet transmit driver for the single-wire link.
//!
//! The generator owns the output pin and walks an explicit state machine
//! through the frame: the start marker, then one mark/space pair per
//! symbol. Every stage arms the countdown timer for its exact width and
//! the machine only advances once the timer reports finished, so the pin
//! level never changes mid-stage. Jitter is bounded by how often the
//! caller polls.
//!
//! # Usage
//!
//! ```ignore
//! let mut tx = PacketGenerator::new(pin, clock);
//! tx.begin();
//! tx.send_packet(Command::Measure, true, false, 3)?;
//! ```
//!
//! `send_packet` validates its inputs before the first edge, then busy
//! polls to completion. A started frame always runs out; this link has
//! no abort path.

use polygraph_core::timer::Timer;
use polygraph_core::traits::{Clock, OutputPin};
use polygraph_protocol::{
    Command, Frame, FrameError, PulseShape, PulseTiming, TimingError, FRAME_SYMBOLS,
};

/// Errors from starting or sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// `begin` has not been called yet
    NotInitialized,
    /// A frame is already in flight on this generator
    Busy,
    /// The frame inputs failed validation
    Frame(FrameError),
}

impl From<FrameError> for TxError {
    fn from(err: FrameError) -> Self {
        TxError::Frame(err)
    }
}

/// Result of polling the transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxStatus {
    /// No frame in flight
    Idle,
    /// Frame in flight, pin under the state machine's control
    Sending,
    /// The frame just finished; reported once, then back to `Idle`
    Complete,
}

/// Half of a transmission slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Line high for the stage's pulse width
    Mark,
    /// Line low for the inter-symbol gap
    Space,
}

/// Transmit state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    Start(Slot),
    Bit { index: u8, slot: Slot },
    Done,
}

/// Frame transmitter bound to one output pin
///
/// The pin is moved in, so exactly one generator controls a given line.
/// Call [`begin`](PacketGenerator::begin) once before the first send.
pub struct PacketGenerator<P: OutputPin, C: Clock> {
    pin: P,
    timer: Timer<C>,
    timing: PulseTiming,
    symbols: [PulseShape; FRAME_SYMBOLS],
    state: TxState,
    initialized: bool,
}

impl<P: OutputPin, C: Clock> PacketGenerator<P, C> {
    /// Create a generator with the default line timing
    pub fn new(pin: P, clock: C) -> Self {
        Self {
            pin,
            timer: Timer::new(clock),
            timing: PulseTiming::default(),
            symbols: [PulseShape::Long; FRAME_SYMBOLS],
            state: TxState::Idle,
            initialized: false,
        }
    }

    /// Create a generator with custom line timing
    ///
    /// Rejects timings a conforming receiver would misclassify.
    pub fn with_timing(pin: P, clock: C, timing: PulseTiming) -> Result<Self, TimingError> {
        timing.validate()?;
        let mut generator = Self::new(pin, clock);
        generator.timing = timing;
        Ok(generator)
    }

    /// One-time line setup: drive the idle level and mark ready
    ///
    /// Idempotent; calling again on an idle generator just re-asserts
    /// the idle level.
    pub fn begin(&mut self) {
        self.pin.set_low();
        self.timer.clear();
        self.state = TxState::Idle;
        self.initialized = true;
    }

    /// The line timing in effect
    pub fn timing(&self) -> &PulseTiming {
        &self.timing
    }

    /// Whether a frame is currently in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self.state, TxState::Idle)
    }

    /// Start transmitting a frame
    ///
    /// Emits the start marker's rising edge and returns; drive the rest
    /// of the frame with [`poll`](PacketGenerator::poll). Fails before
    /// any pin activity if the generator is uninitialized or busy.
    pub fn start(&mut self, frame: Frame) -> Result<(), TxError> {
        if !self.initialized {
            return Err(TxError::NotInitialized);
        }
        if self.is_busy() {
            return Err(TxError::Busy);
        }

        self.symbols = frame.symbols();
        self.state = TxState::Start(Slot::Mark);
        self.pin.set_high();
        self.timer.set_micros(self.timing.start_us);
        Ok(())
    }

    /// Advance the state machine if the current stage's time is up
    ///
    /// Safe to call as often as desired; the pin only changes when the
    /// stage timer has finished. Returns [`TxStatus::Complete`] exactly
    /// once per frame.
    pub fn poll(&mut self) -> TxStatus {
        if matches!(self.state, TxState::Idle) {
            return TxStatus::Idle;
        }

        if self.timer.finished() {
            self.advance();
        }

        if matches!(self.state, TxState::Done) {
            self.state = TxState::Idle;
            return TxStatus::Complete;
        }
        TxStatus::Sending
    }

    /// Validate, transmit and wait out one complete frame
    ///
    /// Runs the busy-wait poll loop until the frame (start marker plus
    /// twelve symbols) is on the wire and the line is back at idle.
    /// Invalid inputs are rejected before the first edge.
    pub fn send_packet(
        &mut self,
        command: Command,
        led_8: bool,
        led_9: bool,
        led_stripe: u8,
    ) -> Result<(), TxError> {
        let frame = Frame::new(command, led_8, led_9, led_stripe)?;
        self.start(frame)?;
        while !matches!(self.poll(), TxStatus::Complete) {}
        Ok(())
    }

    fn advance(&mut self) {
        self.state = match self.state {
            TxState::Start(Slot::Mark) => self.enter_space(TxState::Start(Slot::Space)),
            TxState::Start(Slot::Space) => self.enter_mark(0),
            TxState::Bit {
                index,
                slot: Slot::Mark,
            } => self.enter_space(TxState::Bit {
                index,
                slot: Slot::Space,
            }),
            TxState::Bit {
                index,
                slot: Slot::Space,
            } => {
                let next = index + 1;
                if (next as usize) < FRAME_SYMBOLS {
                    self.enter_mark(next)
                } else {
                    self.timer.clear();
                    TxState::Done
                }
            }
            state @ (TxState::Idle | TxState::Done) => state,
        };
    }

    /// Drive the line high for symbol `index` and arm its width
    fn enter_mark(&mut self, index: u8) -> TxState {
        let width = self.timing.shape_us(self.symbols[index as usize]);
        self.pin.set_high();
        self.timer.set_micros(width);
        TxState::Bit {
            index,
            slot: Slot::Mark,
        }
    }

    /// Drive the line low for the inter-symbol gap
    fn enter_space(&mut self, next: TxState) -> TxState {
        self.pin.set_low();
        self.timer.set_micros(self.timing.gap_us);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use heapless::Vec;
    use polygraph_protocol::{classify, PulseClass};

    /// Hand-advanced clock for testing
    struct TestClock {
        now_us: Cell<u64>,
    }

    impl TestClock {
        fn new() -> Self {
            Self { now_us: Cell::new(0) }
        }

        fn advance(&self, us: u64) {
            self.now_us.set(self.now_us.get() + us);
        }
    }

    impl Clock for TestClock {
        fn now_us(&self) -> u64 {
            self.now_us.get()
        }
    }

    /// Clock that advances by a fixed step on every read, standing in
    /// for real time passing between busy-wait polls
    struct TickingClock {
        now_us: Cell<u64>,
        step_us: u64,
    }

    impl Clock for TickingClock {
        fn now_us(&self) -> u64 {
            let now = self.now_us.get();
            self.now_us.set(now + self.step_us);
            now
        }
    }

    /// Pin recording every level change with its timestamp
    struct RecordingPin<'c> {
        clock: &'c TestClock,
        high: bool,
        edges: Vec<(u64, bool), 32>,
    }

    impl<'c> RecordingPin<'c> {
        fn new(clock: &'c TestClock) -> Self {
            Self {
                clock,
                high: false,
                edges: Vec::new(),
            }
        }
    }

    impl OutputPin for RecordingPin<'_> {
        fn set_high(&mut self) {
            if !self.high {
                self.high = true;
                self.edges.push((self.clock.now_us(), true)).unwrap();
            }
        }

        fn set_low(&mut self) {
            if self.high {
                self.high = false;
                self.edges.push((self.clock.now_us(), false)).unwrap();
            }
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Poll granularity for driven tests; well under the tiny width
    const STEP_US: u64 = 50;

    /// Drive a started frame to completion, advancing simulated time
    fn run_to_completion(
        tx: &mut PacketGenerator<RecordingPin<'_>, &TestClock>,
        clock: &TestClock,
    ) {
        for _ in 0..10_000 {
            clock.advance(STEP_US);
            if matches!(tx.poll(), TxStatus::Complete) {
                return;
            }
        }
        panic!("frame never completed");
    }

    /// High-pulse widths of a recorded frame, in order
    fn high_widths(edges: &[(u64, bool)]) -> Vec<u64, 16> {
        let mut widths = Vec::new();
        let mut rise = None;
        for &(at, high) in edges {
            if high {
                rise = Some(at);
            } else if let Some(start) = rise.take() {
                widths.push(at - start).unwrap();
            }
        }
        widths
    }

    #[test]
    fn test_send_before_begin_fails_without_edges() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);

        assert_eq!(
            tx.send_packet(Command::On, false, false, 0),
            Err(TxError::NotInitialized)
        );
        assert!(tx.pin.edges.is_empty());
    }

    #[test]
    fn test_invalid_stripe_rejected_before_any_edge() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        assert_eq!(
            tx.send_packet(Command::On, false, false, 8),
            Err(TxError::Frame(FrameError::StripeOutOfRange))
        );
        assert!(tx.pin.edges.is_empty());
        assert!(!tx.is_busy());
    }

    #[test]
    fn test_busy_while_frame_in_flight() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        let frame = Frame::new(Command::Beep, false, false, 0).unwrap();
        tx.start(frame).unwrap();
        assert!(tx.is_busy());
        assert_eq!(tx.start(frame), Err(TxError::Busy));

        run_to_completion(&mut tx, &clock);
        assert!(!tx.is_busy());
        assert!(tx.start(frame).is_ok());
    }

    #[test]
    fn test_start_marker_holds_full_width() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        assert_eq!(tx.poll(), TxStatus::Idle);

        let frame = Frame::new(Command::On, false, false, 0).unwrap();
        tx.start(frame).unwrap();
        assert!(tx.pin.is_set_high());

        // One tick short of the start width: polling must not move the pin
        clock.advance(tx.timing().start_us - 1);
        assert_eq!(tx.poll(), TxStatus::Sending);
        assert_eq!(tx.poll(), TxStatus::Sending);
        assert!(tx.pin.is_set_high());

        clock.advance(1);
        assert_eq!(tx.poll(), TxStatus::Sending);
        assert!(tx.pin.is_set_low());
    }

    #[test]
    fn test_all_zero_frame_edge_sequence() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        // MeasureFinOk with no flags is the all-zero payload: the start
        // marker followed by twelve long pulses
        let frame = Frame::new(Command::MeasureFinOk, false, false, 0).unwrap();
        tx.start(frame).unwrap();
        run_to_completion(&mut tx, &clock);

        let timing = *tx.timing();
        let mut expected: Vec<(u64, bool), 32> = Vec::new();
        expected.push((0, true)).unwrap();
        expected.push((timing.start_us, false)).unwrap();
        let mut at = timing.start_us + timing.gap_us;
        for _ in 0..FRAME_SYMBOLS {
            expected.push((at, true)).unwrap();
            expected.push((at + timing.long_us, false)).unwrap();
            at += timing.long_us + timing.gap_us;
        }

        assert_eq!(tx.pin.edges, expected);
        assert!(tx.pin.is_set_low());
        assert!(!tx.is_busy());
    }

    #[test]
    fn test_e7_pattern_on_the_wire() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        let frame = Frame::new(Command::E7, true, true, 5).unwrap();
        tx.start(frame).unwrap();
        run_to_completion(&mut tx, &clock);

        let widths = high_widths(&tx.pin.edges);
        assert_eq!(widths.len(), FRAME_SYMBOLS + 1);
        assert_eq!(classify(widths[0]), Some(PulseClass::Start));

        // Recovered shapes match the frame, bit-distinct from On's
        for (width, symbol) in widths[1..].iter().zip(frame.symbols()) {
            let expected = match symbol {
                PulseShape::Tiny => PulseClass::Tiny,
                PulseShape::Long => PulseClass::Long,
            };
            assert_eq!(classify(*width), Some(expected));
        }
        let on = Frame::new(Command::On, true, true, 5).unwrap();
        assert_ne!(frame.symbols(), on.symbols());
    }

    #[test]
    fn test_identical_sends_identical_edges() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        let frame = Frame::new(Command::MeasureFinVib, true, false, 3).unwrap();

        tx.start(frame).unwrap();
        let first_base = clock.now_us();
        run_to_completion(&mut tx, &clock);
        let first: Vec<(u64, bool), 32> = tx
            .pin
            .edges
            .iter()
            .map(|&(at, high)| (at - first_base, high))
            .collect();

        tx.pin.edges.clear();
        clock.advance(12_345); // arbitrary idle time between frames

        tx.start(frame).unwrap();
        let second_base = clock.now_us();
        run_to_completion(&mut tx, &clock);
        let second: Vec<(u64, bool), 32> = tx
            .pin
            .edges
            .iter()
            .map(|&(at, high)| (at - second_base, high))
            .collect();

        assert_eq!(first, second);
    }

    /// Pin counting rising edges, for tests that don't need timestamps
    struct CountingPin {
        high: bool,
        rising_edges: u32,
    }

    impl OutputPin for CountingPin {
        fn set_high(&mut self) {
            if !self.high {
                self.high = true;
                self.rising_edges += 1;
            }
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_send_packet_busy_waits_to_idle() {
        let clock = TickingClock {
            now_us: Cell::new(0),
            step_us: 25,
        };
        let pin = CountingPin {
            high: false,
            rising_edges: 0,
        };
        let mut tx = PacketGenerator::new(pin, &clock);
        tx.begin();

        tx.send_packet(Command::Measure, true, true, 7).unwrap();

        // Start marker plus twelve data pulses went out
        assert_eq!(tx.pin.rising_edges, FRAME_SYMBOLS as u32 + 1);
        assert!(tx.pin.is_set_low());
        assert!(!tx.is_busy());

        // The generator is immediately reusable
        tx.send_packet(Command::MeasureFinOk, false, false, 0).unwrap();
        assert_eq!(tx.pin.rising_edges, 2 * (FRAME_SYMBOLS as u32 + 1));
    }

    #[test]
    fn test_custom_timing_validated() {
        let clock = TestClock::new();
        let pin = RecordingPin::new(&clock);
        let timing = PulseTiming {
            start_us: 1500, // would classify as a long pulse
            ..PulseTiming::default()
        };
        assert!(matches!(
            PacketGenerator::with_timing(pin, &clock, timing),
            Err(TimingError::StartTooShort)
        ));
    }
}
