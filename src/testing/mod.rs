//! Simulated hardware for host tests.
//!
//! Every simulated peripheral records each operation in a shared [`Ledger`], so a
//! test can compare how much work two loop iterations did.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::ToggleableOutputPin;

use crate::hal::{AnalogInput, Channel, HalfFrame, ShiftClock};

/// Shared count of hardware operations.
#[derive(Clone, Default)]
pub struct Ledger(Rc<Cell<u32>>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn operations(&self) -> u32 {
        self.0.get()
    }

    pub fn reset(&self) {
        self.0.set(0);
    }
}

/// ADC returning queued readings for whichever channel is selected, 0 when none are queued.
pub struct SimAdc {
    ledger: Ledger,
    queues: [VecDeque<u16>; 16],
    selected: Option<Channel>,
    converting: bool,
    busy_polls: u32,
    busy_left: u32,
    selects: u32,
    conversions: u32,
    polls: u32,
}

impl SimAdc {
    pub fn new(ledger: &Ledger) -> Self {
        Self {
            ledger: ledger.clone(),
            queues: Default::default(),
            selected: None,
            converting: false,
            busy_polls: 0,
            busy_left: 0,
            selects: 0,
            conversions: 0,
            polls: 0,
        }
    }

    pub fn push(&mut self, channel: Channel, value: u16) {
        self.queues[channel as usize].push_back(value);
    }

    /// Makes every conversion report "still running" `polls` times after wake-up.
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    pub fn selected(&self) -> Option<Channel> {
        self.selected
    }

    pub fn selects(&self) -> u32 {
        self.selects
    }

    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn pending(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }
}

impl AnalogInput for SimAdc {
    fn select(&mut self, channel: Channel) {
        self.ledger.record();
        self.selects += 1;
        self.selected = Some(channel);
    }

    fn sleep_until_converted(&mut self) {
        self.ledger.record();
        self.conversions += 1;
        self.converting = true;
        self.busy_left = self.busy_polls;
    }

    fn result(&mut self) -> nb::Result<u16, Infallible> {
        self.ledger.record();
        self.polls += 1;
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return Err(nb::Error::WouldBlock);
        }
        assert!(self.converting, "result read without a conversion");
        self.converting = false;
        let queue = match self.selected {
            Some(channel) => &mut self.queues[channel as usize],
            None => panic!("conversion without a selected channel"),
        };
        Ok(queue.pop_front().unwrap_or(0))
    }
}

/// USI + Timer0 model: one bit leaves the register per `is_complete` poll.
///
/// `wire` holds the pin level for every elapsed bit-time.
pub struct SimShiftClock {
    ledger: Ledger,
    cycles_per_bit: Option<u8>,
    data: u8,
    remaining: u8,
    running: bool,
    pub wire: Vec<bool>,
    pub loads: Vec<HalfFrame>,
    pub stops: u32,
}

impl SimShiftClock {
    pub fn new(ledger: &Ledger) -> Self {
        Self {
            ledger: ledger.clone(),
            cycles_per_bit: None,
            data: 0xFF,
            remaining: 0,
            running: false,
            wire: Vec::new(),
            loads: Vec::new(),
            stops: 0,
        }
    }

    pub fn cycles_per_bit(&self) -> Option<u8> {
        self.cycles_per_bit
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Reassembles the bytes on the wire: start bit low, 8 data bits LSB first,
    /// then two high stop bits. Panics on a framing error.
    pub fn received(&self) -> Vec<u8> {
        assert_eq!(self.wire.len() % 11, 0, "partial frame on the wire");
        self.wire
            .chunks(11)
            .map(|bits| {
                assert!(!bits[0], "missing start bit");
                assert!(bits[9] && bits[10], "missing stop bits");
                bits[1..9]
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << i))
            })
            .collect()
    }
}

impl ShiftClock for SimShiftClock {
    fn configure_bit_timing(&mut self, cycles_per_bit: u8) {
        self.ledger.record();
        self.cycles_per_bit = Some(cycles_per_bit);
    }

    fn shift_out_half_frame(&mut self, half: HalfFrame) {
        self.ledger.record();
        assert!(!self.running, "half-frame loaded while the clock runs");
        assert!(self.cycles_per_bit.is_some(), "bit timing not configured");
        self.data = half.data;
        self.remaining = half.bit_count();
        self.running = true;
        self.loads.push(half);
    }

    fn is_complete(&mut self) -> bool {
        self.ledger.record();
        if self.running && self.remaining > 0 {
            self.wire.push(self.data & 0x80 != 0);
            self.data <<= 1;
            self.remaining -= 1;
        }
        self.remaining == 0
    }

    fn stop(&mut self) {
        self.ledger.record();
        self.running = false;
        self.stops += 1;
    }
}

#[derive(Default)]
pub struct SimPin {
    ledger: Ledger,
    toggles: u32,
}

impl SimPin {
    pub fn new(ledger: &Ledger) -> Self {
        Self { ledger: ledger.clone(), ..Self::default() }
    }

    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl ToggleableOutputPin for SimPin {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.ledger.record();
        self.toggles += 1;
        Ok(())
    }
}

/// Delay that only adds up the requested time.
pub struct CountingDelay {
    ledger: Ledger,
    total_us: u32,
    calls: Vec<u16>,
}

impl CountingDelay {
    pub fn new(ledger: &Ledger) -> Self {
        Self { ledger: ledger.clone(), total_us: 0, calls: Vec::new() }
    }

    pub fn total_us(&self) -> u32 {
        self.total_us
    }

    pub fn calls(&self) -> &[u16] {
        &self.calls
    }
}

impl DelayUs<u16> for CountingDelay {
    fn delay_us(&mut self, us: u16) {
        self.ledger.record();
        self.total_us += us as u32;
        self.calls.push(us);
    }
}

/// xorshift32, enough to scramble test inputs.
pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self(seed | 1)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    pub fn sample(&mut self) -> u16 {
        (self.next_u32() & 0x03FF) as u16
    }
}
