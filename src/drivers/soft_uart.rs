//! Transmit-only UART on the USI shift register.
//!
//! Frame format is 8N2: start bit, 8 data bits LSB first, two stop bits. An 11 bit
//! frame does not fit the 8 bit register, so every byte goes out in two loads:
//!
//! ```text
//! load 1, 5 clocks:  0  D0 D1 D2 D3 D4 D5 D6
//! load 2, 6 clocks:  D4 D5 D6 D7 1  1  1  1
//! ```
//!
//! The register shifts MSB first, hence the bit reversal. The second load starts
//! with D4, which is already on the pin when the first load overflows.

use core::convert::Infallible;

use crate::config::RESUME_SEED;
use crate::hal::{HalfFrame, ShiftClock};

/// Timer count loaded before the first half-frame. The timer is started one
/// instruction after the shift clock, so it starts one count ahead.
pub const START_SEED: u8 = 1;

const FIRST_COUNTER: u8 = 11;
const SECOND_COUNTER: u8 = 10;

/// Reverses the bit order of `byte`.
#[inline]
pub const fn reverse(byte: u8) -> u8 {
    byte.reverse_bits()
}

/// Splits `byte` into its two shift register loads.
#[inline]
pub const fn half_frames(byte: u8) -> [HalfFrame; 2] {
    let reversed = reverse(byte);
    [
        HalfFrame { data: reversed >> 1, counter: FIRST_COUNTER, timer_seed: START_SEED },
        HalfFrame { data: (reversed << 4) | 0x0F, counter: SECOND_COUNTER, timer_seed: RESUME_SEED },
    ]
}

pub struct SoftUart<S> {
    clock: S,
}

impl<S: ShiftClock> SoftUart<S> {
    /// `cycles_per_bit` is the compare value plus one and must be at least 2.
    pub fn new(mut clock: S, cycles_per_bit: u8) -> Self {
        debug_assert!(cycles_per_bit >= 2, "bit period below 2 cycles");
        clock.configure_bit_timing(cycles_per_bit);
        Self { clock }
    }

    /// Sends one byte and returns once its last stop bit has been clocked out.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        for half in half_frames(byte) {
            self.clock.shift_out_half_frame(half);
            while !self.clock.is_complete() {}
            self.clock.stop();
        }
    }

    /// Sends `message` up to, not including, the first NUL byte.
    ///
    /// Blocks for the whole message. Time spent depends only on the number of
    /// bytes sent, never on their values.
    pub fn send(&mut self, message: &[u8]) {
        for &byte in message.iter().take_while(|&&byte| byte != 0) {
            self.write_byte(byte);
        }
    }

    pub fn release(self) -> S {
        self.clock
    }
}

impl<S: ShiftClock> ufmt::uWrite for SoftUart<S> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.send(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Ledger, SimShiftClock};

    fn uart(ledger: &Ledger) -> SoftUart<SimShiftClock> {
        SoftUart::new(SimShiftClock::new(ledger), 16)
    }

    #[test]
    fn reverse_is_an_involution() {
        for byte in 0..=u8::MAX {
            assert_eq!(reverse(reverse(byte)), byte);
        }
        assert_eq!(reverse(0b1000_1011), 0b1101_0001);
        assert_eq!(reverse(0x01), 0x80);
    }

    #[test]
    fn half_frames_carry_start_and_stop_bits() {
        let [first, second] = half_frames(b'A');
        // 'A' = 0x41, reversed 0x82
        assert_eq!(first.data, 0x41);
        assert_eq!(first.data & 0x80, 0, "start bit");
        assert_eq!(first.bit_count(), 5);
        assert_eq!(first.timer_seed, START_SEED);
        assert_eq!(second.data, 0x2F);
        assert_eq!(second.bit_count(), 6);
    }

    #[test]
    fn configures_bit_timing_once() {
        let ledger = Ledger::new();
        let uart = uart(&ledger);
        assert_eq!(uart.release().cycles_per_bit(), Some(16));
        assert_eq!(ledger.operations(), 1);
    }

    #[test]
    #[should_panic(expected = "bit period below 2 cycles")]
    fn rejects_a_zero_bit_period() {
        let ledger = Ledger::new();
        SoftUart::new(SimShiftClock::new(&ledger), 0);
    }

    #[test]
    fn every_byte_arrives_intact() {
        let ledger = Ledger::new();
        let mut uart = uart(&ledger);
        let all: Vec<u8> = (1..=u8::MAX).collect();
        uart.send(&all);

        let clock = uart.release();
        assert_eq!(clock.received(), all);
        assert_eq!(clock.wire.len(), 255 * 11);
        assert!(!clock.running());
    }

    #[test]
    fn stops_between_and_after_half_frames() {
        let ledger = Ledger::new();
        let mut uart = uart(&ledger);
        uart.write_byte(0x55);
        let clock = uart.release();
        assert_eq!(clock.loads.len(), 2);
        assert_eq!(clock.stops, 2);
    }

    #[test]
    fn stops_at_nul() {
        let ledger = Ledger::new();
        let mut uart = uart(&ledger);
        uart.send(b"AB\0CD");
        assert_eq!(uart.release().received(), b"AB");
    }

    #[test]
    fn cost_depends_only_on_length() {
        let costs: Vec<u32> = [[0x01; 4], [0xFF; 4], *b"AZ/+", [0x80, 0x7F, 0x55, 0xAA]]
            .iter()
            .map(|message| {
                let ledger = Ledger::new();
                let mut uart = uart(&ledger);
                ledger.reset();
                uart.send(message);
                ledger.operations()
            })
            .collect();
        assert!(costs.windows(2).all(|pair| pair[0] == pair[1]), "{:?}", costs);
    }

    #[test]
    fn writes_formatted_text() {
        let ledger = Ledger::new();
        let mut uart = uart(&ledger);
        ufmt::uwrite!(uart, "# {} baud\r\n", 460_800u32).unwrap();
        assert_eq!(uart.release().received(), b"# 460800 baud\r\n");
    }
}
