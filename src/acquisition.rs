//! The 1 ms acquisition loop.
//!
//! Every iteration must take exactly the same number of cycles: the idle delay at
//! the end is a fixed, per-board trimmed constant, not a timer. Nothing in
//! [`Acquisition::step`] may branch on sampled data.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::ToggleableOutputPin;

use crate::config::POWER_SETTLE_US;
use crate::drivers::{Sampler, SoftUart};
use crate::frame::{self, Frame, FRAME_LEN};
use crate::hal::{AnalogInput, Channel, Mux, ShiftClock};

/// Analog inputs in frame order.
pub const INPUTS: [Channel; frame::CHANNELS] = [Channel::Pb2, Channel::Pb3, Channel::Pb4];

pub struct Acquisition<A, D, S, P, W> {
    sampler: Sampler<A, D>,
    uart: SoftUart<S>,
    tick: P,
    idle: W,
    idle_us: u16,
    reference: u16,
    millis: u32,
    buffer: [u8; FRAME_LEN],
}

impl<A, D, S, P, W> Acquisition<A, D, S, P, W>
where
    A: AnalogInput,
    D: DelayUs<u16>,
    S: ShiftClock,
    P: ToggleableOutputPin<Error = Infallible>,
    W: DelayUs<u16>,
{
    /// Waits for the supply to settle, measures the bandgap reference and
    /// returns a loop ready to run.
    ///
    /// `idle_us` is the time left in each millisecond after sampling and
    /// sending. It has to be measured on the tick pin for every build.
    pub fn start(
        mut sampler: Sampler<A, D>,
        uart: SoftUart<S>,
        tick: P,
        mut idle: W,
        idle_us: u16,
    ) -> Self {
        idle.delay_us(POWER_SETTLE_US);
        let reference = sampler.calibrate_reference();

        Self {
            sampler,
            uart,
            tick,
            idle,
            idle_us,
            reference,
            millis: 0,
            buffer: frame::empty_buffer(),
        }
    }

    /// One millisecond: tick, sample, encode, send, count, idle.
    #[inline]
    pub fn step(&mut self) {
        self.tick.toggle().unwrap_or_else(|never| match never {});

        let mut channels = [0u16; frame::CHANNELS];
        for (value, &input) in channels.iter_mut().zip(INPUTS.iter()) {
            *value = self.sampler.read(Mux::Channel(input));
        }

        Frame { millis: self.millis, reference: self.reference, channels }
            .write_fields(&mut self.buffer);
        self.uart.send(&self.buffer);

        self.millis = self.millis.wrapping_add(1);
        self.idle.delay_us(self.idle_us);
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Bandgap reading taken at start-up.
    pub fn reference(&self) -> u16 {
        self.reference
    }

    /// Iterations completed so far, modulo 2^32.
    pub fn millis(&self) -> u32 {
        self.millis
    }

    /// Last frame handed to the UART.
    pub fn frame(&self) -> &[u8; FRAME_LEN] {
        &self.buffer
    }

    #[cfg(test)]
    fn set_millis(&mut self, millis: u32) {
        self.millis = millis;
    }

    #[cfg(test)]
    fn release(self) -> (Sampler<A, D>, SoftUart<S>, P, W) {
        (self.sampler, self.uart, self.tick, self.idle)
    }
}
