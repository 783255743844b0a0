//! Hardware seams used by the drivers, plus the ATtiny85 implementations.

use core::convert::Infallible;

#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub mod adc;
pub mod delay;
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub mod gpio;
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub mod power;
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub mod usi;

#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub use adc::Adc;
pub use delay::CycleDelay;
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub use gpio::{board_init, TickPin};
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub use power::{Power, SleepMode};
#[cfg(all(target_arch = "avr", feature = "attiny85"))]
pub use usi::UsiClock;

/// ADC multiplexer inputs, numbered as in ADMUX.MUX[3:0].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    Pb5 = 0,
    Pb2 = 1,
    Pb4 = 2,
    Pb3 = 3,
    /// Internal 1.1 V bandgap
    Bandgap = 12,
}

/// Channel selection for one reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mux {
    /// Route this channel to the converter first.
    Channel(Channel),
    /// Convert whatever is already selected.
    Same,
}

/// Single-ended ADC with a wake-on-completion sleep.
pub trait AnalogInput {
    fn select(&mut self, channel: Channel);

    /// Enters the noise-reduction sleep. Entering it starts a conversion and the
    /// conversion-complete interrupt ends it; any other interrupt may end it early.
    fn sleep_until_converted(&mut self);

    /// Raw result, or `WouldBlock` while a conversion is still running.
    fn result(&mut self) -> nb::Result<u16, Infallible>;
}

/// Shift register counter value at which the overflow flag is raised.
pub const SHIFT_COUNTER_OVERFLOW: u8 = 16;

/// One load of the shift register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfFrame {
    /// Register contents; the MSB is on the pin as soon as it is loaded.
    pub data: u8,
    /// Start value of the 4 bit clock counter. It overflows at 16, so
    /// `16 - counter` bits are clocked out.
    pub counter: u8,
    /// Initial timer count. Compensates for the cycles between enabling the
    /// shift clock and starting the timer.
    pub timer_seed: u8,
}

impl HalfFrame {
    pub const fn bit_count(&self) -> u8 {
        SHIFT_COUNTER_OVERFLOW - self.counter
    }
}

/// Timer-clocked shift register driving the TX pin.
pub trait ShiftClock {
    /// Sets the bit period in CPU cycles.
    fn configure_bit_timing(&mut self, cycles_per_bit: u8);

    /// Loads `half`, starts the shift clock, then starts the timer.
    fn shift_out_half_frame(&mut self, half: HalfFrame);

    /// `true` once the configured number of bits has been clocked out.
    fn is_complete(&mut self) -> bool;

    /// Stops the timer and the shift clock. The pin keeps its current level.
    fn stop(&mut self);
}
