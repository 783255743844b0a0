//! 3 channel ADC logger: samples every millisecond and streams base64 frames
//! over a USI soft UART.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

#[cfg(all(target_arch = "avr", not(feature = "attiny85")))]
compile_error!("no chip selected, enable the `attiny85` feature");

pub mod acquisition;
pub mod base64;
pub mod config;
pub mod drivers;
pub mod error;
pub mod frame;
pub mod hal;

#[cfg(test)]
mod testing;

pub use acquisition::Acquisition;
pub use error::{DecodeError, FrameError};
pub use frame::Frame;
