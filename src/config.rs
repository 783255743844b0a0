//! Configuration constants for the crashwagerl firmware

// CPU_FREQ_HZ, BIT_CYCLES, IDLE_US_PER_LOOP, OSCILLATOR_CAL and RESUME_SEED,
// generated by build.rs from the CRASHWAGERL_* environment variables.
include!(concat!(env!("OUT_DIR"), "/timing.rs"));

/// Serial bit rate, 460 800 baud at 7.3728 MHz with 16 cycles per bit
pub const BAUD: u32 = CPU_FREQ_HZ / BIT_CYCLES as u32;

/// Wait after power-up before the first conversion
pub const POWER_SETTLE_US: u16 = 5_000;

/// Settling time after switching to the bandgap channel (datasheet minimum is 1 ms)
pub const BANDGAP_SETTLE_US: u16 = 5_000;

/// Number of bandgap readings averaged into the calibration reference
pub const REFERENCE_READINGS: u32 = 65;

/// Loop period the idle delay is trimmed to
pub const LOOP_PERIOD_US: u16 = 1_000;

const _: () = assert!((RESUME_SEED as u16) < BIT_CYCLES as u16);
const _: () = assert!(IDLE_US_PER_LOOP < LOOP_PERIOD_US);
