#[cfg(target_arch = "avr")]
use embedded_hal::blocking::delay::DelayUs;

use crate::config::CPU_FREQ_HZ;

// Loop passes eaten by the fixed instructions around the loop.
const OVERHEAD_PASSES: u64 = 3;

/// Busy loop of 4 cycles per pass.
///
/// Its length depends only on the argument, so it can be used for the idle
/// time at the end of the acquisition loop. At most 65535 passes, about
/// 35 ms at 7.3728 MHz; longer requests are clamped.
#[derive(Clone, Copy, Default)]
pub struct CycleDelay;

impl CycleDelay {
    /// Rounded number of passes for `us` microseconds.
    #[inline(always)]
    pub const fn passes(us: u16) -> u16 {
        Self::passes_at(CPU_FREQ_HZ, us)
    }

    /// Same as [`passes`](Self::passes) for an explicit clock.
    pub const fn passes_at(cpu_hz: u32, us: u16) -> u16 {
        // Cycles / 4, numerator and denominator reduced by 16.
        let passes = (cpu_hz as u64 / 64 * us as u64 + 31_250) / 62_500;
        if passes <= OVERHEAD_PASSES {
            1
        } else if passes - OVERHEAD_PASSES > u16::MAX as u64 {
            u16::MAX
        } else {
            (passes - OVERHEAD_PASSES) as u16
        }
    }
}

#[cfg(target_arch = "avr")]
impl DelayUs<u16> for CycleDelay {
    #[inline(always)]
    fn delay_us(&mut self, us: u16) {
        let passes = Self::passes(us);
        unsafe {
            core::arch::asm!(
                "1: sbiw {passes}, 1",
                "brne 1b",
                passes = inout(reg_iw) passes => _,
                options(nomem, nostack),
            );
        }
    }
}
