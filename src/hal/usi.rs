use avr_device::attiny85::{TC0, USI};

use super::{HalfFrame, ShiftClock};

// TCCR0A: clear timer on compare match
const WGM_CTC: u8 = 0b10;
// TCCR0B: no prescaling
const CS_DIV1: u8 = 0b001;
// USISR
const USIOIF: u8 = 1 << 6;
// USICR: three-wire mode, clocked by Timer0 compare match
const USIWM_THREE_WIRE: u8 = 0b01 << 4;
const USICS_TIMER0: u8 = 0b01 << 2;

/// USI shift register clocked by Timer0. DO (PB1) is the TX pin.
pub struct UsiClock {
    tc0: TC0,
    usi: USI,
}

impl UsiClock {
    pub fn new(tc0: TC0, usi: USI) -> Self {
        Self { tc0, usi }
    }
}

impl ShiftClock for UsiClock {
    fn configure_bit_timing(&mut self, cycles_per_bit: u8) {
        self.tc0.tccr0b.write(|w| unsafe { w.bits(0) });
        self.tc0.ocr0a.write(|w| unsafe { w.bits(cycles_per_bit.saturating_sub(1)) });
        self.tc0.tccr0a.write(|w| unsafe { w.bits(WGM_CTC) });
    }

    #[inline(always)]
    fn shift_out_half_frame(&mut self, half: HalfFrame) {
        self.tc0.tcnt0.write(|w| unsafe { w.bits(half.timer_seed) });
        self.usi.usidr.write(|w| unsafe { w.bits(half.data) });
        // Writing USIOIF clears the flag
        self.usi.usisr.write(|w| unsafe { w.bits(USIOIF | half.counter) });
        self.usi.usicr.write(|w| unsafe { w.bits(USIWM_THREE_WIRE | USICS_TIMER0) });
        self.tc0.tccr0b.write(|w| unsafe { w.bits(CS_DIV1) });
    }

    #[inline(always)]
    fn is_complete(&mut self) -> bool {
        self.usi.usisr.read().bits() & USIOIF != 0
    }

    #[inline(always)]
    fn stop(&mut self) {
        self.tc0.tccr0b.write(|w| unsafe { w.bits(0) });
        // Keep three-wire mode so DO still drives the last shifted bit.
        self.usi.usicr.write(|w| unsafe { w.bits(USIWM_THREE_WIRE) });
    }
}
