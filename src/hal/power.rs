use avr_device::attiny85::CPU;

const SE: u8 = 1 << 5;
const SM_MASK: u8 = 0b11 << 3;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum SleepMode {
    AdcNoiseReduction = 1,
}

/// Sleep control in MCUCR.
pub struct Power {
    cpu: CPU,
}

impl Power {
    pub fn new(cpu: CPU) -> Self {
        Self { cpu }
    }

    #[inline]
    pub fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.cpu.mcucr.modify(|r, w| unsafe {
            w.bits((r.bits() & !SM_MASK) | ((mode as u8) << 3))
        });
    }

    #[inline]
    pub fn enable_sleep(&mut self) {
        self.cpu.mcucr.modify(|r, w| unsafe { w.bits(r.bits() | SE) });
    }

    #[inline]
    pub fn disable_sleep(&mut self) {
        self.cpu.mcucr.modify(|r, w| unsafe { w.bits(r.bits() & !SE) });
    }

    /// Sleeps in `mode` until the next enabled interrupt.
    #[inline]
    pub fn sleep(&mut self, mode: SleepMode) {
        self.set_sleep_mode(mode);
        self.enable_sleep();
        unsafe { avr_device::asm::sleep() };
        self.disable_sleep();
    }
}
