//! On the ATtiny85 this is the firmware. On a host it is the matching receiver:
//! it reads the serial stream from stdin and prints one CSV row per frame.

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use avr_device::attiny85::Peripherals;
    use crashwagerl::config;
    use crashwagerl::drivers::{Sampler, SoftUart};
    use crashwagerl::hal::{board_init, Adc, CycleDelay, Power, TickPin, UsiClock};
    use crashwagerl::Acquisition;

    let dp = Peripherals::take().unwrap();
    board_init(&dp.CPU, &dp.PORTB);

    let adc = Adc::new(dp.ADC, Power::new(dp.CPU));
    let mut uart = SoftUart::new(UsiClock::new(dp.TC0, dp.USI), config::BIT_CYCLES);

    // The ADC interrupt is what wakes the CPU after each conversion.
    unsafe { avr_device::interrupt::enable() };

    announce(&mut uart);

    Acquisition::start(
        Sampler::new(adc, CycleDelay),
        uart,
        TickPin::new(dp.PORTB),
        CycleDelay,
        config::IDLE_US_PER_LOOP,
    )
    .run()
}

/// Prints the build timing once, before the first frame.
#[cfg(all(target_arch = "avr", feature = "debug"))]
fn announce<W: ufmt::uWrite>(uart: &mut W) {
    use crashwagerl::config;

    let _ = ufmt::uwrite!(
        uart,
        "# crashwagerl {} baud idle {} us\r\n",
        config::BAUD,
        config::IDLE_US_PER_LOOP
    );
}

#[cfg(all(target_arch = "avr", not(feature = "debug")))]
fn announce<W>(_uart: &mut W) {}

#[cfg(not(target_arch = "avr"))]
fn main() {
    use std::io::{self, BufRead, Write};

    use crashwagerl::Frame;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut line = Vec::with_capacity(32);
    let mut number = 0usize;

    if writeln!(out, "millis,reference,ch1,ch2,ch3,vcc_mv").is_err() {
        return;
    }

    loop {
        line.clear();
        match input.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => number += 1,
            Err(error) => {
                eprintln!("read error: {}", error);
                break;
            }
        }

        if line.first() == Some(&b'#') {
            eprintln!("device: {}", String::from_utf8_lossy(&line).trim_end());
            continue;
        }

        let frame = match Frame::parse(&line) {
            Ok(frame) => frame,
            Err(error) => {
                eprintln!("line {}: {}", number, error);
                continue;
            }
        };

        let [ch1, ch2, ch3] = frame.channels;
        let vcc = frame.supply_millivolts().unwrap_or(0);
        let written = writeln!(
            out,
            "{},{},{},{},{},{}",
            frame.millis, frame.reference, ch1, ch2, ch3, vcc
        );
        if written.is_err() {
            break;
        }
    }

    let _ = out.flush();
}
