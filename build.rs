use std::env;
use std::fs;
use std::path::PathBuf;

struct Setting {
    env: &'static str,
    name: &'static str,
    ty: &'static str,
    default: u32,
    min: u32,
    max: u32,
}

// Board timing. All of these are measured per chip with the oscilloscope.
const SETTINGS: [Setting; 5] = [
    Setting { env: "CRASHWAGERL_F_CPU", name: "CPU_FREQ_HZ", ty: "u32", default: 7_372_800, min: 1_000_000, max: 20_000_000 },
    Setting { env: "CRASHWAGERL_BIT_CYCLES", name: "BIT_CYCLES", ty: "u8", default: 16, min: 2, max: 255 },
    Setting { env: "CRASHWAGERL_IDLE_US", name: "IDLE_US_PER_LOOP", ty: "u16", default: 123, min: 1, max: 999 },
    Setting { env: "CRASHWAGERL_OSCCAL", name: "OSCILLATOR_CAL", ty: "u8", default: 88, min: 0, max: 255 },
    Setting { env: "CRASHWAGERL_RESUME_SEED", name: "RESUME_SEED", ty: "u8", default: 1, min: 0, max: 254 },
];

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut generated = String::new();

    for setting in &SETTINGS {
        println!("cargo:rerun-if-env-changed={}", setting.env);
        let value = match env::var(setting.env) {
            Ok(raw) => raw
                .replace('_', "")
                .parse::<u32>()
                .unwrap_or_else(|_| panic!("{} is not an unsigned integer: {:?}", setting.env, raw)),
            Err(_) => setting.default,
        };
        if value < setting.min || value > setting.max {
            panic!(
                "{} = {} is outside {}..={}",
                setting.env, value, setting.min, setting.max
            );
        }
        generated.push_str(&format!(
            "pub const {}: {} = {};\n",
            setting.name, setting.ty, value
        ));
    }

    fs::write(out_dir.join("timing.rs"), generated).unwrap();

    let target = env::var("TARGET").unwrap();
    if target.contains("avr") {
        println!("cargo:warning=Building firmware for {}", target);
    }
}
