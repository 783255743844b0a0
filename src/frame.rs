//! Wire format: one 14 byte ASCII line per millisecond.
//!
//! ```text
//!  ABDE | ab | AB | ab | AB | \r\n
//!  Time | Ref| Ch1| Ch2| Ch3|
//! ```
//!
//! Every field is a fixed-width [`base64`](crate::base64) number.

use core::ops::Range;

use crate::base64;
use crate::error::{Field, FrameError, Result};

pub const FRAME_LEN: usize = 14;
pub const CHANNELS: usize = 3;

pub const TIMECODE: Range<usize> = 0..4;
pub const REFERENCE: Range<usize> = 4..6;
pub const CHANNEL_SLOTS: [Range<usize>; CHANNELS] = [6..8, 8..10, 10..12];
pub const TERMINATOR: &[u8; 2] = b"\r\n";

/// Timecode bits that make it onto the wire.
pub const TIMECODE_MASK: u32 = (1 << 24) - 1;

/// Bandgap voltage the reference reading is taken against.
pub const BANDGAP_MV: u32 = 1_100;
const ADC_FULL_SCALE: u32 = 1_024;

/// Frame buffer with the line terminator already in place.
pub const fn empty_buffer() -> [u8; FRAME_LEN] {
    *b"AAAAAAAAAAAA\r\n"
}

/// One decoded sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    /// Milliseconds since start, low 24 bits only.
    pub millis: u32,
    pub reference: u16,
    pub channels: [u16; CHANNELS],
}

impl Frame {
    /// Writes the data fields into `buffer`; the CR LF tail is left untouched.
    ///
    /// Always performs the same five fixed-width encodes.
    #[inline]
    pub fn write_fields(&self, buffer: &mut [u8; FRAME_LEN]) {
        base64::encode(self.millis, &mut buffer[TIMECODE]);
        base64::encode(self.reference, &mut buffer[REFERENCE]);
        for (slot, &sample) in CHANNEL_SLOTS.iter().zip(self.channels.iter()) {
            base64::encode(sample, &mut buffer[slot.clone()]);
        }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut buffer = empty_buffer();
        self.write_fields(&mut buffer);
        buffer
    }

    /// Parses one received line, CR LF included.
    pub fn parse(line: &[u8]) -> Result<Frame> {
        if line.len() != FRAME_LEN {
            return Err(FrameError::Length(line.len()));
        }
        if &line[FRAME_LEN - 2..] != TERMINATOR {
            return Err(FrameError::Terminator);
        }

        let decode_field = |field: Field, range: Range<usize>| {
            base64::decode(&line[range]).map_err(|source| FrameError::Field { field, source })
        };

        let millis = decode_field(Field::Timecode, TIMECODE)?;
        let reference = decode_field(Field::Reference, REFERENCE)? as u16;
        let mut channels = [0u16; CHANNELS];
        for (index, (slot, value)) in CHANNEL_SLOTS.iter().zip(channels.iter_mut()).enumerate() {
            *value = decode_field(Field::Channel(index as u8 + 1), slot.clone())? as u16;
        }

        Ok(Frame { millis, reference, channels })
    }

    /// Supply voltage derived from the bandgap reading.
    ///
    /// The converter measures the 1.1 V bandgap against Vcc, so
    /// `Vcc = 1.1 V * 1024 / reference`.
    pub fn supply_millivolts(&self) -> Option<u32> {
        match self.reference {
            0 => None,
            reference => Some(BANDGAP_MV * ADC_FULL_SCALE / reference as u32),
        }
    }

    /// Absolute voltage of channel `index` (0 based).
    pub fn channel_millivolts(&self, index: usize) -> Option<u32> {
        let raw = *self.channels.get(index)? as u64;
        let millivolts = raw * self.supply_millivolts()? as u64 / ADC_FULL_SCALE as u64;
        u32::try_from(millivolts).ok()
    }
}
