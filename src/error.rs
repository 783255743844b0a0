//! Error types for the receiving side of the wire format

use core::fmt;

use ufmt::{uDisplay, uWrite, Formatter};

/// Failure to turn base64 text back into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No characters were given.
    Empty,
    /// More characters than fit a `u32` decode.
    TooLong { len: usize },
    /// A byte outside `A-Z a-z 0-9 + /`.
    InvalidCharacter { position: usize, byte: u8 },
    /// Six characters whose value does not fit in 32 bits.
    Overflow,
}

/// Frame fields, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Timecode,
    Reference,
    Channel(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Line is not exactly one frame long.
    Length(usize),
    /// Line does not end in CR LF.
    Terminator,
    Field { field: Field, source: DecodeError },
}

pub type Result<T> = core::result::Result<T, FrameError>;

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => f.write_str("empty input"),
            DecodeError::TooLong { len } => write!(f, "{} characters, at most 6 allowed", len),
            DecodeError::InvalidCharacter { position, byte } => {
                write!(f, "invalid character 0x{:02X} at position {}", byte, position)
            }
            DecodeError::Overflow => f.write_str("value does not fit in 32 bits"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Timecode => f.write_str("timecode"),
            Field::Reference => f.write_str("reference"),
            Field::Channel(n) => write!(f, "channel {}", n),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Length(len) => write!(f, "frame has {} bytes, expected 14", len),
            FrameError::Terminator => f.write_str("frame does not end in CR LF"),
            FrameError::Field { field, source } => write!(f, "{}: {}", field, source),
        }
    }
}

impl uDisplay for DecodeError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            DecodeError::Empty => f.write_str("empty input"),
            DecodeError::TooLong { len } => {
                uDisplay::fmt(len, f)?;
                f.write_str(" characters, at most 6 allowed")
            }
            DecodeError::InvalidCharacter { position, byte } => {
                f.write_str("invalid character ")?;
                uDisplay::fmt(byte, f)?;
                f.write_str(" at position ")?;
                uDisplay::fmt(position, f)
            }
            DecodeError::Overflow => f.write_str("value does not fit in 32 bits"),
        }
    }
}

impl uDisplay for Field {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Field::Timecode => f.write_str("timecode"),
            Field::Reference => f.write_str("reference"),
            Field::Channel(n) => {
                f.write_str("channel ")?;
                uDisplay::fmt(n, f)
            }
        }
    }
}

impl uDisplay for FrameError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            FrameError::Length(len) => {
                f.write_str("frame has ")?;
                uDisplay::fmt(len, f)?;
                f.write_str(" bytes, expected 14")
            }
            FrameError::Terminator => f.write_str("frame does not end in CR LF"),
            FrameError::Field { field, source } => {
                uDisplay::fmt(field, f)?;
                f.write_str(": ")?;
                uDisplay::fmt(source, f)
            }
        }
    }
}
