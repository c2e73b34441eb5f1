//! OSC argument values and time tags

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
const NTP_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

/// Number of fraction units per second.
const FRACTION_SCALE: u64 = 1 << 32;

/// OSC type tag characters understood by the decoder
pub mod tag {
    /// 32-bit big-endian signed integer
    pub const INT: char = 'i';
    /// 32-bit big-endian IEEE-754 float
    pub const FLOAT: char = 'f';
    /// NUL-terminated, 4-byte padded string
    pub const STRING: char = 's';
    /// Length-prefixed, 4-byte padded byte blob
    pub const BLOB: char = 'b';
    /// Leading character of every type-tag string
    pub const PREFIX: char = ',';
}

/// A decoded OSC argument
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// `i`
    Int(i32),
    /// `f`
    Float(f32),
    /// `s`
    String(String),
    /// `b`
    Blob(Bytes),
}

impl Value {
    /// Type tag character written for this value
    #[must_use]
    pub const fn type_tag(&self) -> char {
        match self {
            Self::Int(_) => tag::INT,
            Self::Float(_) => tag::FLOAT,
            Self::String(_) => tag::STRING,
            Self::Blob(_) => tag::BLOB,
        }
    }

    /// Integer payload, if this is an `Int`
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a `String`
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Blob payload, if this is a `Blob`
    #[must_use]
    pub const fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Self::Blob(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::Blob(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(Bytes::from(v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Blob(v) => write!(f, "<blob {} bytes>", v.len()),
        }
    }
}

/// OSC time tag (64-bit NTP-style tick count)
///
/// Upper 32 bits are seconds since 1900-01-01, lower 32 bits are the
/// fractional part. The value `1` means "immediately".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// Special time tag meaning "deliver immediately"
    pub const IMMEDIATE: Self = Self(1);

    /// Wrap a raw tick count
    #[must_use]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Raw tick count
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Seconds since the NTP epoch
    #[must_use]
    pub const fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fractional seconds in units of 2^-32 s
    #[must_use]
    pub const fn fraction(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }

    /// Check for the "immediately" sentinel
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        self.0 == Self::IMMEDIATE.0
    }

    /// Convert a wall-clock time to a time tag
    ///
    /// Times before the Unix epoch clamp to the epoch.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        let secs = since_unix.as_secs() + NTP_UNIX_OFFSET_SECS;
        let fraction = (u64::from(since_unix.subsec_nanos()) * FRACTION_SCALE) / 1_000_000_000;
        Self((secs << 32) | (fraction & 0xFFFF_FFFF))
    }

    /// Convert to wall-clock time
    ///
    /// Tags earlier than the Unix epoch (including `IMMEDIATE`) clamp to it.
    #[must_use]
    pub fn to_system_time(self) -> SystemTime {
        let secs = u64::from(self.seconds());
        let Some(unix_secs) = secs.checked_sub(NTP_UNIX_OFFSET_SECS) else {
            return UNIX_EPOCH;
        };
        // Fits: fraction < 2^32, so nanos < 1e9.
        let nanos = (u64::from(self.fraction()) * 1_000_000_000) / FRACTION_SCALE;
        UNIX_EPOCH + Duration::new(unix_secs, nanos as u32)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}

impl From<u64> for Timestamp {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_immediate() {
            write!(f, "immediate")
        } else {
            write!(f, "{}.{:08x}", self.seconds(), self.fraction())
        }
    }
}
