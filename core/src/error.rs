//! Error types for the persistence, presentation and tuning boundaries.

/// Errors from battery-backed save memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveError {
    /// Access past the end of the save memory.
    OutOfRange { offset: usize, len: usize },
    /// The backing medium reported a failure (the host logs the cause).
    Medium,
    /// A write did not read back as written.
    VerifyFailed { offset: usize },
    /// No game-state record present.
    NoSaveData,
    /// A game-state record holds a value that cannot be restored.
    Corrupt { offset: usize, value: u32 },
}

impl core::fmt::Display for SaveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SaveError::OutOfRange { offset, len } => {
                write!(f, "save access out of range: {len} bytes at offset {offset}")
            }
            SaveError::Medium => write!(f, "save medium failure"),
            SaveError::VerifyFailed { offset } => {
                write!(f, "save verification failed at offset {offset}")
            }
            SaveError::NoSaveData => write!(f, "no saved game"),
            SaveError::Corrupt { offset, value } => {
                write!(f, "corrupt save record at offset {offset}: 0x{value:08x}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SaveError {}

/// Errors from copying the back buffer to the visible buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipError {
    SizeMismatch { expected: usize, got: usize },
}

impl core::fmt::Display for FlipError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlipError::SizeMismatch { expected, got } => {
                write!(f, "visible buffer holds {got} pixels, expected {expected}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FlipError {}

/// A tuning value the frame loop cannot run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningError {
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl core::fmt::Display for TuningError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TuningError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "tuning {field} = {value} is outside {min}..={max}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TuningError {}
