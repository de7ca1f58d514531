//! Protection state types

use core::fmt;

/// Byte written to a control file to lift write protection
pub const UNPROTECTED_BYTE: u8 = b'0';
/// Byte written to a control file to apply write protection
pub const PROTECTED_BYTE: u8 = b'1';

/// Decoded value of a control file's state byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WpState {
    /// Writes reach the device
    Unprotected,
    /// The device rejects writes
    Protected,
}

impl WpState {
    /// Decode a raw state byte
    ///
    /// Only `'0'` and `'1'` are recognized.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            UNPROTECTED_BYTE => Some(WpState::Unprotected),
            PROTECTED_BYTE => Some(WpState::Protected),
            _ => None,
        }
    }

    /// Raw byte for this state
    pub const fn as_byte(self) -> u8 {
        match self {
            WpState::Unprotected => UNPROTECTED_BYTE,
            WpState::Protected => PROTECTED_BYTE,
        }
    }
}

impl fmt::Display for WpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WpState::Unprotected => write!(f, "unprotected"),
            WpState::Protected => write!(f, "protected"),
        }
    }
}

/// Protection state captured by the last unprotect call
///
/// Reprotect only restores [`ArchivedState::Recognized`]. A device whose
/// state was never seen, or could not be decoded, is left alone rather than
/// forced into protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchivedState {
    /// Unprotect has not captured anything yet
    #[default]
    NeverCaptured,
    /// Unprotect ran but the state byte could not be read or decoded
    Unknown,
    /// State observed before unprotect wrote `'0'`
    Recognized(WpState),
}

impl ArchivedState {
    /// The state reprotect should write back, if any
    pub fn restorable(self) -> Option<WpState> {
        match self {
            ArchivedState::Recognized(state) => Some(state),
            ArchivedState::NeverCaptured | ArchivedState::Unknown => None,
        }
    }
}

impl fmt::Display for ArchivedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchivedState::NeverCaptured => write!(f, "never captured"),
            ArchivedState::Unknown => write!(f, "unknown"),
            ArchivedState::Recognized(state) => write!(f, "{}", state),
        }
    }
}

/// Why an operation left the control file untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Reprotect was called before any unprotect
    NeverCaptured,
    /// The state observed by unprotect was not recognized
    Unknown,
}

/// What an unprotect or reprotect call did to the control file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A state byte was written
    Wrote {
        /// State read before the write, `None` if the file was not read
        from: Option<WpState>,
        /// State written
        to: WpState,
    },
    /// Nothing was written
    Skipped(SkipReason),
}

impl Transition {
    /// Whether the control file was written
    pub fn wrote(&self) -> bool {
        matches!(self, Transition::Wrote { .. })
    }
}
