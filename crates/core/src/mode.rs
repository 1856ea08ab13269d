use std::{fmt, str::FromStr};

use thiserror::Error;

/// Which pendulum the session simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(rename_all = "lowercase"))]
pub enum Mode {
    Single,
    #[default]
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pendulum mode {0:?}, expected \"single\" or \"double\"")]
pub struct ParseModeError(String);

impl Mode {
    /// Number of state components for this mode.
    #[must_use]
    pub fn state_len(self) -> usize {
        match self {
            Self::Single => 2,
            Self::Double => 4,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("single".parse(), Ok(Mode::Single));
        assert_eq!(" Double ".parse(), Ok(Mode::Double));
        assert!("triple".parse::<Mode>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for mode in [Mode::Single, Mode::Double] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn as_str_is_parseable() {
        assert_eq!(Mode::Single.as_str(), "single");
        assert_eq!(Mode::Double.as_str().parse(), Ok(Mode::Double));
    }

    #[test]
    fn state_len_per_mode() {
        assert_eq!(Mode::Single.state_len(), 2);
        assert_eq!(Mode::Double.state_len(), 4);
        assert_eq!(Mode::default(), Mode::Double);
    }
}
