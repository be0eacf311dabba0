//! Construction-time configuration errors.
//!
//! The processing units have no recoverable runtime failures: once built,
//! every call is pure arithmetic over fixed-shape state. What can go wrong
//! is configuration, and that is rejected when a unit is constructed so
//! the audio path never has to check.

use crate::frame::MAX_CHANNELS;

/// Errors raised while constructing a processing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A unit was asked for zero channels.
    NoChannels,
    /// A unit was asked for more channels than the fixed capacity.
    TooManyChannels {
        /// Channel count that was requested.
        requested: usize,
    },
    /// A delay line was configured with a lag of zero samples.
    ZeroLag,
    /// A per-channel lag table was empty.
    EmptyLagTable,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoChannels => write!(f, "channel count must be at least 1"),
            Self::TooManyChannels { requested } => {
                write!(f, "{} channels requested, capacity is {}", requested, MAX_CHANNELS)
            }
            Self::ZeroLag => write!(f, "delay lag must be at least 1 sample"),
            Self::EmptyLagTable => write!(f, "per-channel lag table is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validate a requested channel count against [`MAX_CHANNELS`].
pub(crate) fn check_channels(channels: usize) -> Result<(), ConfigError> {
    if channels == 0 {
        return Err(ConfigError::NoChannels);
    }
    if channels > MAX_CHANNELS {
        return Err(ConfigError::TooManyChannels {
            requested: channels,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_channels_bounds() {
        assert_eq!(check_channels(0), Err(ConfigError::NoChannels));
        assert!(check_channels(1).is_ok());
        assert!(check_channels(MAX_CHANNELS).is_ok());
        assert_eq!(
            check_channels(MAX_CHANNELS + 1),
            Err(ConfigError::TooManyChannels {
                requested: MAX_CHANNELS + 1
            })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_display_messages() {
        let msg = std::format!("{}", ConfigError::TooManyChannels { requested: 12 });
        assert!(msg.contains("12"));
        assert!(msg.contains("8"));
    }
}
