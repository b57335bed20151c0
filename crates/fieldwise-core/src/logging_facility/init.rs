//! Subscriber setup for comparison logs
//!
//! Each entry point logs one `op_start` and one `op_end` or `op_error`:
//!
//! - `determine_differences` with `difference_count` and `visited_count`
//! - `recursive_assertion` with `failure_count`
//! - `load_settings` with the settings path
//!
//! Nothing is logged per field.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Where and how comparison events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Text lines on stderr, including the debug level
    Development,
    /// One JSON object per event on stderr, info level and above
    Production,
    /// Bare registry; tests install `init_test_capture` on top
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_filter(self) -> Option<&'static str> {
        match self {
            Profile::Development => Some("fieldwise=debug,fieldwise_core=debug"),
            Profile::Production => Some("fieldwise=info,fieldwise_core=info"),
            Profile::Test => None,
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown logging profile '{}'", other)),
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect. The `fieldwise` binary calls this
/// when `--log-profile` is given, so a plain `fieldwise diff` stays
/// silent on stderr and its report on stdout is never interleaved with
/// log lines. `RUST_LOG` replaces the profile's default filter.
///
/// ```
/// use fieldwise_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile.default_filter() {
        Some(default) if profile == Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(default))
                .try_init()
                .ok();
        }
        Some(default) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(default))
                .try_init()
                .ok();
        }
        None => {
            tracing_subscriber::registry().try_init().ok();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Production);
    }

    #[test]
    fn test_default_filters_cover_library_and_binary() {
        for profile in [Profile::Development, Profile::Production] {
            let filter = profile.default_filter().unwrap();
            assert!(filter.contains("fieldwise_core="));
            assert!(filter.contains("fieldwise="));
        }
        assert!(Profile::Development.default_filter().unwrap().contains("debug"));
        assert_eq!(Profile::Test.default_filter(), None);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("dev".parse::<Profile>(), Ok(Profile::Development));
        assert_eq!("Production".parse::<Profile>(), Ok(Profile::Production));
        assert!("verbose".parse::<Profile>().is_err());
    }
}
