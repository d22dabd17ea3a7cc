//! Dotted API versions used to tell producer generations apart

use crate::scheduler::limits::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:\.(\d+))?$").expect("version pattern is valid"));

/// `major.minor[.build[.revision]]`; missing components compare as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl Version {
    pub const ZERO: Version = Version::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Version {
            major,
            minor,
            build,
            revision: 0,
        }
    }

    pub const fn with_revision(self, revision: u32) -> Self {
        Version { revision, ..self }
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE
            .captures(s.trim())
            .ok_or_else(|| ConfigError::InvalidVersion(s.to_string()))?;

        let component = |idx: usize| -> Result<u32, ConfigError> {
            match caps.get(idx) {
                None => Ok(0),
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| ConfigError::InvalidVersion(s.to_string())),
            }
        };

        Ok(Version {
            major: component(1)?,
            minor: component(2)?,
            build: component(3)?,
            revision: component(4)?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_components() {
        assert_eq!("1.2563.0".parse::<Version>().unwrap(), Version::new(1, 2563, 0));
        assert_eq!("1.2".parse::<Version>().unwrap(), Version::new(1, 2, 0));
        assert_eq!(
            "4.3.2.1".parse::<Version>().unwrap(),
            Version::new(4, 3, 2).with_revision(1)
        );
        assert_eq!(" 2.0 ".parse::<Version>().unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in &["", "1", "v1.2", "1.2.3.4.5", "1.-2", "1.99999999999"] {
            assert!(bad.parse::<Version>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn ordering() {
        assert!(Version::new(1, 2563, 0) > Version::new(1, 2562, 9));
        assert!(Version::new(1, 3000, 0) > Version::new(1, 2563, 0));
        assert!(Version::new(1, 2563, 0).with_revision(1) > Version::new(1, 2563, 0));
        assert!(Version::ZERO < Version::new(0, 0, 1));
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(Version::new(1, 2563, 0).to_string(), "1.2563.0");
        assert_eq!(Version::new(1, 2, 3).with_revision(4).to_string(), "1.2.3.4");

        let json = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Version::new(1, 2, 3));
        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }
}
