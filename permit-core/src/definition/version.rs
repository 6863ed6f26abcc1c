//! Version compatibility gate
//!
//! Every policy document declares the minimum engine version it was written
//! for (`minPEVersion`). The gate runs once, synchronously, before any other
//! component touches the document: a malformed version string or a minimum
//! newer than the running engine fails construction outright. No retries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{PolicyEngineError, Result};

/// Version of the running engine, taken from the crate version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed MAJOR.MINOR.PATCH engine version
///
/// Precedence is standard semantic-version field order: major, then minor,
/// then patch. Pre-release and build metadata are not part of the document
/// contract and are rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for EngineVersion {
    type Err = PolicyEngineError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || PolicyEngineError::InvalidVersionFormat {
            version: s.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(malformed());
        }

        let mut fields = [0u32; 3];
        for (i, part) in parts.iter().enumerate() {
            fields[i] = part.parse::<u32>().map_err(|_| malformed())?;
        }

        Ok(EngineVersion::new(fields[0], fields[1], fields[2]))
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Check a document's declared minimum against the running engine version
///
/// Fails with a configuration error if `declared` is not a valid
/// MAJOR.MINOR.PATCH string, or if the running engine is older than the
/// declared minimum.
pub fn check_minimum(declared: &str) -> Result<()> {
    check_minimum_against(declared, ENGINE_VERSION)
}

/// Gate logic against an explicit engine version (testable form)
pub fn check_minimum_against(declared: &str, engine: &str) -> Result<()> {
    let declared_version: EngineVersion = declared.parse()?;
    let engine_version: EngineVersion = engine.parse()?;

    match engine_version.cmp(&declared_version) {
        Ordering::Less => Err(PolicyEngineError::EngineVersionTooOld {
            declared: declared_version.to_string(),
            engine: engine_version.to_string(),
        }),
        _ => Ok(()),
    }
}
