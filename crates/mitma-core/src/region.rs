//! Region identifiers.
//!
//! MITMA district codes look numeric (`"0800101"`) but carry meaningful
//! leading zeros, and some carry suffixes (`"01001_AM"`).  They are therefore
//! kept as strings end to end and never parsed into integers.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MitmaError, MitmaResult};

/// A region (district / municipality) code, trimmed and never empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionId(String);

impl RegionId {
    /// Validate and wrap a region code.  Surrounding whitespace is dropped.
    pub fn new(code: impl AsRef<str>) -> MitmaResult<Self> {
        let trimmed = code.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MitmaError::InvalidRegion(code.as_ref().to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the code starts with `prefix` (e.g. a province code).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegionId {
    type Err = MitmaError;

    fn from_str(s: &str) -> MitmaResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for RegionId {
    type Error = MitmaError;

    fn try_from(s: String) -> MitmaResult<Self> {
        Self::new(s)
    }
}

impl From<RegionId> for String {
    fn from(id: RegionId) -> String {
        id.0
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
