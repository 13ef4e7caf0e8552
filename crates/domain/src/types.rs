// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Identifies a bookable unit of charging time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ShiftId {
    value: String,
}

impl ShiftId {
    /// Creates a new `ShiftId`.
    ///
    /// Surrounding whitespace is trimmed; the identifier is otherwise
    /// kept verbatim.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for ShiftId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<ShiftId> for String {
    fn from(id: ShiftId) -> Self {
        id.value
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identifies a charging station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StationId {
    value: String,
}

impl StationId {
    /// Creates a new `StationId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for StationId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.value
    }
}

/// Identifies a single charging point within a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChargePointId {
    value: String,
}

impl ChargePointId {
    /// Creates a new `ChargePointId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for ChargePointId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<ChargePointId> for String {
    fn from(id: ChargePointId) -> Self {
        id.value
    }
}

/// The identity a lease is held under.
///
/// Holder identities are usernames and compare case-insensitively, so
/// they are normalized to lowercase on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HolderId {
    value: String,
}

impl HolderId {
    /// Creates a new `HolderId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The username (will be trimmed and lowercased)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_lowercase(),
        }
    }

    /// Returns the holder identity.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<String> for HolderId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<HolderId> for String {
    fn from(id: HolderId) -> Self {
        id.value
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identifier assigned to a lease by the lease store.
///
/// A lease keeps its identifier across retargets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(i64);

impl LeaseId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LeaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
