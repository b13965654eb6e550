//! Core domain types for assessment recommendations.
//!
//! This module defines the data shared by the client, the controller and the
//! terminal front end:
//! - Tri-state filters (`Preference`) and the test-type selector
//! - The `Filters` bundle the user edits between searches
//! - Wire bodies for the `/recommend` endpoint
//! - `Assessment`, the read-only result item

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AssessmentError;

/// Number of results requested from the service on every search.
pub const RESULT_LIMIT: usize = 10;

// =============================================================================
// Filters
// =============================================================================

/// A filter that is either "preferred" or "no preference".
///
/// There is no negative variant: toggling a preferred filter returns it to
/// `Unset`, which goes over the wire as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Preference {
    #[default]
    Unset,
    Preferred,
}

impl Preference {
    /// Flip between `Unset` and `Preferred`.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Preference::Unset => Preference::Preferred,
            Preference::Preferred => Preference::Unset,
        }
    }

    pub fn is_preferred(self) -> bool {
        self == Preference::Preferred
    }

    /// Wire representation: `Some(true)` or `None`, never `Some(false)`.
    pub fn as_wire(self) -> Option<bool> {
        match self {
            Preference::Preferred => Some(true),
            Preference::Unset => None,
        }
    }
}

/// Assessment test-type selector.
///
/// `Any` is the unset default and is sent as the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TestType {
    #[default]
    Any,
    Knowledge,
    Simulation,
    Personality,
}

impl TestType {
    pub const ALL: [TestType; 4] = [
        TestType::Any,
        TestType::Knowledge,
        TestType::Simulation,
        TestType::Personality,
    ];

    /// Single-letter code understood by the service (`""`, `"K"`, `"S"`, `"P"`).
    pub fn code(self) -> &'static str {
        match self {
            TestType::Any => "",
            TestType::Knowledge => "K",
            TestType::Simulation => "S",
            TestType::Personality => "P",
        }
    }

    /// Human-readable option label.
    pub fn label(self) -> &'static str {
        match self {
            TestType::Any => "Test Type",
            TestType::Knowledge => "Knowledge",
            TestType::Simulation => "Simulation",
            TestType::Personality => "Personality",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestType {
    type Err = AssessmentError;

    /// Accepts the wire code or the label, case-insensitively.
    /// `""`, `any` and `none` all mean no preference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" | "none" => Ok(TestType::Any),
            "k" | "knowledge" => Ok(TestType::Knowledge),
            "s" | "simulation" => Ok(TestType::Simulation),
            "p" | "personality" => Ok(TestType::Personality),
            _ => Err(AssessmentError::UnknownTestType(s.to_string())),
        }
    }
}

/// The filter state the user edits between searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub remote: Preference,
    pub adaptive: Preference,
    pub test_type: TestType,
}

impl Filters {
    pub fn toggle_remote(&mut self) {
        self.remote = self.remote.toggled();
    }

    pub fn toggle_adaptive(&mut self) {
        self.adaptive = self.adaptive.toggled();
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `POST /recommend`.
///
/// Unset preferences serialize as `null` (the fields are not skipped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    pub k: usize,
    pub remote_preferred: Option<bool>,
    pub adaptive_preferred: Option<bool>,
    pub test_type_preference: String,
}

impl RecommendRequest {
    /// Build a request from the raw query text and the current filters.
    ///
    /// The query is sent as typed; trimming only decides whether a search
    /// happens at all.
    pub fn new(query: impl Into<String>, filters: &Filters) -> Self {
        Self {
            query: query.into(),
            k: RESULT_LIMIT,
            remote_preferred: filters.remote.as_wire(),
            adaptive_preferred: filters.adaptive.as_wire(),
            test_type_preference: filters.test_type.code().to_string(),
        }
    }
}

/// A single recommended assessment, as returned by the service.
///
/// Rust concept: `#[serde(deserialize_with = ...)]` lets a field accept
/// `null` while keeping a plain `String` in the struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub long_description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub test_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub remote_support: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub adaptive_support: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_levels: Option<String>,
}

impl Assessment {
    /// Create an item with the six core fields and no ranking metadata.
    pub fn new(
        name: impl Into<String>,
        long_description: impl Into<String>,
        test_type: impl Into<String>,
        remote_support: impl Into<String>,
        adaptive_support: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            long_description: long_description.into(),
            test_type: test_type.into(),
            remote_support: remote_support.into(),
            adaptive_support: adaptive_support.into(),
            url: url.into(),
            rank: None,
            score: None,
            job_levels: None,
        }
    }
}

/// Body of a successful `/recommend` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<Assessment>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
