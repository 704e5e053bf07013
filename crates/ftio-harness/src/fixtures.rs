//! Fixture loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Current fixture schema version.
pub const FIXTURE_VERSION: &str = "v1";

/// A single fixture test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Entry point exercised: `ft_printf`, `get_next_line` or `get_next_line_bonus`.
    pub function: String,
    /// Driver and test the case comes from.
    pub reference: String,
    /// Input parameters (serialized).
    pub inputs: serde_json::Value,
    /// Expected output, exactly as the driver prints it.
    pub expected_output: String,
    /// Expected return value, when the entry point has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<i64>,
}

/// A collection of fixture cases for one entry point family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name, e.g. `stdio/ft_printf`.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Empty set stamped with the current time.
    #[must_use]
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            version: FIXTURE_VERSION.to_string(),
            family: family.into(),
            captured_at: crate::structured_log::utc_timestamp(),
            cases: Vec::new(),
        }
    }

    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        Ok(set)
    }

    /// Write the set as pretty JSON to `path`.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load every `*.json` set in `dir`, sorted by file name.
    ///
    /// Files that fail to parse are returned separately so the caller can
    /// report them.
    pub fn load_dir(dir: &Path) -> std::io::Result<(Vec<Self>, Vec<(String, String)>)> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut sets = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            match Self::from_file(&path) {
                Ok(set) => sets.push(set),
                Err(err) => skipped.push((path.display().to_string(), err.to_string())),
            }
        }
        Ok((sets, skipped))
    }
}
