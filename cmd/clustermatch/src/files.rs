//! JSON cluster files.
//!
//! A cluster file maps a cluster label to the signature ids it holds:
//!
//! ```json
//! {"0": [0, 1, 3], "1": [2, 5]}
//! ```
//!
//! Claims and rejections files use the same shape, keyed by old cluster label.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clustermatch::{Assignment, Partition};
use serde::{Deserialize, Serialize};

/// A signature id as found in cluster files: a JSON integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureId {
    Int(i64),
    Text(String),
}

pub type Clusters = Partition<String, SignatureId>;

pub fn parse_clusters(json: &str) -> Result<Clusters> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_clusters(path: &Path) -> Result<Clusters> {
    let data = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    parse_clusters(&data).with_context(|| format!("invalid cluster file {}", path.display()))
}

/// Reads an optional cluster file; a missing path means no clusters.
pub fn read_optional(path: Option<&Path>) -> Result<Clusters> {
    match path {
        Some(path) => read_clusters(path),
        None => Ok(Clusters::new()),
    }
}

/// Writes the assignment as pretty JSON to `path`, or stdout when `None`.
pub fn write_assignment(result: &Assignment<String, SignatureId>, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    match path {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
