//! Canonical storage paths.
//!
//! Every storage key and every persisted reference goes through
//! [`normalize_path`]. Two raw inputs that normalize to the same string
//! address the same object and produce the same public URL.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Maximum accepted length of a normalized key.
const MAX_KEY_LEN: usize = 1024;

/// Normalize a raw, slash-separated storage path.
///
/// Leading and trailing `/` are stripped, runs of `/` collapse to one and
/// `.` segments are dropped. `..` segments, backslashes and control
/// characters are rejected. The result may be empty (bucket root).
pub fn normalize_path(raw: &str) -> AppResult<String> {
    if raw
        .bytes()
        .any(|b| b.is_ascii_control() || b == b'\\')
    {
        return Err(AppError::invalid_path(
            raw,
            "contains a backslash or control character",
        ));
    }

    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(AppError::invalid_path(raw, "contains a '..' segment")),
            other => segments.push(other),
        }
    }

    let normalized = segments.join("/");
    if normalized.len() > MAX_KEY_LEN {
        return Err(AppError::invalid_path(raw, "exceeds 1024 bytes"));
    }
    Ok(normalized)
}

/// A normalized, non-empty object key inside a bucket.
///
/// The only way to build one is through [`AssetPath::parse`], so holding an
/// `AssetPath` proves the key is canonical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPath(String);

impl AssetPath {
    /// Normalize `raw` into an object key. Fails on an empty result.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let normalized = normalize_path(raw)?;
        if normalized.is_empty() {
            return Err(AppError::invalid_path(raw, "path is empty"));
        }
        Ok(Self(normalized))
    }

    /// Join a (possibly empty) folder and a file name into one key.
    pub fn join(folder: &str, name: &str) -> AppResult<Self> {
        Self::parse(&format!("{folder}/{name}"))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Everything before the final segment, empty for root-level keys.
    pub fn folder(&self) -> &str {
        self.0.rsplit_once('/').map(|(folder, _)| folder).unwrap_or("")
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetPath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetPath> for String {
    fn from(path: AssetPath) -> String {
        path.0
    }
}
