//! Decoding of repository files fetched through the platform
//!
//! The platform returns file content base64 encoded, wrapped at 60 columns.

use crate::error::{Error, Result};
use crate::types::FileContent;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;

/// Decode base64 content, ignoring embedded line breaks
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| Error::Decode(format!("invalid base64: {e}")))
}

/// Decode a fetched YAML file into `T`
pub fn decode_yaml<T: DeserializeOwned>(file: &FileContent) -> Result<T> {
    let bytes = decode_base64(&file.encoded)?;
    serde_yaml::from_slice(&bytes)
        .map_err(|e| Error::Decode(format!("invalid YAML in {}: {e}", file.path)))
}

/// Encode text the way the platform does (used by tests and fixtures)
pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text)
}
