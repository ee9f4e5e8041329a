//! JSON body decoding with empty-payload detection.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ArchiveError, Result};

/// Decode a response body.
///
/// Blank bodies, `null` and `{}` are [`ArchiveError::NoData`]. Anything else
/// that fails to match `T` is [`ArchiveError::Decoding`] with the path of the
/// offending field.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ArchiveError::NoData);
    }

    let value: Value = serde_json::from_slice(bytes).map_err(ArchiveError::decoding)?;
    match &value {
        Value::Null => return Err(ArchiveError::NoData),
        Value::Object(map) if map.is_empty() => return Err(ArchiveError::NoData),
        _ => {}
    }

    serde_path_to_error::deserialize(value).map_err(ArchiveError::decoding)
}
