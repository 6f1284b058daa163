//! Data-URL wrapping for image payloads.
//!
//! The wire contract carries images as `data:<mime>;base64,<body>` strings
//! in both directions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CodecError;
use crate::CodecResult;

/// Wrap raw bytes as a base64 data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Extract the raw bytes from a base64 data URL.
pub fn decode_data_url(url: &str) -> CodecResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CodecError::DataUrl("missing data: scheme".to_string()))?;

    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::DataUrl("missing payload separator".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(CodecError::DataUrl(format!(
            "unsupported encoding: {header}"
        )));
    }

    Ok(STANDARD.decode(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let bytes = [0xffu8, 0xd8, 0xff, 0x00, 0x42];
        let url = to_data_url("image/jpeg", &bytes);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(decode_data_url("image/jpeg;base64,AAAA").is_err());
    }

    #[test]
    fn test_rejects_missing_separator() {
        assert!(decode_data_url("data:image/jpeg;base64").is_err());
    }

    #[test]
    fn test_rejects_non_base64_encoding() {
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }

    #[test]
    fn test_rejects_invalid_base64_body() {
        assert!(decode_data_url("data:image/jpeg;base64,!!!!").is_err());
    }
}
