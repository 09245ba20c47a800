//! Request body encoding for the two transmission strategies.
//!
//! `RawBody` sends the file bytes as-is under the file's own media type.
//! `DataUriJson` wraps a base64 data URI in `{"image": ...}`, which costs
//! about a third more bytes on the wire.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::NarrateError;
use crate::types::{MediaType, SelectedFile};

/// How the selected file is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    DataUriJson,
    #[default]
    RawBody,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataUriJson => "data_uri_json",
            Self::RawBody => "raw_body",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "data_uri_json" | "data_uri" | "base64" | "json" => Ok(Self::DataUriJson),
            "raw_body" | "raw" | "binary" => Ok(Self::RawBody),
            other => Err(format!("unknown transmission strategy: {other}")),
        }
    }
}

/// A fully encoded POST body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Encode bytes as `data:<media type>;base64,<payload>`.
pub fn data_uri(media_type: &MediaType, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Encode the selected file for the given strategy.
///
/// An empty file has nothing to describe and is reported as a read failure.
pub fn encode_body(file: &SelectedFile, transmission: Transmission) -> Result<RequestBody, NarrateError> {
    if file.is_empty() {
        return Err(NarrateError::FileRead(format!("{} is empty", file.name())));
    }

    match transmission {
        Transmission::RawBody => Ok(RequestBody {
            content_type: file.media_type().as_str().to_string(),
            bytes: file.bytes().clone(),
        }),
        Transmission::DataUriJson => {
            let payload = serde_json::json!({
                "image": data_uri(file.media_type(), file.bytes()),
            });
            let encoded = serde_json::to_vec(&payload)
                .map_err(|e| NarrateError::FileRead(e.to_string()))?;
            Ok(RequestBody {
                content_type: "application/json".to_string(),
                bytes: Bytes::from(encoded),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> SelectedFile {
        SelectedFile::new(
            "photo.jpg",
            MediaType::new("image/jpeg"),
            vec![0xFF, 0xD8, 0xFF, 0xE0],
        )
    }

    #[test]
    fn raw_body_keeps_bytes_and_declared_type() {
        let body = encode_body(&jpeg(), Transmission::RawBody).unwrap();
        assert_eq!(body.content_type, "image/jpeg");
        assert_eq!(&body.bytes[..], &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn data_uri_json_wraps_image_field() {
        let body = encode_body(&jpeg(), Transmission::DataUriJson).unwrap();
        assert_eq!(body.content_type, "application/json");
        let value: serde_json::Value = serde_json::from_slice(&body.bytes).unwrap();
        assert_eq!(value["image"], "data:image/jpeg;base64,/9j/4A==");
    }

    #[test]
    fn empty_file_is_a_read_failure() {
        let empty = SelectedFile::new("empty.png", MediaType::new("image/png"), Vec::new());
        for strategy in [Transmission::RawBody, Transmission::DataUriJson] {
            assert!(matches!(
                encode_body(&empty, strategy),
                Err(NarrateError::FileRead(_))
            ));
        }
    }

    #[test]
    fn parses_strategy_aliases() {
        assert_eq!("data-uri-json".parse::<Transmission>().unwrap(), Transmission::DataUriJson);
        assert_eq!("RAW".parse::<Transmission>().unwrap(), Transmission::RawBody);
        assert!("multipart".parse::<Transmission>().is_err());
    }
}
