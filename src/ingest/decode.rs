use crate::error::{AppError, Result};
use encoding_rs::Encoding;
use tracing::debug;

/// Text decoded from an uploaded dataset
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    /// Canonical name of the encoding that succeeded
    pub encoding: &'static str,
}

/// Ordered list of candidate text encodings
#[derive(Debug, Clone)]
pub struct EncodingCandidates {
    encodings: Vec<&'static Encoding>,
}

impl EncodingCandidates {
    /// Resolve WHATWG encoding labels ("utf-8", "latin1", "windows-1252", ...)
    pub fn from_labels(labels: &[String]) -> Result<Self> {
        if labels.is_empty() {
            return Err(AppError::Configuration(
                "at least one dataset encoding must be configured".to_string(),
            ));
        }

        let encodings = labels
            .iter()
            .map(|label| {
                Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                    AppError::Configuration(format!("unknown text encoding: {}", label))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { encodings })
    }

    /// Decode with the first encoding that accepts the bytes without replacement
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedText> {
        for encoding in &self.encodings {
            let payload = match Encoding::for_bom(bytes) {
                Some((bom_encoding, bom_len)) if bom_encoding == *encoding => &bytes[bom_len..],
                _ => bytes,
            };

            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(payload) {
                debug!(encoding = encoding.name(), bytes = bytes.len(), "Decoded dataset");
                return Ok(DecodedText {
                    text: text.into_owned(),
                    encoding: encoding.name(),
                });
            }

            debug!(encoding = encoding.name(), "Candidate encoding rejected dataset bytes");
        }

        Err(AppError::UnsupportedEncoding {
            tried: self.names().join(", "),
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.encodings.iter().map(|e| e.name()).collect()
    }
}

impl Default for EncodingCandidates {
    fn default() -> Self {
        Self {
            encodings: vec![encoding_rs::UTF_8, encoding_rs::WINDOWS_1252],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_utf8_wins_first() {
        let candidates = EncodingCandidates::default();
        let decoded = candidates.decode("hostname,location\nweb,Zürich\n".as_bytes()).unwrap();

        assert_eq!(decoded.encoding, "UTF-8");
        assert!(decoded.text.contains("Zürich"));
    }

    #[test]
    fn test_falls_back_to_windows_1252() {
        // "Zürich" in latin-1: 0xFC is invalid as a lone UTF-8 byte
        let bytes = b"location\nZ\xfcrich\n";
        let decoded = EncodingCandidates::default().decode(bytes).unwrap();

        assert_eq!(decoded.encoding, "windows-1252");
        assert!(decoded.text.contains("Zürich"));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"hostname\nweb-01\n");

        let decoded = EncodingCandidates::default().decode(&bytes).unwrap();
        assert!(decoded.text.starts_with("hostname"));
    }

    #[test]
    fn test_all_candidates_failing_is_unsupported_encoding() {
        let candidates = EncodingCandidates::from_labels(&labels(&["utf-8"])).unwrap();
        let err = candidates.decode(b"Z\xfcrich").unwrap_err();

        assert!(matches!(err, AppError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_unknown_label_is_configuration_error() {
        let err = EncodingCandidates::from_labels(&labels(&["utf-8", "klingon"])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_empty_label_list_is_configuration_error() {
        assert!(EncodingCandidates::from_labels(&[]).is_err());
    }

    #[test]
    fn test_latin1_label_resolves() {
        let candidates = EncodingCandidates::from_labels(&labels(&["UTF-8", "latin1"])).unwrap();
        assert_eq!(candidates.names(), vec!["UTF-8", "windows-1252"]);
    }
}
