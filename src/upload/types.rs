use crate::upload::ExtractError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Value the extraction service reports for a field it could not recognise.
pub const MISSING_FIELD_MARKER: &str = "Bulunamadı";

/// Extensions the extraction service accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["pdf", "png", "jpg", "jpeg", "tiff", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A document chosen by the user, read fully into memory at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content,
            content_type: content_type.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ExtractError::FileUnreadable(format!("{} is not a file", path.display())))?;

        let content = fs::read(path)
            .map_err(|e| ExtractError::FileUnreadable(format!("{}: {}", name, e)))?;

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            name,
            content,
            content_type,
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField {
    pub name: String,
    pub value: String,
}

impl ExtractedField {
    pub fn is_missing(&self) -> bool {
        self.value == MISSING_FIELD_MARKER
    }
}

/// Parsed payload of a successful extraction. Field order is the order the
/// service sent them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub fields: Vec<ExtractedField>,
    pub single_xml: String,
    pub master_xml: String,
}

impl ExtractionResult {
    pub fn from_json(body: &[u8]) -> Result<Self, ExtractError> {
        let response: ExtractResponse = serde_json::from_slice(body)
            .map_err(|e| ExtractError::MalformedResponse(e.to_string()))?;
        Self::try_from(response)
    }
}

#[derive(Deserialize)]
struct ExtractResponse {
    fields: serde_json::Map<String, serde_json::Value>,
    single_xml: String,
    master_xml: String,
}

impl TryFrom<ExtractResponse> for ExtractionResult {
    type Error = ExtractError;

    fn try_from(response: ExtractResponse) -> Result<Self, Self::Error> {
        let fields = response
            .fields
            .into_iter()
            .map(|(name, value)| match value {
                serde_json::Value::String(value) => Ok(ExtractedField { name, value }),
                other => Err(ExtractError::MalformedResponse(format!(
                    "field '{}' is not a string: {}",
                    name, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fields,
            single_xml: response.single_xml,
            master_xml: response.master_xml,
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct HealthResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::ErrorKind;
    use std::io::Write;

    #[test]
    fn parses_fields_in_received_order() {
        let body = br#"{"fields":{"Total":"123.45","Invoice No":"INV-001","Amount":"123.45"},"single_xml":"/files/1.xml","master_xml":"/files/master.xml"}"#;

        let result = ExtractionResult::from_json(body).unwrap();

        let names: Vec<_> = result.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Total", "Invoice No", "Amount"]);
        assert_eq!(result.fields[0].value, "123.45");
        assert_eq!(result.fields[2].value, "123.45");
        assert_eq!(result.single_xml, "/files/1.xml");
        assert_eq!(result.master_xml, "/files/master.xml");
    }

    #[test]
    fn accepts_empty_field_map() {
        let body = br#"{"fields":{},"single_xml":"/a.xml","master_xml":"/m.xml"}"#;
        let result = ExtractionResult::from_json(body).unwrap();
        assert!(result.fields.is_empty());
    }

    #[test]
    fn rejects_missing_xml_paths() {
        let body = br#"{"fields":{"Total":"1"},"single_xml":"/a.xml"}"#;
        let err = ExtractionResult::from_json(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn rejects_non_string_field_values() {
        let body = br#"{"fields":{"Total":123.45},"single_xml":"/a.xml","master_xml":"/m.xml"}"#;
        let err = ExtractionResult::from_json(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.to_string().contains("Total"));
    }

    #[test]
    fn rejects_non_json_body() {
        let err = ExtractionResult::from_json(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn flags_missing_marker_values() {
        let found = ExtractedField {
            name: "VergiNo".to_string(),
            value: "1234567890".to_string(),
        };
        let missing = ExtractedField {
            name: "Tutar".to_string(),
            value: MISSING_FIELD_MARKER.to_string(),
        };
        assert!(!found.is_missing());
        assert!(missing.is_missing());
    }

    #[test]
    fn loads_file_with_guessed_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let selected = SelectedFile::load(&path).unwrap();

        assert_eq!(selected.name, "invoice.pdf");
        assert_eq!(selected.content, b"%PDF-1.4 test");
        assert_eq!(selected.content_type, "application/pdf");
        assert_eq!(selected.size(), 13);
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.unknownext");
        fs::write(&path, b"data").unwrap();

        let selected = SelectedFile::load(&path).unwrap();
        assert_eq!(selected.content_type, "application/octet-stream");
    }

    #[test]
    fn unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::load(&dir.path().join("missing.pdf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileUnreadable);
        assert!(err.to_string().contains("missing.pdf"));
    }
}
