//! Uploaded Artifact - the file a user attaches to an experiment

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tabular file formats accepted by the upload surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Matrix Market sparse matrix
    Mtx,
}

impl ArtifactKind {
    /// Infer the kind from a file name's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for missing or unsupported extensions.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "'{file_name}' has no extension (supported formats: CSV, TSV, or MTX files)"
                ))
            })?;

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "mtx" => Ok(Self::Mtx),
            other => Err(Error::Validation(format!(
                "unsupported file type '.{other}' (supported formats: CSV, TSV, or MTX files)"
            ))),
        }
    }

    /// MIME type sent with the multipart upload.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Tsv => "text/tab-separated-values",
            Self::Mtx => "text/plain",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Mtx => "mtx",
        };
        f.write_str(label)
    }
}

/// A file uploaded into an experiment.
///
/// The content is opaque: nothing is parsed or validated before it is
/// forwarded to the prediction backend. Bytes are reference counted so a
/// pending prediction can hold the artifact while the context moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    file_name: String,
    kind: ArtifactKind,
    content: Arc<[u8]>,
    uploaded_at: DateTime<Utc>,
}

impl UploadedArtifact {
    /// Create an artifact, inferring its kind from the file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the file name is blank or its
    /// extension is not csv, tsv or mtx.
    pub fn new(file_name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(Error::Validation("file name must not be empty".to_string()));
        }
        let kind = ArtifactKind::from_file_name(&file_name)?;

        Ok(Self {
            file_name,
            kind,
            content: content.into(),
            uploaded_at: Utc::now(),
        })
    }

    /// Get the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Get the file kind.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Get the raw content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Get the size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Get the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Human-readable size: bytes below 1 KB, then KB, then MB.
    #[must_use]
    pub fn size_label(&self) -> String {
        size_label(self.size_bytes())
    }

    /// Serializable summary for the presentation layer.
    #[must_use]
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            file_name: self.file_name.clone(),
            kind: self.kind,
            size_bytes: self.size_bytes(),
            size_label: self.size_label(),
            uploaded_at: self.uploaded_at,
        }
    }
}

/// File details shown next to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    /// Original file name
    pub file_name: String,
    /// File kind
    pub kind: ArtifactKind,
    /// Size in bytes
    pub size_bytes: u64,
    /// Human-readable size
    pub size_label: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

#[allow(clippy::cast_precision_loss)]
fn size_label(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes > MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_kind_from_extension() {
        assert_eq!(ArtifactKind::from_file_name("run.tsv").unwrap(), ArtifactKind::Tsv);
        assert_eq!(ArtifactKind::from_file_name("RUN.CSV").unwrap(), ArtifactKind::Csv);
        assert_eq!(ArtifactKind::from_file_name("counts.mtx").unwrap(), ArtifactKind::Mtx);
    }

    #[test]
    fn test_artifact_rejects_unsupported() {
        assert!(matches!(
            UploadedArtifact::new("notes.txt", b"x".to_vec()),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            UploadedArtifact::new("no_extension", b"x".to_vec()),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            UploadedArtifact::new("  ", b"x".to_vec()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_size_label_units() {
        assert_eq!(size_label(512), "512 bytes");
        assert_eq!(size_label(1024), "1024 bytes");
        assert_eq!(size_label(2048), "2.00 KB");
        assert_eq!(size_label(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_artifact_content_is_forwarded_verbatim() {
        let artifact = UploadedArtifact::new("cells.tsv", b"gene\tcount\n".to_vec()).unwrap();
        assert_eq!(artifact.content(), b"gene\tcount\n");
        assert_eq!(artifact.size_bytes(), 11);
        assert_eq!(artifact.summary().size_label, "11 bytes");
    }
}
