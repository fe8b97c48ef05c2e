use foundation::MIB;
use thiserror::Error;

/// File-level failures. Any of these aborts ingestion of that file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Unsupported file format. Please upload .json, .geojson, .xyz, .pcd files only.")]
    UnsupportedFormat { extension: String },

    #[error(
        "File is too large! Please upload a file under {limit_mb}MB.",
        limit_mb = .limit_bytes / MIB
    )]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Uploaded file is empty.")]
    EmptyFile,

    #[error("Invalid GeoJSON file: {reason}")]
    InvalidGeoJson { reason: String },

    #[error("Error parsing PCD file: {reason}")]
    InvalidPcd { reason: String },
}

impl IngestError {
    /// Stable machine-readable kind, for adapters that branch on the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFormat { .. } => "UnsupportedFormat",
            IngestError::FileTooLarge { .. } => "FileTooLarge",
            IngestError::EmptyFile => "EmptyFile",
            IngestError::InvalidGeoJson { .. } => "InvalidGeoJSON",
            IngestError::InvalidPcd { .. } => "InvalidPCD",
        }
    }
}

/// Row- or feature-level problems. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestWarning {
    /// 1-based line number of an XYZ row that is not 2 or 3 finite numbers.
    #[error("Line {line} is not a coordinate row.")]
    MalformedRow { line: usize },

    /// The feature is kept, without geometry.
    #[error("Feature at index {index} is missing geometry data.")]
    MissingGeometry { index: usize },
}

impl IngestWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            IngestWarning::MalformedRow { .. } => "MalformedRow",
            IngestWarning::MissingGeometry { .. } => "MissingGeometry",
        }
    }
}
