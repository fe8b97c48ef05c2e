use serde::Serialize;

use crate::error::IngestError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".json", ".geojson", ".xyz", ".pcd"];

/// Upload format, detected from the file extension only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DataFormat {
    Json,
    GeoJson,
    Xyz,
    Pcd,
}

/// The normalized shape a format produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DataKind {
    Features,
    Points,
}

impl DataFormat {
    pub fn from_file_name(name: &str) -> Result<Self, IngestError> {
        let extension = name
            .rfind('.')
            .map(|i| name[i..].to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            ".json" => Ok(Self::Json),
            ".geojson" => Ok(Self::GeoJson),
            ".xyz" => Ok(Self::Xyz),
            ".pcd" => Ok(Self::Pcd),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::GeoJson => ".geojson",
            Self::Xyz => ".xyz",
            Self::Pcd => ".pcd",
        }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            Self::Json | Self::GeoJson => DataKind::Features,
            Self::Xyz | Self::Pcd => DataKind::Points,
        }
    }

    /// Read as a byte buffer rather than text; exempt from the blank-text check.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Pcd)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Json | Self::GeoJson => "GeoJSON",
            Self::Xyz => "XYZ",
            Self::Pcd => "PCD",
        }
    }
}
