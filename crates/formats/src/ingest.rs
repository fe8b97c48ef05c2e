use foundation::{BoundingBox, Dimensions, MIB, Point3, format_byte_size};
use serde::Serialize;

use crate::error::{IngestError, IngestWarning};
use crate::feature_collection::FeatureCollection;
use crate::format::{DataFormat, DataKind};
use crate::pcd;
use crate::point_set::PointSet;
use crate::xyz;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * MIB;

/// A file as handed over by the host: name, reported size, raw bytes.
#[derive(Debug, Copy, Clone)]
pub struct UploadedFile<'a> {
    pub name: &'a str,
    pub size_bytes: u64,
    pub content: &'a [u8],
}

impl<'a> UploadedFile<'a> {
    pub fn new(name: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            size_bytes: content.len() as u64,
            content,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IngestLimits {
    pub max_bytes: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// One of the two normalized shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Features(FeatureCollection),
    Points(PointSet),
}

impl Dataset {
    pub fn kind(&self) -> DataKind {
        match self {
            Dataset::Features(_) => DataKind::Features,
            Dataset::Points(_) => DataKind::Points,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Features(fc) => fc.len(),
            Dataset::Points(ps) => ps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BoundsSummary {
    pub dimensions: Dimensions,
    pub center: Point3,
}

impl From<BoundingBox> for BoundsSummary {
    fn from(b: BoundingBox) -> Self {
        Self {
            dimensions: b.dimensions(),
            center: b.center(),
        }
    }
}

/// Display metadata for the file-details panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMeta {
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    /// Lowercased extension, e.g. `".geojson"`.
    pub format: &'static str,
    pub point_count: Option<usize>,
    pub bounds: Option<BoundsSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub meta: FileMeta,
    pub data: Dataset,
    pub warnings: Vec<IngestWarning>,
    /// Activity-log line describing the upload.
    pub event: String,
}

/// Validates and decodes one uploaded file.
///
/// Checks run in order: extension, reported size, blank text (text formats
/// only), then the format decoder. Any failure yields no dataset at all.
pub fn ingest(file: &UploadedFile<'_>, limits: &IngestLimits) -> Result<Ingested, IngestError> {
    let format = DataFormat::from_file_name(file.name)?;

    if file.size_bytes > limits.max_bytes {
        return Err(IngestError::FileTooLarge {
            size_bytes: file.size_bytes,
            limit_bytes: limits.max_bytes,
        });
    }

    let (data, warnings) = match format {
        DataFormat::Json | DataFormat::GeoJson => {
            let text = decode_text(file.content)?;
            let parsed = FeatureCollection::from_geojson_str(&text)?;
            (Dataset::Features(parsed.collection), parsed.warnings)
        }
        DataFormat::Xyz => {
            let text = decode_text(file.content)?;
            let parsed = xyz::parse_xyz(&text);
            (Dataset::Points(parsed.points), parsed.malformed_rows)
        }
        DataFormat::Pcd => {
            let flat = pcd::decode_positions(file.content).map_err(|e| {
                IngestError::InvalidPcd {
                    reason: e.to_string(),
                }
            })?;
            (Dataset::Points(PointSet::from_flat_positions(&flat)), Vec::new())
        }
    };

    let (point_count, bounds) = match &data {
        Dataset::Points(ps) => (
            Some(ps.len()),
            ps.bounding_box().map(BoundsSummary::from),
        ),
        Dataset::Features(_) => (None, None),
    };

    let event = match &data {
        Dataset::Features(fc) => format!("{} file uploaded: {} features", format.label(), fc.len()),
        Dataset::Points(ps) => format!("{} file uploaded: {} points", format.label(), ps.len()),
    };

    tracing::info!(
        file = file.name,
        format = format.extension(),
        items = data.len(),
        warnings = warnings.len(),
        "ingested upload"
    );

    Ok(Ingested {
        meta: FileMeta {
            name: file.name.to_string(),
            size_bytes: file.size_bytes,
            size_label: format_byte_size(file.size_bytes),
            format: format.extension(),
            point_count,
            bounds,
        },
        data,
        warnings,
        event,
    })
}

fn decode_text(content: &[u8]) -> Result<String, IngestError> {
    let text = String::from_utf8_lossy(content).into_owned();
    if text.trim().is_empty() {
        return Err(IngestError::EmptyFile);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{Dataset, IngestLimits, UploadedFile, ingest};
    use crate::error::{IngestError, IngestWarning};
    use foundation::{MIB, Point3};
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let d = (a - b).abs();
        assert!(d <= eps, "expected {a} ~= {b} (diff {d})");
    }

    #[test]
    fn ingests_xyz_with_meta_and_bounds() {
        let content = b"0 0 0\n2 4 6\nbad row\n";
        let out = ingest(&UploadedFile::new("scan.xyz", content), &IngestLimits::default()).unwrap();
        assert_eq!(out.event, "XYZ file uploaded: 2 points");
        assert_eq!(out.meta.format, ".xyz");
        assert_eq!(out.meta.point_count, Some(2));
        assert_eq!(out.meta.size_label, "20 Bytes");
        assert_eq!(out.warnings, vec![IngestWarning::MalformedRow { line: 3 }]);

        let bounds = out.meta.bounds.unwrap();
        assert_close(bounds.dimensions.width, 2.0, 1e-12);
        assert_close(bounds.dimensions.length, 4.0, 1e-12);
        assert_close(bounds.dimensions.height, 6.0, 1e-12);
        assert_eq!(bounds.center, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn xyz_without_rows_is_an_empty_point_set() {
        let out = ingest(
            &UploadedFile::new("notes.xyz", b"# only a comment\nx y z\n"),
            &IngestLimits::default(),
        )
        .unwrap();
        assert!(matches!(&out.data, Dataset::Points(ps) if ps.is_empty()));
        assert_eq!(out.meta.bounds, None);
        assert_eq!(out.event, "XYZ file uploaded: 0 points");
    }

    #[test]
    fn ingests_geojson_features() {
        let content = br#"{"type":"FeatureCollection","features":[
            {"geometry":{"type":"Point","coordinates":[1,2]},"properties":{}},
            {"properties":{}}
        ]}"#;
        let out = ingest(&UploadedFile::new("city.json", content), &IngestLimits::default()).unwrap();
        assert_eq!(out.event, "GeoJSON file uploaded: 2 features");
        assert_eq!(out.meta.point_count, None);
        assert_eq!(out.warnings, vec![IngestWarning::MissingGeometry { index: 1 }]);
        assert!(matches!(out.data, Dataset::Features(ref fc) if fc.len() == 2));
    }

    #[test]
    fn rejects_unsupported_extension_before_anything_else() {
        let file = UploadedFile {
            name: "big.las",
            size_bytes: 100 * MIB,
            content: b"",
        };
        assert!(matches!(
            ingest(&file, &IngestLimits::default()),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let limits = IngestLimits::default();
        let at_limit = UploadedFile {
            name: "a.xyz",
            size_bytes: 52_428_800,
            content: b"1 2 3",
        };
        assert!(ingest(&at_limit, &limits).is_ok());

        let over = UploadedFile {
            size_bytes: 52_428_801,
            ..at_limit
        };
        assert_eq!(
            ingest(&over, &limits).unwrap_err(),
            IngestError::FileTooLarge {
                size_bytes: 52_428_801,
                limit_bytes: 52_428_800
            }
        );
    }

    #[test]
    fn blank_text_is_empty_but_pcd_is_exempt() {
        let limits = IngestLimits::default();
        for name in ["a.geojson", "a.xyz"] {
            assert_eq!(
                ingest(&UploadedFile::new(name, b"  \n\t "), &limits).unwrap_err(),
                IngestError::EmptyFile
            );
        }
        let err = ingest(&UploadedFile::new("a.pcd", b"  \n"), &limits).unwrap_err();
        assert!(matches!(err, IngestError::InvalidPcd { .. }), "{err:?}");
    }

    #[test]
    fn invalid_geojson_is_fatal() {
        let err = ingest(
            &UploadedFile::new("a.geojson", br#"{"type":"Foo"}"#),
            &IngestLimits::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidGeoJSON");
    }

    #[test]
    fn pcd_zero_fills_missing_channels() {
        let content = b"VERSION 0.7\nFIELDS x y\nSIZE 4 4\nTYPE F F\nCOUNT 1 1\n\
                        WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA ascii\n1 2\n3 nan\n";
        let out = ingest(&UploadedFile::new("room.pcd", content), &IngestLimits::default()).unwrap();
        assert_eq!(out.event, "PCD file uploaded: 2 points");
        let Dataset::Points(ps) = out.data else {
            panic!("expected points");
        };
        assert_eq!(
            ps.as_slice(),
            &[Point3::new(1.0, 2.0, 0.0), Point3::new(3.0, 0.0, 0.0)]
        );
    }
}
