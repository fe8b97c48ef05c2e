use foundation::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{IngestError, IngestWarning};

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Typed view of a feature's coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

/// Geometry as it appeared in the file: a type tag and raw coordinates.
///
/// Coordinates are only interpreted on demand through [`Geometry::shape`], so
/// a feature with odd coordinates still flows through filtering untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: String,
    pub coordinates: Value,
}

impl Geometry {
    pub fn new(kind: impl Into<String>, coordinates: Value) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
        }
    }

    pub fn point(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(
            "Point",
            Value::Array(vec![Value::from(lon_deg), Value::from(lat_deg)]),
        )
    }

    pub fn is_point(&self) -> bool {
        self.kind == "Point"
    }

    pub fn shape(&self) -> Result<Shape, String> {
        let coords = &self.coordinates;
        match self.kind.as_str() {
            "Point" => Ok(Shape::Point(parse_point(coords)?)),
            "MultiPoint" => Ok(Shape::MultiPoint(parse_points(coords)?)),
            "LineString" => Ok(Shape::LineString(parse_points(coords)?)),
            "MultiLineString" => Ok(Shape::MultiLineString(parse_lines(coords)?)),
            "Polygon" => Ok(Shape::Polygon(parse_polygon(coords)?)),
            "MultiPolygon" => Ok(Shape::MultiPolygon(parse_multi_polygon(coords)?)),
            other => Err(format!("unsupported geometry type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    /// `None` when the source feature lacked `geometry.type` or `geometry.coordinates`.
    pub geometry: Option<Geometry>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// String entries of `properties.tags`; anything else is ignored.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.properties
            .get("tags")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }

    /// `properties.timestamp`, if present and non-empty.
    ///
    /// Strings are ISO-8601; numbers are epoch milliseconds; `0`, `""` and
    /// other value kinds count as absent.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self.properties.get("timestamp")? {
            Value::String(s) if !s.is_empty() => Some(Timestamp::new(s.as_str())),
            Value::Number(n) => {
                let ms = n.as_f64()?;
                if ms == 0.0 {
                    None
                } else {
                    Some(Timestamp::from_millis_f64(ms))
                }
            }
            _ => None,
        }
    }

    pub fn is_point(&self) -> bool {
        self.geometry.as_ref().is_some_and(Geometry::is_point)
    }

    pub fn description(&self) -> Option<&str> {
        self.properties.get("description").and_then(|v| v.as_str())
    }

    pub fn to_geojson_value(&self) -> Value {
        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &self.id {
            fobj.insert("id".to_string(), Value::String(id.clone()));
        }
        fobj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        let geometry = match &self.geometry {
            Some(g) => {
                let mut gobj = Map::new();
                gobj.insert("type".to_string(), Value::String(g.kind.clone()));
                gobj.insert("coordinates".to_string(), g.coordinates.clone());
                Value::Object(gobj)
            }
            None => Value::Null,
        };
        fobj.insert("geometry".to_string(), geometry);
        Value::Object(fobj)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Result of reading a GeoJSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeatures {
    pub collection: FeatureCollection,
    pub warnings: Vec<IngestWarning>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<ParsedFeatures, IngestError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| IngestError::InvalidGeoJson {
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    /// Structural checks are fatal; a feature without geometry only warns.
    pub fn from_geojson_value(value: Value) -> Result<ParsedFeatures, IngestError> {
        let not_a_collection = || IngestError::InvalidGeoJson {
            reason: "expected a GeoJSON FeatureCollection".to_string(),
        };

        let obj = value.as_object().ok_or_else(not_a_collection)?;
        let ty = obj.get("type").and_then(|v| v.as_str());
        if ty != Some("FeatureCollection") {
            return Err(not_a_collection());
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or_else(|| IngestError::InvalidGeoJson {
                reason: "features must be an array".to_string(),
            })?;

        let mut features = Vec::with_capacity(features_val.len());
        let mut warnings = Vec::new();
        for (index, feat_val) in features_val.iter().enumerate() {
            // A null entry is unreadable; any other non-object is a feature
            // without geometry or properties.
            let (id, properties, geometry) = match feat_val {
                Value::Null => {
                    return Err(IngestError::InvalidGeoJson {
                        reason: format!("feature at index {index} is null"),
                    });
                }
                Value::Object(feat_obj) => {
                    let id = match feat_obj.get("id") {
                        Some(Value::String(s)) => Some(s.clone()),
                        Some(Value::Number(n)) => Some(n.to_string()),
                        _ => None,
                    };
                    let properties = feat_obj
                        .get("properties")
                        .and_then(|v| v.as_object())
                        .cloned()
                        .unwrap_or_default();
                    (id, properties, read_geometry(feat_obj.get("geometry")))
                }
                _ => (None, Map::new(), None),
            };

            if geometry.is_none() {
                let warning = IngestWarning::MissingGeometry { index };
                tracing::warn!("{warning}");
                warnings.push(warning);
            }

            features.push(Feature {
                id,
                geometry,
                properties,
            });
        }

        tracing::debug!(
            features = features.len(),
            warnings = warnings.len(),
            "parsed GeoJSON"
        );
        Ok(ParsedFeatures {
            collection: Self { features },
            warnings,
        })
    }

    /// Emits a GeoJSON FeatureCollection. Property order may differ from the input.
    pub fn to_geojson_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );
        let features = self
            .features
            .iter()
            .map(Feature::to_geojson_value)
            .collect();
        root.insert("features".to_string(), Value::Array(features));
        Value::Object(root)
    }

    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_geojson_value())
    }
}

fn read_geometry(value: Option<&Value>) -> Option<Geometry> {
    let obj = value?.as_object()?;
    let kind = obj.get("type")?.as_str().filter(|s| !s.is_empty())?;
    let coordinates = obj.get("coordinates").filter(|v| !is_falsy(v))?;
    Some(Geometry::new(kind, coordinates.clone()))
}

/// `null`, `false`, `0` and `""` count as absent. Arrays and objects never do.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("MultiLineString coordinates must be an array".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
