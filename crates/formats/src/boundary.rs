use std::borrow::Cow;

use foundation::BoundaryDataset;
use foundation::bounds::Aabb2;
use serde_json::{Map, Value};

/// Property the choropleth layer reads its color bucket from.
pub const BUCKET_PROPERTY: &str = "bucket";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Areal geometry of a district or state. Rings are lon/lat, outer ring first.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl BoundaryGeometry {
    pub fn bounds(&self) -> Option<Aabb2> {
        let mut out: Option<Aabb2> = None;
        let mut visit = |ring: &[GeoPoint]| {
            for p in ring {
                match out.as_mut() {
                    Some(b) => b.expand_to(p.lon_deg, p.lat_deg),
                    None => out = Some(Aabb2::point(p.lon_deg, p.lat_deg)),
                }
            }
        };
        match self {
            BoundaryGeometry::Polygon(rings) => rings.iter().for_each(|r| visit(r)),
            BoundaryGeometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|poly| poly.iter())
                .for_each(|r| visit(r)),
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for features published with a null geometry.
    pub geometry: Option<BoundaryGeometry>,
    /// Choropleth bucket, filled in by the augmenter.
    pub bucket: Option<u8>,
}

impl BoundaryFeature {
    pub fn new(id: Option<String>, properties: Map<String, Value>) -> Self {
        Self {
            id,
            properties,
            geometry: None,
            bucket: None,
        }
    }

    /// Text value of a property. Numbers are rendered in their JSON form so
    /// that datasets which store codes as integers still match.
    pub fn property_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.properties.get(key)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Two-digit state FIPS code (`STATEFP`).
    pub fn state_code(&self) -> Option<Cow<'_, str>> {
        self.property_text("STATEFP")
    }

    pub fn geoid(&self) -> Option<Cow<'_, str>> {
        self.property_text("GEOID")
    }

    /// Long legal name, e.g. "Congressional District 12".
    pub fn long_name(&self) -> Option<Cow<'_, str>> {
        self.property_text("NAMELSAD")
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        self.geometry.as_ref().and_then(BoundaryGeometry::bounds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCollection {
    pub dataset: BoundaryDataset,
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryParseError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryParseError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            BoundaryParseError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryParseError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryParseError {}

impl BoundaryCollection {
    pub fn new(dataset: BoundaryDataset, features: Vec<BoundaryFeature>) -> Self {
        Self { dataset, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(
        dataset: BoundaryDataset,
        payload: &str,
    ) -> Result<Self, BoundaryParseError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryParseError::Json(e.to_string()))?;
        Self::from_geojson_value(dataset, value)
    }

    pub fn from_geojson_value(
        dataset: BoundaryDataset,
        value: Value,
    ) -> Result<Self, BoundaryParseError> {
        let Value::Object(mut obj) = value else {
            return Err(BoundaryParseError::NotAFeatureCollection);
        };
        if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
            return Err(BoundaryParseError::NotAFeatureCollection);
        }
        let Some(Value::Array(features_val)) = obj.remove("features") else {
            return Err(BoundaryParseError::NotAFeatureCollection);
        };

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.into_iter().enumerate() {
            let invalid = |reason: String| BoundaryParseError::InvalidFeature { index, reason };

            let Value::Object(mut feat_obj) = feat_val else {
                return Err(invalid("feature must be an object".to_string()));
            };

            match feat_obj.get("type").and_then(|v| v.as_str()) {
                Some("Feature") => {}
                Some(other) => return Err(invalid(format!("unexpected feature type: {other}"))),
                None => return Err(invalid("feature missing type".to_string())),
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = match feat_obj.remove("properties") {
                Some(Value::Object(props)) => props,
                _ => Map::new(),
            };

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(geom) => Some(parse_geometry(geom).map_err(invalid)?),
            };

            let bucket = properties
                .get(BUCKET_PROPERTY)
                .and_then(|v| v.as_u64())
                .and_then(|b| u8::try_from(b).ok());

            features.push(BoundaryFeature {
                id,
                properties,
                geometry,
                bucket,
            });
        }

        Ok(Self { dataset, features })
    }

    /// Emits a GeoJSON FeatureCollection for the renderer.
    pub fn to_geojson_value(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|feat| {
                let mut fobj = Map::new();
                fobj.insert("type".to_string(), Value::String("Feature".to_string()));
                if let Some(id) = &feat.id {
                    fobj.insert("id".to_string(), Value::String(id.clone()));
                }
                fobj.insert(
                    "properties".to_string(),
                    Value::Object(feat.properties.clone()),
                );
                let geometry = feat
                    .geometry
                    .as_ref()
                    .map(geometry_to_geojson_value)
                    .unwrap_or(Value::Null);
                fobj.insert("geometry".to_string(), geometry);
                Value::Object(fobj)
            })
            .collect();

        let mut root = Map::new();
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );
        root.insert("features".to_string(), Value::Array(features));
        Value::Object(root)
    }

    pub fn find_by_geoid(&self, geoid: &str) -> Option<&BoundaryFeature> {
        self.features
            .iter()
            .find(|f| f.geoid().as_deref() == Some(geoid))
    }

    /// Union of all feature bounds.
    pub fn bounds(&self) -> Option<Aabb2> {
        self.features
            .iter()
            .filter_map(BoundaryFeature::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

fn geometry_to_geojson_value(geom: &BoundaryGeometry) -> Value {
    let ring = |ring: &Vec<GeoPoint>| {
        Value::Array(
            ring.iter()
                .map(|p| Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)]))
                .collect(),
        )
    };
    let polygon = |rings: &Vec<Vec<GeoPoint>>| Value::Array(rings.iter().map(ring).collect());

    let (ty, coords) = match geom {
        BoundaryGeometry::Polygon(rings) => ("Polygon", polygon(rings)),
        BoundaryGeometry::MultiPolygon(polys) => (
            "MultiPolygon",
            Value::Array(polys.iter().map(polygon).collect()),
        ),
    };

    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(ty.to_string()));
    obj.insert("coordinates".to_string(), coords);
    Value::Object(obj)
}

fn parse_geometry(value: &Value) -> Result<BoundaryGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(BoundaryGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(BoundaryGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported boundary geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
