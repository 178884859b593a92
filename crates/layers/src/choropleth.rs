//! Color buckets for the district/state fill layer.
//!
//! Buckets only spread neighbouring regions across the palette; they say
//! nothing about the official.

use formats::{BUCKET_PROPERTY, BoundaryCollection, BoundaryFeature};
use serde_json::Value;

pub const BUCKET_COUNT: u8 = 14;

/// Fill colors indexed by bucket (sRGB, 0-255).
pub const PALETTE: [[u8; 3]; BUCKET_COUNT as usize] = [
    [0x32, 0x88, 0xbd],
    [0x66, 0xc2, 0xa5],
    [0xab, 0xdd, 0xa4],
    [0xe6, 0xf5, 0x98],
    [0xff, 0xff, 0xbf],
    [0xfe, 0xe0, 0x8b],
    [0xfd, 0xae, 0x61],
    [0xf4, 0x6d, 0x43],
    [0xd5, 0x3e, 0x4f],
    [0x9e, 0xca, 0xe1],
    [0xc7, 0xe9, 0xb4],
    [0xff, 0xf7, 0xbc],
    [0xfd, 0xb8, 0x63],
    [0xe3, 0x4a, 0x33],
];

pub const FILL_OPACITY: f32 = 0.5;

/// RGBA fill for a bucket. Out-of-range buckets wrap.
pub fn color_for_bucket(bucket: u8) -> [f32; 4] {
    let [r, g, b] = PALETTE[(bucket % BUCKET_COUNT) as usize];
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        FILL_OPACITY,
    ]
}

/// `#rrggbb` form of [`PALETTE`], for renderers that take CSS colors.
pub fn hex_for_bucket(bucket: u8) -> String {
    let [r, g, b] = PALETTE[(bucket % BUCKET_COUNT) as usize];
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Bucket for one feature.
///
/// The numeric GEOID (or the feature id when there is no GEOID) modulo
/// [`BUCKET_COUNT`]. Identifiers that are not integers fall back to a
/// blake3 digest of the id, or of the properties when there is no id.
pub fn bucket_for(feature: &BoundaryFeature) -> u8 {
    let ident = feature.geoid().or_else(|| feature.id.as_deref().map(Into::into));
    if let Some(n) = ident.as_deref().and_then(parse_identifier) {
        return (n % BUCKET_COUNT as u64) as u8;
    }
    hashed_bucket(feature)
}

/// Tags every feature with its bucket, both as a typed field and as the
/// `bucket` property the fill layer keys on.
pub fn augment(mut collection: BoundaryCollection) -> BoundaryCollection {
    for feature in &mut collection.features {
        let bucket = bucket_for(feature);
        feature.bucket = Some(bucket);
        feature
            .properties
            .insert(BUCKET_PROPERTY.to_string(), Value::from(bucket));
    }
    collection
}

/// Feature count per bucket.
pub fn histogram(collection: &BoundaryCollection) -> [usize; BUCKET_COUNT as usize] {
    let mut counts = [0usize; BUCKET_COUNT as usize];
    for feature in &collection.features {
        let bucket = feature.bucket.unwrap_or_else(|| bucket_for(feature));
        counts[(bucket % BUCKET_COUNT) as usize] += 1;
    }
    counts
}

fn parse_identifier(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u64>().ok()
}

fn hashed_bucket(feature: &BoundaryFeature) -> u8 {
    let digest = match &feature.id {
        Some(id) => blake3::hash(id.as_bytes()),
        None => {
            // `serde_json::Map` iterates in key order, so this is stable. The
            // bucket property itself is left out so re-augmenting is a no-op.
            let mut props = feature.properties.clone();
            props.remove(BUCKET_PROPERTY);
            let canonical = Value::Object(props).to_string();
            blake3::hash(canonical.as_bytes())
        }
    };
    let bytes = digest.as_bytes();
    let n = u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]);
    (n % BUCKET_COUNT as u64) as u8
}
