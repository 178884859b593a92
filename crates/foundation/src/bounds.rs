/// Axis-aligned lon/lat bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub const fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Box covering a single point.
    pub const fn point(lon_deg: f64, lat_deg: f64) -> Self {
        Aabb2 {
            min: [lon_deg, lat_deg],
            max: [lon_deg, lat_deg],
        }
    }

    pub fn expand_to(&mut self, lon_deg: f64, lat_deg: f64) {
        self.min[0] = self.min[0].min(lon_deg);
        self.min[1] = self.min[1].min(lat_deg);
        self.max[0] = self.max[0].max(lon_deg);
        self.max[1] = self.max[1].max(lat_deg);
    }

    pub fn union(&self, other: &Aabb2) -> Aabb2 {
        let mut out = *self;
        out.expand_to(other.min[0], other.min[1]);
        out.expand_to(other.max[0], other.max[1]);
        out
    }

    pub fn contains(&self, lon_deg: f64, lat_deg: f64) -> bool {
        lon_deg >= self.min[0]
            && lon_deg <= self.max[0]
            && lat_deg >= self.min[1]
            && lat_deg <= self.max[1]
    }
}

/// The lower 48 states, used as the initial camera extent.
pub const CONTINENTAL_US: Aabb2 = Aabb2::new([-125.001, 24.949], [-66.933, 49.591]);

/// Padding (screen pixels) around the initial fit.
pub const DEFAULT_FIT_PADDING_PX: u32 = 40;

/// Request handed to the renderer to frame a geographic box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportFit {
    pub bounds: Aabb2,
    pub padding_px: u32,
    /// Zero means jump without animating.
    pub duration_ms: u32,
}

impl ViewportFit {
    pub const fn continental_us() -> Self {
        Self {
            bounds: CONTINENTAL_US,
            padding_px: DEFAULT_FIT_PADDING_PX,
            duration_ms: 0,
        }
    }
}
