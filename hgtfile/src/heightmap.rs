//! Height map values produced by the decoder.

/// Samples at or above this value are treated as no-data.
pub const NO_DATA_THRESHOLD: f32 = 32768.0;

/// Returns `true` if a decoded sample counts as a real elevation.
#[inline]
pub fn is_valid_sample(value: f32) -> bool {
    value < NO_DATA_THRESHOLD
}

/// A geographic rectangle in decimal degrees (WGS84).
///
/// `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Western boundary longitude.
    pub x_min: f64,
    /// Eastern boundary longitude.
    pub x_max: f64,
    /// Southern boundary latitude.
    pub y_min: f64,
    /// Northern boundary latitude.
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Check whether a coordinate lies inside the box (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.y_min..=self.y_max).contains(&lat) && (self.x_min..=self.x_max).contains(&lon)
    }
}

/// One geo-referenced elevation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f32,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f32) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

/// A decoded, geo-referenced grid of elevations.
///
/// Coordinates are stored row-major: north to south, then west to east.
#[derive(Debug, Clone)]
pub struct HeightMap {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// `width * height`.
    pub count: usize,
    /// Extent of the decoded pixel centers.
    pub bounding_box: BoundingBox,
    /// Smallest valid elevation, `f32::MAX` if there were none.
    pub minimum: f32,
    /// Largest valid elevation, `f32::MIN` if there were none.
    pub maximum: f32,
    /// The samples in scan order.
    pub coordinates: Vec<GeoPoint>,
}

impl HeightMap {
    /// Returns `true` if at least one valid sample was folded into the extrema.
    pub fn has_valid_samples(&self) -> bool {
        self.minimum <= self.maximum
    }

    /// Iterate over the elevations in scan order.
    pub fn elevations(&self) -> impl Iterator<Item = f32> + '_ {
        self.coordinates.iter().map(|p| p.elevation)
    }

    /// The sample at `row`/`col` of this map, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<&GeoPoint> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.coordinates.get(row * self.width + col)
    }

    /// Returns `true` if the map holds no samples.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Accumulates samples into a [`HeightMap`].
#[derive(Debug)]
pub struct HeightMapBuilder {
    width: usize,
    height: usize,
    no_data_fallback: f32,
    bounding_box: BoundingBox,
    minimum: f32,
    maximum: f32,
    coordinates: Vec<GeoPoint>,
}

impl HeightMapBuilder {
    /// Start a `width` × `height` map. Samples rejected by the no-data rule
    /// are stored as `no_data_fallback`.
    pub fn new(width: usize, height: usize, no_data_fallback: f32) -> Self {
        Self {
            width,
            height,
            no_data_fallback,
            bounding_box: BoundingBox::default(),
            minimum: f32::MAX,
            maximum: f32::MIN,
            coordinates: Vec::with_capacity(width * height),
        }
    }

    /// Append a sample; the extrema only see it when `is_valid`.
    pub fn add(&mut self, latitude: f64, longitude: f64, elevation: f32, is_valid: bool) {
        if is_valid {
            self.minimum = self.minimum.min(elevation);
            self.maximum = self.maximum.max(elevation);
        }
        self.coordinates
            .push(GeoPoint::new(latitude, longitude, elevation));
    }

    /// Append a raw decoded sample, substituting the fallback for no-data.
    pub fn add_sample(&mut self, latitude: f64, longitude: f64, value: f32) {
        if is_valid_sample(value) {
            self.add(latitude, longitude, value, true);
        } else {
            self.add(latitude, longitude, self.no_data_fallback, false);
        }
    }

    pub fn set_bounding_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
    }

    /// Number of samples added so far.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Complete the map.
    ///
    /// # Panics
    ///
    /// Panics if the number of added samples differs from `width * height`,
    /// which means the caller walked the grid incorrectly.
    pub fn finish(self) -> HeightMap {
        let count = self.width * self.height;
        assert_eq!(
            self.coordinates.len(),
            count,
            "height map of {}x{} received {} samples",
            self.width,
            self.height,
            self.coordinates.len()
        );

        HeightMap {
            width: self.width,
            height: self.height,
            count,
            bounding_box: self.bounding_box,
            minimum: self.minimum,
            maximum: self.maximum,
            coordinates: self.coordinates,
        }
    }
}
