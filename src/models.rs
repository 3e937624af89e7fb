use geo::MultiPolygon;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Mapping of region name to its value in `0..=100`.
///
/// Keys are unique. Backed by a `BTreeMap` so serialized output is stable; the
/// order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, u32>);

impl<'de> Deserialize<'de> for ValueMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        let mut out = ValueMap::new();
        for (name, value) in raw {
            if value > 100 {
                log::warn!("value {value} for '{name}' clamped into 0..=100");
            }
            out.insert(name, value);
        }
        Ok(out)
    }
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, clamped to `0..=100`.
    pub fn insert(&mut self, name: String, value: u32) {
        self.0.insert(name, value.min(100));
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.values().copied()
    }
}

impl FromIterator<(String, u32)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        let mut out = ValueMap::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

/// Geographic bounding box in degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Hard-coded extent of Anambra State, used when boundaries cannot be loaded.
    pub const ANAMBRA: Bounds = Bounds::new(5.68, 6.60, 6.78, 7.38);

    /// Edges ordered so that `south <= north` and `west <= east`.
    pub fn normalized(&self) -> Bounds {
        Bounds::new(
            self.south.min(self.north),
            self.west.min(self.east),
            self.south.max(self.north),
            self.west.max(self.east),
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// `(lat, lon)` of the centre.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Grow each side by `fraction` of the box's extent.
    pub fn pad(&self, fraction: f64) -> Bounds {
        let dy = self.height() * fraction;
        let dx = self.width() * fraction;
        Bounds::new(
            self.south - dy,
            self.west - dx,
            self.north + dy,
            self.east + dx,
        )
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.south.min(other.south),
            self.west.min(other.west),
            self.north.max(other.north),
            self.east.max(other.east),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::ANAMBRA
    }
}

/// One named region with its boundary geometry.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    /// `(lat, lon)`; computed from the boundary when loaded from GeoJSON.
    pub centroid: Option<(f64, f64)>,
    pub boundary: MultiPolygon<f64>,
}

/// Boundary features loaded from a GeoJSON `FeatureCollection`, in file order.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    pub regions: Vec<Region>,
}

impl BoundarySet {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }

    /// Extent of every boundary, or `None` when there is no geometry.
    pub fn extent(&self) -> Option<Bounds> {
        use geo::BoundingRect;
        self.regions
            .iter()
            .filter_map(|r| r.boundary.bounding_rect())
            .map(|rect| Bounds::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x))
            .reduce(|a, b| a.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_map_clamps_on_insert() {
        let mut v = ValueMap::new();
        v.insert("A".into(), 250);
        assert_eq!(v.get("A"), Some(100));
        assert_eq!(v.get("B"), None);
    }

    #[test]
    fn bounds_pad_and_union() {
        let b = Bounds::new(0.0, 0.0, 10.0, 20.0);
        let p = b.pad(0.1);
        assert_eq!(p, Bounds::new(-1.0, -2.0, 11.0, 22.0));
        let u = b.union(&Bounds::new(-5.0, 5.0, 3.0, 30.0));
        assert_eq!(u, Bounds::new(-5.0, 0.0, 10.0, 30.0));
        assert_eq!(b.center(), (5.0, 10.0));
    }

    #[test]
    fn value_map_serializes_as_plain_object() {
        let v: ValueMap = [("Oyi".to_string(), 15), ("Aguata".to_string(), 24)]
            .into_iter()
            .collect();
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, r#"{"Aguata":24,"Oyi":15}"#);
    }
}
