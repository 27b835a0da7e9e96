//! Stored values and their natural semantics.
//!
//! A mapping with an absent comparer slot falls back to the methods here:
//! a total ordering across variants, equality defined as that ordering
//! reporting `Equal`, and plain clones for snapshots.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A value as held by the file store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Geometry(Geometry),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Coordinate {
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// A spatial value: an optional spatial reference id and its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srid: Option<u32>,
    pub coordinates: Vec<Coordinate>,
}

impl Geometry {
    pub fn new(srid: Option<u32>, coordinates: Vec<Coordinate>) -> Self {
        Self { srid, coordinates }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::new(None, vec![Coordinate::xy(x, y)])
    }
}

impl StoredValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Text(_) => 4,
            Self::Bytes(_) => 5,
            Self::Geometry(_) => 6,
        }
    }

    /// Agrees with [`Self::natural_cmp`]: `NaN` equals `NaN`, `-0.0` does not
    /// equal `0.0`.
    pub fn natural_eq(&self, other: &Self) -> bool {
        self.natural_cmp(other).is_eq()
    }

    /// Total order: variant rank first, then payload.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.cmp(b),
            (Self::Geometry(a), Self::Geometry(b)) => compare_geometries(a, b, 0.0),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

pub(crate) fn compare_axis(a: f64, b: f64, tolerance: f64) -> Ordering {
    if (a - b).abs() <= tolerance {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

pub(crate) fn compare_coordinates(a: &Coordinate, b: &Coordinate, tolerance: f64) -> Ordering {
    compare_axis(a.x, b.x, tolerance)
        .then_with(|| compare_axis(a.y, b.y, tolerance))
        .then_with(|| match (a.z, b.z) {
            (Some(za), Some(zb)) => compare_axis(za, zb, tolerance),
            (za, zb) => za.is_some().cmp(&zb.is_some()),
        })
}

/// SRID, then coordinates pairwise, then coordinate count.
pub(crate) fn compare_geometries(a: &Geometry, b: &Geometry, tolerance: f64) -> Ordering {
    a.srid
        .cmp(&b.srid)
        .then_with(|| {
            a.coordinates
                .iter()
                .zip(&b.coordinates)
                .map(|(ca, cb)| compare_coordinates(ca, cb, tolerance))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.coordinates.len().cmp(&b.coordinates.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_ranks_variants_before_payloads() {
        assert_eq!(
            StoredValue::Null.natural_cmp(&StoredValue::Int(-5)),
            Ordering::Less
        );
        assert_eq!(
            StoredValue::Text("a".into()).natural_cmp(&StoredValue::Int(9)),
            Ordering::Greater
        );
        assert_eq!(
            StoredValue::Float(1.5).natural_cmp(&StoredValue::Float(1.5)),
            Ordering::Equal
        );
    }

    #[test]
    fn natural_equality_agrees_with_natural_order() {
        let pairs = [
            (StoredValue::Float(f64::NAN), StoredValue::Float(f64::NAN)),
            (StoredValue::Float(-0.0), StoredValue::Float(0.0)),
            (StoredValue::Int(1), StoredValue::Float(1.0)),
            (
                StoredValue::Geometry(Geometry::point(f64::NAN, 0.0)),
                StoredValue::Geometry(Geometry::point(f64::NAN, 0.0)),
            ),
        ];
        for (left, right) in &pairs {
            assert_eq!(left.natural_eq(right), left.natural_cmp(right).is_eq());
        }
        assert!(pairs[0].0.natural_eq(&pairs[0].1));
        assert!(!pairs[1].0.natural_eq(&pairs[1].1));
    }

    #[test]
    fn coordinates_with_elevation_sort_after_flat_ones() {
        let flat = Coordinate::xy(1.0, 1.0);
        let low = Coordinate::xyz(1.0, 1.0, 5.0);
        let high = Coordinate::xyz(1.0, 1.0, 9.0);

        assert_eq!(compare_coordinates(&flat, &low, 0.0), Ordering::Less);
        assert_eq!(compare_coordinates(&low, &high, 0.0), Ordering::Less);
        assert_eq!(compare_coordinates(&low, &high, 4.0), Ordering::Equal);
    }

    #[test]
    fn geometry_order_uses_srid_first() {
        let a = Geometry::new(Some(4326), vec![Coordinate::xy(10.0, 0.0)]);
        let b = Geometry::new(Some(3857), vec![Coordinate::xy(0.0, 0.0)]);
        assert_eq!(compare_geometries(&a, &b, 0.0), Ordering::Greater);
    }

    #[test]
    fn stored_value_serializes_tagged() {
        let value = StoredValue::Bytes(vec![1, 2]);
        let json = serde_json::to_value(&value).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "bytes", "value": [1, 2]}));

        let back: StoredValue = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, value);
    }
}
