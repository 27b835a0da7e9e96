//! Structural comparers.
//!
//! A comparer bundles the three roles a mapping can override: equality,
//! ordering, and snapshotting. One instance serves all three roles, so a
//! mapping can share a single `Arc` across its slots.

use crate::descriptor::TypeDescriptor;
use crate::value::{StoredValue, compare_coordinates, compare_geometries};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Equality, ordering, and snapshot semantics for stored values.
pub trait ValueComparer: Send + Sync + fmt::Debug {
    /// Human-readable name, e.g. `array_structural<System.Byte>`.
    fn name(&self) -> String;

    fn equals(&self, left: &StoredValue, right: &StoredValue) -> bool;

    fn compare(&self, left: &StoredValue, right: &StoredValue) -> Ordering;

    /// A copy fixed at this point in time, for later change detection.
    fn snapshot(&self, value: &StoredValue) -> StoredValue;
}

pub type SharedComparer = Arc<dyn ValueComparer>;

/// Elementwise comparer for byte sequences.
///
/// Equal iff same length and same contents. Ordered lexicographically, so a
/// strict prefix sorts first.
#[derive(Debug, Clone)]
pub struct ArrayStructuralComparer {
    element: TypeDescriptor,
}

impl ArrayStructuralComparer {
    pub fn new(element: &TypeDescriptor) -> Self {
        Self {
            element: element.clone(),
        }
    }

    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element
    }
}

impl ValueComparer for ArrayStructuralComparer {
    fn name(&self) -> String {
        format!("array_structural<{}>", self.element)
    }

    fn equals(&self, left: &StoredValue, right: &StoredValue) -> bool {
        match (left, right) {
            (StoredValue::Bytes(a), StoredValue::Bytes(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            _ => left.natural_eq(right),
        }
    }

    fn compare(&self, left: &StoredValue, right: &StoredValue) -> Ordering {
        match (left, right) {
            (StoredValue::Bytes(a), StoredValue::Bytes(b)) => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.cmp(y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => left.natural_cmp(right),
        }
    }

    fn snapshot(&self, value: &StoredValue) -> StoredValue {
        value.clone()
    }
}

/// Tolerance-aware comparer bound to one exact geometry type.
#[derive(Debug, Clone)]
pub struct GeometryComparer {
    subject: TypeDescriptor,
    tolerance: f64,
}

impl GeometryComparer {
    pub fn new(subject: &TypeDescriptor, tolerance: f64) -> Self {
        Self {
            subject: subject.clone(),
            tolerance,
        }
    }

    /// The exact type this comparer was built for.
    pub fn subject(&self) -> &TypeDescriptor {
        &self.subject
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl ValueComparer for GeometryComparer {
    fn name(&self) -> String {
        format!("geometry<{}>", self.subject)
    }

    fn equals(&self, left: &StoredValue, right: &StoredValue) -> bool {
        match (left, right) {
            (StoredValue::Geometry(a), StoredValue::Geometry(b)) => {
                a.srid == b.srid
                    && a.coordinates.len() == b.coordinates.len()
                    && a.coordinates
                        .iter()
                        .zip(&b.coordinates)
                        .all(|(ca, cb)| compare_coordinates(ca, cb, self.tolerance).is_eq())
            }
            _ => left.natural_eq(right),
        }
    }

    fn compare(&self, left: &StoredValue, right: &StoredValue) -> Ordering {
        match (left, right) {
            (StoredValue::Geometry(a), StoredValue::Geometry(b)) => {
                compare_geometries(a, b, self.tolerance)
            }
            _ => left.natural_cmp(right),
        }
    }

    fn snapshot(&self, value: &StoredValue) -> StoredValue {
        value.clone()
    }
}
