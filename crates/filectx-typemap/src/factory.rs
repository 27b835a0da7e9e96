//! Comparer construction.
//!
//! The resolver never builds comparers itself; it asks a [`ComparerFactory`].
//! [`StockComparerFactory`] is the bundled implementation, driven by
//! per-type geometry profiles.

use crate::comparer::{ArrayStructuralComparer, GeometryComparer, SharedComparer};
use crate::descriptor::{TypeDescriptor, TypeKey};
use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds structural comparers for composite or externally-defined types.
pub trait ComparerFactory: Send + Sync {
    /// One comparer usable as equality, ordering, and snapshot comparer,
    /// parameterized by the exact runtime type.
    fn geometry_comparer(&self, exact: &TypeDescriptor) -> Result<SharedComparer, MappingError>;

    /// Stock comparer for ordered sequences of `element`.
    fn array_structural_comparer(&self, element: &TypeDescriptor) -> SharedComparer;
}

/// Comparer parameters for one geometry type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryProfile {
    /// Maximum per-axis difference for two coordinates to count as equal.
    pub tolerance: f64,
}

impl GeometryProfile {
    pub const EXACT: Self = Self { tolerance: 0.0 };
}

/// Concrete NetTopologySuite geometry types.
///
/// Other geometry types, the marker included, use the default profile.
pub const BUILTIN_GEOMETRY_TYPES: &[&str] = &[
    "NetTopologySuite.Geometries.Point",
    "NetTopologySuite.Geometries.LineString",
    "NetTopologySuite.Geometries.LinearRing",
    "NetTopologySuite.Geometries.Polygon",
    "NetTopologySuite.Geometries.MultiPoint",
    "NetTopologySuite.Geometries.MultiLineString",
    "NetTopologySuite.Geometries.MultiPolygon",
    "NetTopologySuite.Geometries.GeometryCollection",
];

/// Builds comparers from per-type geometry profiles.
///
/// Any geometry type without an explicit profile gets the default profile,
/// which starts out as [`GeometryProfile::EXACT`]. A strict factory has no
/// default and rejects unlisted types with [`MappingError::Configuration`].
#[derive(Debug, Clone)]
pub struct StockComparerFactory {
    profiles: BTreeMap<TypeKey, GeometryProfile>,
    default_profile: Option<GeometryProfile>,
}

impl Default for StockComparerFactory {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            default_profile: Some(GeometryProfile::EXACT),
        }
    }
}

impl StockComparerFactory {
    /// A factory with no explicit profiles; every geometry type compares exactly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory with exact profiles for [`BUILTIN_GEOMETRY_TYPES`].
    pub fn with_builtin_profiles() -> Self {
        BUILTIN_GEOMETRY_TYPES
            .iter()
            .fold(Self::new(), |factory, name| {
                factory.with_profile(*name, GeometryProfile::EXACT)
            })
    }

    pub fn with_profile(mut self, type_name: impl Into<TypeKey>, profile: GeometryProfile) -> Self {
        self.profiles.insert(type_name.into(), profile);
        self
    }

    /// Profile used for geometry types with no explicit profile.
    pub fn with_default_profile(mut self, profile: GeometryProfile) -> Self {
        self.default_profile = Some(profile);
        self
    }

    /// Drop the default profile: only listed types get a comparer.
    pub fn strict(mut self) -> Self {
        self.default_profile = None;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.default_profile.is_none()
    }

    pub fn profile_for(&self, key: &TypeKey) -> Option<GeometryProfile> {
        self.profiles.get(key).copied().or(self.default_profile)
    }
}

impl ComparerFactory for StockComparerFactory {
    fn geometry_comparer(&self, exact: &TypeDescriptor) -> Result<SharedComparer, MappingError> {
        let profile = self.profile_for(exact.key()).ok_or_else(|| {
            MappingError::configuration(
                exact.qualified_name(),
                "no geometry profile registered for this type",
            )
        })?;
        Ok(Arc::new(GeometryComparer::new(exact, profile.tolerance)))
    }

    fn array_structural_comparer(&self, element: &TypeDescriptor) -> SharedComparer {
        Arc::new(ArrayStructuralComparer::new(element))
    }
}
