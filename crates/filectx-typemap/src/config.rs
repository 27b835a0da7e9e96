//! Resolver configuration, read once at startup.
//!
//! ```toml
//! geometry_marker = "NetTopologySuite.Geometries.Geometry"
//!
//! [geometry]
//! builtin_profiles = true
//! default_tolerance = 1e-9
//! # strict = true    # reject geometry types with no listed profile
//!
//! [[geometry.profiles]]
//! type = "Acme.Spatial.Parcel"
//! tolerance = 0.5
//! ```

use crate::descriptor::well_known;
use crate::error::MappingError;
use crate::factory::{GeometryProfile, StockComparerFactory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default = "default_geometry_marker")]
    pub geometry_marker: String,
    #[serde(default)]
    pub geometry: GeometryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryConfig {
    /// Register exact profiles for the NetTopologySuite leaf types.
    #[serde(default = "default_true")]
    pub builtin_profiles: bool,
    /// Tolerance for geometry types with no explicit profile. Defaults to
    /// exact comparison.
    #[serde(default)]
    pub default_tolerance: Option<f64>,
    /// Only listed types resolve; any other geometry type is a
    /// configuration error.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub profiles: Vec<GeometryProfileRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryProfileRow {
    #[serde(rename = "type")]
    pub type_name: String,
    pub tolerance: f64,
}

fn default_geometry_marker() -> String {
    well_known::GEOMETRY_MARKER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            geometry_marker: default_geometry_marker(),
            geometry: GeometryConfig::default(),
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            builtin_profiles: true,
            default_tolerance: None,
            strict: false,
            profiles: Vec::new(),
        }
    }
}

fn check_tolerance(label: &str, tolerance: f64) -> Result<(), MappingError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(MappingError::InvalidConfig(format!(
            "{label}: tolerance must be finite and non-negative, got {tolerance}"
        )))
    }
}

impl ResolverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, MappingError> {
        let config: Self =
            toml::from_str(text).map_err(|source| MappingError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MappingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        if self.geometry_marker.trim().is_empty() {
            return Err(MappingError::InvalidConfig(
                "geometry_marker must not be empty".to_string(),
            ));
        }
        if let Some(tolerance) = self.geometry.default_tolerance {
            if self.geometry.strict {
                return Err(MappingError::InvalidConfig(
                    "geometry.default_tolerance cannot be combined with geometry.strict"
                        .to_string(),
                ));
            }
            check_tolerance("geometry.default_tolerance", tolerance)?;
        }
        let mut seen = BTreeSet::new();
        for row in &self.geometry.profiles {
            if row.type_name.trim().is_empty() {
                return Err(MappingError::InvalidConfig(
                    "geometry.profiles: type must not be empty".to_string(),
                ));
            }
            check_tolerance(&format!("geometry.profiles[{}]", row.type_name), row.tolerance)?;
            if !seen.insert(row.type_name.as_str()) {
                return Err(MappingError::InvalidConfig(format!(
                    "geometry.profiles: duplicate profile for {}",
                    row.type_name
                )));
            }
        }
        Ok(())
    }

    /// Explicit profiles override the built-in ones for the same type.
    pub fn comparer_factory(&self) -> StockComparerFactory {
        let base = if self.geometry.builtin_profiles {
            StockComparerFactory::with_builtin_profiles()
        } else {
            StockComparerFactory::new()
        };
        let factory = self.geometry.profiles.iter().fold(base, |factory, row| {
            factory.with_profile(
                row.type_name.as_str(),
                GeometryProfile {
                    tolerance: row.tolerance,
                },
            )
        });
        match (self.geometry.strict, self.geometry.default_tolerance) {
            (true, _) => factory.strict(),
            (false, Some(tolerance)) => factory.with_default_profile(GeometryProfile { tolerance }),
            (false, None) => factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeKey;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ResolverConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.geometry_marker, well_known::GEOMETRY_MARKER);
    }

    #[test]
    fn parses_profiles_and_default_tolerance() {
        let config = ResolverConfig::from_toml_str(
            r#"
            geometry_marker = "Acme.Spatial.Shape"

            [geometry]
            builtin_profiles = false
            default_tolerance = 1e-6

            [[geometry.profiles]]
            type = "Acme.Spatial.Parcel"
            tolerance = 0.5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.geometry_marker, "Acme.Spatial.Shape");
        let factory = config.comparer_factory();
        assert_eq!(
            factory.profile_for(&TypeKey::from("Acme.Spatial.Parcel")),
            Some(GeometryProfile { tolerance: 0.5 })
        );
        assert_eq!(
            factory.profile_for(&TypeKey::from("NetTopologySuite.Geometries.Point")),
            Some(GeometryProfile { tolerance: 1e-6 })
        );
    }

    #[test]
    fn default_config_compares_unlisted_geometry_types_exactly() {
        let factory = ResolverConfig::default().comparer_factory();
        assert!(!factory.is_strict());
        assert_eq!(
            factory.profile_for(&TypeKey::from("NetTopologySuite.Geometries.Point")),
            Some(GeometryProfile::EXACT)
        );
        assert_eq!(
            factory.profile_for(&TypeKey::from(well_known::GEOMETRY_MARKER)),
            Some(GeometryProfile::EXACT)
        );
        assert_eq!(
            factory.profile_for(&TypeKey::from("Acme.Parcel")),
            Some(GeometryProfile::EXACT)
        );
    }

    #[test]
    fn strict_config_only_knows_listed_types() {
        let config = ResolverConfig::from_toml_str(
            r#"
            [geometry]
            strict = true
            "#,
        )
        .expect("strict config");
        let factory = config.comparer_factory();

        assert!(factory.is_strict());
        assert!(
            factory
                .profile_for(&TypeKey::from("NetTopologySuite.Geometries.Point"))
                .is_some()
        );
        assert_eq!(factory.profile_for(&TypeKey::from("Acme.Parcel")), None);
    }

    #[test]
    fn strict_config_rejects_default_tolerance() {
        let err = ResolverConfig::from_toml_str(
            r#"
            [geometry]
            strict = true
            default_tolerance = 0.1
            "#,
        )
        .expect_err("contradictory settings");
        assert!(matches!(err, MappingError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_tolerance() {
        let err = ResolverConfig::from_toml_str(
            r#"
            [[geometry.profiles]]
            type = "Acme.Spatial.Parcel"
            tolerance = -1.0
            "#,
        )
        .expect_err("negative tolerance");
        assert!(matches!(err, MappingError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_duplicate_profiles_and_empty_marker() {
        let duplicate = ResolverConfig::from_toml_str(
            r#"
            [[geometry.profiles]]
            type = "Acme.Parcel"
            tolerance = 0.0

            [[geometry.profiles]]
            type = "Acme.Parcel"
            tolerance = 0.1
            "#,
        );
        assert!(matches!(duplicate, Err(MappingError::InvalidConfig(_))));

        let empty_marker = ResolverConfig::from_toml_str(r#"geometry_marker = " ""#);
        assert!(matches!(empty_marker, Err(MappingError::InvalidConfig(_))));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = ResolverConfig::from_toml_str("geometry_markr = \"X\"").expect_err("typo");
        assert!(matches!(err, MappingError::ConfigParse { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ResolverConfig::load("/nonexistent/filectx-typemap.toml").expect_err("missing");
        assert!(matches!(err, MappingError::ConfigRead { .. }));
    }
}
