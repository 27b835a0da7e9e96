//! Priority-ordered type mapping resolution.
//!
//! The resolver walks a closed rule table, first match wins:
//!
//! ```text
//! 1. Intrinsic       value types and System.String   → plain mapping
//! 2. ByteSequence    exactly System.Byte[]           → one array-structural comparer
//! 3. GeometryFamily  marker type or a descendant     → one comparer for the exact type
//! 4. Delegated       anything else                   → fallback, unchanged
//! ```
//!
//! The resolver has no mutable state. Build it once at startup and share it
//! by reference or `Arc` across every session.

use crate::config::ResolverConfig;
use crate::descriptor::{TypeDescriptor, TypeKey, well_known};
use crate::error::MappingError;
use crate::factory::ComparerFactory;
use crate::fallback::FallbackResolver;
use crate::mapping::TypeMapping;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

pub const MAPPING_RULE_REGISTRY_KIND: &str = "filectx.type_mapping_rules.v1";
pub const MAPPING_RULE_REGISTRY_SCHEMA: u32 = 1;

/// Which rule produced (or would produce) a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingRuleKind {
    Intrinsic,
    ByteSequence,
    GeometryFamily,
    Delegated,
}

impl fmt::Display for MappingRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Intrinsic => "intrinsic",
            Self::ByteSequence => "byte_sequence",
            Self::GeometryFamily => "geometry_family",
            Self::Delegated => "delegated",
        };
        f.write_str(label)
    }
}

type RulePredicate = fn(&TypeMappingResolver, &TypeDescriptor) -> bool;
type RuleBuild = fn(&TypeMappingResolver, &TypeDescriptor) -> Result<TypeMapping, MappingError>;

struct MappingRule {
    kind: MappingRuleKind,
    shared_comparer: bool,
    matches: RulePredicate,
    build: RuleBuild,
}

/// Special-cased rules in priority order. Unmatched types go to the fallback.
const MAPPING_RULES: &[MappingRule] = &[
    MappingRule {
        kind: MappingRuleKind::Intrinsic,
        shared_comparer: false,
        matches: is_intrinsic,
        build: build_plain,
    },
    MappingRule {
        kind: MappingRuleKind::ByteSequence,
        shared_comparer: true,
        matches: is_byte_sequence,
        build: build_byte_sequence,
    },
    MappingRule {
        kind: MappingRuleKind::GeometryFamily,
        shared_comparer: true,
        matches: is_geometry_family,
        build: build_geometry,
    },
];

fn is_intrinsic(_: &TypeMappingResolver, descriptor: &TypeDescriptor) -> bool {
    descriptor.is_value_type() || descriptor.qualified_name() == well_known::STRING
}

fn is_byte_sequence(_: &TypeMappingResolver, descriptor: &TypeDescriptor) -> bool {
    descriptor.qualified_name() == well_known::BYTES
}

fn is_geometry_family(resolver: &TypeMappingResolver, descriptor: &TypeDescriptor) -> bool {
    descriptor.is_or_derives_from(&resolver.geometry_marker)
}

fn build_plain(
    _: &TypeMappingResolver,
    descriptor: &TypeDescriptor,
) -> Result<TypeMapping, MappingError> {
    Ok(TypeMapping::plain(descriptor))
}

fn build_byte_sequence(
    resolver: &TypeMappingResolver,
    descriptor: &TypeDescriptor,
) -> Result<TypeMapping, MappingError> {
    let element = descriptor
        .element_type()
        .cloned()
        .unwrap_or_else(TypeDescriptor::byte);
    let comparer = resolver.comparers.array_structural_comparer(&element);
    Ok(TypeMapping::structural(descriptor, comparer))
}

fn build_geometry(
    resolver: &TypeMappingResolver,
    descriptor: &TypeDescriptor,
) -> Result<TypeMapping, MappingError> {
    let comparer = resolver.comparers.geometry_comparer(descriptor)?;
    Ok(TypeMapping::structural(descriptor, comparer))
}

/// Decides how a value of a given type is stored and compared.
pub struct TypeMappingResolver {
    geometry_marker: TypeKey,
    comparers: Arc<dyn ComparerFactory>,
    fallback: Arc<dyn FallbackResolver>,
}

impl fmt::Debug for TypeMappingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMappingResolver")
            .field("geometry_marker", &self.geometry_marker)
            .finish_non_exhaustive()
    }
}

impl TypeMappingResolver {
    /// A resolver recognizing the NetTopologySuite geometry family.
    pub fn new(comparers: Arc<dyn ComparerFactory>, fallback: Arc<dyn FallbackResolver>) -> Self {
        Self {
            geometry_marker: TypeKey::from(well_known::GEOMETRY_MARKER),
            comparers,
            fallback,
        }
    }

    /// Register a different marker type for the geometry family.
    pub fn with_geometry_marker(mut self, marker: impl Into<TypeKey>) -> Self {
        self.geometry_marker = marker.into();
        self
    }

    /// Build the resolver and its stock comparer factory from config.
    pub fn from_config(
        config: &ResolverConfig,
        fallback: Arc<dyn FallbackResolver>,
    ) -> Result<Self, MappingError> {
        config.validate()?;
        Ok(Self::new(Arc::new(config.comparer_factory()), fallback)
            .with_geometry_marker(config.geometry_marker.as_str()))
    }

    pub fn geometry_marker(&self) -> &TypeKey {
        &self.geometry_marker
    }

    fn matching_rule(&self, descriptor: &TypeDescriptor) -> Option<&'static MappingRule> {
        MAPPING_RULES
            .iter()
            .find(|rule| (rule.matches)(self, descriptor))
    }

    /// Resolve the mapping for `descriptor`.
    ///
    /// Fails only when a geometry comparer cannot be built for the exact
    /// type, or when the fallback fails; fallback errors pass through as-is.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<TypeMapping, MappingError> {
        match self.matching_rule(descriptor) {
            Some(rule) => (rule.build)(self, descriptor),
            None => self.fallback.resolve(descriptor),
        }
    }

    /// The rule `resolve` would apply, without building anything.
    pub fn classify(&self, descriptor: &TypeDescriptor) -> MappingRuleKind {
        self.matching_rule(descriptor)
            .map_or(MappingRuleKind::Delegated, |rule| rule.kind)
    }

    pub fn is_geometry_family(&self, descriptor: &TypeDescriptor) -> bool {
        is_geometry_family(self, descriptor)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingRuleRow {
    pub priority: usize,
    pub rule: MappingRuleKind,
    pub shared_comparer: bool,
}

/// The rule table in evaluation order, ending with fallback delegation.
pub fn mapping_rule_registry() -> Vec<MappingRuleRow> {
    MAPPING_RULES
        .iter()
        .map(|rule| (rule.kind, rule.shared_comparer))
        .chain(std::iter::once((MappingRuleKind::Delegated, false)))
        .enumerate()
        .map(|(index, (rule, shared_comparer))| MappingRuleRow {
            priority: index + 1,
            rule,
            shared_comparer,
        })
        .collect()
}

pub fn mapping_rule_registry_json() -> Value {
    json!({
        "schema": MAPPING_RULE_REGISTRY_SCHEMA,
        "registryKind": MAPPING_RULE_REGISTRY_KIND,
        "rules": mapping_rule_registry(),
    })
}
