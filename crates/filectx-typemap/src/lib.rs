//! # filectx type mapping
//!
//! Decides how a value of a given type is stored and compared by the file
//! context provider. One stateless resolver, built at startup and shared by
//! every session, walks a fixed rule chain and either produces a mapping or
//! hands the type to a fallback catalog.
//!
//! ## Architecture
//!
//! ```text
//! TypeDescriptor        ← qualified name, category, ancestor chain
//!     │
//! TypeMappingResolver   ← ordered rules, first match wins
//!     │   ├── ComparerFactory    ← array-structural / per-type geometry comparers
//!     │   └── FallbackResolver   ← everything not special-cased
//!     │
//! TypeMapping           ← subject + equality / ordering / snapshot slots
//!     │
//! MappingCache          ← caller-side memoization during model building
//! ```

pub mod cache;
pub mod comparer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod fallback;
pub mod mapping;
pub mod resolver;
pub mod value;

pub use cache::{CacheStats, MappingCache};
pub use comparer::{ArrayStructuralComparer, GeometryComparer, SharedComparer, ValueComparer};
pub use config::{GeometryConfig, GeometryProfileRow, ResolverConfig};
pub use descriptor::{TypeCategory, TypeDescriptor, TypeKey, well_known};
pub use error::MappingError;
pub use factory::{ComparerFactory, GeometryProfile, StockComparerFactory};
pub use fallback::{FallbackResolver, UnmappedFallback};
pub use mapping::TypeMapping;
pub use resolver::{
    MappingRuleKind, MappingRuleRow, TypeMappingResolver, mapping_rule_registry,
    mapping_rule_registry_json,
};
pub use value::{Coordinate, Geometry, StoredValue};
