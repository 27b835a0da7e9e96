//! The default mapping source for types with no special handling.

use crate::descriptor::TypeDescriptor;
use crate::error::MappingError;
use crate::mapping::TypeMapping;

/// Supplies the mapping for any type the resolver does not special-case.
///
/// Implementations are shared across threads alongside the resolver and
/// must be safe to call concurrently.
pub trait FallbackResolver: Send + Sync {
    fn resolve(&self, descriptor: &TypeDescriptor) -> Result<TypeMapping, MappingError>;
}

impl<F> FallbackResolver for F
where
    F: Fn(&TypeDescriptor) -> Result<TypeMapping, MappingError> + Send + Sync,
{
    fn resolve(&self, descriptor: &TypeDescriptor) -> Result<TypeMapping, MappingError> {
        self(descriptor)
    }
}

/// A catalog that knows no types: every lookup is [`MappingError::Unmapped`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmappedFallback;

impl FallbackResolver for UnmappedFallback {
    fn resolve(&self, descriptor: &TypeDescriptor) -> Result<TypeMapping, MappingError> {
        Err(MappingError::unmapped(descriptor.qualified_name()))
    }
}
