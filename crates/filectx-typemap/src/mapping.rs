//! The resolution result.

use crate::comparer::SharedComparer;
use crate::descriptor::TypeDescriptor;
use crate::value::StoredValue;
use std::cmp::Ordering;
use std::sync::Arc;

/// How values of one type are stored and compared.
///
/// Each comparer slot is either absent (the value's natural semantics apply)
/// or a structural comparer. Built once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    subject: TypeDescriptor,
    equality: Option<SharedComparer>,
    ordering: Option<SharedComparer>,
    snapshot: Option<SharedComparer>,
}

impl TypeMapping {
    /// All slots absent.
    pub fn plain(subject: &TypeDescriptor) -> Self {
        Self::new(subject, None, None, None)
    }

    /// One comparer instance shared by all three roles.
    pub fn structural(subject: &TypeDescriptor, comparer: SharedComparer) -> Self {
        Self::new(
            subject,
            Some(Arc::clone(&comparer)),
            Some(Arc::clone(&comparer)),
            Some(comparer),
        )
    }

    pub fn new(
        subject: &TypeDescriptor,
        equality: Option<SharedComparer>,
        ordering: Option<SharedComparer>,
        snapshot: Option<SharedComparer>,
    ) -> Self {
        Self {
            subject: subject.clone(),
            equality,
            ordering,
            snapshot,
        }
    }

    pub fn subject(&self) -> &TypeDescriptor {
        &self.subject
    }

    pub fn equality_comparer(&self) -> Option<&SharedComparer> {
        self.equality.as_ref()
    }

    pub fn ordering_comparer(&self) -> Option<&SharedComparer> {
        self.ordering.as_ref()
    }

    pub fn snapshot_comparer(&self) -> Option<&SharedComparer> {
        self.snapshot.as_ref()
    }

    pub fn is_plain(&self) -> bool {
        self.equality.is_none() && self.ordering.is_none() && self.snapshot.is_none()
    }

    /// Whether all three slots hold the very same comparer instance.
    pub fn shares_one_comparer(&self) -> bool {
        match (&self.equality, &self.ordering, &self.snapshot) {
            (Some(eq), Some(ord), Some(snap)) => Arc::ptr_eq(eq, ord) && Arc::ptr_eq(eq, snap),
            _ => false,
        }
    }

    pub fn values_equal(&self, left: &StoredValue, right: &StoredValue) -> bool {
        match &self.equality {
            Some(comparer) => comparer.equals(left, right),
            None => left.natural_eq(right),
        }
    }

    pub fn compare_values(&self, left: &StoredValue, right: &StoredValue) -> Ordering {
        match &self.ordering {
            Some(comparer) => comparer.compare(left, right),
            None => left.natural_cmp(right),
        }
    }

    pub fn snapshot_value(&self, value: &StoredValue) -> StoredValue {
        match &self.snapshot {
            Some(comparer) => comparer.snapshot(value),
            None => value.clone(),
        }
    }
}
