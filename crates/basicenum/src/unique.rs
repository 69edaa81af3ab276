//! The `@unique` guard against aliased member values.

use ahash::AHashSet;

use crate::{
    enum_type::EnumType,
    exception::{EnumError, EnumResult},
    object::Object,
    tracer::{ConstructionTracer, NoopTracer},
};

/// Ensures no two members of `ty` share a value.
///
/// Returns the same type on success so it can be used inline, like the
/// `@unique` decorator.
///
/// # Errors
/// [`EnumError::DuplicateValue`] naming the first value, in declaration order,
/// that equals an earlier one.
pub fn unique(ty: &EnumType) -> EnumResult<EnumType> {
    unique_traced(ty, &mut NoopTracer)
}

pub(crate) fn unique_traced(ty: &EnumType, tracer: &mut impl ConstructionTracer) -> EnumResult<EnumType> {
    let duplicate = first_duplicate(ty);
    tracer.on_unique_check(ty.name(), duplicate);
    match duplicate {
        Some(value) => Err(EnumError::DuplicateValue {
            type_repr: ty.to_string(),
            value: value.clone(),
        }),
        None => Ok(ty.clone()),
    }
}

/// Values unequal to themselves (NaN, or containers holding one) never alias.
fn first_duplicate(ty: &EnumType) -> Option<&Object> {
    let mut seen = AHashSet::with_capacity(ty.len());
    ty.values().find(|value| value.py_eq(value) && !seen.insert(*value))
}
