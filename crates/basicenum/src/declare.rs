//! Declaration-side values: the `auto()` marker and value generation hooks.
//!
//! A class namespace maps names to [`Declared`] values. Everything except
//! [`Declared::Auto`] is a concrete [`Object`]; the auto marker only exists
//! until the type constructor replaces it with a real value.

use std::{fmt, rc::Rc};

use num_bigint::BigInt;

use crate::{exception::HookError, object::Object};

/// A value as written in a class body, before auto values are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Declared {
    /// A concrete value.
    Value(Object),
    /// "Assign the next auto value here."
    Auto,
}

/// Returns the auto marker.
///
/// ```
/// use basicenum::{Declared, EnumBuilder, Object, auto};
///
/// let ty = EnumBuilder::new("Enum")
///     .member("v1", auto())
///     .member("v2", 5)
///     .member("v3", auto())
///     .build()
///     .unwrap();
/// assert_eq!(ty.get("v3").unwrap().value(), &Object::Int(6));
/// assert_eq!(auto(), Declared::Auto);
/// ```
#[must_use]
pub fn auto() -> Declared {
    Declared::Auto
}

macro_rules! declared_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Declared {
                fn from(value: $ty) -> Self {
                    Self::Value(Object::from(value))
                }
            }
        )*
    };
}

declared_from!(bool, i32, i64, BigInt, f64, &str, String, Vec<u8>, ());

impl From<Object> for Declared {
    fn from(value: Object) -> Self {
        Self::Value(value)
    }
}

/// Signature of a value generation hook:
/// `(name, start, index, last_values) -> value`.
type GenerateFn = dyn Fn(&str, i64, usize, &[Object]) -> Result<Object, HookError>;

/// Custom value generation hook, the `_generate_next_value_` of the type.
///
/// The hook is called once per auto-marked member with the member name, the
/// start value (always `1`), the index of the declaration among considered
/// attributes and the values of all members declared before it.
#[derive(Clone)]
pub struct ValueGenerator(Rc<GenerateFn>);

impl ValueGenerator {
    /// Wraps a fallible hook.
    pub fn new(hook: impl Fn(&str, i64, usize, &[Object]) -> Result<Object, HookError> + 'static) -> Self {
        Self(Rc::new(hook))
    }

    /// Wraps a hook that cannot fail.
    pub fn infallible(hook: impl Fn(&str, i64, usize, &[Object]) -> Object + 'static) -> Self {
        Self(Rc::new(move |name, start, index, last_values| {
            Ok(hook(name, start, index, last_values))
        }))
    }

    /// Hook that uses the member name as its value, like `StrEnum`.
    #[must_use]
    pub fn name_as_value() -> Self {
        Self::infallible(|name, _, _, _| Object::from(name))
    }

    /// Hook that lowercases the member name.
    #[must_use]
    pub fn lowercase_name() -> Self {
        Self::infallible(|name, _, _, _| Object::from(name.to_lowercase()))
    }

    pub(crate) fn call(&self, name: &str, start: i64, index: usize, last_values: &[Object]) -> Result<Object, HookError> {
        (self.0)(name, start, index, last_values)
    }
}

impl fmt::Debug for ValueGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueGenerator({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Sequential counter behind hook-less auto values.
///
/// Holds the last integer seen, whether it came from an auto marker or from an
/// explicit integer declaration.
#[derive(Debug, Clone)]
pub(crate) struct AutoCounter {
    last: Object,
}

impl AutoCounter {
    pub(crate) fn new() -> Self {
        Self { last: Object::Int(0) }
    }

    /// Issues the next auto value and remembers it.
    pub(crate) fn next_value(&mut self) -> Object {
        let next = self
            .last
            .int_successor()
            .unwrap_or_else(|| Object::from_bigint(BigInt::from(1)));
        self.last = next.clone();
        next
    }

    /// Restarts the sequence from an explicit integer.
    pub(crate) fn observe(&mut self, value: &Object) {
        if value.is_int() {
            self.last = value.clone();
        }
    }
}
