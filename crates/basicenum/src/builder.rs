//! The type constructor.
//!
//! [`EnumBuilder`] plays the role of a class body plus its metaclass: it
//! collects an ordered namespace and bases, then turns them into an
//! [`EnumType`] whose registry holds one slot per non-underscore attribute.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::{
    declare::{AutoCounter, Declared, ValueGenerator},
    enum_type::{BaseType, Bases, EnumClass, EnumType, Registry},
    exception::EnumResult,
    object::Object,
    tracer::{ConstructionTracer, NoopTracer, ValueOrigin},
    unique::unique_traced,
};

/// Start value passed to generation hooks.
const HOOK_START: i64 = 1;

/// Builds a new enum type from an ordered namespace.
///
/// Declaring the same name twice replaces the earlier value but keeps its
/// original position, the way a class body namespace does.
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    name: String,
    qualname: Option<String>,
    module: Option<String>,
    bases: Bases,
    generator: Option<ValueGenerator>,
    namespace: IndexMap<String, Declared>,
    unique: bool,
}

impl EnumBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualname: None,
            module: None,
            bases: Bases::new(),
            generator: None,
            namespace: IndexMap::new(),
            unique: false,
        }
    }

    /// Sets `__module__`.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Sets `__qualname__`. Defaults to the type name.
    #[must_use]
    pub fn qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = Some(qualname.into());
        self
    }

    /// Appends a base type.
    #[must_use]
    pub fn base(mut self, base: impl Into<BaseType>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Defines `_generate_next_value_` on the type being built.
    #[must_use]
    pub fn generate_next_value(mut self, generator: ValueGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Declares an attribute. Names starting with `_` stay plain class attributes.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Declared>) -> Self {
        self.namespace.insert(name.into(), value.into());
        self
    }

    /// Declares several attributes in order.
    #[must_use]
    pub fn members<N, V>(mut self, members: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Declared>,
    {
        self.namespace
            .extend(members.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Runs the uniqueness guard on the finished type.
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Constructs the type.
    ///
    /// # Errors
    /// Returns [`EnumError::Hook`](crate::EnumError::Hook) when a generation
    /// hook fails and [`EnumError::DuplicateValue`](crate::EnumError::DuplicateValue)
    /// when uniqueness was requested and two members share a value.
    pub fn build(self) -> EnumResult<EnumType> {
        self.build_traced(&mut NoopTracer)
    }

    /// Constructs the type, reporting each step to `tracer`.
    pub fn build_traced(self, tracer: &mut impl ConstructionTracer) -> EnumResult<EnumType> {
        let Self {
            name,
            qualname,
            module,
            bases,
            generator,
            namespace,
            unique,
        } = self;
        tracer.on_type_start(&name, bases.len());

        let generator = generator.or_else(|| bases.iter().find_map(|base| base.generator().cloned()));
        let mut registry = Registry::with_capacity_and_hasher(namespace.len(), ahash::RandomState::new());
        let mut attributes = Registry::default();
        let mut counter = AutoCounter::new();

        for (attr, declared) in namespace {
            if attr.starts_with('_') {
                tracer.on_class_attribute(&attr);
                // an auto marker has no value outside the registry
                if let Declared::Value(value) = declared {
                    attributes.insert(attr, value);
                }
                continue;
            }

            let index = registry.len();
            let (value, origin) = match declared {
                Declared::Value(value) => {
                    counter.observe(&value);
                    (value, ValueOrigin::Explicit)
                }
                Declared::Auto => match &generator {
                    None => (counter.next_value(), ValueOrigin::AutoIncrement),
                    Some(hook) => {
                        let last_values: Vec<Object> = registry.values().cloned().collect();
                        tracer.on_generator_call(&attr, HOOK_START, index, &last_values);
                        (hook.call(&attr, HOOK_START, index, &last_values)?, ValueOrigin::Generated)
                    }
                },
            };
            tracer.on_member(&attr, &value, origin, index);
            registry.insert(attr, value);
        }

        let member_count = registry.len();
        let ty = EnumType::from_class(EnumClass {
            qualname: qualname.unwrap_or_else(|| name.clone()),
            name,
            module,
            bases,
            generator,
            registry,
            attributes,
            value_cache: RefCell::default(),
        });
        tracer.on_type_complete(ty.name(), member_count);

        if unique {
            unique_traced(&ty, tracer)
        } else {
            Ok(ty)
        }
    }
}

/// Declares an enum type with class-body syntax.
///
/// ```
/// use basicenum::{Object, auto, declare_enum};
///
/// let color = declare_enum! {
///     Color {
///         RED = 1,
///         GREEN = auto(),
///         _ignore_ = "not a member",
///     }
/// }
/// .unwrap();
/// assert_eq!(color.get("GREEN").unwrap().value(), &Object::Int(2));
/// assert_eq!(color.len(), 2);
/// ```
///
/// Bases go in parentheses after the name, and a leading `#[unique]` runs the
/// uniqueness guard:
///
/// ```
/// use basicenum::{Mixin, ValueGenerator, auto, declare_enum};
///
/// let named = Mixin::with_generator("Named", ValueGenerator::name_as_value());
/// let err = declare_enum! {
///     #[unique]
///     Dup(named) {
///         A = "B",
///         B = auto(),
///     }
/// }
/// .unwrap_err();
/// assert_eq!(err.to_string(), "ValueError: <class 'Dup'> enum reused 'B'");
/// ```
#[macro_export]
macro_rules! declare_enum {
    (#[unique] $name:ident $(( $($base:expr),* $(,)? ))? { $($member:ident = $value:expr),* $(,)? }) => {
        $crate::EnumBuilder::new(stringify!($name))
            $($(.base($base))*)?
            $(.member(stringify!($member), $value))*
            .unique(true)
            .build()
    };
    ($name:ident $(( $($base:expr),* $(,)? ))? { $($member:ident = $value:expr),* $(,)? }) => {
        $crate::EnumBuilder::new(stringify!($name))
            $($(.base($base))*)?
            $(.member(stringify!($member), $value))*
            .build()
    };
}
