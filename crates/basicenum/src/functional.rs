//! Functional creation of enum types, the `Enum("Name", "A B C")` form.

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::{
    builder::EnumBuilder,
    declare::Declared,
    enum_type::{BaseType, EnumType},
    exception::EnumResult,
    object::Object,
};

/// The member declarations accepted by [`create`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemberSpec {
    /// Names separated by commas and/or whitespace, valued `start`, `start + 1`, ...
    Names(String),
    /// A sequence of names, valued like [`MemberSpec::Names`].
    NameList(Vec<String>),
    /// Explicit (name, value) pairs.
    Pairs(Vec<(String, Declared)>),
    /// An ordered name -> value mapping, used as the namespace directly.
    Mapping(IndexMap<String, Declared>),
}

impl MemberSpec {
    /// Resolves the declarations to an ordered namespace.
    ///
    /// Repeated names keep their first position and their last value.
    fn into_namespace(self, start: i64) -> IndexMap<String, Declared> {
        match self {
            Self::Names(names) => sequential(names.replace(',', " ").split_whitespace().map(str::to_owned), start),
            Self::NameList(names) => sequential(names, start),
            Self::Pairs(pairs) => pairs.into_iter().collect(),
            Self::Mapping(mapping) => mapping,
        }
    }
}

fn sequential(names: impl IntoIterator<Item = String>, start: i64) -> IndexMap<String, Declared> {
    names
        .into_iter()
        .enumerate()
        .map(|(offset, name)| (name, Declared::Value(nth_value(start, offset))))
        .collect()
}

/// `start + offset`, promoted to a big integer when it leaves the i64 range.
fn nth_value(start: i64, offset: usize) -> Object {
    i64::try_from(offset)
        .ok()
        .and_then(|offset| start.checked_add(offset))
        .map_or_else(|| Object::from_bigint(BigInt::from(start) + offset), Object::Int)
}

impl From<&str> for MemberSpec {
    fn from(names: &str) -> Self {
        Self::Names(names.to_owned())
    }
}

impl From<String> for MemberSpec {
    fn from(names: String) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for MemberSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::NameList(names.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<String>> for MemberSpec {
    fn from(names: Vec<String>) -> Self {
        Self::NameList(names)
    }
}

impl<const N: usize> From<[&str; N]> for MemberSpec {
    fn from(names: [&str; N]) -> Self {
        Self::NameList(names.into_iter().map(str::to_owned).collect())
    }
}

impl<V: Into<Declared>> From<Vec<(&str, V)>> for MemberSpec {
    fn from(pairs: Vec<(&str, V)>) -> Self {
        Self::Pairs(pairs.into_iter().map(|(name, value)| (name.to_owned(), value.into())).collect())
    }
}

impl<V: Into<Declared>> From<Vec<(String, V)>> for MemberSpec {
    fn from(pairs: Vec<(String, V)>) -> Self {
        Self::Pairs(pairs.into_iter().map(|(name, value)| (name, value.into())).collect())
    }
}

impl<V: Into<Declared>, const N: usize> From<[(&str, V); N]> for MemberSpec {
    fn from(pairs: [(&str, V); N]) -> Self {
        Self::Pairs(pairs.into_iter().map(|(name, value)| (name.to_owned(), value.into())).collect())
    }
}

impl<V: Into<Declared>> From<IndexMap<String, V>> for MemberSpec {
    fn from(mapping: IndexMap<String, V>) -> Self {
        Self::Mapping(mapping.into_iter().map(|(name, value)| (name, value.into())).collect())
    }
}

impl<V: Into<Declared>> From<IndexMap<&str, V>> for MemberSpec {
    fn from(mapping: IndexMap<&str, V>) -> Self {
        Self::Mapping(
            mapping
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value.into()))
                .collect(),
        )
    }
}

/// Keyword options of [`create`].
#[derive(Debug, Clone)]
pub struct CreateOptions {
    module: Option<String>,
    qualname: Option<String>,
    base: Option<BaseType>,
    start: i64,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            module: None,
            qualname: None,
            base: None,
            start: 1,
        }
    }
}

impl CreateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Module label of the new type.
    ///
    /// An empty label still prefixes the default qualname but is not stored
    /// as the type's module.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Qualified name, used verbatim.
    #[must_use]
    pub fn qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = Some(qualname.into());
        self
    }

    /// Single base type of the new enum.
    #[must_use]
    pub fn base(mut self, base: impl Into<BaseType>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// First value for name-only member specs.
    #[must_use]
    pub fn start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }
}

/// Creates an enum type without class-body syntax.
///
/// ```
/// use basicenum::{CreateOptions, Object, create};
///
/// let animal = create("Animal", "ANT BEE, CAT", CreateOptions::new().start(0)).unwrap();
/// assert_eq!(animal.get("CAT").unwrap().value(), &Object::Int(2));
/// ```
///
/// The qualified name is `qualname` if given, else `"{module}.{name}"` if a
/// module was given, else `name`.
pub fn create(enum_name: &str, members: impl Into<MemberSpec>, options: CreateOptions) -> EnumResult<EnumType> {
    let CreateOptions {
        module,
        qualname,
        base,
        start,
    } = options;
    let qualname = match (qualname, &module) {
        (Some(qualname), _) => qualname,
        (None, Some(module)) => format!("{module}.{enum_name}"),
        (None, None) => enum_name.to_owned(),
    };
    let module = module.filter(|module| !module.is_empty());

    let mut builder = EnumBuilder::new(enum_name)
        .qualname(qualname)
        .members(members.into().into_namespace(start));
    if let Some(module) = module {
        builder = builder.module(module);
    }
    if let Some(base) = base {
        builder = builder.base(base);
    }
    builder.build()
}
