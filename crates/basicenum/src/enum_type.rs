//! Constructed enum types and the type-level protocol.
//!
//! An [`EnumType`] is a cheap handle onto an immutable [`EnumClass`]. The class
//! owns the ordered registry of member slots; [`Member`] handles point back into
//! it by index. Member handles keep their owner alive, the owner never refers
//! to its handles, so no reference cycle exists.

use std::{
    cell::RefCell,
    fmt,
    iter::FusedIterator,
    ops::Range,
    rc::Rc,
};

use ahash::AHashMap;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::{
    declare::ValueGenerator,
    exception::{EnumError, EnumResult},
    member::Member,
    object::Object,
};

/// Ordered name -> value storage shared by the registry and class attributes.
pub(crate) type Registry = IndexMap<String, Object, ahash::RandomState>;

/// Declared bases of a type, in declaration order.
pub(crate) type Bases = SmallVec<[BaseType; 2]>;

/// Immutable state of a constructed enum type.
pub(crate) struct EnumClass {
    pub(crate) name: String,
    pub(crate) qualname: String,
    pub(crate) module: Option<String>,
    pub(crate) bases: Bases,
    /// Effective generation hook: local, or inherited from the first base that has one.
    pub(crate) generator: Option<ValueGenerator>,
    /// Member slots in declaration order. Slot index is the member's identity.
    pub(crate) registry: Registry,
    /// Underscore-prefixed attributes that did not become members.
    pub(crate) attributes: Registry,
    /// Memoized construct-by-value results: value -> slot index.
    ///
    /// Only ever grows. Misses are not cached, and since a NaN never matches
    /// a member it never becomes a key.
    pub(crate) value_cache: RefCell<AHashMap<Object, usize>>,
}

/// Handle onto a constructed enum type.
///
/// Cloning the handle is cheap and preserves identity: two handles are equal
/// iff they refer to the same constructed type.
#[derive(Clone)]
pub struct EnumType(Rc<EnumClass>);

impl EnumType {
    pub(crate) fn from_class(class: EnumClass) -> Self {
        Self(Rc::new(class))
    }

    /// The type's `__name__`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type's `__qualname__`.
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.0.qualname
    }

    /// The type's `__module__`, if it has one.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.0.module.as_deref()
    }

    #[must_use]
    pub fn bases(&self) -> &[BaseType] {
        &self.0.bases
    }

    /// The effective value generation hook, if any.
    #[must_use]
    pub fn generator(&self) -> Option<&ValueGenerator> {
        self.0.generator.as_ref()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.registry.is_empty()
    }

    /// Iterates over members in declaration order.
    ///
    /// Each call starts a fresh iteration.
    #[must_use]
    pub fn iter(&self) -> Members<'_> {
        Members {
            owner: self,
            slots: 0..self.len(),
        }
    }

    /// Iterates over member values in declaration order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Object> {
        self.0.registry.values()
    }

    /// Returns the member whose value equals `value` (`Enum(value)`).
    ///
    /// Results are memoized per distinct value for the lifetime of the type.
    pub fn call(&self, value: impl Into<Object>) -> EnumResult<Member> {
        self.call_value(&value.into())
    }

    /// Like [`EnumType::call`], borrowing the lookup value.
    pub fn call_value(&self, value: &Object) -> EnumResult<Member> {
        if let Some(unhashable) = value.first_unhashable() {
            return Err(EnumError::Unhashable {
                type_name: unhashable.type_name(),
            });
        }

        let cached = self.0.value_cache.borrow().get(value).copied();
        if let Some(slot) = cached {
            return Ok(Member::new(self.clone(), slot));
        }

        let Some(slot) = self.0.registry.values().position(|candidate| candidate.py_eq(value)) else {
            return Err(EnumError::ValueNotFound {
                type_name: self.0.name.clone(),
                value: value.clone(),
            });
        };
        self.0.value_cache.borrow_mut().insert(value.clone(), slot);
        Ok(Member::new(self.clone(), slot))
    }

    /// Returns the member called `name` (`Enum[name]`).
    pub fn get(&self, name: &str) -> EnumResult<Member> {
        self.member(name).ok_or_else(|| EnumError::NameNotFound {
            type_name: self.0.name.clone(),
            name: name.to_owned(),
        })
    }

    /// Named attribute access for members (`Enum.NAME`).
    #[must_use]
    pub fn member(&self, name: &str) -> Option<Member> {
        self.0
            .registry
            .get_index_of(name)
            .map(|slot| Member::new(self.clone(), slot))
    }

    /// Returns a class attribute that did not become a member.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Object> {
        self.0.attributes.get(name)
    }

    /// Snapshot of the `__members__` mapping.
    #[must_use]
    pub fn members(&self) -> IndexMap<&str, Member> {
        self.0
            .registry
            .keys()
            .enumerate()
            .map(|(slot, name)| (name.as_str(), Member::new(self.clone(), slot)))
            .collect()
    }

    /// Returns true if `member` belongs to exactly this type.
    #[must_use]
    pub fn contains(&self, member: &Member) -> bool {
        self.ptr_eq(member.owner())
    }

    /// Type-identity test, `isinstance(member, Enum)`.
    #[must_use]
    pub fn is_instance(&self, member: &Member) -> bool {
        self.contains(member)
    }

    /// `issubclass(self, base)`: true for the type itself and every reachable base.
    #[must_use]
    pub fn is_subclass(&self, base: &BaseType) -> bool {
        if let BaseType::Enum(ty) = base
            && self.ptr_eq(ty)
        {
            return true;
        }
        self.0.bases.iter().any(|own| {
            own == base
                || match own {
                    BaseType::Enum(ty) => ty.is_subclass(base),
                    BaseType::Mixin(_) => false,
                }
        })
    }

    /// Returns true when both handles refer to the same type.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn slot_name(&self, slot: usize) -> &str {
        self.0.registry.get_index(slot).map_or("", |(name, _)| name.as_str())
    }

    pub(crate) fn slot_value(&self, slot: usize) -> &Object {
        const MISSING: &Object = &Object::None;
        self.0.registry.get_index(slot).map_or(MISSING, |(_, value)| value)
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EnumType {}

impl fmt::Display for EnumType {
    /// Matches the default `repr()` of a class: `<class 'module.qualname'>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.module() {
            Some(module) => write!(f, "<class '{module}.{}'>", self.qualname()),
            None => write!(f, "<class '{}'>", self.qualname()),
        }
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("qualname", &self.0.qualname)
            .field("module", &self.0.module)
            .field("members", &self.0.registry)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a EnumType {
    type Item = Member;
    type IntoIter = Members<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of an [`EnumType`] in declaration order.
#[derive(Debug, Clone)]
pub struct Members<'a> {
    owner: &'a EnumType,
    slots: Range<usize>,
}

impl Iterator for Members<'_> {
    type Item = Member;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().map(|slot| Member::new(self.owner.clone(), slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Members<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back().map(|slot| Member::new(self.owner.clone(), slot))
    }
}

impl ExactSizeIterator for Members<'_> {}

impl FusedIterator for Members<'_> {}

/// A plain (non-enum) base type.
///
/// Mixins take part in `is_subclass` checks and can carry a value generation
/// hook for the enums that extend them.
#[derive(Clone)]
pub struct Mixin(Rc<MixinClass>);

struct MixinClass {
    name: String,
    generator: Option<ValueGenerator>,
}

impl Mixin {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Rc::new(MixinClass {
            name: name.into(),
            generator: None,
        }))
    }

    /// A mixin that supplies a value generation hook to its subclasses.
    #[must_use]
    pub fn with_generator(name: impl Into<String>, generator: ValueGenerator) -> Self {
        Self(Rc::new(MixinClass {
            name: name.into(),
            generator: Some(generator),
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn generator(&self) -> Option<&ValueGenerator> {
        self.0.generator.as_ref()
    }
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixin")
            .field("name", &self.0.name)
            .field("generator", &self.0.generator)
            .finish()
    }
}

/// A base type an enum can extend.
#[derive(Debug, Clone)]
pub enum BaseType {
    /// Another constructed enum type.
    Enum(EnumType),
    /// A plain base type.
    Mixin(Mixin),
}

impl BaseType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Enum(ty) => ty.name(),
            Self::Mixin(mixin) => mixin.name(),
        }
    }

    /// The hook this base provides to subclasses, inherited ones included.
    #[must_use]
    pub fn generator(&self) -> Option<&ValueGenerator> {
        match self {
            Self::Enum(ty) => ty.generator(),
            Self::Mixin(mixin) => mixin.generator(),
        }
    }
}

impl PartialEq for BaseType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Enum(a), Self::Enum(b)) => a.ptr_eq(b),
            (Self::Mixin(a), Self::Mixin(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl Eq for BaseType {}

impl From<EnumType> for BaseType {
    fn from(ty: EnumType) -> Self {
        Self::Enum(ty)
    }
}

impl From<&EnumType> for BaseType {
    fn from(ty: &EnumType) -> Self {
        Self::Enum(ty.clone())
    }
}

impl From<Mixin> for BaseType {
    fn from(mixin: Mixin) -> Self {
        Self::Mixin(mixin)
    }
}

impl From<&Mixin> for BaseType {
    fn from(mixin: &Mixin) -> Self {
        Self::Mixin(mixin.clone())
    }
}
