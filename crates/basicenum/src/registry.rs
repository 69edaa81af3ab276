//! Identity-preserving member serialization.
//!
//! A member serializes as a [`MemberRef`]: the owning type's module and
//! qualified name plus the member name. Deserializing goes through a
//! [`TypeRegistry`] that maps those paths back to live types, so the result is
//! the very member that was serialized, not a copy.
//!
//! ```
//! use basicenum::{EnumBuilder, TypeRegistry};
//!
//! let color = EnumBuilder::new("Color").module("paint").member("RED", 1).build().unwrap();
//! let mut types = TypeRegistry::new();
//! types.register(&color);
//!
//! let red = color.get("RED").unwrap();
//! let bytes = red.dump().unwrap();
//! assert_eq!(types.load(&bytes).unwrap(), red);
//! ```

use ahash::AHashMap;
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeSeed, Error as _},
};

use crate::{
    enum_type::EnumType,
    exception::{EnumError, EnumResult},
    member::{Member, MemberRef},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TypePath {
    module: Option<String>,
    qualname: String,
}

impl TypePath {
    fn of(ty: &EnumType) -> Self {
        Self {
            module: ty.module().map(str::to_owned),
            qualname: ty.qualname().to_owned(),
        }
    }
}

/// Maps `(module, qualname)` to constructed enum types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: AHashMap<TypePath, EnumType>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `ty` resolvable by its module and qualified name.
    ///
    /// Returns the type previously registered under the same path, if any.
    pub fn register(&mut self, ty: &EnumType) -> Option<EnumType> {
        self.types.insert(TypePath::of(ty), ty.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a registered type.
    pub fn resolve(&self, module: Option<&str>, qualname: &str) -> EnumResult<EnumType> {
        let path = TypePath {
            module: module.map(str::to_owned),
            qualname: qualname.to_owned(),
        };
        match self.types.get(&path) {
            Some(ty) => Ok(ty.clone()),
            None => Err(EnumError::UnknownType {
                module: path.module,
                qualname: path.qualname,
            }),
        }
    }

    /// Resolves a member reference to the live member, `getattr(type, name)`.
    pub fn resolve_member(&self, reference: &MemberRef) -> EnumResult<Member> {
        self.resolve(reference.module.as_deref(), &reference.qualname)?
            .get(&reference.name)
    }

    /// Decodes postcard bytes written by [`Member::dump`].
    pub fn load(&self, bytes: &[u8]) -> EnumResult<Member> {
        let reference: MemberRef = postcard::from_bytes(bytes)?;
        self.resolve_member(&reference)
    }

    /// Seed for deserializing members with any serde format.
    #[must_use]
    pub fn seed(&self) -> MemberSeed<'_> {
        MemberSeed { registry: self }
    }
}

/// [`DeserializeSeed`] that yields live members.
#[derive(Debug, Clone, Copy)]
pub struct MemberSeed<'a> {
    registry: &'a TypeRegistry,
}

impl<'de> DeserializeSeed<'de> for MemberSeed<'_> {
    type Value = Member;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let reference = MemberRef::deserialize(deserializer)?;
        self.registry.resolve_member(&reference).map_err(D::Error::custom)
    }
}
