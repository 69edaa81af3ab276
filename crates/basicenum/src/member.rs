//! Enum members.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize, Serializer};

use crate::{enum_type::EnumType, object::Object, py_hash};

/// A single enum member.
///
/// Members are handles: the owning type holds the name and value, the member
/// holds its owner and its slot. Every lookup path (by value, by name, by
/// attribute, iteration, deserialization) returns a handle to the same slot, so
/// `==` on members is identity.
#[derive(Clone)]
pub struct Member {
    owner: EnumType,
    slot: usize,
}

impl Member {
    pub(crate) fn new(owner: EnumType, slot: usize) -> Self {
        Self { owner, slot }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.owner.slot_name(self.slot)
    }

    #[must_use]
    pub fn value(&self) -> &Object {
        self.owner.slot_value(self.slot)
    }

    /// The type this member belongs to.
    #[must_use]
    pub fn owner(&self) -> &EnumType {
        &self.owner
    }

    /// Position of the member in declaration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.slot
    }

    /// Python hash of the member: the hash of its name.
    ///
    /// Values may be unhashable, names never are.
    #[must_use]
    pub fn py_hash(&self) -> i64 {
        py_hash::hash_str(self.name())
    }

    /// `<TypeName.NAME: value_repr>`
    #[must_use]
    pub fn py_repr(&self) -> String {
        self.to_string()
    }

    /// Reduces the member to a by-name reference to its owner.
    #[must_use]
    pub fn reduce(&self) -> MemberRef {
        MemberRef {
            module: self.owner.module().map(str::to_owned),
            qualname: self.owner.qualname().to_owned(),
            name: self.name().to_owned(),
        }
    }

    /// Serializes the member reference to postcard bytes.
    pub fn dump(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.owner.ptr_eq(&other.owner)
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.py_hash());
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}: ", self.owner.name(), self.name())?;
        self.value().repr_fmt(f)?;
        f.write_str(">")
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member({self})")
    }
}

impl Serialize for Member {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reduce().serialize(serializer)
    }
}

/// Serialized form of a member: where its type lives and which member it is.
///
/// Resolved back to the live member by
/// [`TypeRegistry::resolve_member`](crate::TypeRegistry::resolve_member).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    /// `__module__` of the owning type.
    pub module: Option<String>,
    /// `__qualname__` of the owning type.
    pub qualname: String,
    /// Member name.
    pub name: String,
}
