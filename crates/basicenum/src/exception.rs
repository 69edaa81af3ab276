//! Error classification and the errors raised while building and using enum types.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::object::Object;

/// Result type alias for every fallible enum operation.
pub type EnumResult<T> = Result<T, EnumError>;

/// Python exception classes that enum operations can raise.
///
/// The string form matches the Python class name exactly
/// (e.g. `ValueError` -> "ValueError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ExcType {
    /// Base class; usable by generation hooks that do not care about the category.
    Exception,
    /// Base class of `KeyError`.
    LookupError,
    /// Lookup by name failed.
    KeyError,
    /// Lookup by value failed, or a duplicate value was found.
    ValueError,
    /// A value could not be used as a cache key.
    TypeError,
    /// A type referenced by a serialized member could not be found.
    AttributeError,
    /// Generic failure raised from a generation hook.
    RuntimeError,
}

impl ExcType {
    /// Returns true if `self` would be caught by `except handler:`.
    #[must_use]
    pub fn is_subclass_of(self, handler: Self) -> bool {
        if self == handler {
            return true;
        }
        match handler {
            Self::Exception => true,
            Self::LookupError => matches!(self, Self::KeyError),
            _ => false,
        }
    }
}

/// Error raised by a caller-supplied value generation hook.
///
/// The constructor never wraps, rewrites or suppresses it: the same value
/// reaches the caller inside [`EnumError::Hook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookError {
    exc_type: ExcType,
    arg: Option<String>,
}

impl HookError {
    /// Creates a hook error without a message.
    #[must_use]
    pub fn new(exc_type: ExcType) -> Self {
        Self { exc_type, arg: None }
    }

    /// Creates a hook error with a message.
    #[must_use]
    pub fn new_msg(exc_type: ExcType, arg: impl fmt::Display) -> Self {
        Self {
            exc_type,
            arg: Some(arg.to_string()),
        }
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}: {arg}", self.exc_type),
            None => write!(f, "{}", self.exc_type),
        }
    }
}

impl std::error::Error for HookError {}

/// Error type for enum construction, lookup and serialization.
///
/// Variants keep the offending name or value so callers can report failures
/// precisely without parsing messages. [`EnumError::exc_type`] gives the Python
/// exception class each failure corresponds to.
#[derive(Debug)]
pub enum EnumError {
    /// Construction-by-value found no member with an equal value.
    ValueNotFound {
        /// Name of the enum type that was searched.
        type_name: String,
        /// The value that was looked up.
        value: Object,
    },
    /// Lookup by name found no member.
    NameNotFound {
        /// Name of the enum type that was searched.
        type_name: String,
        /// The missing member name.
        name: String,
    },
    /// The uniqueness guard found a value shared by two members.
    DuplicateValue {
        /// `repr()` of the offending type.
        type_repr: String,
        /// The repeated value.
        value: Object,
    },
    /// A lookup value cannot act as a cache key.
    Unhashable {
        /// Python type name of the unhashable part of the value.
        type_name: &'static str,
    },
    /// A generation hook failed; carried unchanged.
    Hook(HookError),
    /// A serialized member named a type that is not registered.
    UnknownType {
        /// Module of the missing type, if it had one.
        module: Option<String>,
        /// Qualified name of the missing type.
        qualname: String,
    },
    /// Serialized member bytes could not be decoded or encoded.
    Codec(postcard::Error),
}

impl EnumError {
    /// Returns the Python exception class for this error.
    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        match self {
            Self::ValueNotFound { .. } | Self::DuplicateValue { .. } | Self::Codec(_) => ExcType::ValueError,
            Self::NameNotFound { .. } => ExcType::KeyError,
            Self::Unhashable { .. } => ExcType::TypeError,
            Self::Hook(err) => err.exc_type(),
            Self::UnknownType { .. } => ExcType::AttributeError,
        }
    }

    /// Writes the exception message, without the class prefix.
    fn message_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueNotFound { value, .. } => write!(f, "no enum member with a value of {}", value.py_repr()),
            Self::NameNotFound { name, .. } => write!(f, "{}", Object::from(name.as_str()).py_repr()),
            Self::DuplicateValue { type_repr, value } => {
                write!(f, "{type_repr} enum reused {}", value.py_repr())
            }
            Self::Unhashable { type_name } => write!(f, "unhashable type: '{type_name}'"),
            Self::Hook(err) => match err.arg() {
                Some(arg) => f.write_str(arg),
                None => Ok(()),
            },
            Self::UnknownType { module, qualname } => match module {
                Some(module) => write!(f, "Can't get attribute '{qualname}' on module '{module}'"),
                None => write!(f, "Can't get attribute '{qualname}'"),
            },
            Self::Codec(err) => write!(f, "malformed member reference: {err}"),
        }
    }
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Hook(err) = self {
            return write!(f, "{err}");
        }
        write!(f, "{}: ", self.exc_type())?;
        self.message_fmt(f)
    }
}

impl std::error::Error for EnumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Hook(err) => Some(err),
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HookError> for EnumError {
    fn from(error: HookError) -> Self {
        Self::Hook(error)
    }
}

impl From<postcard::Error> for EnumError {
    fn from(error: postcard::Error) -> Self {
        Self::Codec(error)
    }
}
