use std::{
    cmp::Ordering,
    fmt::{self, Write},
    hash::{Hash, Hasher},
};

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::py_hash;

/// A Python value usable as an enum member value or as a lookup key.
///
/// `Object` owns all of its data and is immutable once built, which is what
/// lets it double as the key of a type's value cache.
///
/// # Equality
///
/// Equality follows Python rather than Rust structural equality:
/// numbers compare by value across `Bool`, `Int`, `BigInt` and `Float`
/// (`1 == 1.0 == True`), everything else compares within its own variant.
/// Floats compare by bit pattern so that the relation stays reflexive and
/// agrees with [`Hash`]. [`Object::py_eq`] is the Python `==` proper, under
/// which NaN equals nothing, itself included.
///
/// # Hashability
///
/// The Rust `Hash` impl is total so `Object` can always live in Rust maps,
/// and it agrees with [`Object::py_hash`] wherever Python would hash the value.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Object {
    /// Python's `None` singleton.
    #[serde(alias = "none", alias = "NoneType")]
    None,
    /// Python boolean, an integer subtype in Python.
    #[serde(alias = "bool")]
    Bool(bool),
    /// Python integer (64-bit signed).
    #[serde(alias = "int")]
    Int(i64),
    /// Python integer that does not fit in 64 bits.
    BigInt(BigInt),
    /// Python float (64-bit IEEE 754).
    #[serde(alias = "float")]
    Float(f64),
    /// Python string.
    #[serde(alias = "str")]
    String(String),
    /// Python bytes.
    #[serde(alias = "bytes")]
    Bytes(Vec<u8>),
    /// Python tuple.
    #[serde(alias = "tuple")]
    Tuple(Vec<Self>),
    /// Python list. Valid as a member value, unhashable as a lookup key.
    #[serde(alias = "list")]
    List(Vec<Self>),
}

impl Object {
    /// Builds an integer object, demoting to `Int` when the value fits in `i64`.
    #[must_use]
    pub fn from_bigint(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Self::Int(small),
            None => Self::BigInt(value),
        }
    }

    /// Returns the Python type name (`type(x).__name__`).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::BigInt(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
        }
    }

    /// Returns `true` for values Python treats as `int` instances, `bool` included.
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Int(_) | Self::BigInt(_))
    }

    /// Returns `self + 1` for integer objects, promoting to `BigInt` on overflow.
    ///
    /// Returns `None` for non-integer objects.
    #[must_use]
    pub fn int_successor(&self) -> Option<Self> {
        match self {
            Self::Bool(flag) => Some(Self::Int(i64::from(*flag) + 1)),
            Self::Int(value) => Some(
                value
                    .checked_add(1)
                    .map_or_else(|| Self::BigInt(BigInt::from(*value) + 1), Self::Int),
            ),
            Self::BigInt(value) => Some(Self::from_bigint(value + 1)),
            _ => None,
        }
    }

    /// Finds the first value nested in `self` that makes it unhashable.
    ///
    /// Lists are mutable and therefore unhashable, as is any tuple containing one.
    pub(crate) fn first_unhashable(&self) -> Option<&Self> {
        match self {
            Self::List(_) => Some(self),
            Self::Tuple(items) => items.iter().find_map(Self::first_unhashable),
            _ => None,
        }
    }

    /// Python `==`.
    ///
    /// Agrees with `PartialEq` except that a NaN float is unequal to every
    /// value, so `nan == nan` and `(nan,) == (nan,)` are both false.
    #[must_use]
    pub fn py_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Tuple(a), Self::Tuple(b)) | (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y))
            }
            _ => !self.is_nan() && !other.is_nan() && self == other,
        }
    }

    fn is_nan(&self) -> bool {
        matches!(self, Self::Float(value) if value.is_nan())
    }

    /// Returns the CPython (`PYTHONHASHSEED=0`) hash of this value.
    ///
    /// Returns `None` when the value is unhashable in Python.
    #[must_use]
    pub fn py_hash(&self) -> Option<i64> {
        let hash = match self {
            // CPython hashes None by address; a fixed lane keeps ours stable.
            Self::None => 0x0FCA_8642_0000_0000,
            Self::Bool(flag) => i64::from(*flag),
            Self::Int(value) => py_hash::hash_int(*value),
            Self::BigInt(value) => py_hash::hash_bigint(value),
            Self::Float(value) => py_hash::hash_float(*value),
            Self::String(value) => py_hash::hash_str(value),
            Self::Bytes(value) => py_hash::hash_bytes(value),
            Self::Tuple(items) => {
                let lanes = items.iter().map(Self::py_hash).collect::<Option<Vec<_>>>()?;
                py_hash::hash_tuple(lanes.into_iter())
            }
            Self::List(_) => return None,
        };
        Some(hash)
    }

    /// Returns the Python `repr()` of this value.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.repr_fmt(&mut out);
        out
    }

    pub(crate) fn repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(value) => write!(f, "{value}"),
            Self::BigInt(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&float_repr(*value)),
            Self::String(value) => string_repr_fmt(value, f),
            Self::Bytes(value) => bytes_repr_fmt(value, f),
            Self::Tuple(items) => {
                f.write_char('(')?;
                write_items(items, f)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::List(items) => {
                f.write_char('[')?;
                write_items(items, f)?;
                f.write_char(']')
            }
        }
    }

    /// Numeric view used for cross-type equality.
    fn as_number(&self) -> Option<Number<'_>> {
        match self {
            Self::Bool(flag) => Some(Number::Int(i64::from(*flag))),
            Self::Int(value) => Some(Number::Int(*value)),
            Self::BigInt(value) => Some(Number::Big(value)),
            Self::Float(value) => Some(Number::Float(*value)),
            _ => None,
        }
    }
}

/// Borrowed numeric view of an [`Object`].
#[derive(Clone, Copy)]
enum Number<'a> {
    Int(i64),
    Big(&'a BigInt),
    Float(f64),
}

impl Number<'_> {
    fn num_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Big(a), Self::Big(b)) => a == b,
            (Self::Int(a), Self::Big(b)) | (Self::Big(b), Self::Int(a)) => BigInt::from(a) == *b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits() || a == b,
            (Self::Float(f), Self::Int(i)) | (Self::Int(i), Self::Float(f)) => {
                float_int_cmp(f, &BigInt::from(i)) == Some(Ordering::Equal)
            }
            (Self::Float(f), Self::Big(b)) | (Self::Big(b), Self::Float(f)) => {
                float_int_cmp(f, b) == Some(Ordering::Equal)
            }
        }
    }
}

/// Compares a float against an integer exactly, without lossy conversion.
fn float_int_cmp(float: f64, int: &BigInt) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float.is_infinite() {
        return Some(if float > 0.0 { Ordering::Greater } else { Ordering::Less });
    }
    if float.fract() != 0.0 {
        return None;
    }
    BigInt::from_f64(float).map(|as_int| as_int.cmp(int))
}

fn write_items(items: &[Object], f: &mut impl Write) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(first) = iter.next() {
        first.repr_fmt(f)?;
        for item in iter {
            f.write_str(", ")?;
            item.repr_fmt(f)?;
        }
    }
    Ok(())
}

/// Formats a string the way Python's `repr()` does, including quote selection.
pub(crate) fn string_repr_fmt(value: &str, f: &mut impl Write) -> fmt::Result {
    let quote = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for ch in value.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(f, "\\x{:02x}", c as u32)?,
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    write!(f, "\\x{code:02x}")?;
                } else {
                    write!(f, "\\u{code:04x}")?;
                }
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn bytes_repr_fmt(value: &[u8], f: &mut impl Write) -> fmt::Result {
    let quote = if value.contains(&b'\'') && !value.contains(&b'"') { '"' } else { '\'' };
    f.write_char('b')?;
    f.write_char(quote)?;
    for &byte in value {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if char::from(b) == quote => {
                f.write_char('\\')?;
                f.write_char(quote)?;
            }
            0x20..=0x7e => f.write_char(char::from(byte))?,
            _ => write!(f, "\\x{byte:02x}")?,
        }
    }
    f.write_char(quote)
}

/// Formats a float like CPython's `repr()`.
///
/// `ryu` yields the shortest round-tripping digits; CPython additionally
/// switches to exponent notation outside `1e-4 <= |x| < 1e16` and always
/// writes an explicit, two-digit exponent sign.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let mut buffer = ryu::Buffer::new();
    let shortest = buffer.format_finite(value);
    let (mantissa, exponent) = match shortest.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or_default()),
        None => (shortest, 0),
    };

    let negative = mantissa.starts_with('-');
    let unsigned = mantissa.trim_start_matches('-');
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let frac_part = frac_part.trim_end_matches('0');

    // Normalize to digits `d1 d2 ...` and a decimal exponent of the first digit.
    let mut digits: String = format!("{int_part}{frac_part}");
    let leading_zeros = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading_zeros);
    if digits.is_empty() {
        return if negative { "-0.0" } else { "0.0" }.to_owned();
    }
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation, reason = "digit counts are tiny")]
    let point = int_part.len() as i32 - leading_zeros as i32 + exponent;
    let sci_exp = point - 1;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if (-4..16).contains(&sci_exp) {
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', point.unsigned_abs() as usize));
            out.push_str(&digits);
        } else {
            let point = point.unsigned_abs() as usize;
            if digits.len() <= point {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', point - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        }
    } else {
        let digits = digits.trim_end_matches('0');
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if sci_exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", sci_exp.unsigned_abs());
    }
    out
}

impl fmt::Display for Object {
    /// Matches Python's `str()`: strings render bare, everything else as `repr()`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            _ => self.repr_fmt(f),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.num_eq(b);
        }
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.py_hash() {
            Some(hash) => state.write_i64(hash),
            // Unhashable in Python, but the Rust impl stays total.
            None => {
                if let Self::List(items) = self {
                    state.write_usize(items.len());
                    for item in items {
                        item.hash(state);
                    }
                }
            }
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Object {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<BigInt> for Object {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(value)
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for Object {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<()> for Object {
    fn from((): ()) -> Self {
        Self::None
    }
}
