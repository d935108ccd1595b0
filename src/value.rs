use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::CustomTag;

/// A plain native value, the other side of a [`Converter`][`crate::Converter`].
///
/// Lists and compounds convert element-wise, so a `Value` tree has no names
/// on list elements and no parent links. It implements serde's traits, so a
/// tree converted with [`Nbt::to_value`][`crate::Nbt::to_value`] can be
/// handed to any serde format.
///
/// ```
/// # use nbtx::{Nbt, Tag, Value};
/// # fn main() -> nbtx::error::Result<()> {
/// let nbt = Nbt::extended();
/// let value = nbt.to_value(&Tag::new("answer", 42i32))?;
/// assert_eq!(value, Value::Int(42));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// Elements in order. The element kind is not kept: an empty list
    /// converts back to an untyped [`TagList`][`crate::TagList`], whatever
    /// kind it was declared with.
    List(Vec<Value>),
    Compound(IndexMap<String, Value>),
    IntArray(Vec<i32>),
    Boolean(bool),
    DoubleArray(Vec<f64>),
    FloatArray(Vec<f32>),
    LongArray(Vec<i64>),
    ShortArray(Vec<i16>),
    StringArray(Vec<String>),
    #[serde(skip)]
    Custom(Box<dyn CustomTag>),
}

/// The kind of a [`Value`], the key the converter registry uses for native
/// types.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    Boolean,
    DoubleArray,
    FloatArray,
    LongArray,
    ShortArray,
    StringArray,
    Custom(&'static str),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::ByteArray(_) => ValueKind::ByteArray,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Compound(_) => ValueKind::Compound,
            Value::IntArray(_) => ValueKind::IntArray,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::DoubleArray(_) => ValueKind::DoubleArray,
            Value::FloatArray(_) => ValueKind::FloatArray,
            Value::LongArray(_) => ValueKind::LongArray,
            Value::ShortArray(_) => ValueKind::ShortArray,
            Value::StringArray(_) => ValueKind::StringArray,
            Value::Custom(c) => ValueKind::Custom(c.kind_name()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Custom(name) => write!(f, "value of {}", name),
            kind => write!(f, "{:?} value", kind),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (ByteArray(a), ByteArray(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Compound(a), Compound(b)) => a == b,
            (IntArray(a), IntArray(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (DoubleArray(a), DoubleArray(b)) => a == b,
            (FloatArray(a), FloatArray(b)) => a == b,
            (LongArray(a), LongArray(b)) => a == b,
            (ShortArray(a), ShortArray(b)) => a == b,
            (StringArray(a), StringArray(b)) => a == b,
            (Custom(a), Custom(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(bool, Boolean);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<i8>, ByteArray);
from!(Vec<i16>, ShortArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(Vec<f32>, FloatArray);
from!(Vec<f64>, DoubleArray);
from!(Vec<String>, StringArray);
from!(Vec<Value>, List);
from!(IndexMap<String, Value>, Compound);
from!(Box<dyn CustomTag>, Custom);
