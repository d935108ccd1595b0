//! Translation between tags and native [`Value`]s.
//!
//! Converters are the only place a tag is built from decoded primitives.
//! Scalar and array adapters hand what they read to
//! [`Nbt::to_tag`][`crate::Nbt::to_tag`], which picks the converter
//! registered for the value's kind. Registering a different converter for
//! a kind therefore changes what decoding produces without touching any
//! adapter.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::{CustomKind, Nbt, Payload, Tag, TagCompound, TagKind, TagList, Value, ValueKind};

pub trait Converter: Send + Sync {
    /// The plain value held by `tag`. Containers convert their children
    /// through `nbt`.
    fn to_value(&self, tag: &Tag, nbt: &Nbt) -> Result<Value>;

    /// A new unparented tag called `name` holding `value`.
    fn to_tag(&self, name: String, value: Value, nbt: &Nbt) -> Result<Tag>;
}

macro_rules! converter {
    ($($name:ident: $variant:ident),* $(,)?) => {
        $(
            /// Moves the payload between the tag and the value of the same
            /// kind unchanged.
            #[derive(Debug, Default, Clone, Copy)]
            pub struct $name;

            impl Converter for $name {
                fn to_value(&self, tag: &Tag, _: &Nbt) -> Result<Value> {
                    match tag.payload() {
                        Payload::$variant(v) => Ok(Value::$variant(v.clone())),
                        _ => Err(Error::mismatch(TagKind::$variant, tag.kind())),
                    }
                }

                fn to_tag(&self, name: String, value: Value, _: &Nbt) -> Result<Tag> {
                    match value {
                        Value::$variant(v) => Ok(Tag::new(name, Payload::$variant(v))),
                        other => Err(Error::mismatch(ValueKind::$variant, other.kind())),
                    }
                }
            }
        )*
    };
}

converter! {
    ByteConverter: Byte,
    ShortConverter: Short,
    IntConverter: Int,
    LongConverter: Long,
    FloatConverter: Float,
    DoubleConverter: Double,
    ByteArrayConverter: ByteArray,
    StringConverter: String,
    IntArrayConverter: IntArray,
    BooleanConverter: Boolean,
    DoubleArrayConverter: DoubleArray,
    FloatArrayConverter: FloatArray,
    LongArrayConverter: LongArray,
    ShortArrayConverter: ShortArray,
    StringArrayConverter: StringArray,
}

/// Converts element-wise. Building a list from values of mixed kinds fails
/// the same way adding them to a [`TagList`] would.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListConverter;

impl Converter for ListConverter {
    fn to_value(&self, tag: &Tag, nbt: &Nbt) -> Result<Value> {
        let list = tag
            .as_list()
            .ok_or_else(|| Error::mismatch(TagKind::List, tag.kind()))?;
        let values = list
            .iter()
            .map(|element| nbt.to_value(element))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::List(values))
    }

    fn to_tag(&self, name: String, value: Value, nbt: &Nbt) -> Result<Tag> {
        let values = match value {
            Value::List(values) => values,
            other => return Err(Error::mismatch(ValueKind::List, other.kind())),
        };

        let mut list = TagList::new();
        for value in values {
            list.add(nbt.to_tag("", value)?)?;
        }
        Ok(Tag::new(name, list))
    }
}

/// Converts entry by entry, keeping the order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompoundConverter;

impl Converter for CompoundConverter {
    fn to_value(&self, tag: &Tag, nbt: &Nbt) -> Result<Value> {
        let compound = tag
            .as_compound()
            .ok_or_else(|| Error::mismatch(TagKind::Compound, tag.kind()))?;
        let mut map = IndexMap::with_capacity(compound.len());
        for (key, child) in compound.iter() {
            map.insert(key.to_owned(), nbt.to_value(child)?);
        }
        Ok(Value::Compound(map))
    }

    fn to_tag(&self, name: String, value: Value, nbt: &Nbt) -> Result<Tag> {
        let map = match value {
            Value::Compound(map) => map,
            other => return Err(Error::mismatch(ValueKind::Compound, other.kind())),
        };

        let mut compound = TagCompound::new();
        for (key, value) in map {
            let child = nbt.to_tag(key.clone(), value)?;
            compound.insert(key, child)?;
        }
        Ok(Tag::new(name, compound))
    }
}

/// Converter for a third-party kind, passing the boxed custom payload
/// through as is.
#[derive(Debug, Clone, Copy)]
pub struct CustomConverter {
    kind: &'static str,
}

impl CustomConverter {
    pub fn of<T: CustomKind>() -> Self {
        Self { kind: T::KIND }
    }
}

impl Converter for CustomConverter {
    fn to_value(&self, tag: &Tag, _: &Nbt) -> Result<Value> {
        match tag.payload() {
            Payload::Custom(c) if c.kind_name() == self.kind => Ok(Value::Custom(c.clone())),
            _ => Err(Error::mismatch(TagKind::Custom(self.kind), tag.kind())),
        }
    }

    fn to_tag(&self, name: String, value: Value, _: &Nbt) -> Result<Tag> {
        match value {
            Value::Custom(c) if c.kind_name() == self.kind => Ok(Tag::new(name, Payload::Custom(c))),
            other => Err(Error::mismatch(ValueKind::Custom(self.kind), other.kind())),
        }
    }
}

/// The converter for a built-in kind along with the value kind it produces.
/// `None` for End and custom kinds.
pub(crate) fn builtin(kind: TagKind) -> Option<(ValueKind, Arc<dyn Converter>)> {
    let entry: (ValueKind, Arc<dyn Converter>) = match kind {
        TagKind::Byte => (ValueKind::Byte, Arc::new(ByteConverter)),
        TagKind::Short => (ValueKind::Short, Arc::new(ShortConverter)),
        TagKind::Int => (ValueKind::Int, Arc::new(IntConverter)),
        TagKind::Long => (ValueKind::Long, Arc::new(LongConverter)),
        TagKind::Float => (ValueKind::Float, Arc::new(FloatConverter)),
        TagKind::Double => (ValueKind::Double, Arc::new(DoubleConverter)),
        TagKind::ByteArray => (ValueKind::ByteArray, Arc::new(ByteArrayConverter)),
        TagKind::String => (ValueKind::String, Arc::new(StringConverter)),
        TagKind::List => (ValueKind::List, Arc::new(ListConverter)),
        TagKind::Compound => (ValueKind::Compound, Arc::new(CompoundConverter)),
        TagKind::IntArray => (ValueKind::IntArray, Arc::new(IntArrayConverter)),
        TagKind::Boolean => (ValueKind::Boolean, Arc::new(BooleanConverter)),
        TagKind::DoubleArray => (ValueKind::DoubleArray, Arc::new(DoubleArrayConverter)),
        TagKind::FloatArray => (ValueKind::FloatArray, Arc::new(FloatArrayConverter)),
        TagKind::LongArray => (ValueKind::LongArray, Arc::new(LongArrayConverter)),
        TagKind::ShortArray => (ValueKind::ShortArray, Arc::new(ShortArrayConverter)),
        TagKind::StringArray => (ValueKind::StringArray, Arc::new(StringArrayConverter)),
        TagKind::End | TagKind::Custom(_) => return None,
    };
    Some(entry)
}
