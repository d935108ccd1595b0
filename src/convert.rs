//! Mapping your own types to and from tags.
//!
//! A type opts in by implementing [`IntoTag`] and [`FromTag`]. The
//! implementations for plain types go through the instance's converters, so
//! a type built from them respects whatever the instance has registered.
//!
//! ```
//! use nbtx::convert::{FromTag, IntoTag};
//! use nbtx::error::{Error, Result};
//! use nbtx::{Nbt, Tag, TagList};
//!
//! #[derive(Debug, PartialEq)]
//! struct BlockPos {
//!     x: i32,
//!     y: i32,
//!     z: i32,
//! }
//!
//! impl IntoTag for BlockPos {
//!     fn into_tag(&self, name: &str, _: &Nbt) -> Result<Tag> {
//!         let mut list = TagList::new();
//!         for n in [self.x, self.y, self.z] {
//!             list.push(n)?;
//!         }
//!         Ok(Tag::new(name, list))
//!     }
//! }
//!
//! impl FromTag for BlockPos {
//!     fn from_tag(tag: &Tag, nbt: &Nbt) -> Result<Self> {
//!         let list = tag
//!             .as_list()
//!             .ok_or_else(|| Error::conversion("block position must be a list"))?;
//!         let coords = list
//!             .iter()
//!             .map(|n| i32::from_tag(n, nbt))
//!             .collect::<Result<Vec<_>>>()?;
//!         match coords[..] {
//!             [x, y, z] => Ok(BlockPos { x, y, z }),
//!             _ => Err(Error::conversion("block position needs 3 coordinates")),
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let nbt = Nbt::extended();
//! let pos = BlockPos { x: 1, y: 64, z: -3 };
//! let tag = nbt.to_tag_from("pos", &pos)?;
//! assert_eq!(nbt.from_tag_into::<BlockPos>(&tag)?, pos);
//! # Ok(())
//! # }
//! ```
use crate::error::{Error, Result};
use crate::{Nbt, Tag, TagCompound, Value, ValueKind};

/// Types that can be written as a tag.
pub trait IntoTag {
    fn into_tag(&self, name: &str, nbt: &Nbt) -> Result<Tag>;
}

/// Types that can be read back from a tag.
pub trait FromTag: Sized {
    fn from_tag(tag: &Tag, nbt: &Nbt) -> Result<Self>;
}

macro_rules! via_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoTag for $t {
                fn into_tag(&self, name: &str, nbt: &Nbt) -> Result<Tag> {
                    nbt.to_tag(name, Value::$variant(self.clone()))
                }
            }

            impl FromTag for $t {
                fn from_tag(tag: &Tag, nbt: &Nbt) -> Result<Self> {
                    match nbt.to_value(tag)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::mismatch(ValueKind::$variant, other.kind())),
                    }
                }
            }
        )*
    };
}

via_value! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    String => String,
    Vec<i8> => ByteArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<String> => StringArray,
}

impl IntoTag for str {
    fn into_tag(&self, name: &str, nbt: &Nbt) -> Result<Tag> {
        nbt.to_tag(name, Value::String(self.to_owned()))
    }
}

impl IntoTag for Value {
    fn into_tag(&self, name: &str, nbt: &Nbt) -> Result<Tag> {
        nbt.to_tag(name, self.clone())
    }
}

impl FromTag for Value {
    fn from_tag(tag: &Tag, nbt: &Nbt) -> Result<Self> {
        nbt.to_value(tag)
    }
}

impl IntoTag for Tag {
    fn into_tag(&self, name: &str, _: &Nbt) -> Result<Tag> {
        let mut tag = self.clone();
        tag.set_name(name)?;
        Ok(tag)
    }
}

impl FromTag for Tag {
    fn from_tag(tag: &Tag, _: &Nbt) -> Result<Self> {
        Ok(tag.clone())
    }
}

impl Nbt {
    /// `value` as a tag called `name`.
    pub fn to_tag_from<T: IntoTag + ?Sized>(&self, name: &str, value: &T) -> Result<Tag> {
        value.into_tag(name, self)
    }

    pub fn from_tag_into<T: FromTag>(&self, tag: &Tag) -> Result<T> {
        T::from_tag(tag, self)
    }
}

impl TagCompound {
    /// The entry under `key` as a `T`. A missing key is `None`; an entry that
    /// is not a `T` is an error.
    pub fn get_as<T: FromTag>(&self, key: &str, nbt: &Nbt) -> Result<Option<T>> {
        self.get(key).map(|tag| T::from_tag(tag, nbt)).transpose()
    }

    /// Like [`TagCompound::get_as`], falling back to `default` when the key
    /// is missing.
    pub fn get_or<T: FromTag>(&self, key: &str, nbt: &Nbt, default: T) -> Result<T> {
        Ok(self.get_as(key, nbt)?.unwrap_or(default))
    }

    /// Store `value` under `key`, returning the tag it replaced.
    pub fn insert_from<T: IntoTag + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        nbt: &Nbt,
    ) -> Result<Option<Tag>> {
        let tag = value.into_tag(key, nbt)?;
        self.insert(key, tag)
    }
}
