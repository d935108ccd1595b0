//! nbtx is a codec for NBT (Named Binary Tag) data: a self-describing,
//! hierarchical binary format for numbers, strings, arrays and nested
//! lists/compounds.
//!
//! Unlike a fixed-format parser, every tag kind is dispatched through two
//! registries held by an [`Nbt`] instance:
//!
//! * the [`AdapterRegistry`] maps wire type ids to tag kinds and to the
//!   [`Adapter`] that reads and writes that kind's payload, and
//! * the [`ConverterRegistry`] maps tag kinds to native [`Value`] kinds and
//!   to the [`Converter`] translating between the two.
//!
//! Third parties can add tag kinds (see [`CustomKind`]) by registering an
//! adapter and a converter without touching the reader or writer.
//!
//! * For the in-memory tree see [`Tag`], [`TagList`] and [`TagCompound`].
//! * For the byte-stream collaborators (compression, string encodings) see
//!   [`stream`].
//! * For mapping your own types to and from tags see [`convert`].
//!
//! # Quick example
//!
//! ```
//! use nbtx::{Nbt, Tag, TagCompound, TagList};
//!
//! # fn main() -> nbtx::error::Result<()> {
//! let nbt = Nbt::extended();
//!
//! let mut longs = TagList::new();
//! for n in 11..=15i64 {
//!     longs.push(n)?;
//! }
//!
//! let mut root = TagCompound::new();
//! root.put("shortTest", 32767i16)?;
//! root.put("listTest", longs)?;
//!
//! let bytes = nbt.to_bytes(&root)?;
//! let back = nbt.from_bytes(&bytes)?;
//! assert_eq!(root, back);
//! # Ok(())
//! # }
//! ```
//!
//! # Wire ids
//!
//! The original NBT ids 0 to 11 are used for the standard kinds. Extension
//! kinds live from 80 upwards: Boolean (80), DoubleArray (81), FloatArray
//! (82), LongArray (83), ShortArray (84) and StringArray (85). Use
//! [`Nbt::original`] for an instance that only understands the standard ids.

use std::fmt;

pub mod adapter;
pub mod convert;
pub mod converter;
pub mod error;
pub mod registry;
pub mod stream;

mod input;
mod nbt;
mod output;
mod tag;
mod value;

pub use adapter::Adapter;
pub use converter::Converter;
pub use input::Decoder;
pub use nbt::{Nbt, DEFAULT_MAX_DEPTH};
pub use output::Encoder;
pub use registry::{AdapterRegistry, ConverterRegistry};
pub use tag::*;
pub use value::*;

#[cfg(test)]
mod test;

/// Wire id of the End tag. Terminates compounds and marks "no tag".
pub const END_ID: u8 = 0;

/// The kind of an NBT tag. This does not carry the value or the name of the
/// data, and is the key the registries use to identify a tag variant.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TagKind {
    /// Represents the end of a Compound object.
    End,
    /// Equivalent to i8.
    Byte,
    /// Equivalent to i16.
    Short,
    /// Equivalent to i32.
    Int,
    /// Equivalent to i64.
    Long,
    /// Equivalent to f32.
    Float,
    /// Equivalent to f64.
    Double,
    /// Represents as array of Byte (i8).
    ByteArray,
    /// Represents a Unicode string.
    String,
    /// Represents a list of unnamed tags, all of the same kind.
    List,
    /// Represents a struct-like structure.
    Compound,
    /// Represents as array of Int (i32).
    IntArray,
    /// Extension: a single boolean.
    Boolean,
    /// Extension: array of Double (f64).
    DoubleArray,
    /// Extension: array of Float (f32).
    FloatArray,
    /// Extension: array of Long (i64).
    LongArray,
    /// Extension: array of Short (i16).
    ShortArray,
    /// Extension: array of String.
    StringArray,
    /// A third-party kind, identified by its [`CustomKind::KIND`] name.
    Custom(&'static str),
}

impl TagKind {
    /// Every kind with a standard wire id, in id order.
    pub const STANDARD: [TagKind; 18] = [
        TagKind::End,
        TagKind::Byte,
        TagKind::Short,
        TagKind::Int,
        TagKind::Long,
        TagKind::Float,
        TagKind::Double,
        TagKind::ByteArray,
        TagKind::String,
        TagKind::List,
        TagKind::Compound,
        TagKind::IntArray,
        TagKind::Boolean,
        TagKind::DoubleArray,
        TagKind::FloatArray,
        TagKind::LongArray,
        TagKind::ShortArray,
        TagKind::StringArray,
    ];

    /// The id this kind is given by [`Nbt::extended`]. Custom kinds have no
    /// standard id.
    pub fn standard_id(self) -> Option<u8> {
        use TagKind::*;
        Some(match self {
            End => 0,
            Byte => 1,
            Short => 2,
            Int => 3,
            Long => 4,
            Float => 5,
            Double => 6,
            ByteArray => 7,
            String => 8,
            List => 9,
            Compound => 10,
            IntArray => 11,
            Boolean => 80,
            DoubleArray => 81,
            FloatArray => 82,
            LongArray => 83,
            ShortArray => 84,
            StringArray => 85,
            Custom(_) => return None,
        })
    }

    /// Inverse of [`standard_id`][`TagKind::standard_id`].
    pub fn from_standard_id(id: u8) -> Option<TagKind> {
        use TagKind::*;
        Some(match id {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            80 => Boolean,
            81 => DoubleArray,
            82 => FloatArray,
            83 => LongArray,
            84 => ShortArray,
            85 => StringArray,
            _ => return None,
        })
    }

    /// True for kinds that are not part of the original NBT format.
    pub fn is_extension(self) -> bool {
        matches!(self.standard_id(), Some(id) if id >= 80) || matches!(self, TagKind::Custom(_))
    }

    /// True for List and Compound.
    pub fn is_container(self) -> bool {
        matches!(self, TagKind::List | TagKind::Compound)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TagKind::*;
        let name = match self {
            End => "TAG_End",
            Byte => "TAG_Byte",
            Short => "TAG_Short",
            Int => "TAG_Int",
            Long => "TAG_Long",
            Float => "TAG_Float",
            Double => "TAG_Double",
            ByteArray => "TAG_Byte_Array",
            String => "TAG_String",
            List => "TAG_List",
            Compound => "TAG_Compound",
            IntArray => "TAG_Int_Array",
            Boolean => "TAG_Boolean",
            DoubleArray => "TAG_Double_Array",
            FloatArray => "TAG_Float_Array",
            LongArray => "TAG_Long_Array",
            ShortArray => "TAG_Short_Array",
            StringArray => "TAG_String_Array",
            Custom(name) => name,
        };
        f.write_str(name)
    }
}
