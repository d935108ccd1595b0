//! Payload codecs, one per tag kind.
//!
//! An [`Adapter`] owns the binary layout of a single kind's payload and
//! nothing else. The id byte and the name in front of it are framed by the
//! engine ([`Decoder::decode_tag`]/[`Encoder::encode_tag`]), so an adapter
//! never needs to know where in the tree it is.
//!
//! Scalar and array adapters build their tags through the instance's
//! converters, see [`Nbt::to_tag`][`crate::Nbt::to_tag`].
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::input::PREALLOC_LIMIT;
use crate::{ContainerKind, Decoder, Encoder, Payload, Tag, TagCompound, TagKind, TagList, Value, END_ID};

/// Reads and writes the payload of one tag kind.
///
/// `read` is given the name the engine already decoded (empty for list
/// elements) and must return a tag of the kind the adapter is registered
/// for. `write` is only ever given tags of that kind.
pub trait Adapter: Send + Sync {
    fn read(&self, name: String, input: &mut Decoder<'_>) -> Result<Tag>;
    fn write(&self, tag: &Tag, output: &mut Encoder<'_>) -> Result<()>;
}

macro_rules! adapter {
    ($(#[$doc:meta])* $name:ident, $variant:ident,
     read: |$input:ident| $read:expr,
     write: |$output:ident, $v:ident| $write:expr $(,)?) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl Adapter for $name {
            fn read(&self, name: String, $input: &mut Decoder<'_>) -> Result<Tag> {
                let value = $read;
                $input.nbt().to_tag(name, Value::$variant(value))
            }

            fn write(&self, tag: &Tag, $output: &mut Encoder<'_>) -> Result<()> {
                match tag.payload() {
                    Payload::$variant($v) => $write,
                    _ => Err(Error::mismatch(TagKind::$variant, tag.kind())),
                }
            }
        }
    };
}

adapter!(ByteAdapter, Byte,
    read: |input| input.consume_i8()?,
    write: |output, v| output.write_i8(*v));

adapter!(ShortAdapter, Short,
    read: |input| input.consume_i16()?,
    write: |output, v| output.write_i16(*v));

adapter!(IntAdapter, Int,
    read: |input| input.consume_i32()?,
    write: |output, v| output.write_i32(*v));

adapter!(LongAdapter, Long,
    read: |input| input.consume_i64()?,
    write: |output, v| output.write_i64(*v));

adapter!(FloatAdapter, Float,
    read: |input| input.consume_f32()?,
    write: |output, v| output.write_f32(*v));

adapter!(DoubleAdapter, Double,
    read: |input| input.consume_f64()?,
    write: |output, v| output.write_f64(*v));

adapter!(
    /// One byte, any non-zero value reads as true.
    BooleanAdapter, Boolean,
    read: |input| input.consume_bool()?,
    write: |output, v| output.write_bool(*v));

adapter!(
    /// Unsigned 16-bit length, then the bytes in the instance's encoding.
    StringAdapter, String,
    read: |input| input.consume_str()?,
    write: |output, v| output.write_str(v));

adapter!(ByteArrayAdapter, ByteArray,
    read: |input| input.consume_byte_array()?,
    write: |output, v| output.write_byte_array(v));

adapter!(ShortArrayAdapter, ShortArray,
    read: |input| input.consume_array(|i| i.consume_i16())?,
    write: |output, v| output.write_array(v, |o, x| o.write_i16(*x)));

adapter!(IntArrayAdapter, IntArray,
    read: |input| input.consume_array(|i| i.consume_i32())?,
    write: |output, v| output.write_array(v, |o, x| o.write_i32(*x)));

adapter!(LongArrayAdapter, LongArray,
    read: |input| input.consume_array(|i| i.consume_i64())?,
    write: |output, v| output.write_array(v, |o, x| o.write_i64(*x)));

adapter!(FloatArrayAdapter, FloatArray,
    read: |input| input.consume_array(|i| i.consume_f32())?,
    write: |output, v| output.write_array(v, |o, x| o.write_f32(*x)));

adapter!(DoubleArrayAdapter, DoubleArray,
    read: |input| input.consume_array(|i| i.consume_f64())?,
    write: |output, v| output.write_array(v, |o, x| o.write_f64(*x)));

adapter!(
    /// Like the numeric arrays, but every element is a length-prefixed
    /// string.
    StringArrayAdapter, StringArray,
    read: |input| input.consume_array(|i| i.consume_str())?,
    write: |output, v| output.write_array(v, |o, s| o.write_str(s)));

/// Element id, signed 32-bit count, then that many bare payloads.
///
/// A list nothing was ever added to is written with element id 0 and count
/// 0. Reading id 0 with any other count fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListAdapter;

impl Adapter for ListAdapter {
    fn read(&self, name: String, input: &mut Decoder<'_>) -> Result<Tag> {
        input.nested(|input| {
            let element_id = input.consume_byte()?;
            let len = input.consume_len()?;

            if element_id == END_ID {
                if len > 0 {
                    return Err(Error::format(format!(
                        "invalid nbt: list of TAG_End with {} elements",
                        len
                    )));
                }
                return Ok(Tag::new(name, TagList::new()));
            }

            let kind = input.nbt().kind_for(element_id)?;
            let mut list = TagList::with_capacity(kind, len.min(PREALLOC_LIMIT))?;
            for _ in 0..len {
                list.add(input.decode_payload(element_id, String::new())?)?;
            }
            Ok(Tag::new(name, list))
        })
    }

    fn write(&self, tag: &Tag, output: &mut Encoder<'_>) -> Result<()> {
        let list = tag
            .as_list()
            .ok_or_else(|| Error::mismatch(TagKind::List, tag.kind()))?;
        list.validate()?;

        output.nested(|output| {
            let element_id = match list.element_kind() {
                Some(kind) => output.nbt().id_for(kind)?,
                None => END_ID,
            };
            output.write_byte(element_id)?;
            output.write_len(list.len())?;
            for element in list {
                output.encode_payload(element)?;
            }
            Ok(())
        })
    }
}

/// Fully framed children, terminated by an End byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompoundAdapter;

impl Adapter for CompoundAdapter {
    fn read(&self, name: String, input: &mut Decoder<'_>) -> Result<Tag> {
        input.nested(|input| {
            let mut compound = TagCompound::new();
            while let Some(tag) = input.decode_tag(Some(ContainerKind::Compound))? {
                if compound.contains_key(tag.name()) {
                    return Err(Error::format(format!(
                        "invalid nbt: duplicate key {:?} in compound",
                        tag.name()
                    )));
                }
                let key = tag.name().to_owned();
                compound.insert(key, tag)?;
            }
            Ok(Tag::new(name, compound))
        })
    }

    fn write(&self, tag: &Tag, output: &mut Encoder<'_>) -> Result<()> {
        let compound = tag
            .as_compound()
            .ok_or_else(|| Error::mismatch(TagKind::Compound, tag.kind()))?;
        write_compound(compound, output)
    }
}

/// Payload of a compound. Shared with the root, which is written without
/// being wrapped in a [`Tag`].
pub(crate) fn write_compound(compound: &TagCompound, output: &mut Encoder<'_>) -> Result<()> {
    compound.validate()?;

    output.nested(|output| {
        for child in compound.values() {
            output.encode_tag(child)?;
        }
        output.write_byte(END_ID)
    })
}

/// The adapter for a built-in kind. `None` for End and custom kinds.
pub(crate) fn builtin(kind: TagKind) -> Option<Arc<dyn Adapter>> {
    let adapter: Arc<dyn Adapter> = match kind {
        TagKind::Byte => Arc::new(ByteAdapter),
        TagKind::Short => Arc::new(ShortAdapter),
        TagKind::Int => Arc::new(IntAdapter),
        TagKind::Long => Arc::new(LongAdapter),
        TagKind::Float => Arc::new(FloatAdapter),
        TagKind::Double => Arc::new(DoubleAdapter),
        TagKind::ByteArray => Arc::new(ByteArrayAdapter),
        TagKind::String => Arc::new(StringAdapter),
        TagKind::List => Arc::new(ListAdapter),
        TagKind::Compound => Arc::new(CompoundAdapter),
        TagKind::IntArray => Arc::new(IntArrayAdapter),
        TagKind::Boolean => Arc::new(BooleanAdapter),
        TagKind::DoubleArray => Arc::new(DoubleArrayAdapter),
        TagKind::FloatArray => Arc::new(FloatArrayAdapter),
        TagKind::LongArray => Arc::new(LongArrayAdapter),
        TagKind::ShortArray => Arc::new(ShortArrayAdapter),
        TagKind::StringArray => Arc::new(StringArrayAdapter),
        TagKind::End | TagKind::Custom(_) => return None,
    };
    Some(adapter)
}
