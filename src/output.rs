use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use log::{trace, warn};

use crate::error::{Error, Result};
use crate::{ContainerKind, Nbt, Tag};

/// Writing side of the protocol engine, handed to every
/// [`Adapter::write`][`crate::Adapter::write`].
pub struct Encoder<'a> {
    output: &'a mut dyn Write,
    nbt: &'a Nbt,
    depth: usize,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(output: &'a mut dyn Write, nbt: &'a Nbt) -> Self {
        Self {
            output,
            nbt,
            depth: 0,
        }
    }

    pub fn nbt(&self) -> &'a Nbt {
        self.nbt
    }

    /// Encode one fully framed tag: id, then the name unless the tag is
    /// owned by a list, then the payload.
    pub fn encode_tag(&mut self, tag: &Tag) -> Result<()> {
        let nbt = self.nbt;
        let kind = tag.kind();
        let id = nbt.id_for(kind)?;
        let adapter = nbt.adapter_for_id(id)?;

        trace!("writing {}({:?})", kind, tag.name());
        self.write_byte(id)?;
        if !matches!(tag.parent().map(|p| p.kind()), Some(ContainerKind::List)) {
            self.write_str(tag.name())?;
        }
        adapter.write(tag, self)
    }

    /// Encode just the payload of a tag, as stored in a list.
    pub fn encode_payload(&mut self, tag: &Tag) -> Result<()> {
        let nbt = self.nbt;
        nbt.adapter_for_kind(tag.kind())?.write(tag, self)
    }

    /// Run `f` one nesting level deeper. See [`Decoder::nested`][`crate::Decoder::nested`].
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.nbt.max_depth() {
            warn!("nbt nesting deeper than {}, refusing", self.nbt.max_depth());
            return Err(Error::format(format!(
                "invalid nbt: nested deeper than {}",
                self.nbt.max_depth()
            )));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    pub fn write_byte(&mut self, b: u8) -> Result<()> {
        Ok(self.output.write_u8(b)?)
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        Ok(self.output.write_i8(v)?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        Ok(self.output.write_i16::<BigEndian>(v)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        Ok(self.output.write_i32::<BigEndian>(v)?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        Ok(self.output.write_i64::<BigEndian>(v)?)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        Ok(self.output.write_f32::<BigEndian>(v)?)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        Ok(self.output.write_f64::<BigEndian>(v)?)
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_byte(v as u8)
    }

    /// A length-prefixed string in the instance's character encoding.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.nbt.encoding().write_string(self.output, s)
    }

    /// A signed 32-bit length.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| Error::format(format!("len too large: {}", len)))?;
        self.write_i32(len)
    }

    /// A length-prefixed array of bytes.
    pub fn write_byte_array(&mut self, bytes: &[i8]) -> Result<()> {
        self.write_len(bytes.len())?;
        let bytes: Vec<u8> = bytes.iter().map(|&b| b as u8).collect();
        Ok(self.output.write_all(&bytes)?)
    }

    /// A length-prefixed array, each element written by `element`.
    pub fn write_array<T>(
        &mut self,
        data: &[T],
        mut element: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        self.write_len(data.len())?;
        for item in data {
            element(self, item)?;
        }
        Ok(())
    }
}
