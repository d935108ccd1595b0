use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use log::{trace, warn};

use crate::error::{Error, Result};
use crate::{ContainerKind, Nbt, Tag, END_ID};

// Never trust a length prefix for more than this many elements of up-front
// allocation; a lying length then fails at EOF instead of at the allocator.
pub(crate) const PREALLOC_LIMIT: usize = 4096;

/// Reading side of the protocol engine, handed to every
/// [`Adapter::read`][`crate::Adapter::read`].
///
/// Wraps the byte source together with the [`Nbt`] instance doing the
/// decoding, and tracks how deeply nested the current payload is.
pub struct Decoder<'a> {
    input: &'a mut dyn Read,
    nbt: &'a Nbt,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(input: &'a mut dyn Read, nbt: &'a Nbt) -> Self {
        Self {
            input,
            nbt,
            depth: 0,
        }
    }

    /// The instance doing the decoding. Adapters build their tags through
    /// its converters.
    pub fn nbt(&self) -> &'a Nbt {
        self.nbt
    }

    /// Decode one fully framed tag: id, name unless the parent is a list,
    /// then payload. Returns `None` for an End tag.
    ///
    /// An id nothing is registered for fails before anything past the id
    /// byte is consumed.
    pub fn decode_tag(&mut self, parent: Option<ContainerKind>) -> Result<Option<Tag>> {
        let id = self.consume_byte()?;
        if id == END_ID {
            return Ok(None);
        }

        let nbt = self.nbt;
        let kind = nbt.kind_for(id)?;
        let adapter = nbt.adapter_for_id(id)?;

        let name = match parent {
            Some(ContainerKind::List) => String::new(),
            _ => self.consume_str()?,
        };

        trace!("reading {}({:?})", kind, name);
        let tag = adapter.read(name, self)?;
        trace!("finished reading {}({:?})", kind, tag.name());
        Ok(Some(tag))
    }

    /// Decode just the payload of a tag with the given id, as found in a
    /// list.
    pub fn decode_payload(&mut self, id: u8, name: String) -> Result<Tag> {
        let nbt = self.nbt;
        nbt.adapter_for_id(id)?.read(name, self)
    }

    /// Run `f` one nesting level deeper, failing once the instance's maximum
    /// depth is exceeded. Container adapters wrap their payload in this.
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

    pub fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.input.read_u8()?)
    }

    pub fn consume_i8(&mut self) -> Result<i8> {
        Ok(self.input.read_i8()?)
    }

    pub fn consume_i16(&mut self) -> Result<i16> {
        Ok(self.input.read_i16::<BigEndian>()?)
    }

    pub fn consume_i32(&mut self) -> Result<i32> {
        Ok(self.input.read_i32::<BigEndian>()?)
    }

    pub fn consume_i64(&mut self) -> Result<i64> {
        Ok(self.input.read_i64::<BigEndian>()?)
    }

    pub fn consume_f32(&mut self) -> Result<f32> {
        Ok(self.input.read_f32::<BigEndian>()?)
    }

    pub fn consume_f64(&mut self) -> Result<f64> {
        Ok(self.input.read_f64::<BigEndian>()?)
    }

    /// Any non-zero byte is true.
    pub fn consume_bool(&mut self) -> Result<bool> {
        Ok(self.consume_byte()? != 0)
    }

    /// A length-prefixed string in the instance's character encoding.
    pub fn consume_str(&mut self) -> Result<String> {
        self.nbt.encoding().read_string(self.input)
    }

    /// A signed 32-bit length. Negative lengths and lengths beyond the
    /// instance's maximum sequence length are format errors.
    pub fn consume_len(&mut self) -> Result<usize> {
        let len = self.consume_i32()?;
        let len: usize = len.try_into().map_err(|_| Error::negative_len(len))?;

        if len > self.nbt.max_seq_len() {
            warn!(
                "nbt length {} greater than max sequence length {}",
                len,
                self.nbt.max_seq_len()
            );
            return Err(Error::format(format!(
                "size ({}) greater than max sequence length ({})",
                len,
                self.nbt.max_seq_len(),
            )));
        }
        Ok(len)
    }

    /// A length-prefixed array, each element read by `element`.
    pub fn consume_array<T>(
        &mut self,
        mut element: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let len = self.consume_len()?;
        let mut data = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            data.push(element(self)?);
        }
        Ok(data)
    }

    /// A length-prefixed array of bytes, read in one go.
    pub fn consume_byte_array(&mut self) -> Result<Vec<i8>> {
        let len = self.consume_len()?;
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        (&mut *self.input).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf.into_iter().map(|b| b as i8).collect())
    }
}
