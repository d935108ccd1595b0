use std::io::{Read, Write};
use std::sync::Arc;

use crate::adapter::{self, Adapter};
use crate::converter::{self, Converter};
use crate::error::{Error, Result};
use crate::stream::{Compression, Encoding};
use crate::{
    AdapterRegistry, ContainerKind, ConverterRegistry, Decoder, Encoder, Tag, TagCompound,
    TagKind, Value, ValueKind,
};

/// Default bound on nested lists and compounds.
///
/// Decoding and encoding recurse once per level, so this must stay low
/// enough for a tree at the limit to fit a 2 MiB thread stack in debug
/// builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A configured codec: the adapter and converter registries, plus the
/// stream collaborators and decode limits.
///
/// Set an instance up first, then share it freely. All reading and writing
/// takes `&self`, and registration needs `&mut self`, so nothing can be
/// registered while a decode or encode is running.
///
/// ```
/// # use nbtx::{Nbt, TagCompound};
/// # use nbtx::stream::Compression;
/// # fn main() -> nbtx::error::Result<()> {
/// let nbt = Nbt::extended()
///     .with_compression(Compression::Uncompressed)
///     .with_max_depth(64);
///
/// let mut root = TagCompound::new();
/// root.put("flag", true)?;
///
/// let bytes = nbt.to_bytes(&root)?;
/// assert_eq!(bytes[0], 10);
/// assert_eq!(nbt.from_bytes(&bytes)?, root);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Nbt {
    adapters: AdapterRegistry,
    converters: ConverterRegistry,
    compression: Compression,
    encoding: Encoding,
    max_depth: usize,
    max_seq_len: usize,
}

impl Nbt {
    /// No kinds at all. Only End is known.
    pub fn empty() -> Self {
        Self {
            adapters: AdapterRegistry::new(),
            converters: ConverterRegistry::new(),
            compression: Compression::default(),
            encoding: Encoding::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_seq_len: i32::MAX as usize,
        }
    }

    /// The kinds of the original format, ids 1 to 11.
    pub fn original() -> Self {
        let mut nbt = Self::empty();
        nbt.add_builtins(|id| id < 80);
        nbt
    }

    /// The original kinds plus the extension kinds, ids 80 to 85.
    pub fn extended() -> Self {
        let mut nbt = Self::empty();
        nbt.add_builtins(|_| true);
        nbt
    }

    fn add_builtins(&mut self, include: impl Fn(u8) -> bool) {
        for kind in TagKind::STANDARD {
            let id = match kind.standard_id() {
                Some(id) if id != crate::END_ID && include(id) => id,
                _ => continue,
            };
            if let Some(adapter) = adapter::builtin(kind) {
                self.adapters.insert(id, kind, adapter);
            }
            if let Some((value_kind, converter)) = converter::builtin(kind) {
                self.converters.insert(kind, value_kind, converter);
            }
        }
    }

    /// Register `adapter` for `kind` under wire id `id`.
    pub fn register_adapter(
        &mut self,
        id: u8,
        kind: TagKind,
        adapter: impl Adapter + 'static,
    ) -> Result<()> {
        self.adapters.register(id, kind, Arc::new(adapter))
    }

    /// Register `converter` between `kind` and `value_kind`.
    pub fn register_converter(
        &mut self,
        kind: TagKind,
        value_kind: ValueKind,
        converter: impl Converter + 'static,
    ) -> Result<()> {
        self.converters.register(kind, value_kind, Arc::new(converter))
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.set_compression(compression);
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.set_encoding(encoding);
        self
    }

    /// Maximum number of lists and compounds nested inside one another.
    /// Exceeding it is a format error when decoding and when encoding.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.set_max_depth(max_depth);
        self
    }

    /// Maximum length of any array or list read. Longer ones are format
    /// errors, before anything is allocated for them.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    pub fn set_max_seq_len(&mut self, max_seq_len: usize) {
        self.max_seq_len = max_seq_len;
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.set_max_seq_len(max_seq_len);
        self
    }

    /// Read a compressed document, returning its root compound.
    pub fn read<R: Read>(&self, reader: R) -> Result<TagCompound> {
        let root = self.read_root(reader)?;
        into_compound(root)
    }

    /// Read a compressed document, returning its root as a named tag.
    pub fn read_root<R: Read>(&self, reader: R) -> Result<Tag> {
        let mut reader = self.compression.wrap_reader(reader);
        self.decode_root(reader.as_mut())
    }

    /// Write `root` as a compressed document with an unnamed root.
    pub fn write<W: Write>(&self, root: &TagCompound, writer: W) -> Result<()> {
        let mut writer = self.compression.wrap_writer(writer);
        self.encode(root, &mut writer)?;
        writer.finish()?;
        Ok(())
    }

    /// Write a named root compound as a compressed document.
    pub fn write_root<W: Write>(&self, root: &Tag, writer: W) -> Result<()> {
        let mut writer = self.compression.wrap_writer(writer);
        self.encode_root(root, &mut writer)?;
        writer.finish()?;
        Ok(())
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<TagCompound> {
        self.read(bytes)
    }

    pub fn to_bytes(&self, root: &TagCompound) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(root, &mut buf)?;
        Ok(buf)
    }

    /// Decode an uncompressed document. Fails unless it holds a compound.
    pub fn decode(&self, input: &mut dyn Read) -> Result<TagCompound> {
        into_compound(self.decode_root(input)?)
    }

    /// Like [`Nbt::decode`], keeping the root's name.
    pub fn decode_root(&self, input: &mut dyn Read) -> Result<Tag> {
        match self.decode_tag(None, input)? {
            Some(root) if root.kind() == TagKind::Compound => Ok(root),
            _ => Err(Error::no_root_compound()),
        }
    }

    /// Encode `root` uncompressed, with the empty name.
    pub fn encode(&self, root: &TagCompound, output: &mut dyn Write) -> Result<()> {
        let id = self.id_for(TagKind::Compound)?;
        let mut encoder = Encoder::new(output, self);
        encoder.write_byte(id)?;
        encoder.write_str("")?;
        adapter::write_compound(root, &mut encoder)
    }

    /// Encode a named root compound uncompressed.
    pub fn encode_root(&self, root: &Tag, output: &mut dyn Write) -> Result<()> {
        if root.kind() != TagKind::Compound {
            return Err(Error::no_root_compound());
        }
        self.encode_tag(root, output)
    }

    /// Decode a single framed tag, `None` if the input holds an End tag.
    /// `parent` is the kind of container the tag sits in, which decides
    /// whether a name is read.
    pub fn decode_tag(
        &self,
        parent: Option<ContainerKind>,
        input: &mut dyn Read,
    ) -> Result<Option<Tag>> {
        Decoder::new(input, self).decode_tag(parent)
    }

    /// Encode a single framed tag.
    pub fn encode_tag(&self, tag: &Tag, output: &mut dyn Write) -> Result<()> {
        Encoder::new(output, self).encode_tag(tag)
    }

    pub fn to_value(&self, tag: &Tag) -> Result<Value> {
        self.converters.to_value(tag, self)
    }

    pub fn to_tag(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<Tag> {
        self.converters.to_tag(name.into(), value.into(), self)
    }

    pub fn kind_for(&self, id: u8) -> Result<TagKind> {
        self.adapters.kind_for(id)
    }

    pub fn id_for(&self, kind: TagKind) -> Result<u8> {
        self.adapters.id_for(kind)
    }

    /// Display name of the kind registered under `id`, eg `TAG_Compound`.
    pub fn name_for(&self, id: u8) -> Result<String> {
        Ok(self.kind_for(id)?.to_string())
    }

    pub fn adapter_for_id(&self, id: u8) -> Result<&dyn Adapter> {
        self.adapters.adapter_for_id(id)
    }

    pub fn adapter_for_kind(&self, kind: TagKind) -> Result<&dyn Adapter> {
        self.adapters.adapter_for_kind(kind)
    }

    /// Read a length-prefixed string in the configured encoding.
    pub fn read_string(&self, input: &mut dyn Read) -> Result<String> {
        self.encoding.read_string(input)
    }

    /// Write a length-prefixed string in the configured encoding.
    pub fn write_string(&self, output: &mut dyn Write, s: &str) -> Result<()> {
        self.encoding.write_string(output, s)
    }
}

impl Default for Nbt {
    fn default() -> Self {
        Self::extended()
    }
}

fn into_compound(root: Tag) -> Result<TagCompound> {
    match root.into_payload() {
        crate::Payload::Compound(compound) => Ok(compound),
        _ => Err(Error::no_root_compound()),
    }
}
