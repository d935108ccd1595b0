use std::fmt;

use super::{Payload, Tag};

const INDENT: usize = 2;

/// Renders the tree one tag per line, containers as indented blocks:
///
/// ```text
/// TAG_Compound("Level"): 2 entries
/// {
///   TAG_Short("shortTest"): 32767
///   TAG_List("listTest"): 2 entries of type TAG_Long
///   {
///     TAG_Long: 11
///     TAG_Long: 12
///   }
/// }
/// ```
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(self, f, 0)
    }
}

fn write_tag(tag: &Tag, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    write!(f, "{:indent$}{}", "", tag.kind(), indent = indent)?;
    if !tag.name().is_empty() {
        write!(f, "({:?})", tag.name())?;
    }

    match tag.payload() {
        Payload::Byte(v) => writeln!(f, ": {}", v),
        Payload::Short(v) => writeln!(f, ": {}", v),
        Payload::Int(v) => writeln!(f, ": {}", v),
        Payload::Long(v) => writeln!(f, ": {}", v),
        Payload::Float(v) => writeln!(f, ": {}", v),
        Payload::Double(v) => writeln!(f, ": {}", v),
        Payload::Boolean(v) => writeln!(f, ": {}", v),
        Payload::String(v) => writeln!(f, ": {}", v),
        Payload::ByteArray(v) => writeln!(f, ": [{} bytes]", v.len()),
        Payload::ShortArray(v) => writeln!(f, ": [{} shorts]", v.len()),
        Payload::IntArray(v) => writeln!(f, ": [{} ints]", v.len()),
        Payload::LongArray(v) => writeln!(f, ": [{} longs]", v.len()),
        Payload::FloatArray(v) => writeln!(f, ": [{} floats]", v.len()),
        Payload::DoubleArray(v) => writeln!(f, ": [{} doubles]", v.len()),
        Payload::StringArray(v) => writeln!(f, ": [{} strings]", v.len()),
        Payload::Custom(v) => writeln!(f, ": {:?}", v),
        Payload::List(list) => {
            match list.element_kind() {
                Some(kind) => writeln!(f, ": {} entries of type {}", list.len(), kind)?,
                None => writeln!(f, ": {} entries", list.len())?,
            }
            writeln!(f, "{:indent$}{{", "", indent = indent)?;
            for child in list {
                write_tag(child, f, indent + INDENT)?;
            }
            writeln!(f, "{:indent$}}}", "", indent = indent)
        }
        Payload::Compound(compound) => {
            writeln!(f, ": {} entries", compound.len())?;
            writeln!(f, "{:indent$}{{", "", indent = indent)?;
            for child in compound.values() {
                write_tag(child, f, indent + INDENT)?;
            }
            writeln!(f, "{:indent$}}}", "", indent = indent)
        }
    }
}
