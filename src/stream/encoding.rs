use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Character encoding of names and string payloads.
///
/// Whatever the encoding, a string is framed as an unsigned 16-bit
/// big-endian count of the encoded bytes followed by those bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// The JVM's modified UTF-8, as the NBT format specifies: NUL is encoded
    /// as two bytes and characters outside the BMP as surrogate pairs of
    /// three bytes each.
    ModifiedUtf8,
    Utf8,
    /// Characters beyond 7 bits are written as `?`.
    Ascii,
    /// ISO-8859-1. Characters beyond 8 bits are written as `?`.
    Latin1,
    Utf16Be,
    Utf16Le,
    /// UTF-16 with a byte order mark. Written big-endian; read in whichever
    /// order the mark gives, big-endian without one.
    Utf16,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::ModifiedUtf8
    }
}

impl Encoding {
    /// The bytes of `s` in this encoding, without the length prefix.
    pub fn encode<'s>(self, s: &'s str) -> Cow<'s, [u8]> {
        match self {
            Encoding::ModifiedUtf8 => cesu8::to_java_cesu8(s),
            Encoding::Utf8 => Cow::Borrowed(s.as_bytes()),
            Encoding::Ascii => Cow::Owned(
                s.chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                    .collect(),
            ),
            Encoding::Latin1 => Cow::Owned(
                s.chars()
                    .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
                    .collect(),
            ),
            Encoding::Utf16Be => Cow::Owned(s.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Encoding::Utf16Le => Cow::Owned(s.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Encoding::Utf16 => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(s.encode_utf16().flat_map(u16::to_be_bytes));
                Cow::Owned(bytes)
            }
        }
    }

    /// Decode `data`, failing on anything that is not valid in this
    /// encoding.
    pub fn decode(self, data: &[u8]) -> Result<String> {
        match self {
            Encoding::ModifiedUtf8 => cesu8::from_java_cesu8(data)
                .map(Cow::into_owned)
                .map_err(|_| Error::nonunicode_string(data)),
            Encoding::Utf8 => {
                String::from_utf8(data.to_vec()).map_err(|_| Error::nonunicode_string(data))
            }
            Encoding::Ascii => {
                if data.is_ascii() {
                    Ok(data.iter().map(|&b| b as char).collect())
                } else {
                    Err(Error::nonunicode_string(data))
                }
            }
            Encoding::Latin1 => Ok(data.iter().map(|&b| b as char).collect()),
            Encoding::Utf16Be => decode_utf16(data, u16::from_be_bytes),
            Encoding::Utf16Le => decode_utf16(data, u16::from_le_bytes),
            Encoding::Utf16 => match data {
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                _ => decode_utf16(data, u16::from_be_bytes),
            },
        }
    }

    /// Read one length-prefixed string.
    pub fn read_string(self, input: &mut dyn Read) -> Result<String> {
        let len = input.read_u16::<BigEndian>()? as usize;
        let mut buf = vec![0; len];
        input.read_exact(&mut buf)?;
        self.decode(&buf)
    }

    /// Write one length-prefixed string. Fails if the encoded form does not
    /// fit the 16-bit length.
    pub fn write_string(self, output: &mut dyn Write, s: &str) -> Result<()> {
        let bytes = self.encode(s);
        let len: u16 = bytes.len().try_into().map_err(|_| {
            Error::format(format!(
                "string of {} bytes too long for a 16-bit length",
                bytes.len()
            ))
        })?;
        output.write_u16::<BigEndian>(len)?;
        output.write_all(&bytes)?;
        Ok(())
    }
}

fn decode_utf16(data: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(Error::nonunicode_string(data));
    }
    let units = data.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|_| Error::nonunicode_string(data))
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::ModifiedUtf8 => "modified-utf-8",
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16 => "utf-16",
        })
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "modified-utf-8" | "modified-utf8" | "mutf-8" | "mutf8" | "cesu-8" => {
                Ok(Encoding::ModifiedUtf8)
            }
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf-16be" => Ok(Encoding::Utf16Be),
            "utf-16le" => Ok(Encoding::Utf16Le),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            _ => Err(Error::conversion(format!("unknown encoding {:?}", s))),
        }
    }
}
