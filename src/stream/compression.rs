use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use log::debug;

use crate::error::Error;

/// How a whole NBT document is compressed. Gzip is what most NBT files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    Gzip,
    /// zlib-wrapped deflate, as used for chunks in region files.
    Deflate,
    Uncompressed,
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Gzip
    }
}

impl Compression {
    /// Wrap `reader` so reading from the result yields decompressed bytes.
    pub fn wrap_reader<'r, R: Read + 'r>(self, reader: R) -> Box<dyn Read + 'r> {
        debug!("reading {} nbt", self);
        match self {
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            Compression::Deflate => Box::new(ZlibDecoder::new(reader)),
            Compression::Uncompressed => Box::new(reader),
        }
    }

    /// Wrap `writer` so bytes written to the result land compressed. Call
    /// [`CompressedWriter::finish`] once done to flush the trailer.
    pub fn wrap_writer<W: Write>(self, writer: W) -> CompressedWriter<W> {
        debug!("writing {} nbt", self);
        match self {
            Compression::Gzip => {
                CompressedWriter::Gzip(GzEncoder::new(writer, flate2::Compression::default()))
            }
            Compression::Deflate => {
                CompressedWriter::Deflate(ZlibEncoder::new(writer, flate2::Compression::default()))
            }
            Compression::Uncompressed => CompressedWriter::Uncompressed(writer),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::Gzip => "gzip",
            Compression::Deflate => "deflate",
            Compression::Uncompressed => "uncompressed",
        })
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Compression::Gzip),
            "deflate" | "zlib" => Ok(Compression::Deflate),
            "none" | "uncompressed" => Ok(Compression::Uncompressed),
            _ => Err(Error::conversion(format!("unknown compression {:?}", s))),
        }
    }
}

/// Writer returned by [`Compression::wrap_writer`].
pub enum CompressedWriter<W: Write> {
    Gzip(GzEncoder<W>),
    Deflate(ZlibEncoder<W>),
    Uncompressed(W),
}

impl<W: Write> CompressedWriter<W> {
    /// Write any trailing compressed data and hand back the inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressedWriter::Gzip(w) => w.finish(),
            CompressedWriter::Deflate(w) => w.finish(),
            CompressedWriter::Uncompressed(mut w) => {
                w.flush()?;
                Ok(w)
            }
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::Gzip(w) => w.write(buf),
            CompressedWriter::Deflate(w) => w.write(buf),
            CompressedWriter::Uncompressed(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::Gzip(w) => w.flush(),
            CompressedWriter::Deflate(w) => w.flush(),
            CompressedWriter::Uncompressed(w) => w.flush(),
        }
    }
}
