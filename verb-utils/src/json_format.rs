//! JSON output in the house style: objects indented over multiple lines,
//! arrays always on a single line, no matter how deeply nested.
//!
//! Implemented as a `serde_json` formatter, not a text post-process; string
//! content that resembles array syntax is never rewritten, and re-parsing
//! the output yields a structure deep-equal to the input.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

pub struct InlineArrayFormatter {
    current_indent: usize,
    has_value: bool,
}

impl InlineArrayFormatter {
    pub fn new() -> InlineArrayFormatter {
        InlineArrayFormatter {
            current_indent: 0,
            has_value: false,
        }
    }
}

impl Default for InlineArrayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for InlineArrayFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b",")
        }
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
            write_indent(writer, self.current_indent)?;
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            writer.write_all(b"\n")?;
        } else {
            writer.write_all(b",\n")?;
        }
        write_indent(writer, self.current_indent)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }
}

fn write_indent<W>(writer: &mut W, levels: usize) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    for _ in 0..levels {
        writer.write_all(b"  ")?;
    }
    Ok(())
}

/// Serialize a value in the house style.
pub fn to_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buffer = Vec::with_capacity(4096);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, InlineArrayFormatter::new());
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer).expect("serde_json writes valid UTF-8"))
}
