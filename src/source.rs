use crate::JsonError;
use std::io::Read;

/// A character source abstraction: the only way the lexer touches the host
/// environment. Mirrors the teacher crate's `Code`, which wraps a raw `&[u8]`
/// behind a small owned struct instead of exposing bytes everywhere — here
/// generalized to also cover an owned `std::io::Read` adapter.
pub trait CharSource {
    /// Returns the next character, or `None` at end of input.
    fn read(&mut self) -> Result<Option<char>, JsonError>;
}

/// A character sink abstraction used by the writer.
pub trait CharSink {
    fn write_char(&mut self, c: char) -> Result<(), JsonError>;

    fn write_str(&mut self, s: &str) -> Result<(), JsonError> {
        for c in s.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }
}

/// Forwarding impl so a `&mut S` can stand in for an owned source: a
/// `Reader<&mut S>` never drops `S`, giving callers an explicit way to pass
/// an external, caller-owned source that the reader must not release.
impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn read(&mut self) -> Result<Option<char>, JsonError> {
        (**self).read()
    }
}

/// A non-owning source over an in-memory string slice, iterated by character.
pub struct StrSource<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
        }
    }
}

impl<'a> CharSource for StrSource<'a> {
    fn read(&mut self) -> Result<Option<char>, JsonError> {
        Ok(self.chars.next())
    }
}

/// A source over an owned `std::io::Read`, decoding UTF-8 one byte sequence
/// at a time. Used when the Reader is handed a reader it should own and
/// release on `close`.
pub struct ReadSource<R: Read> {
    inner: R,
    // holds overflow bytes of a multi-byte UTF-8 sequence across calls
    pending: Vec<u8>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(4),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, JsonError> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(JsonError::wrapping("failed reading from source", e)),
        }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read(&mut self) -> Result<Option<char>, JsonError> {
        self.pending.clear();
        loop {
            let byte = match self.read_byte()? {
                Some(b) => b,
                None => {
                    if self.pending.is_empty() {
                        return Ok(None);
                    }
                    return Err(JsonError::new("truncated UTF-8 sequence in source"));
                }
            };
            self.pending.push(byte);
            match std::str::from_utf8(&self.pending) {
                Ok(s) => return Ok(s.chars().next()),
                Err(e) if e.error_len().is_some() => {
                    return Err(JsonError::new("invalid UTF-8 byte sequence in source"));
                }
                Err(_) => continue,
            }
        }
    }
}

/// A sink that accumulates into an owned `String` buffer.
#[derive(Debug, Default)]
pub struct StringSink {
    pub buffer: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CharSink for StringSink {
    fn write_char(&mut self, c: char) -> Result<(), JsonError> {
        self.buffer.push(c);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), JsonError> {
        self.buffer.push_str(s);
        Ok(())
    }
}

/// A sink over a `std::io::Write`, UTF-8 encoding characters as written.
pub struct WriteSink<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: std::io::Write> CharSink for WriteSink<W> {
    fn write_char(&mut self, c: char) -> Result<(), JsonError> {
        let mut buf = [0u8; 4];
        let encoded = c.encode_utf8(&mut buf);
        self.inner
            .write_all(encoded.as_bytes())
            .map_err(|e| JsonError::wrapping("failed writing to sink", e))
    }

    fn write_str(&mut self, s: &str) -> Result<(), JsonError> {
        self.inner
            .write_all(s.as_bytes())
            .map_err(|e| JsonError::wrapping("failed writing to sink", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_source_yields_chars_in_order() {
        let mut source = StrSource::new("ab");
        assert_eq!(source.read().unwrap(), Some('a'));
        assert_eq!(source.read().unwrap(), Some('b'));
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn read_source_decodes_multi_byte_utf8() {
        let mut source = ReadSource::new("λx".as_bytes());
        assert_eq!(source.read().unwrap(), Some('λ'));
        assert_eq!(source.read().unwrap(), Some('x'));
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn string_sink_accumulates_writes() {
        let mut sink = StringSink::new();
        sink.write_str("hel").unwrap();
        sink.write_char('l').unwrap();
        sink.write_char('o').unwrap();
        assert_eq!(sink.buffer, "hello");
    }
}
