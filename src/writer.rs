use crate::source::{CharSink, StringSink, WriteSink};
use crate::JsonError;

/// Bookkeeping for one open container (§3 "Writer state"). The distinguished
/// root frame has both `in_array` and `in_object` false and is never popped.
#[derive(Debug, Clone, Copy)]
struct Frame {
    in_array: bool,
    in_object: bool,
    expecting_value: bool,
    count: u32,
    padding: usize,
}

impl Frame {
    fn root() -> Self {
        Self {
            in_array: false,
            in_object: false,
            expecting_value: false,
            count: 0,
            padding: 0,
        }
    }

    fn array() -> Self {
        Self {
            in_array: true,
            ..Self::root()
        }
    }

    fn object() -> Self {
        Self {
            in_object: true,
            ..Self::root()
        }
    }
}

/// A stateful streaming JSON writer (§4.3): a stack of container contexts,
/// a validation state machine over the sequence of calls, and a sink the
/// rendered characters are written to.
pub struct Writer<S: CharSink> {
    sink: S,
    stack: Vec<Frame>,
    indent: usize,
    has_reached_end: bool,

    /// Render with newlines, indentation, and property-name alignment
    /// (default `false`).
    pub pretty_print: bool,
    /// Width of one indentation step in pretty mode (default `4`).
    pub indent_value: usize,
    /// Whether to run the validation state machine at all (default `true`).
    pub validate: bool,
    /// Lowercase property names before emission (default `false`).
    pub lower_case_properties: bool,
}

impl Writer<StringSink> {
    /// Builds a writer that owns an internal `String` buffer.
    pub fn new() -> Self {
        Self::with_sink(StringSink::new())
    }

    /// The accumulated output so far; only meaningful for the owned-buffer form.
    pub fn as_str(&self) -> &str {
        &self.sink.buffer
    }

    /// Consumes the writer, returning the owned buffer.
    pub fn into_string(self) -> String {
        self.sink.buffer
    }
}

impl Default for Writer<StringSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: std::io::Write> Writer<WriteSink<W>> {
    /// Builds a writer over an external `std::io::Write` sink. The writer
    /// never closes a caller-supplied sink.
    pub fn from_write(inner: W) -> Self {
        Self::with_sink(WriteSink::new(inner))
    }
}

impl<S: CharSink> Writer<S> {
    /// Builds a writer over any `CharSink`, owned or external.
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink,
            stack: vec![Frame::root()],
            indent: 0,
            has_reached_end: false,
            pretty_print: false,
            indent_value: 4,
            validate: true,
            lower_case_properties: false,
        }
    }

    /// Clears all state, permitting the writer (and any internally owned
    /// buffer) to be reused for a new document.
    pub fn reset(&mut self) {
        self.stack = vec![Frame::root()];
        self.indent = 0;
        self.has_reached_end = false;
    }

    fn top(&self) -> Frame {
        *self.stack.last().expect("writer context stack is never empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.stack.last_mut().expect("writer context stack is never empty")
    }

    fn check_write_value(&self) -> Result<(), JsonError> {
        if self.has_reached_end {
            return Err(JsonError::new(
                "A complete JSON symbol has already been written",
            ));
        }
        let top = self.top();
        // The root frame (stack depth 1) is a single-value slot: a bare
        // top-level scalar is valid JSON, so it is accepted here and
        // immediately completes the document (see `begin_child`/the
        // `has_reached_end` latch in the scalar-writing methods below).
        if self.stack.len() == 1 || top.in_array || (top.in_object && top.expecting_value) {
            return Ok(());
        }
        Err(JsonError::new("Can't add a value here"))
    }

    fn check_write_property(&self) -> Result<(), JsonError> {
        if self.has_reached_end {
            return Err(JsonError::new(
                "A complete JSON symbol has already been written",
            ));
        }
        let top = self.top();
        if top.in_object && !top.expecting_value {
            return Ok(());
        }
        Err(JsonError::new("Can't add a property here"))
    }

    fn check_close_array(&self) -> Result<(), JsonError> {
        if self.top().in_array {
            return Ok(());
        }
        Err(JsonError::new("Can't close an array here"))
    }

    fn check_close_object(&self) -> Result<(), JsonError> {
        let top = self.top();
        if !top.in_object {
            return Err(JsonError::new("Can't close an object here"));
        }
        if top.expecting_value {
            return Err(JsonError::new("Expected a property"));
        }
        Ok(())
    }

    /// Emits the comma/newline/indentation a new child needs, and marks the
    /// child as introduced. Called for every value, property name, and
    /// nested-container start that is actually going to be written.
    fn begin_child(&mut self) -> Result<(), JsonError> {
        let introducing_child = !self.top().expecting_value;
        if introducing_child {
            if self.top().count > 0 {
                self.sink.write_char(',')?;
            }
            if self.pretty_print {
                self.write_newline_and_indent()?;
            }
            self.top_mut().count += 1;
        }
        Ok(())
    }

    fn write_newline_and_indent(&mut self) -> Result<(), JsonError> {
        self.sink.write_str("\n")?;
        for _ in 0..self.indent {
            self.sink.write_char(' ')?;
        }
        Ok(())
    }

    fn after_top_level_container_closed(&mut self) {
        if self.stack.len() == 1 {
            self.has_reached_end = true;
        }
    }

    /// A scalar written while the stack is still just the root frame is a
    /// complete top-level JSON document by itself (§4.3 "end-of-document
    /// latching", extended to the degenerate single-scalar document).
    fn after_root_scalar_written(&mut self) {
        if self.stack.len() == 1 {
            self.has_reached_end = true;
        }
    }

    pub fn write_array_start(&mut self) -> Result<(), JsonError> {
        if self.validate {
            self.check_write_value()?;
        }
        self.begin_child()?;
        self.sink.write_char('[')?;
        self.stack.push(Frame::array());
        self.indent += self.indent_value;
        Ok(())
    }

    pub fn write_array_end(&mut self) -> Result<(), JsonError> {
        if self.validate {
            self.check_close_array()?;
        }
        let had_children = self.top().count > 0;
        self.stack.pop();
        self.indent = self.indent.saturating_sub(self.indent_value);
        if self.pretty_print && had_children {
            self.write_newline_and_indent()?;
        }
        self.sink.write_char(']')?;
        self.top_mut().expecting_value = false;
        self.after_top_level_container_closed();
        Ok(())
    }

    pub fn write_object_start(&mut self) -> Result<(), JsonError> {
        if self.validate {
            self.check_write_value()?;
        }
        self.begin_child()?;
        self.sink.write_char('{')?;
        self.stack.push(Frame::object());
        self.indent += self.indent_value;
        Ok(())
    }

    pub fn write_object_end(&mut self) -> Result<(), JsonError> {
        if self.validate {
            self.check_close_object()?;
        }
        let had_children = self.top().count > 0;
        self.stack.pop();
        self.indent = self.indent.saturating_sub(self.indent_value);
        if self.pretty_print && had_children {
            self.write_newline_and_indent()?;
        }
        self.sink.write_char('}')?;
        self.top_mut().expecting_value = false;
        self.after_top_level_container_closed();
        Ok(())
    }

    pub fn write_property_name(&mut self, name: &str) -> Result<(), JsonError> {
        if self.validate {
            self.check_write_property()?;
        }
        self.begin_child()?;
        let rendered: String = if self.lower_case_properties {
            name.chars().flat_map(char::to_lowercase).collect()
        } else {
            name.to_string()
        };
        let padding = {
            let frame = self.top_mut();
            frame.padding = frame.padding.max(rendered.chars().count());
            frame.padding
        };
        self.sink.write_char('"')?;
        write_escaped(&mut self.sink, &rendered)?;
        self.sink.write_char('"')?;
        if self.pretty_print {
            let pad = padding - rendered.chars().count() + 1;
            for _ in 0..pad {
                self.sink.write_char(' ')?;
            }
            self.sink.write_str(": ")?;
        } else {
            self.sink.write_char(':')?;
        }
        self.top_mut().expecting_value = true;
        Ok(())
    }

    /// Writes a boolean scalar.
    pub fn write_bool(&mut self, value: bool) -> Result<(), JsonError> {
        self.write_raw(if value { "true" } else { "false" })
    }

    /// Writes a signed 32-bit integer scalar.
    pub fn write_i32(&mut self, value: i32) -> Result<(), JsonError> {
        self.write_raw(&value.to_string())
    }

    /// Writes a signed 64-bit integer scalar.
    pub fn write_i64(&mut self, value: i64) -> Result<(), JsonError> {
        self.write_raw(&value.to_string())
    }

    /// Writes an unsigned 64-bit integer scalar.
    pub fn write_u64(&mut self, value: u64) -> Result<(), JsonError> {
        self.write_raw(&value.to_string())
    }

    /// Writes a floating-point scalar. Per §4.3, if the locale-invariant
    /// rendering contains neither `.` nor `E`, a trailing `.0` is appended
    /// so the token unambiguously re-parses as a double.
    pub fn write_f64(&mut self, value: f64) -> Result<(), JsonError> {
        let mut text = format!("{}", value);
        if !text.contains(['.', 'e', 'E']) {
            text.push_str(".0");
        }
        self.write_raw(&text)
    }

    /// Writes a string scalar, escaped per §4.3.
    pub fn write_string(&mut self, value: &str) -> Result<(), JsonError> {
        if self.validate {
            self.check_write_value()?;
        }
        self.begin_child()?;
        self.sink.write_char('"')?;
        write_escaped(&mut self.sink, value)?;
        self.sink.write_char('"')?;
        self.top_mut().expecting_value = false;
        self.after_root_scalar_written();
        Ok(())
    }

    /// Writes a JSON `null` scalar.
    pub fn write_null(&mut self) -> Result<(), JsonError> {
        self.write_raw("null")
    }

    /// Splices a pre-rendered JSON fragment directly into the output while
    /// still running it through the validation state machine as if it were
    /// a scalar value (§6 "Writer exposes its current character sink").
    pub fn write_raw(&mut self, rendered: &str) -> Result<(), JsonError> {
        if self.validate {
            self.check_write_value()?;
        }
        self.begin_child()?;
        self.sink.write_str(rendered)?;
        self.top_mut().expecting_value = false;
        self.after_root_scalar_written();
        Ok(())
    }

    /// Exposes the underlying sink, mirroring §6's extension point for
    /// the excluded mapping layer to splice pre-rendered JSON through.
    pub fn raw_sink(&mut self) -> &mut S {
        &mut self.sink
    }
}

/// Escapes `s` per §4.3: the named single-character escapes, `"` and `\`,
/// verbatim ASCII in `[32, 126]`, and `\uXXXX` (uppercase hex) otherwise.
fn write_escaped<S: CharSink>(sink: &mut S, s: &str) -> Result<(), JsonError> {
    for c in s.chars() {
        match c {
            '\n' => sink.write_str("\\n")?,
            '\r' => sink.write_str("\\r")?,
            '\t' => sink.write_str("\\t")?,
            '\u{000C}' => sink.write_str("\\f")?,
            '\u{0008}' => sink.write_str("\\b")?,
            '"' => sink.write_str("\\\"")?,
            '\\' => sink.write_str("\\\\")?,
            c if (' '..='~').contains(&c) => sink.write_char(c)?,
            c => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    sink.write_str(&format!("\\u{:04X}", unit))?;
                }
            }
        }
    }
    Ok(())
}
