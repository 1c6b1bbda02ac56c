//! `json-stream` is a streaming JSON lexer, a table-driven pull parser, and a
//! validating streaming writer.
//!
//! # Overview
//!
//! The crate is built from three components that compose bottom-up and share
//! no runtime state:
//!
//! - [`Lexer`] — a character-driven finite-state machine that turns a
//!   [`CharSource`] into one [`Terminal`] lexeme at a time.
//! - [`Reader`] — a pull-style parser that drives a [`Lexer`] through a
//!   predictive (LL(1)) automaton over a static parse table, emitting one
//!   [`Token`] event per [`Reader::read`] call.
//! - [`Writer`] — a validating streaming writer that accepts value and
//!   structural calls and renders bytes to a [`CharSink`].
//!
//! The grammar recognized on input is JSON plus two well-defined extensions,
//! both on by default and individually disableable: `//` and `/* */`
//! comments, and single-quoted strings.
//!
//! # Example
//!
//! ```
//! use json_stream::{Reader, Token};
//!
//! let mut reader = Reader::from_str(r#"{"a": 1, "b": [true, null]}"#);
//! let mut events = Vec::new();
//! while reader.read().unwrap() {
//!     events.push(reader.token.clone());
//! }
//! assert_eq!(
//!     events,
//!     vec![
//!         Token::ObjectStart,
//!         Token::PropertyName("a".into()),
//!         Token::Int(1),
//!         Token::PropertyName("b".into()),
//!         Token::ArrayStart,
//!         Token::Boolean(true),
//!         Token::Null,
//!         Token::ArrayEnd,
//!         Token::ObjectEnd,
//!     ]
//! );
//! ```
//!
//! ```
//! use json_stream::Writer;
//!
//! let mut writer = Writer::new();
//! writer.write_object_start().unwrap();
//! writer.write_property_name("a").unwrap();
//! writer.write_i32(1).unwrap();
//! writer.write_object_end().unwrap();
//! assert_eq!(writer.as_str(), r#"{"a":1}"#);
//! ```
//!
//! # License
//! `json-stream` is provided under the MIT license. See [LICENSE](https://github.com/creative-forest/json-stream/blob/main/LICENSE).

mod error;
mod lexer;
mod parse_table;
mod position;
mod reader;
pub mod source;
mod token;
mod writer;

pub use error::JsonError;
pub use lexer::Lexer;
pub use position::Position;
pub use reader::Reader;
pub use source::{CharSink, CharSource};
pub use token::{Terminal, Token};
pub use writer::Writer;

#[cfg(test)]
mod tests {
    use super::*;

    /// Drains a reader into a token replaying them into a writer, producing
    /// canonical (re-serialized) JSON for the input document.
    fn replay(input: &str) -> String {
        let mut reader = Reader::from_str(input);
        let mut writer = Writer::new();
        while reader.read().unwrap() {
            match reader.token.clone() {
                Token::ObjectStart => writer.write_object_start().unwrap(),
                Token::ObjectEnd => writer.write_object_end().unwrap(),
                Token::ArrayStart => writer.write_array_start().unwrap(),
                Token::ArrayEnd => writer.write_array_end().unwrap(),
                Token::PropertyName(name) => writer.write_property_name(&name).unwrap(),
                Token::Int(v) => writer.write_i32(v).unwrap(),
                Token::Long(v) => writer.write_i64(v).unwrap(),
                Token::Double(v) => writer.write_f64(v).unwrap(),
                Token::Boolean(v) => writer.write_bool(v).unwrap(),
                Token::String(v) => writer.write_string(&v).unwrap(),
                Token::Null => writer.write_null().unwrap(),
                Token::None => {}
            }
        }
        writer.into_string()
    }

    #[test]
    fn parser_printer_round_trip_preserves_canonical_json() {
        let input = r#"{"a":1,"b":[true,null,"x"],"c":2.5}"#;
        assert_eq!(replay(input), input);
    }

    #[test]
    fn round_trip_drops_comments_and_canonicalizes_single_quotes() {
        let input = "/*c*/ {'k': 'v' /* c */} // tail";
        assert_eq!(replay(input), r#"{"k":"v"}"#);
    }

    #[test]
    fn replayed_output_is_accepted_by_an_independent_oracle() {
        let input = r#"{"a":1,"b":[true,null,"x",9999999999],"c":2.5}"#;
        let rendered = replay(input);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["a"], 1);
        assert_eq!(value["c"], 2.5);
    }
}
