use crate::lexer::Lexer;
use crate::parse_table;
use crate::source::{CharSource, ReadSource, StrSource};
use crate::token::{Nonterminal, Symbol, Terminal, Token};
use crate::JsonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Value,
    Property,
}

/// A pull-style parser driving a [`Lexer`] through a predictive (LL(1))
/// automaton over [`parse_table`], emitting one [`Token`] event per
/// successful [`read`](Reader::read) call.
pub struct Reader<S: CharSource> {
    lexer: Lexer<S>,
    stack: Vec<Symbol>,
    current: Terminal,
    primed: bool,
    in_string: bool,
    pending_kind: Pending,
    pending_text: String,

    pub token: Token,
    pub end_of_json: bool,
    pub end_of_input: bool,

    /// Whether `//` and `/* */` comments are recognized (default `true`).
    pub allow_comments: bool,
    /// Whether `'...'` strings are recognized alongside `"..."` (default `true`).
    pub allow_single_quoted_strings: bool,
    /// Read by the excluded mapping layer to decide whether to discard an
    /// unrecognized subtree via [`skip_value`](Reader::skip_value) instead of
    /// erroring (default `true`). The core never consults this itself.
    pub skip_non_members: bool,
}

fn initial_stack() -> Vec<Symbol> {
    vec![Symbol::N(Nonterminal::End), Symbol::N(Nonterminal::Text)]
}

impl<'a> Reader<StrSource<'a>> {
    /// Builds a reader that owns a source over an in-memory string.
    pub fn from_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: std::io::Read> Reader<ReadSource<R>> {
    /// Builds a reader that owns a source over an arbitrary byte reader.
    pub fn from_reader(inner: R) -> Self {
        Self::new(ReadSource::new(inner))
    }
}

impl<S: CharSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            lexer: Lexer::new(source),
            stack: initial_stack(),
            current: Terminal::End,
            primed: false,
            in_string: false,
            pending_kind: Pending::None,
            pending_text: String::new(),
            token: Token::None,
            end_of_json: false,
            end_of_input: false,
            allow_comments: true,
            allow_single_quoted_strings: true,
            skip_non_members: true,
        }
    }

    /// Releases the underlying source if this reader owns it (dropping it),
    /// and marks the reader as finished. A reader built over `&mut S` never
    /// owned its source, so nothing is released here beyond the flags.
    pub fn close(&mut self) {
        self.end_of_input = true;
        self.end_of_json = true;
    }

    fn sync_lexer_config(&mut self) {
        self.lexer.allow_comments = self.allow_comments;
        self.lexer.allow_single_quoted_strings = self.allow_single_quoted_strings;
    }

    fn fetch_next(&mut self) -> Result<(), JsonError> {
        self.sync_lexer_config();
        if self.lexer.next_token()? {
            self.current = self.lexer.token;
        } else {
            self.current = Terminal::End;
        }
        Ok(())
    }

    fn fetch_string_content(&mut self) -> Result<(), JsonError> {
        self.lexer.scan_string_content()?;
        self.current = Terminal::CharSeq;
        Ok(())
    }

    /// Advances until a new token event is produced, or end of input is
    /// reached. Returns `Ok(true)` when `token` holds a new event.
    pub fn read(&mut self) -> Result<bool, JsonError> {
        if self.end_of_json {
            self.stack = initial_stack();
            self.end_of_json = false;
            self.primed = false;
        }
        if !self.primed {
            self.fetch_next()?;
            self.primed = true;
        }
        self.in_string = false;
        self.token = Token::None;

        loop {
            let top = match self.stack.pop() {
                Some(Symbol::N(Nonterminal::End)) => {
                    self.end_of_json = true;
                    return Ok(false);
                }
                Some(s) => s,
                None => {
                    self.end_of_json = true;
                    return Ok(false);
                }
            };

            // Latch any token this symbol completes before consuming it from
            // the lexer, so the match against `self.current` below still sees
            // the terminal the token was built from.
            let yielded = self.process_symbol(top)?;

            match top {
                Symbol::T(t) => {
                    if t != self.current {
                        return Err(JsonError::unexpected_token(
                            &t.to_string(),
                            &self.current.to_string(),
                            self.lexer.position(),
                        ));
                    }
                    if t == Terminal::Quote && self.in_string {
                        self.fetch_string_content()?;
                    } else {
                        if self.current == Terminal::End {
                            return Err(JsonError::new(
                                "input doesn't evaluate to proper JSON text",
                            ));
                        }
                        self.fetch_next()?;
                    }
                }
                Symbol::N(n) => match parse_table::lookup(n, self.current) {
                    None => {
                        return Err(JsonError::unexpected_token(
                            &n.to_string(),
                            &self.current.to_string(),
                            self.lexer.position(),
                        ));
                    }
                    Some(production) => {
                        for sym in production.iter().rev() {
                            self.stack.push(*sym);
                        }
                    }
                },
            }

            if yielded {
                return Ok(true);
            }
        }
    }

    /// Runs the per-symbol side effects described for the automaton; returns
    /// whether this symbol completes a token event.
    fn process_symbol(&mut self, symbol: Symbol) -> Result<bool, JsonError> {
        match symbol {
            Symbol::T(Terminal::LeftBracket) => {
                self.token = Token::ArrayStart;
                Ok(true)
            }
            Symbol::T(Terminal::RightBracket) => {
                self.token = Token::ArrayEnd;
                Ok(true)
            }
            Symbol::T(Terminal::LeftBrace) => {
                self.token = Token::ObjectStart;
                Ok(true)
            }
            Symbol::T(Terminal::RightBrace) => {
                self.token = Token::ObjectEnd;
                Ok(true)
            }
            Symbol::T(Terminal::Quote) => {
                self.in_string = !self.in_string;
                if self.in_string {
                    if self.pending_kind == Pending::None {
                        self.pending_kind = Pending::Value;
                    }
                    Ok(false)
                } else {
                    let text = std::mem::take(&mut self.pending_text);
                    self.token = match self.pending_kind {
                        Pending::Property => Token::PropertyName(text),
                        Pending::Value | Pending::None => Token::String(text),
                    };
                    self.pending_kind = Pending::None;
                    Ok(true)
                }
            }
            Symbol::T(Terminal::CharSeq) => {
                self.pending_text = self.lexer.string_value.clone();
                Ok(false)
            }
            Symbol::T(Terminal::True) => {
                self.token = Token::Boolean(true);
                Ok(true)
            }
            Symbol::T(Terminal::False) => {
                self.token = Token::Boolean(false);
                Ok(true)
            }
            Symbol::T(Terminal::Null) => {
                self.token = Token::Null;
                Ok(true)
            }
            Symbol::T(Terminal::Number) => {
                self.token = classify_number(&self.lexer.string_value)?;
                Ok(true)
            }
            Symbol::T(Terminal::Comma) | Symbol::T(Terminal::Colon) | Symbol::T(Terminal::End) => {
                Ok(false)
            }
            Symbol::N(Nonterminal::Pair) => {
                self.pending_kind = Pending::Property;
                Ok(false)
            }
            Symbol::N(_) => Ok(false),
        }
    }

    /// Consumes and discards the next complete value (scalar or subtree)
    /// from the token stream without interpreting it — the hook the excluded
    /// mapping layer would call when [`skip_non_members`](Reader::skip_non_members)
    /// lets it ignore a field it doesn't recognize.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        if !self.read()? {
            return Ok(());
        }
        let mut depth = match self.token {
            Token::ObjectStart | Token::ArrayStart => 1u32,
            _ => 0,
        };
        while depth > 0 {
            if !self.read()? {
                break;
            }
            match self.token {
                Token::ObjectStart | Token::ArrayStart => depth += 1,
                Token::ObjectEnd | Token::ArrayEnd => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Classifies a numeric lexeme into the narrowest exact representation:
/// `Double` if it has a fractional or exponent part, else the smallest of
/// `Int` and `Long` that fits. A lexeme that parses as a 64-bit unsigned
/// integer but overflows `i64` is still reported as `Long`, carrying the
/// value's bit pattern rather than its signed magnitude.
fn classify_number(lexeme: &str) -> Result<Token, JsonError> {
    if lexeme.contains(['.', 'e', 'E']) {
        if let Ok(d) = lexeme.parse::<f64>() {
            if d.is_finite() {
                return Ok(Token::Double(d));
            }
        }
    }
    if let Ok(v) = lexeme.parse::<i32>() {
        return Ok(Token::Int(v));
    }
    if let Ok(v) = lexeme.parse::<i64>() {
        return Ok(Token::Long(v));
    }
    if let Ok(v) = lexeme.parse::<u64>() {
        return Ok(Token::Long(v as i64));
    }
    Err(JsonError::new(format!(
        "number literal '{}' out of range",
        lexeme
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut reader = Reader::from_str(input);
        let mut out = Vec::new();
        while reader.read().unwrap() {
            out.push(reader.token.clone());
        }
        out
    }

    #[test]
    fn reads_an_empty_object_and_an_empty_array() {
        assert_eq!(
            tokens("{}"),
            vec![Token::ObjectStart, Token::ObjectEnd]
        );
        assert_eq!(
            tokens("[1]"),
            vec![Token::ArrayStart, Token::Int(1), Token::ArrayEnd]
        );
    }

    #[test]
    fn reads_a_small_object() {
        let result = tokens(r#"{"a":1,"b":[true,null,"x"]}"#);
        assert_eq!(
            result,
            vec![
                Token::ObjectStart,
                Token::PropertyName("a".into()),
                Token::Int(1),
                Token::PropertyName("b".into()),
                Token::ArrayStart,
                Token::Boolean(true),
                Token::Null,
                Token::String("x".into()),
                Token::ArrayEnd,
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn classifies_numbers_by_narrowest_type() {
        let result = tokens("[1, 2.5, 3e2, 9999999999]");
        assert_eq!(
            result,
            vec![
                Token::ArrayStart,
                Token::Int(1),
                Token::Double(2.5),
                Token::Double(300.0),
                Token::Long(9999999999),
                Token::ArrayEnd,
            ]
        );
    }

    #[test]
    fn recognizes_comments_and_single_quoted_strings_by_default() {
        let result = tokens("/*c*/ {'k': 'v' /* c */} // tail");
        assert_eq!(
            result,
            vec![
                Token::ObjectStart,
                Token::PropertyName("k".into()),
                Token::String("v".into()),
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn reports_an_error_for_an_unexpected_terminal() {
        let mut reader = Reader::from_str("{,}");
        // ObjectStart
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::ObjectStart);
        assert!(reader.read().is_err());
    }

    #[test]
    fn reuses_the_reader_for_a_second_document() {
        let mut reader = Reader::from_str("1 2");
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::Int(1));
        assert!(!reader.read().unwrap());
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::Int(2));
    }

    #[test]
    fn skip_value_discards_a_whole_subtree() {
        let mut reader = Reader::from_str(r#"{"a":[1,2,{"b":3}],"c":4}"#);
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::ObjectStart);
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::PropertyName("a".into()));
        reader.skip_value().unwrap();
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::PropertyName("c".into()));
        assert!(reader.read().unwrap());
        assert_eq!(reader.token, Token::Int(4));
    }
}
