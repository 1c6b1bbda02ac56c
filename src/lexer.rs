use crate::source::CharSource;
use crate::token::Terminal;
use crate::{JsonError, Position};

/// Internal FSM states. `Start` is the top-level dispatch state; the rest
/// are reached only while recognizing a single lexeme and always return to
/// `Start` (directly, or via one of the comment states) once that lexeme is
/// complete. String bodies are not modeled as states here — they are
/// scanned by [`Lexer::scan_string_content`], called explicitly by the
/// reader once it has already consumed the opening quote terminal, so the
/// one-character pushback is the only lookahead the lexer ever needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    NumSign,
    NumZero,
    NumIntDigits,
    NumFracDot,
    NumFracDigits,
    NumExpSign,
    NumExpDigits,
    TrueT,
    TrueTr,
    TrueTru,
    FalseF,
    FalseFa,
    FalseFal,
    FalseFals,
    NullN,
    NullNu,
    NullNul,
    SlashDispatch,
    LineComment,
    BlockCommentBody,
    BlockCommentStar,
}

/// A character-driven finite-state lexer recognizing JSON lexemes:
/// structural characters, numbers, keywords, and (via [`scan_string_content`])
/// string bodies with full escape processing, including the `\uXXXX` and
/// comment extensions.
///
/// [`scan_string_content`]: Lexer::scan_string_content
pub struct Lexer<S: CharSource> {
    source: S,
    pushback: Option<char>,
    position: Position,
    /// Recognized when `false`, line/block comments are a lexical error.
    pub allow_comments: bool,
    /// Recognized when `false`, a bare `'` is a lexical error.
    pub allow_single_quoted_strings: bool,
    /// The quote character (`"` or `'`) most recently yielded as a terminal;
    /// used by [`scan_string_content`](Lexer::scan_string_content) to know
    /// which character closes the string it is about to scan.
    last_quote: char,
    pub token: Terminal,
    pub string_value: String,
    pub end_of_input: bool,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pushback: None,
            position: Position::start(),
            allow_comments: true,
            allow_single_quoted_strings: true,
            last_quote: '"',
            token: Terminal::End,
            string_value: String::new(),
            end_of_input: false,
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn next_char(&mut self) -> Result<Option<char>, JsonError> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        let c = self.source.read()?;
        if let Some(c) = c {
            self.position.advance(c);
        }
        Ok(c)
    }

    fn push_back(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "at most one character of pushback");
        self.pushback = Some(c);
    }

    fn is_whitespace(c: char) -> bool {
        c == ' ' || ('\t'..='\r').contains(&c)
    }

    /// Advances until a complete lexeme has been recognized, publishing it
    /// via `token`/`string_value`. Returns `Ok(false)` at end of input.
    pub fn next_token(&mut self) -> Result<bool, JsonError> {
        self.string_value.clear();
        let mut state = State::Start;
        let mut exp_sign_seen = false;
        loop {
            let c = self.next_char()?;
            let c = match c {
                Some(c) => c,
                None => return self.handle_eof(state),
            };
            match state {
                State::Start => {
                    if Self::is_whitespace(c) {
                        continue;
                    }
                    if let Some(terminal) = Terminal::from_structural_char(c) {
                        if terminal == Terminal::Quote {
                            self.last_quote = c;
                        }
                        self.token = terminal;
                        return Ok(true);
                    }
                    match c {
                        '\'' if self.allow_single_quoted_strings => {
                            self.last_quote = c;
                            self.token = Terminal::Quote;
                            return Ok(true);
                        }
                        '-' => {
                            self.string_value.push(c);
                            state = State::NumSign;
                        }
                        '0' => {
                            self.string_value.push(c);
                            state = State::NumZero;
                        }
                        '1'..='9' => {
                            self.string_value.push(c);
                            state = State::NumIntDigits;
                        }
                        't' => state = State::TrueT,
                        'f' => state = State::FalseF,
                        'n' => state = State::NullN,
                        '/' if self.allow_comments => state = State::SlashDispatch,
                        _ => {
                            return Err(JsonError::unexpected_char(c, self.position));
                        }
                    }
                }
                State::NumSign => match c {
                    '0' => {
                        self.string_value.push(c);
                        state = State::NumZero;
                    }
                    '1'..='9' => {
                        self.string_value.push(c);
                        state = State::NumIntDigits;
                    }
                    _ => return Err(JsonError::unexpected_char(c, self.position)),
                },
                State::NumZero => match c {
                    '.' => {
                        self.string_value.push(c);
                        state = State::NumFracDot;
                    }
                    'e' | 'E' => {
                        self.string_value.push(c);
                        exp_sign_seen = false;
                        state = State::NumExpSign;
                    }
                    _ => {
                        self.push_back(c);
                        self.token = Terminal::Number;
                        return Ok(true);
                    }
                },
                State::NumIntDigits => match c {
                    '0'..='9' => {
                        self.string_value.push(c);
                    }
                    '.' => {
                        self.string_value.push(c);
                        state = State::NumFracDot;
                    }
                    'e' | 'E' => {
                        self.string_value.push(c);
                        exp_sign_seen = false;
                        state = State::NumExpSign;
                    }
                    _ => {
                        self.push_back(c);
                        self.token = Terminal::Number;
                        return Ok(true);
                    }
                },
                State::NumFracDot => match c {
                    '0'..='9' => {
                        self.string_value.push(c);
                        state = State::NumFracDigits;
                    }
                    _ => return Err(JsonError::unexpected_char(c, self.position)),
                },
                State::NumFracDigits => match c {
                    '0'..='9' => {
                        self.string_value.push(c);
                    }
                    'e' | 'E' => {
                        self.string_value.push(c);
                        exp_sign_seen = false;
                        state = State::NumExpSign;
                    }
                    _ => {
                        self.push_back(c);
                        self.token = Terminal::Number;
                        return Ok(true);
                    }
                },
                State::NumExpSign => match c {
                    '+' | '-' if !exp_sign_seen => {
                        self.string_value.push(c);
                        exp_sign_seen = true;
                    }
                    '0'..='9' => {
                        self.string_value.push(c);
                        state = State::NumExpDigits;
                    }
                    _ => return Err(JsonError::unexpected_char(c, self.position)),
                },
                State::NumExpDigits => match c {
                    '0'..='9' => {
                        self.string_value.push(c);
                    }
                    _ => {
                        self.push_back(c);
                        self.token = Terminal::Number;
                        return Ok(true);
                    }
                },
                State::TrueT => state = self.expect(c, 'r', State::TrueTr)?,
                State::TrueTr => state = self.expect(c, 'u', State::TrueTru)?,
                State::TrueTru => {
                    self.expect_final(c, 'e')?;
                    self.token = Terminal::True;
                    return Ok(true);
                }
                State::FalseF => state = self.expect(c, 'a', State::FalseFa)?,
                State::FalseFa => state = self.expect(c, 'l', State::FalseFal)?,
                State::FalseFal => state = self.expect(c, 's', State::FalseFals)?,
                State::FalseFals => {
                    self.expect_final(c, 'e')?;
                    self.token = Terminal::False;
                    return Ok(true);
                }
                State::NullN => state = self.expect(c, 'u', State::NullNu)?,
                State::NullNu => state = self.expect(c, 'l', State::NullNul)?,
                State::NullNul => {
                    self.expect_final(c, 'l')?;
                    self.token = Terminal::Null;
                    return Ok(true);
                }
                State::SlashDispatch => match c {
                    '/' => state = State::LineComment,
                    '*' => state = State::BlockCommentBody,
                    _ => return Err(JsonError::unexpected_char(c, self.position)),
                },
                State::LineComment => {
                    if c == '\n' {
                        state = State::Start;
                    }
                    // any other character, including further '/', is swallowed
                }
                State::BlockCommentBody => {
                    if c == '*' {
                        state = State::BlockCommentStar;
                    }
                }
                State::BlockCommentStar => match c {
                    '/' => state = State::Start,
                    '*' => {}
                    _ => state = State::BlockCommentBody,
                },
            }
        }
    }

    fn expect(&self, c: char, want: char, next: State) -> Result<State, JsonError> {
        if c == want {
            Ok(next)
        } else {
            Err(JsonError::unexpected_char(c, self.position))
        }
    }

    fn expect_final(&self, c: char, want: char) -> Result<(), JsonError> {
        if c == want {
            Ok(())
        } else {
            Err(JsonError::unexpected_char(c, self.position))
        }
    }

    fn handle_eof(&mut self, state: State) -> Result<bool, JsonError> {
        match state {
            State::Start => {
                self.end_of_input = true;
                Ok(false)
            }
            State::NumZero | State::NumIntDigits | State::NumFracDigits | State::NumExpDigits => {
                self.token = Terminal::Number;
                Ok(true)
            }
            State::LineComment => {
                self.end_of_input = true;
                Ok(false)
            }
            _ => Err(JsonError::new(
                "unexpected end of input while scanning a lexeme",
            )),
        }
    }

    /// Scans raw string content up to (not including) the closing quote
    /// matching the most recently yielded quote terminal, processing
    /// escapes. Leaves the closing quote in the pushback buffer so the next
    /// ordinary `next_token` call yields it.
    pub fn scan_string_content(&mut self) -> Result<(), JsonError> {
        self.string_value.clear();
        let quote = self.last_quote;
        loop {
            let c = self
                .next_char()?
                .ok_or_else(|| JsonError::new("unterminated string literal"))?;
            if c == quote {
                self.push_back(c);
                self.token = Terminal::CharSeq;
                return Ok(());
            }
            if c == '\\' {
                self.scan_escape()?;
                continue;
            }
            self.string_value.push(c);
        }
    }

    fn scan_escape(&mut self) -> Result<(), JsonError> {
        let c = self
            .next_char()?
            .ok_or_else(|| JsonError::new("unterminated escape sequence"))?;
        let resolved = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{C}',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            '/' => '/',
            'u' => return self.scan_unicode_escape(),
            other => return Err(JsonError::unexpected_char(other, self.position)),
        };
        self.string_value.push(resolved);
        Ok(())
    }

    fn scan_unicode_escape(&mut self) -> Result<(), JsonError> {
        let mut value: u32 = 0;
        for _ in 0..4 {
            let c = self
                .next_char()?
                .ok_or_else(|| JsonError::new("unterminated \\u escape"))?;
            let digit = c
                .to_digit(16)
                .ok_or_else(|| JsonError::unexpected_char(c, self.position))?;
            value = value * 16 + digit;
        }
        let resolved = char::from_u32(value)
            .ok_or_else(|| JsonError::new(format!("invalid \\u{:04X} escape", value)))?;
        self.string_value.push(resolved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn lexer(input: &str) -> Lexer<StrSource<'_>> {
        Lexer::new(StrSource::new(input))
    }

    #[test]
    fn recognizes_structural_characters() {
        let mut lx = lexer("{}[],:");
        for expected in [
            Terminal::LeftBrace,
            Terminal::RightBrace,
            Terminal::LeftBracket,
            Terminal::RightBracket,
            Terminal::Comma,
            Terminal::Colon,
        ] {
            assert!(lx.next_token().unwrap());
            assert_eq!(lx.token, expected);
        }
        assert!(!lx.next_token().unwrap());
    }

    #[test]
    fn recognizes_keywords() {
        let mut lx = lexer("true false null");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::True);
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::False);
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Null);
    }

    #[test]
    fn recognizes_numbers_with_pushback() {
        let mut lx = lexer("-12.5e+2,");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Number);
        assert_eq!(lx.string_value, "-12.5e+2");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Comma);
    }

    #[test]
    fn scans_string_content_with_escapes() {
        let mut lx = lexer("\"a\\nb\\u0041\"");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Quote);
        lx.scan_string_content().unwrap();
        assert_eq!(lx.token, Terminal::CharSeq);
        assert_eq!(lx.string_value, "a\nbA");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Quote);
    }

    #[test]
    fn swallows_line_and_block_comments() {
        let mut lx = lexer("/*c*/ true // tail");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::True);
        assert!(!lx.next_token().unwrap());
    }

    #[test]
    fn single_quoted_strings_when_allowed() {
        let mut lx = lexer("'v'");
        assert!(lx.next_token().unwrap());
        assert_eq!(lx.token, Terminal::Quote);
        lx.scan_string_content().unwrap();
        assert_eq!(lx.string_value, "v");
    }

    #[test]
    fn rejects_comments_when_disabled() {
        let mut lx = lexer("// nope\ntrue");
        lx.allow_comments = false;
        assert!(lx.next_token().is_err());
    }
}
