use crate::token::{Nonterminal, Symbol, Terminal, NONTERMINAL_COUNT, TERMINAL_COUNT};
use once_cell::sync::Lazy;

/// `T[nonterminal][terminal] -> production`, built once and shared across
/// every `Reader` instance. `None` means no production applies (a parse
/// error); `Some(&[])` is the `EPSILON` production.
pub type Production = Option<&'static [Symbol]>;

type Row = [Production; TERMINAL_COUNT];
type Table = [Row; NONTERMINAL_COUNT];

const EMPTY_ROW: Row = [None; TERMINAL_COUNT];

const VALUE_STARTERS: [Terminal; 7] = [
    Terminal::Quote,
    Terminal::Number,
    Terminal::True,
    Terminal::False,
    Terminal::Null,
    Terminal::LeftBrace,
    Terminal::LeftBracket,
];

static TEXT_TO_VALUE: [Symbol; 1] = [Symbol::N(Nonterminal::Value)];
static VALUE_TO_STRING: [Symbol; 1] = [Symbol::N(Nonterminal::StringLit)];
static VALUE_TO_NUMBER: [Symbol; 1] = [Symbol::T(Terminal::Number)];
static VALUE_TO_TRUE: [Symbol; 1] = [Symbol::T(Terminal::True)];
static VALUE_TO_FALSE: [Symbol; 1] = [Symbol::T(Terminal::False)];
static VALUE_TO_NULL: [Symbol; 1] = [Symbol::T(Terminal::Null)];
static VALUE_TO_OBJECT: [Symbol; 1] = [Symbol::N(Nonterminal::Object)];
static VALUE_TO_ARRAY: [Symbol; 1] = [Symbol::N(Nonterminal::Array)];

static OBJECT_PRODUCTION: [Symbol; 2] = [
    Symbol::T(Terminal::LeftBrace),
    Symbol::N(Nonterminal::ObjectRest),
];
static OBJECT_REST_EMPTY: [Symbol; 1] = [Symbol::T(Terminal::RightBrace)];
static OBJECT_REST_PAIRS: [Symbol; 3] = [
    Symbol::N(Nonterminal::Pair),
    Symbol::N(Nonterminal::PairRest),
    Symbol::T(Terminal::RightBrace),
];

static PAIR_PRODUCTION: [Symbol; 3] = [
    Symbol::N(Nonterminal::StringLit),
    Symbol::T(Terminal::Colon),
    Symbol::N(Nonterminal::Value),
];
static PAIR_REST_MORE: [Symbol; 3] = [
    Symbol::T(Terminal::Comma),
    Symbol::N(Nonterminal::Pair),
    Symbol::N(Nonterminal::PairRest),
];

static ARRAY_PRODUCTION: [Symbol; 2] = [
    Symbol::T(Terminal::LeftBracket),
    Symbol::N(Nonterminal::ArrayRest),
];
static ARRAY_REST_EMPTY: [Symbol; 1] = [Symbol::T(Terminal::RightBracket)];
static ARRAY_REST_VALUES: [Symbol; 3] = [
    Symbol::N(Nonterminal::Value),
    Symbol::N(Nonterminal::ValueRest),
    Symbol::T(Terminal::RightBracket),
];

static VALUE_REST_MORE: [Symbol; 3] = [
    Symbol::T(Terminal::Comma),
    Symbol::N(Nonterminal::Value),
    Symbol::N(Nonterminal::ValueRest),
];

static STRING_PRODUCTION: [Symbol; 3] = [
    Symbol::T(Terminal::Quote),
    Symbol::T(Terminal::CharSeq),
    Symbol::T(Terminal::Quote),
];

fn build_table() -> Table {
    let mut table: Table = [EMPTY_ROW; NONTERMINAL_COUNT];

    for t in VALUE_STARTERS {
        table[Nonterminal::Text.index()][t.index()] = Some(&TEXT_TO_VALUE);
    }

    table[Nonterminal::Value.index()][Terminal::Quote.index()] = Some(&VALUE_TO_STRING);
    table[Nonterminal::Value.index()][Terminal::Number.index()] = Some(&VALUE_TO_NUMBER);
    table[Nonterminal::Value.index()][Terminal::True.index()] = Some(&VALUE_TO_TRUE);
    table[Nonterminal::Value.index()][Terminal::False.index()] = Some(&VALUE_TO_FALSE);
    table[Nonterminal::Value.index()][Terminal::Null.index()] = Some(&VALUE_TO_NULL);
    table[Nonterminal::Value.index()][Terminal::LeftBrace.index()] = Some(&VALUE_TO_OBJECT);
    table[Nonterminal::Value.index()][Terminal::LeftBracket.index()] = Some(&VALUE_TO_ARRAY);

    table[Nonterminal::Object.index()][Terminal::LeftBrace.index()] = Some(&OBJECT_PRODUCTION);

    table[Nonterminal::ObjectRest.index()][Terminal::RightBrace.index()] =
        Some(&OBJECT_REST_EMPTY);
    table[Nonterminal::ObjectRest.index()][Terminal::Quote.index()] = Some(&OBJECT_REST_PAIRS);

    table[Nonterminal::Pair.index()][Terminal::Quote.index()] = Some(&PAIR_PRODUCTION);

    table[Nonterminal::PairRest.index()][Terminal::RightBrace.index()] = Some(&[]);
    table[Nonterminal::PairRest.index()][Terminal::Comma.index()] = Some(&PAIR_REST_MORE);

    table[Nonterminal::Array.index()][Terminal::LeftBracket.index()] = Some(&ARRAY_PRODUCTION);

    table[Nonterminal::ArrayRest.index()][Terminal::RightBracket.index()] =
        Some(&ARRAY_REST_EMPTY);
    for t in VALUE_STARTERS {
        table[Nonterminal::ArrayRest.index()][t.index()] = Some(&ARRAY_REST_VALUES);
    }

    table[Nonterminal::ValueRest.index()][Terminal::RightBracket.index()] = Some(&[]);
    table[Nonterminal::ValueRest.index()][Terminal::Comma.index()] = Some(&VALUE_REST_MORE);

    table[Nonterminal::StringLit.index()][Terminal::Quote.index()] = Some(&STRING_PRODUCTION);

    table
}

static TABLE: Lazy<Table> = Lazy::new(build_table);

/// Looks up `T[nonterminal][terminal]`. `None` means the terminal is
/// unexpected in this nonterminal's position.
pub fn lookup(nonterminal: Nonterminal, terminal: Terminal) -> Production {
    TABLE[nonterminal.index()][terminal.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_predicts_value_on_every_value_starter() {
        for t in VALUE_STARTERS {
            assert!(lookup(Nonterminal::Text, t).is_some());
        }
        assert!(lookup(Nonterminal::Text, Terminal::Comma).is_none());
    }

    #[test]
    fn pair_rest_has_an_epsilon_production_before_closing_brace() {
        let production = lookup(Nonterminal::PairRest, Terminal::RightBrace);
        assert_eq!(production, Some(&[][..]));
    }

    #[test]
    fn object_rest_distinguishes_empty_from_populated() {
        assert_eq!(
            lookup(Nonterminal::ObjectRest, Terminal::RightBrace),
            Some(&OBJECT_REST_EMPTY[..])
        );
        assert_eq!(
            lookup(Nonterminal::ObjectRest, Terminal::Quote),
            Some(&OBJECT_REST_PAIRS[..])
        );
    }
}
