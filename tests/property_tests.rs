//! Property-based tests for the lexer, parser and printer.
//!
//! Programs are generated from the grammar, so each one is known to be valid
//! and its number of lexical units is known in advance:
//!
//! 1. **Generated programs parse** and print the same text every time
//! 2. **Token count** equals the generated lexical units plus one `EOF`
//! 3. **Lines never decrease** along the token stream
//! 4. **EOF is always last**, and appears exactly once, for any input that scans
//! 5. **Longest match** picks the two-letter symbol over its one-letter prefix

use esoreaction::elements::periodic_table;
use esoreaction::parser::{parse_source, print, scan_tokens, Options, TokenKind, KEYWORDS};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Symbols and group names that may appear next to each other in a molecule.
const ELEMENTS: &[&str] = &[
    "H", "He", "C", "Cl", "Na", "O", "N", "S", "Fe", "Co", "(OH)", "(SO4)", "(NH4)", "()",
];

/// Two-letter symbols whose first letter is itself a symbol.
const PREFIXED_SYMBOLS: &[&str] = &[
    "He", "Hf", "Cl", "Ca", "Co", "Cu", "Na", "Nb", "Fe", "Si", "Sn", "Os", "Pb", "Bi",
];

const OPERATORS: &[&str] = &["->", "="];

const SEPARATORS: &[&str] = &[";", "; ", ";\n", " ;\n\n"];

/// Program text with the number of non-EOF tokens it scans to.
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    tokens: usize,
}

impl Fragment {
    fn new(text: impl Into<String>, tokens: usize) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }

    /// Join fragments; a non-blank separator counts as one token per use.
    fn join(parts: Vec<Fragment>, separator: &str) -> Self {
        let separators = if separator.trim().is_empty() {
            0
        } else {
            parts.len().saturating_sub(1)
        };
        Self {
            tokens: parts.iter().map(|p| p.tokens).sum::<usize>() + separators,
            text: parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join(separator),
        }
    }
}

fn element() -> impl Strategy<Value = Fragment> {
    (prop::sample::select(ELEMENTS), prop::option::of(0u64..100)).prop_map(
        |(symbol, subscript)| match subscript {
            Some(n) => Fragment::new(format!("{symbol}_{n}"), 2),
            None => Fragment::new(symbol, 1),
        },
    )
}

/// A run of elements, or a keyword standing alone
fn molecule() -> impl Strategy<Value = Fragment> {
    prop_oneof![
        prop::collection::vec(element(), 1..4).prop_map(|parts| Fragment::join(parts, "")),
        prop::sample::select(KEYWORDS.to_vec()).prop_map(|keyword| Fragment::new(keyword, 1)),
    ]
}

fn term() -> impl Strategy<Value = Fragment> {
    (prop::option::of(1u64..50), molecule()).prop_map(|(coefficient, molecule)| match coefficient {
        Some(n) => Fragment::new(format!("{n}{}", molecule.text), molecule.tokens + 1),
        None => molecule,
    })
}

fn reagent() -> impl Strategy<Value = Fragment> {
    prop::collection::vec(term(), 1..4).prop_map(|terms| Fragment::join(terms, " + "))
}

fn equation() -> impl Strategy<Value = Fragment> {
    (reagent(), prop::sample::select(OPERATORS), reagent()).prop_map(
        |(left, operator, right)| {
            Fragment::new(
                format!("{} {} {}", left.text, operator, right.text),
                left.tokens + right.tokens + 1,
            )
        },
    )
}

/// A whole program plus the number of equations in it
fn program() -> impl Strategy<Value = (Fragment, usize)> {
    (
        prop::collection::vec(equation(), 1..4),
        prop::sample::select(SEPARATORS),
    )
        .prop_map(|(equations, separator)| {
            let count = equations.len();
            (Fragment::join(equations, separator), count)
        })
}

// ============================================================================
// Property tests
// ============================================================================

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: generated programs parse, and printing is deterministic.
    #[test]
    fn generated_programs_parse((program, equations) in program()) {
        let table = periodic_table();
        let options = Options::default();

        let first = parse_source(&program.text, &table, &options);
        prop_assert!(first.is_ok(), "{:?} failed: {:?}", program.text, first);
        let first = first.unwrap();
        let second = parse_source(&program.text, &table, &options).unwrap();

        prop_assert_eq!(first.equations().count(), equations);
        prop_assert_eq!(print(&first), print(&first));
        prop_assert_eq!(print(&first), print(&second));
    }

    /// Property 2: one token per lexical unit, plus the EOF.
    #[test]
    fn token_count_matches_units((program, _) in program()) {
        let tokens = scan_tokens(&program.text, &periodic_table(), &Options::default()).unwrap();
        prop_assert_eq!(tokens.len(), program.tokens + 1, "for {:?}", program.text);
    }

    /// Property 3: token lines are non-decreasing.
    #[test]
    fn token_lines_non_decreasing((program, _) in program()) {
        let tokens = scan_tokens(&program.text, &periodic_table(), &Options::default()).unwrap();
        for window in tokens.windows(2) {
            prop_assert!(window[0].location.line <= window[1].location.line);
        }
        let last_line = program.text.matches('\n').count() + 1;
        prop_assert_eq!(tokens.last().map(|t| t.location.line), Some(last_line));
    }

    /// Property 4: any input that scans ends with exactly one EOF.
    #[test]
    fn eof_always_last(input in "\\PC{0,200}") {
        if let Ok(tokens) = scan_tokens(&input, &periodic_table(), &Options::default()) {
            let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
            prop_assert_eq!(eofs, 1);
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        }
    }

    /// Property 5: the two-letter symbol wins over its one-letter prefix.
    #[test]
    fn longest_match(symbol in prop::sample::select(PREFIXED_SYMBOLS)) {
        let tokens = scan_tokens(symbol, &periodic_table(), &Options::default()).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::Element);
        prop_assert_eq!(tokens[0].lexeme.as_str(), symbol);
    }
}
