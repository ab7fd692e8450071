//! Lexer (tokenizer) for equation source text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Element symbols are recognized by longest match against a [`SymbolTable`]:
//! the two-letter candidate is tried before the one-letter one, so `Cl` is
//! chlorine rather than carbon followed by a stray `l`.

use super::ast::SourceLocation;
use super::symbols::SymbolTable;
use super::Options;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Multi-letter words lexed as elements without a table lookup.
pub const KEYWORDS: [&str; 2] = ["heat", "light"];

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EquSep,    // ;
    Equal,     // =
    Arrow,     // ->
    Plus,      // +
    Element,   // H, Cl, heat
    Name,      // (OH)
    Coeff,     // 2
    Subscript, // _2
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::EquSep => "EQUSEP",
            TokenKind::Equal => "EQUAL",
            TokenKind::Arrow => "ARROW",
            TokenKind::Plus => "PLUS",
            TokenKind::Element => "ELEMENT",
            TokenKind::Name => "NAME",
            TokenKind::Coeff => "COEFF",
            TokenKind::Subscript => "SUBSCRIPT",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A token produced by the lexer.
///
/// `lexeme` is the matched source text, except for `NAME` (the text between
/// the parentheses) and `SUBSCRIPT` (the digits after `_`). `literal` is set
/// for `COEFF` and `SUBSCRIPT` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<u64>,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        literal: Option<u64>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal,
            location,
        }
    }

    /// The end-of-input marker.
    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::Eof, "", None, location)
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}, '{}'", self.location.line, self.kind, self.lexeme)?;
        if let Some(literal) = self.literal {
            write!(f, ", {}", literal)?;
        }
        f.write_str(">")
    }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated group name '({0}'")]
    UnterminatedName(String),
    #[error("subscript marker '_' is not followed by digits")]
    EmptySubscript,
    #[error("expected '>' after '-'")]
    DanglingMinus,
    #[error("unknown element symbol '{0}'")]
    UnknownSymbol(String),
    #[error("integer literal '{0}' is too large")]
    IntegerOverflow(String),
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {kind}", .location.line, .location.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

/// Scan `source` into tokens, ending with a single `EOF`.
///
/// Stops at the first lexical error.
pub fn scan_tokens(
    source: &str,
    symbols: &SymbolTable,
    options: &Options,
) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, symbols, options.debug).tokenize()
}

/// Scan state for a single call to [`scan_tokens`].
struct Lexer<'a> {
    input: Vec<char>,
    symbols: &'a SymbolTable,
    debug: bool,
    start: usize,
    start_location: SourceLocation,
    current: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &str, symbols: &'a SymbolTable, debug: bool) -> Self {
        Self {
            input: input.chars().collect(),
            symbols,
            debug,
            start: 0,
            start_location: SourceLocation::new(1, 1),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            self.start = self.current;
            self.start_location = self.current_location();

            let Some(ch) = self.advance() else {
                tokens.push(Token::eof(self.current_location()));
                break;
            };

            let token = self.next_token(ch)?;
            if self.debug {
                debug!(target: "esoreaction::lexer", %token, "token");
            }
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Scan the token starting with the already consumed `ch`
    fn next_token(&mut self, ch: char) -> Result<Token, LexError> {
        match ch {
            '=' => Ok(self.make_token(TokenKind::Equal)),
            ';' => Ok(self.make_token(TokenKind::EquSep)),
            '+' => Ok(self.make_token(TokenKind::Plus)),
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    Ok(self.make_token(TokenKind::Arrow))
                } else {
                    Err(self.error(LexErrorKind::DanglingMinus))
                }
            }
            '_' => self.subscript(),
            '0'..='9' => self.coefficient(),
            '(' => self.group_name(),
            c if c.is_ascii_alphabetic() => self.element(),
            c => Err(self.error(LexErrorKind::UnexpectedCharacter(c))),
        }
    }

    /// `_` followed by one or more digits
    fn subscript(&mut self) -> Result<Token, LexError> {
        let digits = self.digits();
        if digits.is_empty() {
            return Err(self.error(LexErrorKind::EmptySubscript));
        }
        let value = self.decode(&digits)?;
        Ok(Token::new(
            TokenKind::Subscript,
            digits,
            Some(value),
            self.start_location,
        ))
    }

    /// A run of digits whose first digit is already consumed
    fn coefficient(&mut self) -> Result<Token, LexError> {
        self.digits();
        let lexeme = self.lexeme();
        let value = self.decode(&lexeme)?;
        Ok(Token::new(
            TokenKind::Coeff,
            lexeme,
            Some(value),
            self.start_location,
        ))
    }

    /// `(` ... `)`, not nested
    fn group_name(&mut self) -> Result<Token, LexError> {
        loop {
            match self.advance() {
                Some(')') => break,
                Some(_) => {}
                None => {
                    let interior = self.slice(self.start + 1, self.current);
                    return Err(self.error(LexErrorKind::UnterminatedName(interior)));
                }
            }
        }

        let name = self.slice(self.start + 1, self.current - 1);
        Ok(Token::new(TokenKind::Name, name, None, self.start_location))
    }

    /// Keyword, two-letter symbol or one-letter symbol, in that order
    fn element(&mut self) -> Result<Token, LexError> {
        for keyword in KEYWORDS {
            if self.starts_with_at(self.start, keyword) {
                for _ in 1..keyword.chars().count() {
                    self.advance();
                }
                return Ok(self.make_token(TokenKind::Element));
            }
        }

        let two_letters = match self.peek() {
            Some(next) if next.is_ascii_alphabetic() => {
                let candidate = self.slice(self.start, self.start + 2);
                if self.symbols.contains(&candidate) {
                    self.advance();
                    return Ok(self.make_token(TokenKind::Element));
                }
                Some(candidate)
            }
            _ => None,
        };

        let one_letter = self.lexeme();
        if self.symbols.contains(&one_letter) {
            return Ok(self.make_token(TokenKind::Element));
        }

        Err(self.error(LexErrorKind::UnknownSymbol(
            two_letters.unwrap_or(one_letter),
        )))
    }

    fn digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }
        digits
    }

    fn decode(&self, digits: &str) -> Result<u64, LexError> {
        digits
            .parse::<u64>()
            .map_err(|_| self.error(LexErrorKind::IntegerOverflow(digits.to_string())))
    }

    /// Skip spaces, tabs, carriage returns and newlines
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    fn starts_with_at(&self, position: usize, word: &str) -> bool {
        let mut index = position;
        for expected in word.chars() {
            if self.input.get(index) != Some(&expected) {
                return false;
            }
            index += 1;
        }
        true
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), None, self.start_location)
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            location: self.start_location,
        }
    }

    /// Source text of the current token so far
    fn lexeme(&self) -> String {
        self.slice(self.start, self.current)
    }

    fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.input.len());
        self.input[from.min(to)..to].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.current)?;
        self.current += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        if self.debug {
            trace!(target: "esoreaction::lexer", ?ch, line = self.line, "consume");
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> SymbolTable {
        SymbolTable::from_symbols(["H", "He", "C", "Cl", "Na", "O", "N", "S"])
    }

    fn scan(source: &str) -> Result<Vec<Token>, LexError> {
        scan_tokens(source, &symbols(), &Options::default())
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = scan("H_2O").unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Element);
        assert_eq!(tokens[0].lexeme, "H");
        assert_eq!(tokens[1].kind, TokenKind::Subscript);
        assert_eq!(tokens[1].lexeme, "2");
        assert_eq!(tokens[1].literal, Some(2));
        assert_eq!(tokens[2].kind, TokenKind::Element);
        assert_eq!(tokens[2].lexeme, "O");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
        assert_eq!(tokens[3].lexeme, "");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= -> + ;"),
            vec![
                TokenKind::Equal,
                TokenKind::Arrow,
                TokenKind::Plus,
                TokenKind::EquSep,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_longest_match() {
        let tokens = scan("NaCl").unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["Na", "Cl", ""]);

        // "CO" is not a symbol, so it falls back to one letter at a time
        let tokens = scan("CO").unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["C", "O", ""]);
    }

    #[test]
    fn test_keywords() {
        let tokens = scan("heat + light").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Element);
        assert_eq!(tokens[0].lexeme, "heat");
        assert_eq!(tokens[2].kind, TokenKind::Element);
        assert_eq!(tokens[2].lexeme, "light");
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_coefficient_literal() {
        let tokens = scan("12H").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Coeff);
        assert_eq!(tokens[0].lexeme, "12");
        assert_eq!(tokens[0].literal, Some(12));
        assert_eq!(tokens[1].literal, None);
    }

    #[test]
    fn test_group_name() {
        let tokens = scan("Na(OH)_2").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].lexeme, "OH");
        assert_eq!(tokens[2].kind, TokenKind::Subscript);
    }

    #[test]
    fn test_line_tracking() {
        let tokens = scan("H = H;\n\nO -> O").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line()).collect();
        assert_eq!(lines, vec![1, 1, 1, 1, 3, 3, 3, 3]);
        assert_eq!(tokens[4].location.column, 1);
        assert_eq!(tokens[5].location.column, 3);
    }

    #[test]
    fn test_newline_inside_group_name() {
        let tokens = scan("(O\nH) = H").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[0].lexeme, "O\nH");
        assert_eq!(tokens[0].line(), 1);

        let rest: Vec<(TokenKind, usize)> = tokens[1..].iter().map(|t| (t.kind, t.line())).collect();
        assert_eq!(
            rest,
            vec![
                (TokenKind::Equal, 2),
                (TokenKind::Element, 2),
                (TokenKind::Eof, 2)
            ]
        );
        assert_eq!(tokens[2].lexeme, "H");
    }

    #[test]
    fn test_eof_on_last_line() {
        let tokens = scan("H\n").unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.last().unwrap().line(), 2);

        let tokens = scan("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].line(), 1);
    }

    #[test]
    fn test_dangling_minus() {
        let err = scan("H - O").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::DanglingMinus);
        assert_eq!(err.location, SourceLocation::new(1, 3));
    }

    #[test]
    fn test_empty_subscript() {
        let err = scan("\nH_O").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::EmptySubscript);
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn test_unterminated_name() {
        let err = scan("Na(OH").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedName("OH".to_string()));
    }

    #[test]
    fn test_unknown_symbol() {
        let err = scan("H + Xy").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnknownSymbol("Xy".to_string()));
        assert_eq!(err.location.column, 5);

        let err = scan("Q_2").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnknownSymbol("Q".to_string()));
    }

    #[test]
    fn test_unexpected_character() {
        let err = scan("H * O").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('*'));
    }

    #[test]
    fn test_integer_overflow() {
        let err = scan("99999999999999999999999H").unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::IntegerOverflow(_)));
    }

    #[test]
    fn test_error_display() {
        let err = scan("H - O").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Lexer error at line 1, column 3: expected '>' after '-'"
        );
    }

    #[test]
    fn test_token_display() {
        let tokens = scan("2H").unwrap();
        assert_eq!(tokens[0].to_string(), "<1: COEFF, '2', 2>");
        assert_eq!(tokens[1].to_string(), "<1: ELEMENT, 'H'>");
    }
}
