//! Recursive descent parser
//!
//! Builds a [`Code`] tree from the token stream with one token of lookahead
//! and no backtracking:
//!
//! ```text
//! code      := equation (";" code)?
//! equation  := reagent ("->" | "=") reagent
//! reagent   := term ("+" reagent)?
//! term      := COEFF? molecule
//! molecule  := element molecule?
//! element   := (ELEMENT | NAME) subscript?
//! subscript := SUBSCRIPT
//! ```
//!
//! Every chained rule nests on its right, so `A + B + C` becomes
//! `Reagent(A, Reagent(B, Reagent(C)))`. Chains are read in a loop and folded
//! into that shape afterwards, so their length never grows the call stack.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::Options;
use thiserror::Error;
use tracing::trace;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Parse error at line {}, column {}: expected {expected}, found {}",
    .location.line,
    .location.column,
    describe(.found, .lexeme)
)]
pub struct ParseError {
    pub expected: String,
    pub found: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

fn describe(kind: &TokenKind, lexeme: &str) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_string(),
        kind => format!("{} '{}'", kind, lexeme),
    }
}

/// Parse a complete token stream into its [`Code`] root.
pub fn parse(tokens: &[Token], options: &Options) -> Result<Code, ParseError> {
    Parser::new(tokens, options).parse_program()
}

/// Recursive descent parser over a borrowed token slice
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    /// Stands in for a missing trailing `EOF`
    eof: Token,
    print_stack: bool,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token], options: &Options) -> Self {
        let last = tokens
            .last()
            .map_or(SourceLocation::new(1, 1), |token| token.location);
        Self {
            tokens,
            position: 0,
            eof: Token::eof(last),
            print_stack: options.print_stack,
            depth: 0,
        }
    }

    /// Parse the whole program; everything up to `EOF` must be consumed
    pub fn parse_program(&mut self) -> Result<Code, ParseError> {
        let code = self.parse_code()?;

        if !self.is_at_end() {
            return Err(self.error("';' or end of input"));
        }

        Ok(code)
    }

    fn parse_code(&mut self) -> Result<Code, ParseError> {
        self.traced("code", |parser| {
            let equation = parser.parse_equation()?;

            let mut chain = Vec::new();
            while parser.check(TokenKind::EquSep) {
                let separator = parser.advance();
                parser.enter("code");
                chain.push((separator, parser.parse_equation()?));
            }

            // Fold from the right so each link owns the rest of the chain
            let mut rest = None;
            while let Some((separator, equation)) = chain.pop() {
                rest = Some((separator, Box::new(Code { equation, rest })));
            }

            Ok(Code { equation, rest })
        })
    }

    fn parse_equation(&mut self) -> Result<Equation, ParseError> {
        self.traced("equation", |parser| {
            let left = parser.parse_reagent()?;

            let operator = if parser.check(TokenKind::Arrow) || parser.check(TokenKind::Equal) {
                parser.advance()
            } else {
                return Err(parser.error("'->' or '='"));
            };

            let right = parser.parse_reagent()?;

            Ok(Equation {
                left,
                operator,
                right,
            })
        })
    }

    fn parse_reagent(&mut self) -> Result<Reagent, ParseError> {
        self.traced("reagent", |parser| {
            let term = parser.parse_term()?;

            let mut chain = Vec::new();
            while parser.check(TokenKind::Plus) {
                let plus = parser.advance();
                parser.enter("reagent");
                chain.push((plus, parser.parse_term()?));
            }

            let mut rest = None;
            while let Some((plus, term)) = chain.pop() {
                rest = Some((plus, Box::new(Reagent { term, rest })));
            }

            Ok(Reagent { term, rest })
        })
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        self.traced("term", |parser| {
            let coefficient = parser.match_token(TokenKind::Coeff);
            let molecule = parser.parse_molecule()?;
            Ok(Term {
                coefficient,
                molecule,
            })
        })
    }

    fn parse_molecule(&mut self) -> Result<Molecule, ParseError> {
        self.traced("molecule", |parser| {
            let element = parser.parse_element()?;

            let mut chain = Vec::new();
            while parser.check_element() {
                parser.enter("molecule");
                chain.push(parser.parse_element()?);
            }

            let mut rest = None;
            while let Some(element) = chain.pop() {
                rest = Some(Box::new(Molecule { element, rest }));
            }

            Ok(Molecule { element, rest })
        })
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        self.traced("element", |parser| {
            if !parser.check_element() {
                return Err(parser.error("an element or group name"));
            }
            let symbol = parser.advance();

            let subscript = if parser.check(TokenKind::Subscript) {
                Some(parser.parse_subscript()?)
            } else {
                None
            };

            Ok(Element { symbol, subscript })
        })
    }

    fn parse_subscript(&mut self) -> Result<Subscript, ParseError> {
        self.traced("subscript", |parser| {
            let count = parser.expect_token(TokenKind::Subscript, "a subscript")?;
            Ok(Subscript { count })
        })
    }

    // ===== Helper methods =====

    /// Run one grammar rule, reporting entry when stack tracing is on
    fn traced<T>(
        &mut self,
        rule: &'static str,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.enter(rule);
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Report entry into `rule`; chained links report at their head's depth
    fn enter(&self, rule: &'static str) {
        if self.print_stack {
            trace!(
                target: "esoreaction::parser",
                depth = self.depth,
                rule,
                lookahead = %self.peek(),
                "enter"
            );
        }
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_element(&self) -> bool {
        self.check(TokenKind::Element) || self.check(TokenKind::Name)
    }

    /// Consume the current token and return a copy of it
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, ParseError> {
        self.match_token(kind).ok_or_else(|| self.error(expected))
    }

    fn error(&self, expected: &str) -> ParseError {
        let found = self.peek();
        ParseError {
            expected: expected.to_string(),
            found: found.kind,
            lexeme: found.lexeme.clone(),
            location: found.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::scan_tokens;
    use crate::parser::symbols::SymbolTable;

    fn parse_source(source: &str) -> Result<Code, ParseError> {
        let symbols = SymbolTable::from_symbols(["H", "O", "C", "Na", "Cl", "N"]);
        let tokens = scan_tokens(source, &symbols, &Options::default()).unwrap();
        parse(&tokens, &Options::default())
    }

    #[test]
    fn test_parse_simple_equation() {
        let code = parse_source("2H_2 + O_2 -> 2H_2O").unwrap();

        assert!(code.rest.is_none());
        let equation = &code.equation;
        assert!(equation.is_reaction());
        assert_eq!(equation.operator.lexeme, "->");

        let left: Vec<&Term> = equation.left.terms().collect();
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].multiplicity(), 2);
        assert!(left[1].coefficient.is_none());
        assert_eq!(left[1].multiplicity(), 1);

        let right: Vec<&Term> = equation.right.terms().collect();
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].coefficient.as_ref().unwrap().lexeme, "2");
        let elements: Vec<&str> = right[0]
            .molecule
            .elements()
            .map(|e| e.symbol.lexeme.as_str())
            .collect();
        assert_eq!(elements, vec!["H", "O"]);
    }

    #[test]
    fn test_parse_molecule_shape() {
        let code = parse_source("H_2O = H").unwrap();
        let molecule = &code.equation.left.term.molecule;

        assert_eq!(molecule.element.symbol.lexeme, "H");
        assert_eq!(molecule.element.multiplicity(), 2);
        let rest = molecule.rest.as_ref().unwrap();
        assert_eq!(rest.element.symbol.lexeme, "O");
        assert!(rest.element.subscript.is_none());
        assert!(rest.rest.is_none());
    }

    #[test]
    fn test_parse_separator_nests_right() {
        let code = parse_source("H = O; C -> N; Na = Cl").unwrap();

        assert_eq!(code.equations().count(), 3);
        assert_eq!(code.equation.operator.kind, TokenKind::Equal);
        let second = code.next().unwrap();
        assert!(second.equation.is_reaction());
        let third = second.next().unwrap();
        assert!(third.next().is_none());
        assert_eq!(code.rest.as_ref().unwrap().0.kind, TokenKind::EquSep);
    }

    #[test]
    fn test_parse_group_name() {
        let code = parse_source("Na(OH)_2 = Na").unwrap();
        let molecule = &code.equation.left.term.molecule;
        let group = &molecule.rest.as_ref().unwrap().element;
        assert!(group.is_group());
        assert_eq!(group.symbol.lexeme, "OH");
        assert_eq!(group.multiplicity(), 2);
    }

    #[test]
    fn test_missing_operator() {
        let err = parse_source("H O").unwrap_err();
        assert_eq!(err.expected, "'->' or '='");
        assert_eq!(err.found, TokenKind::Eof);
    }

    #[test]
    fn test_dangling_plus() {
        let err = parse_source("Na = Na +").unwrap_err();
        assert_eq!(err.expected, "an element or group name");
        assert_eq!(err.found, TokenKind::Eof);
        assert_eq!(err.location.line, 1);
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_source("H = O = C").unwrap_err();
        assert_eq!(err.expected, "';' or end of input");
        assert_eq!(err.found, TokenKind::Equal);
        assert_eq!(err.location.column, 7);
    }

    #[test]
    fn test_coefficient_without_molecule() {
        let err = parse_source("2 -> H").unwrap_err();
        assert_eq!(err.found, TokenKind::Arrow);
        assert_eq!(err.lexeme, "->");
    }

    #[test]
    fn test_empty_input() {
        let err = parse_source("").unwrap_err();
        assert_eq!(err.found, TokenKind::Eof);
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 1: expected an element or group name, found end of input"
        );
    }

    #[test]
    fn test_missing_eof_token() {
        let err = parse(&[], &Options::default()).unwrap_err();
        assert_eq!(err.found, TokenKind::Eof);
    }

    #[test]
    fn test_error_names_found_token() {
        let err = parse_source("H = ;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 5: expected an element or group name, found EQUSEP ';'"
        );
    }
}
