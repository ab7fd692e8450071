// AST (Abstract Syntax Tree) definitions for the equation language
//
// Every node is built once by the parser and owns its children. The chains
// (`Code`, `Reagent`, `Molecule`) are right-recursive: the first link holds
// the head item and the rest of the chain is its right child. Chains are
// dropped link by link so that a long chain cannot exhaust the stack.

use super::lexer::{Token, TokenKind};
use std::iter;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One or more equations joined by `;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub equation: Equation,
    /// The separator token and the code that follows it
    pub rest: Option<(Token, Box<Code>)>,
}

impl Code {
    /// Equations in source order.
    pub fn equations(&self) -> impl Iterator<Item = &Equation> {
        iter::successors(Some(self), |code| code.next()).map(|code| &code.equation)
    }

    /// The chained code after the separator, if any.
    pub fn next(&self) -> Option<&Code> {
        self.rest.as_ref().map(|(_, code)| code.as_ref())
    }
}

impl Drop for Code {
    fn drop(&mut self) {
        let mut rest = self.rest.take();
        while let Some((_, mut code)) = rest {
            rest = code.rest.take();
        }
    }
}

/// `reagent (-> | =) reagent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub left: Reagent,
    pub operator: Token,
    pub right: Reagent,
}

impl Equation {
    /// True for `->` (a reaction), false for `=` (an assignment).
    pub fn is_reaction(&self) -> bool {
        self.operator.kind == TokenKind::Arrow
    }
}

/// Terms joined by `+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reagent {
    pub term: Term,
    /// The `+` token and the reagent that follows it
    pub rest: Option<(Token, Box<Reagent>)>,
}

impl Reagent {
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        iter::successors(Some(self), |reagent| reagent.next()).map(|reagent| &reagent.term)
    }

    pub fn next(&self) -> Option<&Reagent> {
        self.rest.as_ref().map(|(_, reagent)| reagent.as_ref())
    }
}

impl Drop for Reagent {
    fn drop(&mut self) {
        let mut rest = self.rest.take();
        while let Some((_, mut reagent)) = rest {
            rest = reagent.rest.take();
        }
    }
}

/// A molecule with an optional stoichiometric coefficient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub coefficient: Option<Token>,
    pub molecule: Molecule,
}

impl Term {
    /// The coefficient's value, 1 when it was omitted.
    pub fn multiplicity(&self) -> u64 {
        self.coefficient
            .as_ref()
            .and_then(|token| token.literal)
            .unwrap_or(1)
    }
}

/// Elements written next to each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molecule {
    pub element: Element,
    pub rest: Option<Box<Molecule>>,
}

impl Molecule {
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        iter::successors(Some(self), |molecule| molecule.rest.as_deref())
            .map(|molecule| &molecule.element)
    }
}

impl Drop for Molecule {
    fn drop(&mut self) {
        let mut rest = self.rest.take();
        while let Some(mut molecule) = rest {
            rest = molecule.rest.take();
        }
    }
}

/// An element symbol (or parenthesized group name) with an optional subscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub symbol: Token,
    pub subscript: Option<Subscript>,
}

impl Element {
    /// The subscript's value, 1 when it was omitted.
    pub fn multiplicity(&self) -> u64 {
        self.subscript.as_ref().map_or(1, Subscript::value)
    }

    /// True when the element came from a `(NAME)` group.
    pub fn is_group(&self) -> bool {
        self.symbol.kind == TokenKind::Name
    }
}

/// The `_N` suffix of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscript {
    pub count: Token,
}

impl Subscript {
    pub fn value(&self) -> u64 {
        self.count.literal.unwrap_or(1)
    }
}

/// Borrowed view over any AST node.
///
/// Operations over the tree (printing, the inspector's tree pane) match on
/// this enum exhaustively, so a new node type cannot be silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Code(&'a Code),
    Equation(&'a Equation),
    Reagent(&'a Reagent),
    Term(&'a Term),
    Molecule(&'a Molecule),
    Element(&'a Element),
    Subscript(&'a Subscript),
}

impl<'a> Node<'a> {
    /// Direct child nodes, in source order.
    pub fn children(self) -> Vec<Node<'a>> {
        match self {
            Node::Code(code) => {
                let mut children = vec![Node::Equation(&code.equation)];
                children.extend(code.next().map(Node::Code));
                children
            }
            Node::Equation(equation) => {
                vec![Node::Reagent(&equation.left), Node::Reagent(&equation.right)]
            }
            Node::Reagent(reagent) => {
                let mut children = vec![Node::Term(&reagent.term)];
                children.extend(reagent.next().map(Node::Reagent));
                children
            }
            Node::Term(term) => vec![Node::Molecule(&term.molecule)],
            Node::Molecule(molecule) => {
                let mut children = vec![Node::Element(&molecule.element)];
                children.extend(molecule.rest.as_deref().map(Node::Molecule));
                children
            }
            Node::Element(element) => element.subscript.iter().map(Node::Subscript).collect(),
            Node::Subscript(_) => Vec::new(),
        }
    }

    /// Line of the first token belonging to this node.
    pub fn line(self) -> usize {
        match self {
            Node::Code(code) => Node::Equation(&code.equation).line(),
            Node::Equation(equation) => Node::Reagent(&equation.left).line(),
            Node::Reagent(reagent) => Node::Term(&reagent.term).line(),
            Node::Term(term) => match &term.coefficient {
                Some(token) => token.line(),
                None => Node::Molecule(&term.molecule).line(),
            },
            Node::Molecule(molecule) => molecule.element.symbol.line(),
            Node::Element(element) => element.symbol.line(),
            Node::Subscript(subscript) => subscript.count.line(),
        }
    }
}

macro_rules! node_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $variant> for Node<'a> {
                fn from(node: &'a $variant) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

node_from!(Code, Equation, Reagent, Term, Molecule, Element, Subscript);
