//! Canonical text rendering of the AST
//!
//! Each node prints as `(label child ...)` with absent optional children left
//! out. Only token text is printed; an omitted coefficient or subscript is
//! never rendered as an implicit `1`.
//!
//! ```text
//! 2H_2 + O_2 -> 2H_2O
//! (; (-> (+ (term 2 (molecule (H 2))) (+ (term (molecule (O 2)))))
//!        (+ (term 2 (molecule (H 2) (molecule (O)))))))
//! ```

use super::ast::*;
use std::fmt;

/// Label of a `Code` node; the separator token itself is not stored when a
/// program has a single equation.
const CODE_LABEL: &str = ";";
const REAGENT_LABEL: &str = "+";
const TERM_LABEL: &str = "term";
const MOLECULE_LABEL: &str = "molecule";

/// Render any node in canonical form.
pub fn print<'a>(node: impl Into<Node<'a>>) -> String {
    let mut out = String::new();
    // Output still to write, next item on top
    let mut work = vec![Work::Node(node.into())];

    while let Some(item) = work.pop() {
        match item {
            Work::Space => out.push(' '),
            Work::Close => out.push(')'),
            Work::Text(text) => out.push_str(text),
            Work::Node(Node::Subscript(subscript)) => out.push_str(&subscript.count.lexeme),
            Work::Node(node) => {
                let (label, children) = layout(node);
                out.push('(');
                out.push_str(label);
                work.push(Work::Close);
                for child in children.into_iter().rev() {
                    work.push(child);
                    work.push(Work::Space);
                }
            }
        }
    }

    out
}

enum Work<'a> {
    Node(Node<'a>),
    Text(&'a str),
    Space,
    Close,
}

/// Label and children of a parenthesized node
fn layout(node: Node<'_>) -> (&str, Vec<Work<'_>>) {
    match node {
        Node::Code(code) => {
            let mut children = vec![Work::Node(Node::Equation(&code.equation))];
            children.extend(code.next().map(|next| Work::Node(Node::Code(next))));
            (CODE_LABEL, children)
        }
        Node::Equation(equation) => (
            &equation.operator.lexeme,
            vec![
                Work::Node(Node::Reagent(&equation.left)),
                Work::Node(Node::Reagent(&equation.right)),
            ],
        ),
        Node::Reagent(reagent) => {
            let mut children = vec![Work::Node(Node::Term(&reagent.term))];
            children.extend(reagent.next().map(|next| Work::Node(Node::Reagent(next))));
            (REAGENT_LABEL, children)
        }
        Node::Term(term) => {
            let mut children = Vec::with_capacity(2);
            if let Some(coefficient) = &term.coefficient {
                children.push(Work::Text(&coefficient.lexeme));
            }
            children.push(Work::Node(Node::Molecule(&term.molecule)));
            (TERM_LABEL, children)
        }
        Node::Molecule(molecule) => {
            let mut children = vec![Work::Node(Node::Element(&molecule.element))];
            children.extend(
                molecule
                    .rest
                    .as_deref()
                    .map(|rest| Work::Node(Node::Molecule(rest))),
            );
            (MOLECULE_LABEL, children)
        }
        Node::Element(element) => (
            &element.symbol.lexeme,
            element
                .subscript
                .iter()
                .map(|subscript| Work::Node(Node::Subscript(subscript)))
                .collect(),
        ),
        Node::Subscript(subscript) => (&subscript.count.lexeme, Vec::new()),
    }
}

macro_rules! display_via_printer {
    ($($node:ident),* $(,)?) => {
        $(
            impl fmt::Display for $node {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&print(self))
                }
            }
        )*
    };
}

display_via_printer!(Code, Equation, Reagent, Term, Molecule, Element, Subscript);

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(*self))
    }
}
