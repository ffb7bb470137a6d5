//! Concrete parse tree produced by the parser.
//!
//! Every grammar production becomes a [`Tree`] tagged with its [`Rule`].
//! Children are positional: optional clauses that were not written occupy
//! their slot as [`Child::Absent`], so the AST builder can map slots to
//! fields without looking at keywords again.
//!
//! Slot layout per rule:
//!
//! | Rule | Children |
//! |------|----------|
//! | `Controller` | value |
//! | `RemoteController` | NAME, STRING (host), NUMBER (port) |
//! | `Host` | NAME, ip?, image, mac?, ports?, port_bindings?, env?, cmd? |
//! | `Switch`, `Ping` | NAME+ |
//! | `Link` | NAME, src, dst, port1?, port2?, cls?, delay?, bw? |
//! | `Intent` | NAME, NAME+ |
//! | `Up`, `Down` | (none) |
//! | `Array` | value* |
//! | `Object` | `Pair`* |
//! | `Pair` | STRING, value |
//! | `IntMap` | `IntPair`* |
//! | `IntPair` | NUMBER, NUMBER |

use super::lexer::Token;

/// Grammar productions that survive into the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Controller,
    RemoteController,
    Host,
    Switch,
    Link,
    Intent,
    Up,
    Down,
    Ping,
    Array,
    Object,
    Pair,
    IntMap,
    IntPair,
}

/// A positional child of a [`Tree`].
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Token(Token),
    Tree(Tree),
    /// Placeholder for an optional clause that was omitted
    Absent,
}

/// One node of the concrete parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub rule: Rule,
    pub children: Vec<Child>,
    /// Line of the first token of the production
    pub line: usize,
    /// Column of the first token of the production
    pub column: usize,
}

impl Tree {
    pub fn new(rule: Rule, line: usize, column: usize) -> Self {
        Self {
            rule,
            children: Vec::new(),
            line,
            column,
        }
    }

    /// A tree with `slots` absent children, to be filled by clause parsing.
    pub fn with_slots(rule: Rule, slots: usize, line: usize, column: usize) -> Self {
        Self {
            rule,
            children: vec![Child::Absent; slots],
            line,
            column,
        }
    }
}
