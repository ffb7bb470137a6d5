//! Parser for the topology DSL.
//!
//! A single deterministic pass over the token stream with one token of
//! lookahead. Every statement is keyword-led, so the next production is
//! always decided by the current token; nothing is ever backtracked.

use tracing::trace;

use super::lexer::{Token, TokenKind};
use super::tree::{Child, Rule, Tree};
use crate::error::{MidoriError, Result};

/// Keywords that start a statement. They can never be used as names.
pub const STATEMENT_KEYWORDS: &[&str] = &[
    "controller",
    "remote_controller",
    "host",
    "switch",
    "link",
    "intent",
    "up",
    "down",
    "ping",
];

/// What a clause keyword must be followed by.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Name,
    String,
    Number,
    Array,
    Object,
    IntMap,
}

/// An optional (or required) keyword clause filling one slot of a tree.
struct Clause {
    keyword: &'static str,
    slot: usize,
    shape: Shape,
    required: bool,
}

const fn clause(keyword: &'static str, slot: usize, shape: Shape, required: bool) -> Clause {
    Clause {
        keyword,
        slot,
        shape,
        required,
    }
}

const HOST_CLAUSES: &[Clause] = &[
    clause("ip", 1, Shape::String, false),
    clause("image", 2, Shape::String, true),
    clause("mac", 3, Shape::String, false),
    clause("ports", 4, Shape::Array, false),
    clause("port_bindings", 5, Shape::IntMap, false),
    clause("env", 6, Shape::Object, false),
    clause("cmd", 7, Shape::Array, false),
];

const LINK_CLAUSES: &[Clause] = &[
    clause("src", 1, Shape::Name, true),
    clause("dst", 2, Shape::Name, true),
    clause("port1", 3, Shape::Number, false),
    clause("port2", 4, Shape::Number, false),
    clause("cls", 5, Shape::Name, false),
    clause("delay", 6, Shape::String, false),
    clause("bw", 7, Shape::Number, false),
];

/// True if `word` starts a statement.
pub fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word)
}

/// Parser for the topology DSL.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over a token stream.
    ///
    /// An [`TokenKind::Eof`] token is appended if the stream lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line,
                column,
            });
        }
        Self { tokens, pos: 0 }
    }

    /// Parse the whole document into one tree per statement.
    pub fn parse(&mut self) -> Result<Vec<Tree>> {
        let mut statements = Vec::new();

        while self.current().kind != TokenKind::Eof {
            let tree = self.parse_statement()?;
            trace!(rule = ?tree.rule, line = tree.line, "parsed statement");
            statements.push(tree);
        }

        if statements.is_empty() {
            let eof = self.current();
            return Err(MidoriError::parse(
                eof.line,
                eof.column,
                "expected at least one statement",
            ));
        }

        Ok(statements)
    }

    fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof and the parser never steps past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn error_here(&self, message: impl Into<String>) -> MidoriError {
        let tok = self.current();
        MidoriError::parse(tok.line, tok.column, message)
    }

    fn describe(tok: &Token) -> String {
        match tok.kind {
            TokenKind::Name => format!("name '{}'", tok.text),
            TokenKind::String => format!("string \"{}\"", tok.text),
            TokenKind::Number => format!("number {}", tok.text),
            kind => kind.to_string(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                kind,
                Self::describe(self.current())
            )))
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<Token> {
        if self.current().is_word(word) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected '{}', found {}",
                word,
                Self::describe(self.current())
            )))
        }
    }

    /// A NAME that is not a statement keyword.
    fn expect_name(&mut self) -> Result<Token> {
        let tok = self.expect(TokenKind::Name)?;
        if is_statement_keyword(&tok.text) {
            return Err(MidoriError::parse(
                tok.line,
                tok.column,
                format!("'{}' is a reserved keyword and cannot be used as a name", tok.text),
            ));
        }
        Ok(tok)
    }

    fn at_free_name(&self) -> bool {
        let tok = self.current();
        tok.kind == TokenKind::Name && !is_statement_keyword(&tok.text)
    }

    fn parse_statement(&mut self) -> Result<Tree> {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Name || !is_statement_keyword(&tok.text) {
            return Err(self.error_here(format!(
                "expected a statement keyword, found {}",
                Self::describe(&tok)
            )));
        }
        self.advance();

        let (line, column) = (tok.line, tok.column);
        match tok.text.as_str() {
            "controller" => {
                let mut tree = Tree::new(Rule::Controller, line, column);
                tree.children.push(self.parse_value()?);
                Ok(tree)
            }
            "remote_controller" => {
                let mut tree = Tree::new(Rule::RemoteController, line, column);
                tree.children.push(Child::Token(self.expect_name()?));
                self.expect_keyword("host")?;
                tree.children.push(Child::Token(self.expect(TokenKind::String)?));
                self.expect_keyword("port")?;
                tree.children.push(Child::Token(self.expect(TokenKind::Number)?));
                Ok(tree)
            }
            "host" => {
                let mut tree = Tree::with_slots(Rule::Host, 8, line, column);
                tree.children[0] = Child::Token(self.expect_name()?);
                self.parse_clauses(&mut tree, "host", HOST_CLAUSES)?;
                Ok(tree)
            }
            "link" => {
                let mut tree = Tree::with_slots(Rule::Link, 8, line, column);
                tree.children[0] = Child::Token(self.expect_name()?);
                self.parse_clauses(&mut tree, "link", LINK_CLAUSES)?;
                Ok(tree)
            }
            "switch" => self.parse_name_list(Rule::Switch, line, column),
            "ping" => self.parse_name_list(Rule::Ping, line, column),
            "intent" => {
                let mut tree = Tree::new(Rule::Intent, line, column);
                tree.children.push(Child::Token(self.expect_name()?));
                self.expect(TokenKind::Arrow)?;
                tree.children.push(Child::Token(self.expect_name()?));
                while self.current().kind == TokenKind::Arrow {
                    self.advance();
                    tree.children.push(Child::Token(self.expect_name()?));
                }
                Ok(tree)
            }
            "up" => Ok(Tree::new(Rule::Up, line, column)),
            "down" => Ok(Tree::new(Rule::Down, line, column)),
            other => Err(MidoriError::parse(
                line,
                column,
                format!("unhandled statement keyword '{}'", other),
            )),
        }
    }

    /// `NAME+`, stopping at the next statement keyword.
    fn parse_name_list(&mut self, rule: Rule, line: usize, column: usize) -> Result<Tree> {
        let mut tree = Tree::new(rule, line, column);
        tree.children.push(Child::Token(self.expect_name()?));
        while self.at_free_name() {
            tree.children.push(Child::Token(self.advance()));
        }
        Ok(tree)
    }

    /// Order-independent keyword clauses; each may appear at most once.
    fn parse_clauses(&mut self, tree: &mut Tree, statement: &str, clauses: &[Clause]) -> Result<()> {
        loop {
            let tok = self.current();
            if tok.kind != TokenKind::Name {
                break;
            }
            let Some(clause) = clauses.iter().find(|c| c.keyword == tok.text) else {
                break;
            };
            if !matches!(tree.children[clause.slot], Child::Absent) {
                return Err(self.error_here(format!(
                    "duplicate '{}' clause in {} statement",
                    clause.keyword, statement
                )));
            }
            self.advance();
            tree.children[clause.slot] = self.parse_shape(clause.shape)?;
        }

        for clause in clauses.iter().filter(|c| c.required) {
            if matches!(tree.children[clause.slot], Child::Absent) {
                return Err(self.error_here(format!(
                    "{} statement is missing required '{}' clause (found {})",
                    statement,
                    clause.keyword,
                    Self::describe(self.current())
                )));
            }
        }
        Ok(())
    }

    fn parse_shape(&mut self, shape: Shape) -> Result<Child> {
        Ok(match shape {
            Shape::Name => Child::Token(self.expect_name()?),
            Shape::String => Child::Token(self.expect(TokenKind::String)?),
            Shape::Number => Child::Token(self.expect(TokenKind::Number)?),
            Shape::Array => Child::Tree(self.parse_array()?),
            Shape::Object => Child::Tree(self.parse_object()?),
            Shape::IntMap => Child::Tree(self.parse_int_map()?),
        })
    }

    /// `NAME | STRING | NUMBER`
    fn parse_value(&mut self) -> Result<Child> {
        match self.current().kind {
            TokenKind::Name => Ok(Child::Token(self.expect_name()?)),
            TokenKind::String | TokenKind::Number => Ok(Child::Token(self.advance())),
            _ => Err(self.error_here(format!(
                "expected a name, string or number, found {}",
                Self::describe(self.current())
            ))),
        }
    }

    /// Comma separated items between `open` and `close`; the list may be empty.
    fn parse_delimited(
        &mut self,
        rule: Rule,
        open: TokenKind,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<Child>,
    ) -> Result<Tree> {
        let start = self.expect(open)?;
        let mut tree = Tree::new(rule, start.line, start.column);
        if self.current().kind != close {
            tree.children.push(item(self)?);
            while self.current().kind == TokenKind::Comma {
                self.advance();
                tree.children.push(item(self)?);
            }
        }
        self.expect(close)?;
        Ok(tree)
    }

    fn parse_array(&mut self) -> Result<Tree> {
        self.parse_delimited(Rule::Array, TokenKind::LBracket, TokenKind::RBracket, |p| {
            p.parse_value()
        })
    }

    fn parse_object(&mut self) -> Result<Tree> {
        self.parse_delimited(Rule::Object, TokenKind::LBrace, TokenKind::RBrace, |p| {
            let key = p.expect(TokenKind::String)?;
            let mut pair = Tree::new(Rule::Pair, key.line, key.column);
            pair.children.push(Child::Token(key));
            p.expect(TokenKind::Colon)?;
            pair.children.push(p.parse_value()?);
            Ok(Child::Tree(pair))
        })
    }

    fn parse_int_map(&mut self) -> Result<Tree> {
        self.parse_delimited(Rule::IntMap, TokenKind::LBrace, TokenKind::RBrace, |p| {
            let key = p.expect(TokenKind::Number)?;
            let mut pair = Tree::new(Rule::IntPair, key.line, key.column);
            pair.children.push(Child::Token(key));
            p.expect(TokenKind::Colon)?;
            pair.children.push(Child::Token(p.expect(TokenKind::Number)?));
            Ok(Child::Tree(pair))
        })
    }
}
