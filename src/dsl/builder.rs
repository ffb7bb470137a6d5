//! AST builder: maps parse trees onto [`Statement`] and [`Value`] variants.
//!
//! Each [`Rule`] has exactly one constructor below, selected by a single
//! exhaustive `match`. The builder strips punctuation, de-quotes strings
//! (already done by the lexer), parses integers and attaches positions.
//! It does not check that referenced names were declared.

use tracing::debug;

use super::ast::*;
use super::lexer::{Token, TokenKind};
use super::tree::{Child, Rule, Tree};
use crate::error::{MidoriError, Result};

/// Build a [`Program`] from the statement trees of one document.
pub fn build_program(trees: Vec<Tree>) -> Result<Program> {
    let statements = trees
        .into_iter()
        .map(build_statement)
        .collect::<Result<Vec<_>>>()?;
    Ok(Program::new(statements))
}

/// Build one statement from its tree.
pub fn build_statement(tree: Tree) -> Result<Statement> {
    let pos = Position::new(tree.line, tree.column);
    let rule = tree.rule;
    let mut slots = Slots::new(tree);

    let statement = match rule {
        Rule::Controller => Statement::Controller(Controller {
            name: slots.value()?,
            pos,
        }),
        Rule::RemoteController => Statement::RemoteController(RemoteController {
            name: slots.text()?,
            host: slots.text()?,
            port: slots.int()?,
            pos,
        }),
        Rule::Host => Statement::Host(Host {
            name: slots.text()?,
            ip_addr: slots.opt_text()?,
            image: slots.text()?,
            mac: slots.opt_text()?,
            ports: slots.opt_array()?,
            port_bindings: slots.opt_int_map()?,
            env: slots.opt_object()?,
            cmd: slots.opt_array()?,
            pos,
        }),
        Rule::Switch => Statement::Switch(Switch {
            names: slots.rest_text()?,
            pos,
        }),
        Rule::Link => Statement::Link(Link {
            name: slots.text()?,
            src: slots.text()?,
            dst: slots.text()?,
            port1: slots.opt_int()?,
            port2: slots.opt_int()?,
            cls: slots.opt_text()?,
            delay: slots.opt_text()?,
            bw: slots.opt_int()?,
            pos,
        }),
        Rule::Intent => Statement::Intent(Intent {
            names: slots.rest_text()?,
            pos,
        }),
        Rule::Up => Statement::Up { pos },
        Rule::Down => Statement::Down { pos },
        Rule::Ping => Statement::Ping(Ping {
            names: slots.rest_text()?,
            pos,
        }),
        Rule::Array | Rule::Object | Rule::Pair | Rule::IntMap | Rule::IntPair => {
            return Err(malformed(pos, format!("{:?} is not a statement", rule)));
        }
    };

    slots.finish()?;
    debug!(keyword = statement.keyword(), at = %pos, "built statement");
    Ok(statement)
}

fn malformed(pos: Position, message: impl Into<String>) -> MidoriError {
    MidoriError::parse(
        pos.line,
        pos.column,
        format!("malformed parse tree: {}", message.into()),
    )
}

fn token_pos(tok: &Token) -> Position {
    Position::new(tok.line, tok.column)
}

/// Coerce a NUMBER token to an integer.
fn parse_int(tok: &Token) -> Result<u64> {
    tok.text.parse::<u64>().map_err(|_| {
        MidoriError::parse(
            tok.line,
            tok.column,
            format!("integer literal '{}' is out of range", tok.text),
        )
    })
}

/// Convert a value token (NAME, STRING or NUMBER) into a [`Value`].
fn token_value(tok: Token) -> Result<Value> {
    let pos = token_pos(&tok);
    match tok.kind {
        TokenKind::Name => Ok(Value::name(tok.text, pos)),
        TokenKind::String => Ok(Value::string(tok.text, pos)),
        TokenKind::Number => Ok(Value::int(parse_int(&tok)?, pos)),
        kind => Err(malformed(pos, format!("{} is not a value", kind))),
    }
}

/// Positional reader over a tree's children.
struct Slots {
    pos: Position,
    rule: Rule,
    children: std::vec::IntoIter<Child>,
}

impl Slots {
    fn new(tree: Tree) -> Self {
        Self {
            pos: Position::new(tree.line, tree.column),
            rule: tree.rule,
            children: tree.children.into_iter(),
        }
    }

    fn next(&mut self) -> Result<Child> {
        self.children
            .next()
            .ok_or_else(|| malformed(self.pos, format!("{:?} has too few children", self.rule)))
    }

    fn finish(mut self) -> Result<()> {
        match self.children.next() {
            None => Ok(()),
            Some(_) => Err(malformed(
                self.pos,
                format!("{:?} has too many children", self.rule),
            )),
        }
    }

    fn token(&mut self) -> Result<Token> {
        match self.next()? {
            Child::Token(tok) => Ok(tok),
            _ => Err(malformed(self.pos, "expected a token")),
        }
    }

    fn opt_token(&mut self) -> Result<Option<Token>> {
        match self.next()? {
            Child::Token(tok) => Ok(Some(tok)),
            Child::Absent => Ok(None),
            Child::Tree(_) => Err(malformed(self.pos, "expected a token")),
        }
    }

    fn opt_tree(&mut self, rule: Rule) -> Result<Option<Tree>> {
        match self.next()? {
            Child::Tree(tree) if tree.rule == rule => Ok(Some(tree)),
            Child::Absent => Ok(None),
            _ => Err(malformed(self.pos, format!("expected {:?}", rule))),
        }
    }

    fn value(&mut self) -> Result<Value> {
        token_value(self.token()?)
    }

    fn text(&mut self) -> Result<String> {
        Ok(self.token()?.text)
    }

    fn opt_text(&mut self) -> Result<Option<String>> {
        Ok(self.opt_token()?.map(|tok| tok.text))
    }

    fn int(&mut self) -> Result<u64> {
        parse_int(&self.token()?)
    }

    fn opt_int(&mut self) -> Result<Option<u64>> {
        self.opt_token()?.map(|tok| parse_int(&tok)).transpose()
    }

    /// All remaining children as names.
    fn rest_text(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while self.children.len() > 0 {
            names.push(self.text()?);
        }
        Ok(names)
    }

    fn opt_array(&mut self) -> Result<Vec<Value>> {
        let Some(tree) = self.opt_tree(Rule::Array)? else {
            return Ok(Vec::new());
        };
        let mut items = Slots::new(tree);
        let mut values = Vec::new();
        while items.children.len() > 0 {
            values.push(items.value()?);
        }
        Ok(values)
    }

    fn opt_object(&mut self) -> Result<Vec<(String, Value)>> {
        let Some(tree) = self.opt_tree(Rule::Object)? else {
            return Ok(Vec::new());
        };
        let mut pairs = Slots::new(tree);
        let mut entries = Vec::new();
        while pairs.children.len() > 0 {
            let Child::Tree(pair) = pairs.next()? else {
                return Err(malformed(pairs.pos, "expected a key/value pair"));
            };
            let mut pair = Slots::new(pair);
            let key = pair.text()?;
            let value = pair.value()?;
            pair.finish()?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    fn opt_int_map(&mut self) -> Result<Vec<(u64, u64)>> {
        let Some(tree) = self.opt_tree(Rule::IntMap)? else {
            return Ok(Vec::new());
        };
        let mut pairs = Slots::new(tree);
        let mut entries = Vec::new();
        while pairs.children.len() > 0 {
            let Child::Tree(pair) = pairs.next()? else {
                return Err(malformed(pairs.pos, "expected an integer pair"));
            };
            let mut pair = Slots::new(pair);
            let key = pair.int()?;
            let value = pair.int()?;
            pair.finish()?;
            entries.push((key, value));
        }
        Ok(entries)
    }
}
