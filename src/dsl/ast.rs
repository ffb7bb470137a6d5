//! Abstract Syntax Tree types for the topology DSL.

use std::fmt;

/// A 1-indexed source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A literal or identifier value with the position it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub kind: ValueKind,
    pub pos: Position,
}

/// The three value shapes the grammar accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// A bare identifier
    Name(String),
    /// A string literal, quotes stripped
    Str(String),
    /// A decimal integer literal
    Int(u64),
}

impl Value {
    pub fn name(name: impl Into<String>, pos: Position) -> Self {
        Self {
            kind: ValueKind::Name(name.into()),
            pos,
        }
    }

    pub fn string(text: impl Into<String>, pos: Position) -> Self {
        Self {
            kind: ValueKind::Str(text.into()),
            pos,
        }
    }

    pub fn int(value: u64, pos: Position) -> Self {
        Self {
            kind: ValueKind::Int(value),
            pos,
        }
    }

    /// The textual form of the value (identifier, string contents or digits).
    pub fn text(&self) -> String {
        match &self.kind {
            ValueKind::Name(s) | ValueKind::Str(s) => s.clone(),
            ValueKind::Int(n) => n.to_string(),
        }
    }
}

/// Complete AST of one source document. Statement order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Iterate over the host statements in declaration order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Host(host) => Some(host),
            _ => None,
        })
    }
}

/// One top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Controller(Controller),
    RemoteController(RemoteController),
    Host(Host),
    Switch(Switch),
    Link(Link),
    Intent(Intent),
    Up { pos: Position },
    Down { pos: Position },
    Ping(Ping),
}

impl Statement {
    /// The statement keyword, as written in source.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Controller(_) => "controller",
            Self::RemoteController(_) => "remote_controller",
            Self::Host(_) => "host",
            Self::Switch(_) => "switch",
            Self::Link(_) => "link",
            Self::Intent(_) => "intent",
            Self::Up { .. } => "up",
            Self::Down { .. } => "down",
            Self::Ping(_) => "ping",
        }
    }

    /// Position of the statement's leading keyword.
    pub fn pos(&self) -> Position {
        match self {
            Self::Controller(s) => s.pos,
            Self::RemoteController(s) => s.pos,
            Self::Host(s) => s.pos,
            Self::Switch(s) => s.pos,
            Self::Link(s) => s.pos,
            Self::Intent(s) => s.pos,
            Self::Up { pos } | Self::Down { pos } => *pos,
            Self::Ping(s) => s.pos,
        }
    }
}

/// `controller <value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub name: Value,
    pub pos: Position,
}

/// `remote_controller <name> host "<addr>" port <n>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteController {
    pub name: String,
    pub host: String,
    pub port: u64,
    pub pos: Position,
}

/// A container host. `ip_addr` and `mac` are filled in by the defaulting pass
/// when the source omits them.
///
/// Clause scalars are plain text located by the statement's `pos`; only the
/// items of `ports`, `env` and `cmd` keep their own [`Value`] positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    pub ip_addr: Option<String>,
    pub image: String,
    pub mac: Option<String>,
    pub ports: Vec<Value>,
    pub port_bindings: Vec<(u64, u64)>,
    pub env: Vec<(String, Value)>,
    pub cmd: Vec<Value>,
    pub pos: Position,
}

/// `switch <name>+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub names: Vec<String>,
    pub pos: Position,
}

/// A link between two nodes, with optional traffic-control settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub src: String,
    pub dst: String,
    pub port1: Option<u64>,
    pub port2: Option<u64>,
    /// Link class, e.g. `TCLink`
    pub cls: Option<String>,
    /// Delay as written, e.g. `"100ms"`
    pub delay: Option<String>,
    /// Bandwidth in Mbit/s
    pub bw: Option<u64>,
    pub pos: Position,
}

/// `intent a -> b [-> c ...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub names: Vec<String>,
    pub pos: Position,
}

impl Intent {
    /// Consecutive hops of the chain: `a -> b -> c` yields `(a, b)` and `(b, c)`.
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// `ping <name>+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ping {
    pub names: Vec<String>,
    pub pos: Position,
}
