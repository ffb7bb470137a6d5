//! DSL (Domain Specific Language) front end for network topology descriptions.
//!
//! Source text is tokenized by the [`Lexer`], shaped into a concrete parse
//! tree by the [`Parser`] and turned into a typed [`Program`] by the AST
//! builder. Statements are keyword-led and newline-insensitive.
//!
//! # Grammar Overview
//!
//! ```text
//! program           = statement { statement }
//! statement         = controller | remote_controller | host | switch
//!                   | link | intent | up | ping | down
//! controller        = "controller" value
//! remote_controller = "remote_controller" NAME "host" STRING "port" NUMBER
//! host              = "host" NAME ["ip" STRING] "image" STRING ["mac" STRING]
//!                     ["ports" array] ["port_bindings" int_map]
//!                     ["env" object] ["cmd" array]
//! switch            = "switch" NAME { NAME }
//! link              = "link" NAME "src" NAME "dst" NAME
//!                     ["port1" NUMBER] ["port2" NUMBER]
//!                     ["cls" NAME] ["delay" STRING] ["bw" NUMBER]
//! intent            = "intent" NAME "->" NAME { "->" NAME }
//! up                = "up"
//! ping              = "ping" NAME { NAME }
//! down              = "down"
//!
//! value             = NAME | STRING | NUMBER
//! array             = "[" [ value { "," value } ] "]"
//! object            = "{" [ STRING ":" value { "," STRING ":" value } ] "}"
//! int_map           = "{" [ NUMBER ":" NUMBER { "," NUMBER ":" NUMBER } ] "}"
//! ```
//!
//! Host and link clauses may be written in any order, each at most once.
//! `#` starts a comment that runs to the end of the line.
//!
//! # Example
//!
//! ```text
//! # Two containers behind a pair of switches
//! controller c0
//! host d1 image "ubuntu:trusty"
//! host d2 image "ubuntu:trusty"
//! switch s1 s2
//! link l1 src d1 dst s1
//! link l2 src s1 dst s2 cls TCLink delay "100ms" bw 1
//! link l3 src s2 dst d2
//! up
//! ping d1 d2
//! down
//! ```

mod ast;
mod builder;
mod lexer;
mod parser;
mod tree;

pub use ast::*;
pub use builder::{build_program, build_statement};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{is_statement_keyword, Parser, STATEMENT_KEYWORDS};
pub use tree::{Child, Rule, Tree};

use crate::error::Result;

/// Parse a topology DSL string into an AST. No defaults are applied.
pub fn parse(input: &str) -> Result<Program> {
    let tokens = Lexer::new(input).tokenize()?;
    let trees = Parser::new(tokens).parse()?;
    build_program(trees)
}

/// Read and parse a topology DSL file.
pub fn parse_file(path: &std::path::Path) -> Result<Program> {
    parse(&read_source(path)?)
}

/// Read a source file, mapping I/O failures to [`crate::error::MidoriError::FileReadError`].
pub fn read_source(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| crate::error::MidoriError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}
