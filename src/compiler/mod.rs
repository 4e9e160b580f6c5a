//! The compiler module is in charge of taking an hlx
//! source and producing a placeholder NASM listing.
//!
//! It does this with a character-level lexer, a single
//! token lookahead recursive descent parser and an emitter
//! that walks the resulting AST.

pub mod ast;
pub mod lexer;
pub mod parser;

use self::ast::{GateBlock, Node};
use self::lexer::{Dropped, Lexer, Token};
use self::parser::{Parser, Skip};

/// Everything produced by one pass over a source.
pub struct Compilation {
    pub tokens:  Vec<Token>,
    pub dropped: Vec<Dropped>,
    pub gate:    GateBlock,
    pub skipped: Vec<Skip>,
    pub listing: Vec<String>,
}

impl Compilation {
    /// The listing as a single newline separated text.
    pub fn output(&self) -> String {
        self.listing.join("\n")
    }
}

/// Lexes, parses and emits `source`. This never fails; anything that
/// could not be understood shows up in `dropped` and `skipped`.
pub fn compile(source: &str) -> Compilation {
    let (tokens, dropped) = Lexer::new(source).run();
    debug!("lexed {} token(s)", tokens.len());

    let parsed = Parser::new(tokens.clone()).run();
    debug!("parsed gate `{}` with {} statement(s)", parsed.gate.name, parsed.gate.body.len());

    let mut listing = Vec::new();
    Node::from(parsed.gate.clone()).emit(&mut listing);

    Compilation{tokens, dropped, gate: parsed.gate, skipped: parsed.skipped, listing}
}
