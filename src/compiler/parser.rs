//! The Parser module takes a token stream (Vec<Token>) from the lexer
//! and converts it into an AST rooted at a single gate.
//!
//! The parser never fails. Tokens it cannot place are consumed one at a
//! time and reported back as `Skip` records instead of errors.
use std::fmt;
use super::lexer::{Token, TokenKind};
use super::ast::*;

/// Why a statement produced no node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SkipReason {
    /// A newline between statements.
    BlankLine,
    /// A token that cannot start a statement.
    UnexpectedToken,
    /// `::fuse` not followed by `when`. Only the `::fuse` is consumed; the
    /// rejected token is not, since a failed match never advances.
    FuseWithoutWhen,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Skip {
    pub reason: SkipReason,
    pub token:  Token,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let what = match self.reason {
            SkipReason::BlankLine       => "blank line",
            SkipReason::UnexpectedToken => "unexpected token",
            SkipReason::FuseWithoutWhen => "`::fuse` without `when`",
        };
        write!(f, "{}:{}: skipped {} `{}`", self.token.line, self.token.column, what, self.token.value.escape_debug())
    }
}

/// The result of parsing one statement.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Parsed(Node),
    Skipped(Skip),
}

/// A parsed gate together with everything that was skipped on the way.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Parsed {
    pub gate:    GateBlock,
    pub skipped: Vec<Skip>,
}

pub struct Parser {
    tokens:  Vec<Token>,
    current: usize,
    skipped: Vec<Skip>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // The cursor relies on a trailing EOF to stop on.
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column)).unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Parser{tokens, current: 0, skipped: Vec::new()}
    }

    /// Run the parser, consuming itself and returning the gate.
    pub fn run(mut self) -> Parsed {
        let gate = self.gate();

        let noisy = self.skipped.iter().filter(|s| s.reason != SkipReason::BlankLine).count();
        if noisy > 0 {
            info!("parser skipped {} token(s) in gate `{}`", noisy, gate.name);
        }

        Parsed{gate, skipped: self.skipped}
    }

    fn gate(&mut self) -> GateBlock {
        while self.check(TokenKind::Newline) {
            self.advance();
        }

        self.matches(TokenKind::GateOpen);
        // The name is taken as-is, whatever kind of token it is.
        let name_tok = self.advance();
        if name_tok.kind != TokenKind::Identifier {
            warn!("{}:{}: gate named by {} token `{}`",
                name_tok.line, name_tok.column, name_tok.kind, name_tok.value.escape_debug());
        }
        self.matches(TokenKind::Colon);
        self.matches(TokenKind::Newline);

        let mut gate = GateBlock{name: name_tok.value, body: Vec::new()};

        while !self.matches(TokenKind::GateEnd) && !self.check(TokenKind::Eof) {
            match self.statement() {
                Outcome::Parsed(node) => gate.body.push(node),
                Outcome::Skipped(skip) => {
                    if skip.reason == SkipReason::BlankLine {
                        trace!("{}", skip);
                    } else {
                        warn!("{}", skip);
                    }
                    self.skipped.push(skip);
                },
            }
        }

        gate
    }

    fn statement(&mut self) -> Outcome {
        match self.peek().kind {
            TokenKind::Init => {
                self.advance();
                Outcome::Parsed(Node::Init(self.init()))
            },
            TokenKind::Fuse => {
                let fuse_tok = self.advance();
                if !self.matches(TokenKind::When) {
                    return Outcome::Skipped(Skip{reason: SkipReason::FuseWithoutWhen, token: fuse_tok});
                }
                Outcome::Parsed(Node::Fuse(self.fuse()))
            },
            TokenKind::Bullet => {
                self.advance();
                Outcome::Parsed(Node::Expr(self.expression()))
            },
            TokenKind::Newline => {
                let token = self.advance();
                Outcome::Skipped(Skip{reason: SkipReason::BlankLine, token})
            },
            _ => {
                let token = self.advance();
                Outcome::Skipped(Skip{reason: SkipReason::UnexpectedToken, token})
            },
        }
    }

    /// Parses the body of an `init` section. The keyword is already consumed.
    fn init(&mut self) -> InitStatement {
        self.matches(TokenKind::Colon);
        self.matches(TokenKind::Newline);

        let mut init = InitStatement::default();
        while self.check(TokenKind::Bullet) {
            self.matches(TokenKind::Bullet);
            init.actions.push(self.advance().value);
            self.matches(TokenKind::Newline);
        }
        init
    }

    /// Parses a fuse section after its `::fuse when`.
    fn fuse(&mut self) -> FuseStatement {
        let condition = self.advance().value;
        self.matches(TokenKind::Colon);
        self.matches(TokenKind::Newline);

        let mut fuse = FuseStatement{condition, actions: Vec::new()};
        while self.check(TokenKind::Bullet) {
            self.matches(TokenKind::Bullet);
            fuse.actions.push(self.expression());
        }
        fuse
    }

    /// Parses `left (op right)?` and the newline ending it. The bullet
    /// is already consumed.
    fn expression(&mut self) -> ExpressionStatement {
        let left = self.advance().value;
        let expr = if self.check(TokenKind::Operator) {
            let op = self.advance().value;
            let right = self.advance().value;
            ExpressionStatement::binary(left, op, right)
        } else {
            ExpressionStatement::bare(left)
        };
        self.matches(TokenKind::Newline);
        expr
    }

    #[inline]
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the current token if it is of the given kind.
    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token and moves past it.
    /// The cursor never moves past EOF.
    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.current].clone();
        if tok.kind != TokenKind::Eof {
            self.current += 1;
        }
        tok
    }
}
