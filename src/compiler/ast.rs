//! This AST describes a parsed hlx gate.
//!
//! A source unit holds exactly one gate. The gate's body is made of
//! `init` sections, conditional `::fuse when` sections and loose bullet
//! expressions. Action lines are prefixed with a bullet (•).
//!
//! Example source file:
//!
//! ```text
//! ::gate main:
//!    init:
//!       • load.env
//!       • set.mode = SAFE
//!
//!    ::fuse when clock > 1200:
//!       • burn.signal @ch4
//!       • sync.pulse = ENABLED
//! ::end
//! ```
//!
//! Emission produces a NASM-flavoured listing in which every action
//! becomes a comment describing it followed by a `nop` placeholder.
//! Nothing here selects real instructions.

use std::fmt;

/// The placeholder instruction emitted for every action.
pub const PLACEHOLDER: &str = "    nop";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    Gate(GateBlock),
    Init(InitStatement),
    Fuse(FuseStatement),
    Expr(ExpressionStatement),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GateBlock {
    pub name: String,
    pub body: Vec<Node>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct InitStatement {
    pub actions: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FuseStatement {
    pub condition: String,
    pub actions:   Vec<ExpressionStatement>,
}

/// `left` optionally followed by an operator and its right operand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExpressionStatement {
    pub left:     String,
    pub operator: Option<(String, String)>,
}

impl ExpressionStatement {
    pub fn bare<S: Into<String>>(left: S) -> Self {
        ExpressionStatement{left: left.into(), operator: None}
    }

    pub fn binary<S: Into<String>>(left: S, op: S, right: S) -> Self {
        ExpressionStatement{left: left.into(), operator: Some((op.into(), right.into()))}
    }

    pub fn op(&self) -> Option<&str> {
        self.operator.as_ref().map(|(op, _)| op.as_str())
    }

    pub fn right(&self) -> Option<&str> {
        self.operator.as_ref().map(|(_, right)| right.as_str())
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.op(), self.right()) {
            (Some(op), Some(right)) => write!(f, "{} {} {}", self.left, op, right),
            _ => write!(f, "{}", self.left),
        }
    }
}

impl From<GateBlock> for Node {
    fn from(gate: GateBlock) -> Self {
        Node::Gate(gate)
    }
}

impl Node {
    /// Appends this node's listing lines to `out`, children in source order.
    pub fn emit(&self, out: &mut Vec<String>) {
        match self {
            Node::Gate(gate) => {
                out.push(format!("; Gate: {}", gate.name));
                for stmt in gate.body.iter() {
                    stmt.emit(out);
                }
            },
            Node::Init(init) => {
                out.push("    ; INIT BLOCK".to_owned());
                for action in init.actions.iter() {
                    out.push(format!("    ; action: {}", action));
                    out.push(PLACEHOLDER.to_owned());
                }
            },
            Node::Fuse(fuse) => {
                out.push(format!("    ; FUSE WHEN {}", fuse.condition));
                for expr in fuse.actions.iter() {
                    emit_expression(expr, out);
                }
            },
            Node::Expr(expr) => emit_expression(expr, out),
        }
    }
}

fn emit_expression(expr: &ExpressionStatement, out: &mut Vec<String>) {
    out.push(format!("    ; expr: {}", expr));
    out.push(PLACEHOLDER.to_owned());
}
