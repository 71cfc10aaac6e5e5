//! LaTeX serialization: a recursive, sequence-order walk that mirrors
//! the node kinds one-to-one. Output goes through a bounded writer so an
//! oversized expression is a reported overflow, never a silent
//! truncation or an unchecked write.

use thiserror::Error;

use crate::editing::expr::Expression;
use crate::editing::node::{NodeId, NodeKind, TextKind};
use crate::editing::pool::NodePool;

/// Maximum serialized length in bytes.
pub const MAX_LATEX: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LatexError {
    #[error("LaTeX output exceeds the {limit}-byte budget")]
    Overflow { limit: usize },
}

/// Serialize the whole expression.
pub fn render(expr: &Expression) -> Result<String, LatexError> {
    let mut out = Writer {
        buf: String::new(),
        limit: MAX_LATEX,
    };
    write_sequence(expr.pool(), expr.root(), &mut out)?;
    Ok(out.buf)
}

struct Writer {
    buf: String,
    limit: usize,
}

impl Writer {
    fn push(&mut self, s: &str) -> Result<(), LatexError> {
        if self.buf.len() + s.len() > self.limit {
            return Err(LatexError::Overflow { limit: self.limit });
        }
        self.buf.push_str(s);
        Ok(())
    }
}

fn write_sequence(pool: &NodePool, seq: NodeId, out: &mut Writer) -> Result<(), LatexError> {
    for child in pool.children(seq) {
        write_node(pool, child, out)?;
    }
    Ok(())
}

fn write_node(pool: &NodePool, id: NodeId, out: &mut Writer) -> Result<(), LatexError> {
    match &pool.node(id).kind {
        NodeKind::Empty => Ok(()),

        NodeKind::Sequence { .. } => write_sequence(pool, id, out),

        NodeKind::Text { kind, text } => match kind {
            TextKind::Pi => out.push("\\pi "),
            TextKind::Operator => match text.as_str() {
                "×" => out.push("*"),
                "÷" => out.push("/"),
                other => out.push(other),
            },
            _ => out.push(text),
        },

        NodeKind::Fraction { numer, denom } => {
            out.push("\\frac{")?;
            write_sequence(pool, *numer, out)?;
            out.push("}{")?;
            write_sequence(pool, *denom, out)?;
            out.push("}")
        }

        NodeKind::Exponent { base, power } => {
            out.push("{")?;
            write_sequence(pool, *base, out)?;
            out.push("}^{")?;
            write_sequence(pool, *power, out)?;
            out.push("}")
        }

        NodeKind::Subscript { base, sub } => {
            out.push("{")?;
            write_sequence(pool, *base, out)?;
            out.push("}_{")?;
            write_sequence(pool, *sub, out)?;
            out.push("}")
        }

        NodeKind::Root { index, content } => {
            if *index == 2 {
                out.push("\\sqrt{")?;
            } else {
                out.push(&format!("\\sqrt[{index}]{{"))?;
            }
            write_sequence(pool, *content, out)?;
            out.push("}")
        }

        NodeKind::NthRoot { index, content } => {
            out.push("\\sqrt[")?;
            write_sequence(pool, *index, out)?;
            out.push("]{")?;
            write_sequence(pool, *content, out)?;
            out.push("}")
        }

        NodeKind::Abs { content } => {
            out.push("\\left|")?;
            write_sequence(pool, *content, out)?;
            out.push("\\right|")
        }

        NodeKind::Paren { content } => {
            out.push("\\left(")?;
            write_sequence(pool, *content, out)?;
            out.push("\\right)")
        }

        NodeKind::Function { name, arg } => {
            out.push("\\")?;
            out.push(name)?;
            out.push("\\left(")?;
            write_sequence(pool, *arg, out)?;
            out.push("\\right)")
        }

        // Whole part and fraction are concatenated with no glue; the
        // ambiguity for multi-character whole parts is the established
        // output format.
        NodeKind::MixedFraction {
            whole,
            numer,
            denom,
        } => {
            write_sequence(pool, *whole, out)?;
            out.push("\\frac{")?;
            write_sequence(pool, *numer, out)?;
            out.push("}{")?;
            write_sequence(pool, *denom, out)?;
            out.push("}")
        }
    }
}
