use thiserror::Error;

use crate::editing::cursor::Cursor;
use crate::editing::expr::Expression;
use crate::editing::node::{
    MAX_FUNC_NAME_LEN, MAX_TEXT_LEN, NodeId, NodeKind, TextKind,
};
use crate::editing::pool::PoolExhausted;

/// Commands that can be applied to the expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText { kind: TextKind, text: String },
    /// Fraction; absorbs the run of terms before the cursor as numerator.
    InsertFraction,
    /// Exponent; absorbs the single node before the cursor as base.
    InsertExponent,
    /// Subscript; absorbs a single text node before the cursor as base.
    InsertSubscript,
    /// Root with a fixed literal index (2 = square root).
    InsertRoot { index: u8 },
    /// Root with an editable index sub-expression.
    InsertNthRoot,
    InsertMixedFraction,
    InsertAbs,
    InsertParen,
    InsertFunction { name: String },
    /// Remove the node before the cursor, or step out of the slot when
    /// the cursor is at its start.
    Delete,
    /// Empty the whole expression and put the cursor back at the root.
    Clear,
}

/// Result of applying a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Whether the tree was mutated.
    pub changed: bool,
    /// Directive to the input glue: drop shift/alpha modes now. Inserts
    /// request this; plain deletion does not.
    pub reset_modes: bool,
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    PoolExhausted(#[from] PoolExhausted),
    #[error("text is {len} bytes, limit is {max}")]
    TextTooLong { len: usize, max: usize },
}

pub(crate) fn apply(expr: &mut Expression, cmd: Cmd) -> Result<Patch, EditError> {
    match cmd {
        Cmd::InsertText { kind, text } => insert_text(expr, kind, &text),
        Cmd::InsertFraction => insert_fraction(expr),
        Cmd::InsertExponent => insert_exponent(expr),
        Cmd::InsertSubscript => insert_subscript(expr),
        Cmd::InsertRoot { index } => insert_root(expr, index),
        Cmd::InsertNthRoot => insert_nthroot(expr),
        Cmd::InsertMixedFraction => insert_mixed_fraction(expr),
        Cmd::InsertAbs => insert_wrapper(expr, WrapperKind::Abs),
        Cmd::InsertParen => insert_wrapper(expr, WrapperKind::Paren),
        Cmd::InsertFunction { name } => insert_function(expr, &name),
        Cmd::Delete => Ok(delete(expr)),
        Cmd::Clear => Ok(clear(expr)),
    }
}

/// Bump the version and report a structural insert.
fn inserted(expr: &mut Expression) -> Patch {
    expr.version += 1;
    Patch {
        changed: true,
        reset_modes: true,
        version: expr.version,
    }
}

fn insert_text(expr: &mut Expression, kind: TextKind, text: &str) -> Result<Patch, EditError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(EditError::TextTooLong {
            len: text.len(),
            max: MAX_TEXT_LEN,
        });
    }
    expr.pool.ensure_free(1)?;
    let node = expr.pool.alloc(NodeKind::Text {
        kind,
        text: text.to_string(),
    })?;
    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, node);
    expr.cursor.after = Some(node);
    Ok(inserted(expr))
}

/// Can this node join the run a new fraction absorbs as its numerator?
/// Operators end the run; so does any kind not listed here.
fn joins_numerator_run(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::Text {
            kind: TextKind::Operator,
            ..
        } => false,
        NodeKind::Text { .. }
        | NodeKind::Exponent { .. }
        | NodeKind::Subscript { .. }
        | NodeKind::Paren { .. }
        | NodeKind::Fraction { .. }
        | NodeKind::Root { .. }
        | NodeKind::Abs { .. } => true,
        _ => false,
    }
}

/// Maximal run of consecutive siblings ending at the cursor that a new
/// fraction may absorb, as `(first, last)`.
fn numerator_run(expr: &Expression) -> Option<(NodeId, NodeId)> {
    let last = expr.cursor.after?;
    if !joins_numerator_run(&expr.pool.node(last).kind) {
        return None;
    }
    let mut first = last;
    while let Some(prev) = expr.pool.node(first).prev {
        if !joins_numerator_run(&expr.pool.node(prev).kind) {
            break;
        }
        first = prev;
    }
    Some((first, last))
}

/// Move the sibling run `first..=last` into `dest`, preserving order.
fn move_run_into(expr: &mut Expression, first: NodeId, last: NodeId, dest: NodeId) {
    let mut node = Some(first);
    let mut tail: Option<NodeId> = None;
    while let Some(id) = node {
        let next = expr.pool.node(id).next;
        let done = id == last;
        expr.pool.remove(id);
        expr.pool.insert_after(dest, tail, id);
        tail = Some(id);
        if done {
            break;
        }
        node = next;
    }
}

fn insert_fraction(expr: &mut Expression) -> Result<Patch, EditError> {
    expr.pool.ensure_free(3)?;
    let numer = expr.pool.new_sequence()?;
    let denom = expr.pool.new_sequence()?;
    let frac = expr.pool.alloc(NodeKind::Fraction { numer, denom })?;
    expr.pool.node_mut(numer).parent = Some(frac);
    expr.pool.node_mut(denom).parent = Some(frac);

    if let Some((first, last)) = numerator_run(expr) {
        expr.cursor.after = expr.pool.node(first).prev;
        move_run_into(expr, first, last, numer);
    }

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, frac);

    // Empty numerator means nothing was absorbed: start typing there.
    // Otherwise the numerator is done and the cursor goes below the bar.
    let slot = if expr.pool.is_empty(numer) { numer } else { denom };
    expr.cursor = Cursor {
        sequence: slot,
        after: None,
    };
    Ok(inserted(expr))
}

/// Kinds a new exponent may absorb as its base (a single node only).
fn collects_as_power_base(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text { .. }
            | NodeKind::Fraction { .. }
            | NodeKind::Paren { .. }
            | NodeKind::Exponent { .. }
            | NodeKind::Root { .. }
    )
}

fn insert_exponent(expr: &mut Expression) -> Result<Patch, EditError> {
    expr.pool.ensure_free(3)?;
    let base = expr.pool.new_sequence()?;
    let power = expr.pool.new_sequence()?;
    let exp = expr.pool.alloc(NodeKind::Exponent { base, power })?;
    expr.pool.node_mut(base).parent = Some(exp);
    expr.pool.node_mut(power).parent = Some(exp);

    if let Some(prev) = expr.cursor.after {
        if collects_as_power_base(&expr.pool.node(prev).kind) {
            expr.cursor.after = expr.pool.node(prev).prev;
            expr.pool.remove(prev);
            expr.pool.insert_after(base, None, prev);
        }
    }

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, exp);
    expr.cursor = Cursor {
        sequence: power,
        after: None,
    };
    Ok(inserted(expr))
}

fn insert_subscript(expr: &mut Expression) -> Result<Patch, EditError> {
    expr.pool.ensure_free(3)?;
    let base = expr.pool.new_sequence()?;
    let sub = expr.pool.new_sequence()?;
    let node = expr.pool.alloc(NodeKind::Subscript { base, sub })?;
    expr.pool.node_mut(base).parent = Some(node);
    expr.pool.node_mut(sub).parent = Some(node);

    // Subscripts only make sense on a symbol, so only text is absorbed.
    if let Some(prev) = expr.cursor.after {
        if matches!(expr.pool.node(prev).kind, NodeKind::Text { .. }) {
            expr.cursor.after = expr.pool.node(prev).prev;
            expr.pool.remove(prev);
            expr.pool.insert_after(base, None, prev);
        }
    }

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, node);
    expr.cursor = Cursor {
        sequence: sub,
        after: None,
    };
    Ok(inserted(expr))
}

fn insert_root(expr: &mut Expression, index: u8) -> Result<Patch, EditError> {
    expr.pool.ensure_free(2)?;
    let content = expr.pool.new_sequence()?;
    let root = expr.pool.alloc(NodeKind::Root { index, content })?;
    expr.pool.node_mut(content).parent = Some(root);

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, root);
    expr.cursor = Cursor {
        sequence: content,
        after: None,
    };
    Ok(inserted(expr))
}

fn insert_nthroot(expr: &mut Expression) -> Result<Patch, EditError> {
    expr.pool.ensure_free(3)?;
    let index = expr.pool.new_sequence()?;
    let content = expr.pool.new_sequence()?;
    let root = expr.pool.alloc(NodeKind::NthRoot { index, content })?;
    expr.pool.node_mut(index).parent = Some(root);
    expr.pool.node_mut(content).parent = Some(root);

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, root);
    // The index is typed first; moving on to the content is the
    // caller's navigation step.
    expr.cursor = Cursor {
        sequence: index,
        after: None,
    };
    Ok(inserted(expr))
}

fn insert_mixed_fraction(expr: &mut Expression) -> Result<Patch, EditError> {
    expr.pool.ensure_free(4)?;
    let whole = expr.pool.new_sequence()?;
    let numer = expr.pool.new_sequence()?;
    let denom = expr.pool.new_sequence()?;
    let node = expr.pool.alloc(NodeKind::MixedFraction {
        whole,
        numer,
        denom,
    })?;
    expr.pool.node_mut(whole).parent = Some(node);
    expr.pool.node_mut(numer).parent = Some(node);
    expr.pool.node_mut(denom).parent = Some(node);

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, node);
    expr.cursor = Cursor {
        sequence: whole,
        after: None,
    };
    Ok(inserted(expr))
}

enum WrapperKind {
    Abs,
    Paren,
}

fn insert_wrapper(expr: &mut Expression, which: WrapperKind) -> Result<Patch, EditError> {
    expr.pool.ensure_free(2)?;
    let content = expr.pool.new_sequence()?;
    let kind = match which {
        WrapperKind::Abs => NodeKind::Abs { content },
        WrapperKind::Paren => NodeKind::Paren { content },
    };
    let node = expr.pool.alloc(kind)?;
    expr.pool.node_mut(content).parent = Some(node);

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, node);
    expr.cursor = Cursor {
        sequence: content,
        after: None,
    };
    Ok(inserted(expr))
}

fn insert_function(expr: &mut Expression, name: &str) -> Result<Patch, EditError> {
    if name.len() > MAX_FUNC_NAME_LEN {
        return Err(EditError::TextTooLong {
            len: name.len(),
            max: MAX_FUNC_NAME_LEN,
        });
    }
    expr.pool.ensure_free(2)?;
    let arg = expr.pool.new_sequence()?;
    let node = expr.pool.alloc(NodeKind::Function {
        name: name.to_string(),
        arg,
    })?;
    expr.pool.node_mut(arg).parent = Some(node);

    expr.pool.insert_after(expr.cursor.sequence, expr.cursor.after, node);
    expr.cursor = Cursor {
        sequence: arg,
        after: None,
    };
    Ok(inserted(expr))
}

fn delete(expr: &mut Expression) -> Patch {
    match expr.cursor.after {
        None => {
            // At the start of a slot: step out instead of deleting.
            let _ = expr.exit_to_parent_right();
            Patch {
                changed: false,
                reset_modes: false,
                version: expr.version,
            }
        }
        Some(target) => {
            expr.cursor.after = expr.pool.node(target).prev;
            expr.pool.remove(target);
            expr.pool.release(target);
            expr.version += 1;
            Patch {
                changed: true,
                reset_modes: false,
                version: expr.version,
            }
        }
    }
}

fn clear(expr: &mut Expression) -> Patch {
    let changed = !expr.pool.is_empty(expr.root);

    let mut child = expr.pool.first_child(expr.root);
    while let Some(c) = child {
        let next = expr.pool.node(c).next;
        expr.pool.release(c);
        child = next;
    }
    expr.pool.set_first(expr.root, None);
    expr.pool.set_last(expr.root, None);

    expr.cursor = Cursor {
        sequence: expr.root,
        after: None,
    };
    if changed {
        expr.version += 1;
    }
    Patch {
        changed,
        reset_modes: true,
        version: expr.version,
    }
}
