//! Cursor navigation. A cursor sits *between* nodes of one sequence;
//! every operation returns `false` at a boundary and leaves the cursor
//! untouched, so the input glue can chain fallbacks (step, then enter,
//! then exit) the way arrow keys are expected to behave.

use crate::editing::expr::Expression;
use crate::editing::node::{NodeId, NodeKind};

/// Position in the tree: inside `sequence`, after node `after`
/// (`None` = before the first child).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub sequence: NodeId,
    pub after: Option<NodeId>,
}

impl Expression {
    /// Step left within the current sequence.
    pub fn move_left(&mut self) -> bool {
        match self.cursor.after {
            Some(a) => {
                self.cursor.after = self.pool.node(a).prev;
                true
            }
            None => false,
        }
    }

    /// Step right within the current sequence.
    pub fn move_right(&mut self) -> bool {
        match self.node_ahead() {
            Some(next) => {
                self.cursor.after = Some(next);
                true
            }
            None => false,
        }
    }

    /// Enter the container directly ahead of the cursor, landing at the
    /// start of its first editable slot. Fails if the node ahead is not
    /// a container (or there is none).
    pub fn enter_from_left(&mut self) -> bool {
        let Some(target) = self.node_ahead() else {
            return false;
        };
        let Some(slot) = self.pool.node(target).kind.first_slot() else {
            return false;
        };
        self.cursor = Cursor {
            sequence: slot,
            after: None,
        };
        true
    }

    /// Enter the container directly ahead of the cursor from its right
    /// edge, landing at the end of its last editable slot. Used after a
    /// leftward step has just skipped over the container.
    pub fn enter_from_right(&mut self) -> bool {
        let Some(target) = self.node_ahead() else {
            return false;
        };
        let Some(slot) = self.pool.node(target).kind.last_slot() else {
            return false;
        };
        self.cursor = Cursor {
            sequence: slot,
            after: self.pool.last_child(slot),
        };
        true
    }

    /// Leave the current slot, landing just after the container in its
    /// parent sequence. Fails at the tree root.
    pub fn exit_to_parent_right(&mut self) -> bool {
        let Some((container, parent_seq)) = self.enclosing_container() else {
            return false;
        };
        self.cursor = Cursor {
            sequence: parent_seq,
            after: Some(container),
        };
        true
    }

    /// Leave the current slot, landing just before the container.
    pub fn exit_to_parent_left(&mut self) -> bool {
        let Some((container, parent_seq)) = self.enclosing_container() else {
            return false;
        };
        self.cursor = Cursor {
            sequence: parent_seq,
            after: self.pool.node(container).prev,
        };
        true
    }

    /// Hop to the next sibling slot of the enclosing container
    /// (numerator -> denominator and so on), at its start.
    pub fn next_slot(&mut self) -> bool {
        let seq = self.cursor.sequence;
        let Some(container) = self.pool.node(seq).parent else {
            return false;
        };
        let Some(slot) = self.pool.node(container).kind.slot_after(seq) else {
            return false;
        };
        self.cursor = Cursor {
            sequence: slot,
            after: None,
        };
        true
    }

    /// Hop to the previous sibling slot, at its end.
    pub fn prev_slot(&mut self) -> bool {
        let seq = self.cursor.sequence;
        let Some(container) = self.pool.node(seq).parent else {
            return false;
        };
        let Some(slot) = self.pool.node(container).kind.slot_before(seq) else {
            return false;
        };
        self.cursor = Cursor {
            sequence: slot,
            after: self.pool.last_child(slot),
        };
        true
    }

    /// Node directly ahead of the cursor, if any.
    pub(crate) fn node_ahead(&self) -> Option<NodeId> {
        match self.cursor.after {
            Some(a) => self.pool.node(a).next,
            None => self.pool.first_child(self.cursor.sequence),
        }
    }

    /// Container owning the cursor's sequence, plus the sequence that
    /// container sits in. `None` at the root.
    fn enclosing_container(&self) -> Option<(NodeId, NodeId)> {
        let container = self.pool.node(self.cursor.sequence).parent?;
        let parent_seq = self.pool.node(container).parent?;
        if !matches!(self.pool.node(parent_seq).kind, NodeKind::Sequence { .. }) {
            return None;
        }
        Some((container, parent_seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::commands::Cmd;
    use crate::editing::node::TextKind;

    fn digit(expr: &mut Expression, d: &str) {
        expr.apply(Cmd::InsertText {
            kind: TextKind::Number,
            text: d.to_string(),
        })
        .unwrap();
    }

    #[test]
    fn moves_fail_on_empty_expression() {
        let mut expr = Expression::new();
        let before = expr.cursor();
        assert!(!expr.move_left());
        assert!(!expr.move_right());
        assert_eq!(expr.cursor(), before);
    }

    #[test]
    fn move_left_stops_at_sequence_start() {
        let mut expr = Expression::new();
        digit(&mut expr, "1");
        digit(&mut expr, "2");

        assert!(expr.move_left());
        assert!(expr.move_left());
        assert_eq!(expr.cursor().after, None);
        assert!(!expr.move_left());
        assert_eq!(expr.cursor().after, None);
    }

    #[test]
    fn move_right_stops_at_sequence_end() {
        let mut expr = Expression::new();
        digit(&mut expr, "1");
        assert!(!expr.move_right());
    }

    #[test]
    fn exit_fails_at_root() {
        let mut expr = Expression::new();
        assert!(!expr.exit_to_parent_right());
        assert!(!expr.exit_to_parent_left());
        assert!(!expr.next_slot());
        assert!(!expr.prev_slot());
    }

    #[test]
    fn fraction_slot_navigation() {
        let mut expr = Expression::new();
        expr.apply(Cmd::InsertFraction).unwrap();
        // Nothing collected, so the cursor starts in the numerator.
        digit(&mut expr, "1");

        assert!(expr.next_slot());
        digit(&mut expr, "2");
        assert!(!expr.next_slot());

        assert!(expr.prev_slot());
        // prev_slot lands at the end of the numerator.
        assert!(expr.cursor().after.is_some());

        assert!(expr.exit_to_parent_right());
        assert_eq!(expr.cursor().sequence, expr.root());
    }

    #[test]
    fn enter_from_left_lands_in_first_slot() {
        let mut expr = Expression::new();
        expr.apply(Cmd::InsertFraction).unwrap();
        expr.exit_to_parent_left();
        assert_eq!(expr.cursor().sequence, expr.root());
        assert_eq!(expr.cursor().after, None);

        assert!(expr.enter_from_left());
        digit(&mut expr, "7");
        assert_eq!(expr.to_latex().unwrap(), "\\frac{7}{}");
    }

    #[test]
    fn enter_from_right_lands_at_end_of_last_slot() {
        let mut expr = Expression::new();
        expr.apply(Cmd::InsertFraction).unwrap();
        digit(&mut expr, "1");
        expr.next_slot();
        digit(&mut expr, "2");
        expr.exit_to_parent_right();

        // Step back over the fraction, then fall into the denominator.
        assert!(expr.move_left());
        assert!(expr.enter_from_right());
        digit(&mut expr, "5");
        assert_eq!(expr.to_latex().unwrap(), "\\frac{1}{25}");
    }

    #[test]
    fn enter_fails_on_leaf() {
        let mut expr = Expression::new();
        digit(&mut expr, "1");
        expr.move_left();
        assert!(!expr.enter_from_left());
        assert!(!expr.enter_from_right());
    }

    #[test]
    fn mixed_fraction_slot_order() {
        let mut expr = Expression::new();
        expr.apply(Cmd::InsertMixedFraction).unwrap();
        digit(&mut expr, "1");
        assert!(expr.next_slot());
        digit(&mut expr, "2");
        assert!(expr.next_slot());
        digit(&mut expr, "3");
        assert!(!expr.next_slot());
        assert_eq!(expr.to_latex().unwrap(), "1\\frac{2}{3}");
    }
}
