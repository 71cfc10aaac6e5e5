//! Sequence splice primitives. These are the only functions that mutate
//! sibling links or a sequence's `first`/`last` handles; every higher
//! level edit is a composition of them.

use crate::editing::node::{NodeId, NodeKind};
use crate::editing::pool::NodePool;

impl NodePool {
    /// Splice `node` into `seq` immediately after `after`
    /// (`None` = at the front).
    pub fn insert_after(&mut self, seq: NodeId, after: Option<NodeId>, node: NodeId) {
        debug_assert!(matches!(self.node(seq).kind, NodeKind::Sequence { .. }));
        self.node_mut(node).parent = Some(seq);

        match after {
            None => {
                let first = self.first_child(seq);
                {
                    let n = self.node_mut(node);
                    n.prev = None;
                    n.next = first;
                }
                if let Some(f) = first {
                    self.node_mut(f).prev = Some(node);
                }
                self.set_first(seq, Some(node));
                if self.last_child(seq).is_none() {
                    self.set_last(seq, Some(node));
                }
            }
            Some(a) => {
                let a_next = self.node(a).next;
                {
                    let n = self.node_mut(node);
                    n.prev = Some(a);
                    n.next = a_next;
                }
                if let Some(nx) = a_next {
                    self.node_mut(nx).prev = Some(node);
                }
                self.node_mut(a).next = Some(node);
                if self.last_child(seq) == Some(a) {
                    self.set_last(seq, Some(node));
                }
            }
        }
    }

    /// Detach `node` from whatever sequence owns it, patching neighbour
    /// links and `first`/`last`. The node itself stays allocated.
    pub fn remove(&mut self, node: NodeId) {
        let Some(seq) = self.node(node).parent else {
            return;
        };
        if !matches!(self.node(seq).kind, NodeKind::Sequence { .. }) {
            return;
        }

        let prev = self.node(node).prev;
        let next = self.node(node).next;

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.set_first(seq, next),
        }
        match next {
            Some(nx) => self.node_mut(nx).prev = prev,
            None => self.set_last(seq, prev),
        }

        let n = self.node_mut(node);
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    pub fn is_empty(&self, seq: NodeId) -> bool {
        self.first_child(seq).is_none()
    }

    pub fn first_child(&self, seq: NodeId) -> Option<NodeId> {
        match self.node(seq).kind {
            NodeKind::Sequence { first, .. } => first,
            _ => None,
        }
    }

    pub fn last_child(&self, seq: NodeId) -> Option<NodeId> {
        match self.node(seq).kind {
            NodeKind::Sequence { last, .. } => last,
            _ => None,
        }
    }

    /// Forward iteration over a sequence's children.
    pub fn children(&self, seq: NodeId) -> Children<'_> {
        Children {
            pool: self,
            cur: self.first_child(seq),
        }
    }

    pub(crate) fn set_first(&mut self, seq: NodeId, value: Option<NodeId>) {
        if let NodeKind::Sequence { first, .. } = &mut self.node_mut(seq).kind {
            *first = value;
        }
    }

    pub(crate) fn set_last(&mut self, seq: NodeId, value: Option<NodeId>) {
        if let NodeKind::Sequence { last, .. } = &mut self.node_mut(seq).kind {
            *last = value;
        }
    }
}

pub struct Children<'a> {
    pool: &'a NodePool,
    cur: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.pool.node(id).next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::node::TextKind;

    fn text(pool: &mut NodePool, s: &str) -> NodeId {
        pool.alloc(NodeKind::Text {
            kind: TextKind::Number,
            text: s.to_string(),
        })
        .unwrap()
    }

    /// Walk forward from `first` and backward from `last`, checking that
    /// both traversals visit exactly `expected`.
    fn assert_chain(pool: &NodePool, seq: NodeId, expected: &[NodeId]) {
        let forward: Vec<NodeId> = pool.children(seq).collect();
        assert_eq!(forward, expected);

        let mut backward = Vec::new();
        let mut cur = pool.last_child(seq);
        while let Some(id) = cur {
            backward.push(id);
            cur = pool.node(id).prev;
        }
        backward.reverse();
        assert_eq!(backward, expected);

        for id in expected {
            assert_eq!(pool.node(*id).parent, Some(seq));
        }
    }

    #[test]
    fn insert_at_front_and_after() {
        let mut pool = NodePool::new();
        let seq = pool.new_sequence().unwrap();
        let a = text(&mut pool, "a");
        let b = text(&mut pool, "b");
        let c = text(&mut pool, "c");

        pool.insert_after(seq, None, b);
        pool.insert_after(seq, None, a);
        pool.insert_after(seq, Some(b), c);

        assert_chain(&pool, seq, &[a, b, c]);
    }

    #[test]
    fn remove_middle_front_back() {
        let mut pool = NodePool::new();
        let seq = pool.new_sequence().unwrap();
        let ids: Vec<NodeId> = ["a", "b", "c", "d"]
            .iter()
            .map(|s| text(&mut pool, s))
            .collect();
        let mut prev = None;
        for id in &ids {
            pool.insert_after(seq, prev, *id);
            prev = Some(*id);
        }

        pool.remove(ids[1]);
        assert_chain(&pool, seq, &[ids[0], ids[2], ids[3]]);
        assert_eq!(pool.node(ids[1]).parent, None);
        assert_eq!(pool.node(ids[1]).prev, None);
        assert_eq!(pool.node(ids[1]).next, None);

        pool.remove(ids[0]);
        assert_chain(&pool, seq, &[ids[2], ids[3]]);

        pool.remove(ids[3]);
        assert_chain(&pool, seq, &[ids[2]]);

        pool.remove(ids[2]);
        assert_chain(&pool, seq, &[]);
        assert!(pool.is_empty(seq));
    }

    #[test]
    fn remove_detached_node_is_noop() {
        let mut pool = NodePool::new();
        let seq = pool.new_sequence().unwrap();
        let a = text(&mut pool, "a");
        pool.insert_after(seq, None, a);
        let b = text(&mut pool, "b");

        pool.remove(b);
        assert_chain(&pool, seq, &[a]);
    }

    #[test]
    fn chain_consistent_after_interleaved_edits() {
        let mut pool = NodePool::new();
        let seq = pool.new_sequence().unwrap();
        let a = text(&mut pool, "a");
        let b = text(&mut pool, "b");
        let c = text(&mut pool, "c");
        let d = text(&mut pool, "d");

        pool.insert_after(seq, None, a);
        pool.insert_after(seq, Some(a), b);
        pool.remove(a);
        pool.insert_after(seq, Some(b), c);
        pool.insert_after(seq, None, d);
        pool.remove(c);
        pool.insert_after(seq, Some(d), a);

        assert_chain(&pool, seq, &[d, a, b]);
    }
}
