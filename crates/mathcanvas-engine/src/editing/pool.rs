use thiserror::Error;

use crate::editing::node::{Node, NodeId, NodeKind};

/// Upper bound on the number of live nodes in one expression.
pub const POOL_CAPACITY: usize = 256;

/// Returned when an allocation would exceed [`POOL_CAPACITY`]. Callers
/// treat this as "the edit did not happen", never as a fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("node pool exhausted ({capacity} slots in use)")]
pub struct PoolExhausted {
    pub capacity: usize,
}

/// Fixed-capacity arena holding every node of one expression.
///
/// Allocation scans for an `Empty` slot starting from a rotating index so
/// freed slots are reused round-robin rather than first-fit from zero;
/// that spreads reuse and keeps recently-freed handles from being
/// recycled immediately.
pub struct NodePool {
    nodes: Vec<Node>,
    next_free: usize,
}

impl NodePool {
    pub fn new() -> Self {
        NodePool {
            nodes: (0..POOL_CAPACITY)
                .map(|_| Node::new(NodeKind::Empty))
                .collect(),
            next_free: 0,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Allocate a slot for `kind`, with cleared links.
    pub fn alloc(&mut self, kind: NodeKind) -> Result<NodeId, PoolExhausted> {
        for i in 0..POOL_CAPACITY {
            let idx = (self.next_free + i) % POOL_CAPACITY;
            if matches!(self.nodes[idx].kind, NodeKind::Empty) {
                self.nodes[idx] = Node::new(kind);
                self.next_free = (idx + 1) % POOL_CAPACITY;
                return Ok(NodeId(idx as u16));
            }
        }
        Err(PoolExhausted {
            capacity: POOL_CAPACITY,
        })
    }

    /// Allocate an empty sequence node.
    pub fn new_sequence(&mut self) -> Result<NodeId, PoolExhausted> {
        self.alloc(NodeKind::Sequence {
            first: None,
            last: None,
        })
    }

    /// Return a node and all of its descendants to the `Empty` state.
    /// No-op on a slot that is already empty, so double-release cannot
    /// corrupt the free scan.
    pub fn release(&mut self, id: NodeId) {
        if matches!(self.node(id).kind, NodeKind::Empty) {
            return;
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.prev = None;
        node.next = None;
        let kind = std::mem::replace(&mut node.kind, NodeKind::Empty);
        match kind {
            NodeKind::Sequence { first, .. } => {
                let mut child = first;
                while let Some(c) = child {
                    let next = self.node(c).next;
                    self.release(c);
                    child = next;
                }
            }
            NodeKind::Fraction { numer, denom } => {
                self.release(numer);
                self.release(denom);
            }
            NodeKind::Exponent { base, power } => {
                self.release(base);
                self.release(power);
            }
            NodeKind::Subscript { base, sub } => {
                self.release(base);
                self.release(sub);
            }
            NodeKind::Root { content, .. } => self.release(content),
            NodeKind::NthRoot { index, content } => {
                self.release(index);
                self.release(content);
            }
            NodeKind::Abs { content } => self.release(content),
            NodeKind::Paren { content } => self.release(content),
            NodeKind::Function { arg, .. } => self.release(arg),
            NodeKind::MixedFraction {
                whole,
                numer,
                denom,
            } => {
                self.release(whole);
                self.release(numer);
                self.release(denom);
            }
            NodeKind::Empty | NodeKind::Text { .. } => {}
        }
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| !matches!(n.kind, NodeKind::Empty))
            .count()
    }

    pub fn free_slots(&self) -> usize {
        POOL_CAPACITY - self.live_nodes()
    }

    /// Check that `needed` slots are available before a multi-node
    /// construction starts, so it cannot fail halfway through.
    pub(crate) fn ensure_free(&self, needed: usize) -> Result<(), PoolExhausted> {
        if self.free_slots() >= needed {
            Ok(())
        } else {
            Err(PoolExhausted {
                capacity: POOL_CAPACITY,
            })
        }
    }
}

impl Default for NodePool {
    fn default() -> Self {
        Self::new()
    }
}
