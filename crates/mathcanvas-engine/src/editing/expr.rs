use crate::editing::commands::{self, Cmd, EditError, Patch};
use crate::editing::cursor::Cursor;
use crate::editing::node::{NodeId, NodeKind};
use crate::editing::pool::NodePool;
use crate::latex::{self, LatexError};
use crate::render::measure::measure;

/// One editable math expression: the node pool, the root sequence and
/// the cursor. All mutation goes through [`Expression::apply`] or the
/// cursor navigation methods; rendering and serialization only read.
pub struct Expression {
    pub(crate) pool: NodePool,
    pub(crate) root: NodeId,
    pub(crate) cursor: Cursor,
    pub(crate) version: u64,
}

impl Expression {
    pub fn new() -> Self {
        let mut pool = NodePool::new();
        let root = pool
            .new_sequence()
            .expect("fresh pool always has a free slot");
        Expression {
            pool,
            root,
            cursor: Cursor {
                sequence: root,
                after: None,
            },
            version: 0,
        }
    }

    /// Apply an editing command. Returns what happened: whether the tree
    /// changed, and whether the input glue should reset its mode flags.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        commands::apply(self, cmd)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Kind of the container whose slot the cursor is in, with the slot
    /// handle. `None` when the cursor is at the root.
    pub fn cursor_container(&self) -> Option<(&NodeKind, NodeId)> {
        let seq = self.cursor.sequence;
        let container = self.pool.node(seq).parent?;
        Some((&self.pool.node(container).kind, seq))
    }

    /// Version counter, incremented on every change. Lets a UI skip
    /// redraws when nothing happened.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty(self.root)
    }

    /// Pixel width of the whole expression at 100% scale.
    pub fn width(&self) -> i32 {
        measure(&self.pool, self.root, 100).width
    }

    /// Pixel height of the whole expression at 100% scale.
    pub fn height(&self) -> i32 {
        measure(&self.pool, self.root, 100).height
    }

    pub fn to_latex(&self) -> Result<String, LatexError> {
        latex::render(self)
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::new()
    }
}
