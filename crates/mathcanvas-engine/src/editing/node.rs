/// Longest text a leaf node may store, in bytes.
pub const MAX_TEXT_LEN: usize = 15;

/// Longest function name, in bytes ("arcsin" is the worst built-in case).
pub const MAX_FUNC_NAME_LEN: usize = 7;

/// Handle into the node pool. Handles stay valid until the node is
/// released; a released slot may be reused for an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u16);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Subtypes of text leaves. The subtype drives operator-aware editing
/// (numerator collection stops at operators) and LaTeX output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// 0-9, .
    Number,
    /// x, y, z, α, β, ...
    Variable,
    /// +, -, ×, ÷
    Operator,
    /// π (drawn by hand, serialized as \pi)
    Pi,
    /// Literal ( typed as a character, not a bracket pair
    ParenOpen,
    /// Literal )
    ParenClose,
}

/// The payload of one pool slot. Container variants hold the handles of
/// their child slot sequences; those sequences are allocated together
/// with the container and stay live for the container's whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Unused pool slot.
    Empty,
    /// Horizontal list of children.
    Sequence {
        first: Option<NodeId>,
        last: Option<NodeId>,
    },
    /// Leaf: number, variable or operator text.
    Text { kind: TextKind, text: String },
    Fraction {
        numer: NodeId,
        denom: NodeId,
    },
    Exponent {
        base: NodeId,
        power: NodeId,
    },
    Subscript {
        base: NodeId,
        sub: NodeId,
    },
    /// Root with a fixed literal index (2 = square root).
    Root {
        index: u8,
        content: NodeId,
    },
    /// Root whose index is itself an editable sub-expression.
    NthRoot {
        index: NodeId,
        content: NodeId,
    },
    Abs {
        content: NodeId,
    },
    Paren {
        content: NodeId,
    },
    Function {
        name: String,
        arg: NodeId,
    },
    /// Whole part followed by a fraction block.
    MixedFraction {
        whole: NodeId,
        numer: NodeId,
        denom: NodeId,
    },
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        self.first_slot().is_some()
    }

    /// Slot the cursor lands in when entering this node from its left edge.
    pub fn first_slot(&self) -> Option<NodeId> {
        match *self {
            NodeKind::Fraction { numer, .. } => Some(numer),
            NodeKind::Exponent { base, .. } => Some(base),
            NodeKind::Subscript { base, .. } => Some(base),
            NodeKind::Root { content, .. } => Some(content),
            NodeKind::NthRoot { index, .. } => Some(index),
            NodeKind::Abs { content } => Some(content),
            NodeKind::Paren { content } => Some(content),
            NodeKind::Function { arg, .. } => Some(arg),
            NodeKind::MixedFraction { whole, .. } => Some(whole),
            _ => None,
        }
    }

    /// Slot the cursor lands in when entering this node from its right edge.
    pub fn last_slot(&self) -> Option<NodeId> {
        match *self {
            NodeKind::Fraction { denom, .. } => Some(denom),
            NodeKind::Exponent { power, .. } => Some(power),
            NodeKind::Subscript { sub, .. } => Some(sub),
            NodeKind::Root { content, .. } => Some(content),
            NodeKind::NthRoot { content, .. } => Some(content),
            NodeKind::Abs { content } => Some(content),
            NodeKind::Paren { content } => Some(content),
            NodeKind::Function { arg, .. } => Some(arg),
            NodeKind::MixedFraction { denom, .. } => Some(denom),
            _ => None,
        }
    }

    /// Sibling slot after `current` within this container
    /// (numerator -> denominator, base -> power, ...).
    pub fn slot_after(&self, current: NodeId) -> Option<NodeId> {
        match *self {
            NodeKind::Fraction { numer, denom } if current == numer => Some(denom),
            NodeKind::Exponent { base, power } if current == base => Some(power),
            NodeKind::Subscript { base, sub } if current == base => Some(sub),
            NodeKind::NthRoot { index, content } if current == index => Some(content),
            NodeKind::MixedFraction { whole, numer, .. } if current == whole => Some(numer),
            NodeKind::MixedFraction { numer, denom, .. } if current == numer => Some(denom),
            _ => None,
        }
    }

    /// Sibling slot before `current` within this container.
    pub fn slot_before(&self, current: NodeId) -> Option<NodeId> {
        match *self {
            NodeKind::Fraction { numer, denom } if current == denom => Some(numer),
            NodeKind::Exponent { base, power } if current == power => Some(base),
            NodeKind::Subscript { base, sub } if current == sub => Some(base),
            NodeKind::NthRoot { index, content } if current == content => Some(index),
            NodeKind::MixedFraction { numer, denom, .. } if current == denom => Some(numer),
            NodeKind::MixedFraction { whole, numer, .. } if current == numer => Some(whole),
            _ => None,
        }
    }
}

/// One element of the expression tree. Sibling links and the parent
/// back-reference are maintained by the sequence splice primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            prev: None,
            next: None,
        }
    }
}
