/*!
 * # Editing Core Module
 *
 * The editing system is built around four pieces:
 *
 * ### 1. Single Source of Truth: the node pool
 * - The entire expression lives in one fixed-capacity **`NodePool`** arena
 * - Nodes address each other through **`NodeId`** handles, never references,
 *   so splicing and detaching stay O(1) with no dangling-pointer risk when
 *   slots are reused
 * - Freed slots return to the `Empty` state and are reused round-robin
 *
 * ### 2. Sequences
 * - Every horizontal run of symbols is a **sequence** node: a doubly-linked
 *   list of siblings with `first`/`last` handles
 * - Container nodes (fractions, exponents, roots, ...) own their editable
 *   slots as child sequences, so the whole expression is a tree of
 *   sequences and leaves
 *
 * ### 3. Cursor
 * - The **`Cursor`** is a `(sequence, after)` pair: the position *between*
 *   nodes of one sequence (`after == None` means "before the first child")
 * - Navigation is split into small primitives — step within a sequence,
 *   enter a container from either edge, exit to the parent on either side,
 *   hop between sibling slots — and each reports `false` at a boundary
 *   instead of erroring, because hitting an edge is how the UI learns
 *   where it is
 *
 * ### 4. Command-Based Editing
 * - All edits are **Commands** (`Cmd` enum) applied through
 *   `Expression::apply`, which returns a `Patch` describing what happened
 * - Structural inserts collect preceding siblings into the new container
 *   (a fraction absorbs the term before the cursor as its numerator, an
 *   exponent absorbs a single node as its base) and reposition the cursor
 *   into the slot the user will type into next
 * - Mode clearing is a **directive on the returned `Patch`**, not a hidden
 *   side effect: the input glue owns the shift/alpha flags and applies
 *   `Patch::reset_modes` itself
 * - Capacity exhaustion is a reported `EditError`; inserts reserve their
 *   node count up front so a failed insert changes nothing
 *
 * ## Usage Pattern
 *
 * ```rust
 * use mathcanvas_engine::editing::{Cmd, Expression, TextKind};
 *
 * let mut expr = Expression::new();
 * expr.apply(Cmd::InsertText { kind: TextKind::Number, text: "2".into() }).unwrap();
 * expr.apply(Cmd::InsertExponent).unwrap(); // "2" becomes the base, cursor in the power
 * expr.apply(Cmd::InsertText { kind: TextKind::Number, text: "8".into() }).unwrap();
 * assert_eq!(expr.to_latex().unwrap(), "{2}^{8}");
 * ```
 */

pub mod commands;
pub mod cursor;
pub mod expr;
pub mod modes;
pub mod node;
pub mod pool;
pub mod sequence;

// Public API re-exports
pub use commands::{Cmd, EditError, Patch};
pub use cursor::Cursor;
pub use expr::Expression;
pub use modes::Modes;
pub use node::{Node, NodeId, NodeKind, TextKind};
pub use pool::{NodePool, PoolExhausted};
