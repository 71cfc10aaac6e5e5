pub mod editing;
pub mod latex;
pub mod render;
pub mod transport;

// Re-export key types for easier usage
pub use editing::{commands::*, cursor::*, expr::*, modes::*, node::*, pool::*};
pub use latex::{LatexError, MAX_LATEX};
pub use render::{draw::*, measure::*, metrics::*, surface::*};
pub use transport::*;
