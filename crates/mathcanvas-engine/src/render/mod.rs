/*!
 * Two-pass rendering: [`measure`](measure::measure) computes width,
 * height and baseline for any subtree without touching a surface, and
 * the draw pass places ink through an injected [`DrawSurface`]
 * (surface::DrawSurface) by re-running the same formulas. The two
 * passes share every constant and scale rule, so a drawn expression can
 * never disagree with its measured box.
 */

pub mod draw;
pub mod measure;
pub mod metrics;
pub mod surface;

pub use draw::{RenderOptions, draw};
pub use measure::measure;
pub use metrics::Metrics;
pub use surface::{DrawSurface, Rgb};
