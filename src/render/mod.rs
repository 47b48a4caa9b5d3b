//! Frame rendering: canvas, text, assets, chart layout and the per-step scene.

/// Logo and font loading.
pub mod assets;
/// The reusable drawing surface and the frame type.
pub mod canvas;
/// The per-step chart renderer.
pub mod frame;
/// Fixed chart geometry and coordinate mapping.
pub mod layout;
pub(crate) mod text;

pub use assets::RaceAssets;
pub use canvas::{FrameCanvas, FrameRGBA};
pub use frame::{FrameRenderer, StepRenderer};
pub use layout::{AxisScale, GraphMapper};

#[cfg(test)]
#[path = "../../tests/unit/render/support.rs"]
pub(crate) mod test_support;
