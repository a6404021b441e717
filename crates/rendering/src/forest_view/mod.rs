//! Forest view: a procedurally generated pixel-art forest, repainted every
//! frame into a low-resolution texture and upscaled to fill the window.
//!
//! The scene is rebuilt whenever the time-of-day category changes: new tree
//! layout, new palette. Window resizes change the logical resolution but keep
//! the trees where they are.

mod canvas;
mod image_gen;
mod painter;
mod render_loop;
mod systems;
mod tests;
mod types;

pub use canvas::PixelCanvas;
pub use painter::{hill_height, paint_frame, FrameStats};
pub use render_loop::{ForestRenderLoop, RenderLoopState, FALLBACK_VIEWPORT};
pub use systems::ForestViewPlugin;
pub use types::{ForestCanvas, ForestSurface};
