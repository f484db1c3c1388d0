//! Headless rendering API.
//!
//! Renders one frame of the mirror scene at a chosen timestamp without
//! opening a window. Used by integration tests and batch capture.

use pollster::FutureExt;

use glint_core::{GlintError, Result, SceneOptions};
use glint_render::{CaptureTarget, RenderEngine};

use crate::scene::{MirrorScene, Scene};

/// Renders the mirror scene to a raw RGBA pixel buffer.
///
/// `millis` selects the animation timestamp, so captures are
/// deterministic. The returned buffer holds `width * height * 4` bytes,
/// rows top to bottom.
pub fn render_to_image(width: u32, height: u32, millis: f32) -> Result<Vec<u8>> {
    let engine = RenderEngine::new_headless(width, height)
        .block_on()
        .map_err(|e| GlintError::Render(format!("headless engine creation failed: {e}")))?;

    let mut scene = MirrorScene::procedural(&engine, SceneOptions::default());
    let capture = CaptureTarget::new(&engine);
    scene.render(&engine, &capture.view, millis);

    capture
        .read_pixels(&engine)
        .map_err(|e| GlintError::Render(format!("frame capture failed: {e}")))
}

/// Renders the mirror scene and saves it as a PNG or JPEG file.
pub fn render_to_file(filename: &str, width: u32, height: u32, millis: f32) -> Result<()> {
    let data = render_to_image(width, height, millis)?;
    glint_render::save_image(filename, &data, width, height)
        .map_err(|e| GlintError::Render(format!("failed to save image: {e}")))
}
