#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Planar-reflection (mirror) demonstration.
//!
//! This demo shows:
//! - An orbiting camera over a spinning, flattened gem
//! - A swinging mirror rendered with a two-view reflection pipeline
//! - Ripple distortion and chromatic aberration on the mirror surface
//! - A skybox shared by the main and reflected views
//!
//! Cubemap faces (`px/nx/py/ny/pz/nz.png`) and a distortion map
//! (`mirrortexture.jpg`) are read from a local `images/` directory when one
//! exists; otherwise the textures are generated procedurally.
//!
//! Run with: cargo run --example `mirror_demo`
//!
//! Pass an output path to capture a single frame headlessly instead:
//! cargo run --example `mirror_demo` -- frame.png

use std::path::Path;

use glint::{init, App, CubemapFaces, GlintError, MirrorScene, SceneOptions};

fn main() -> glint::Result<()> {
    init();

    if let Some(output) = std::env::args().nth(1) {
        log::info!("rendering one headless frame to {output}");
        return glint::headless::render_to_file(&output, 1024, 768, 0.0);
    }

    let options = SceneOptions::default();

    // Load once at startup; a broken asset directory aborts the demo.
    let assets = if Path::new("images").is_dir() {
        let faces = CubemapFaces::load_dir("images")
            .map_err(|e| GlintError::Render(e.to_string()))?;
        let distortion = glint::load_image("images/mirrortexture.jpg")
            .map_err(|e| GlintError::Render(e.to_string()))?;
        Some((faces, distortion))
    } else {
        None
    };

    App::new(
        "glint - mirror",
        Box::new(move |engine| match &assets {
            Some((faces, distortion)) => {
                Box::new(MirrorScene::new(engine, options, faces, distortion))
            }
            None => Box::new(MirrorScene::procedural(engine, options)),
        }),
    )
    .run()
}
