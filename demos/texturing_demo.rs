#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Texturing demonstration: a tumbling cube blending two 2D textures in
//! front of a cubemap skybox.
//!
//! Textures (`texture_paper.jpg`, `purple.jpg`) and cubemap faces are read
//! from a local `images/` directory when one exists; otherwise they are
//! generated procedurally.
//!
//! Run with: cargo run --example `texturing_demo`

use std::path::Path;

use glint::{init, App, CubemapFaces, GlintError, TexturedOptions, TexturedScene};

fn main() -> glint::Result<()> {
    init();

    let options = TexturedOptions::default();

    let assets = if Path::new("images").is_dir() {
        let base = glint::load_image("images/texture_paper.jpg")
            .map_err(|e| GlintError::Render(e.to_string()))?;
        let overlay = glint::load_image("images/purple.jpg")
            .map_err(|e| GlintError::Render(e.to_string()))?;
        let faces = CubemapFaces::load_dir("images")
            .map_err(|e| GlintError::Render(e.to_string()))?;
        Some((base, overlay, faces))
    } else {
        None
    };

    App::new(
        "glint - texturing",
        Box::new(move |engine| match &assets {
            Some((base, overlay, faces)) => {
                Box::new(TexturedScene::new(engine, options, base, overlay, faces))
            }
            None => Box::new(TexturedScene::procedural(engine, options)),
        }),
    )
    .run()
}
