//! glint-rs: real-time planar-reflection rendering demos on wgpu.
//!
//! Each demo sets up a scene once (geometry buffers, pipelines, textures,
//! off-screen targets) and then runs a per-frame loop driven by the window
//! system's redraw callback. The mirror demo renders the scene twice per
//! frame, once mirrored through a reflection matrix into an off-screen
//! target and once normally, then composites a distorted, chromatically
//! aberrated sample of that target onto the mirror surface.
//!
//! # Quick Start
//!
//! ```no_run
//! use glint::{init, show_mirror, SceneOptions};
//!
//! fn main() -> glint::Result<()> {
//!     init();
//!     show_mirror(SceneOptions::default())
//! }
//! ```
//!
//! Rendering without a window:
//!
//! ```no_run
//! let pixels = glint::headless::render_to_image(800, 600, 0.0).unwrap();
//! assert_eq!(pixels.len(), 800 * 600 * 4);
//! ```

pub mod app;
pub mod headless;
pub mod scene;

// Re-export core types
pub use glint_core::{
    GlintError, LightOptions, Result, RippleOptions, SceneOptions, TexturedOptions,
};

// Re-export render types
pub use glint_render::{load_image, CubemapFaces, RenderEngine, RenderError};

pub use app::App;
pub use scene::{MirrorScene, PassKind, Scene, TexturedScene, PASS_SCHEDULE};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3};

/// Initializes logging.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = env_logger::try_init();
    log::info!("glint-rs initialized");
}

/// Opens a window and runs the mirror demo until it is closed.
pub fn show_mirror(options: SceneOptions) -> Result<()> {
    App::new(
        "glint - mirror",
        Box::new(move |engine| Box::new(MirrorScene::procedural(engine, options))),
    )
    .run()
}

/// Opens a window and runs the texturing demo until it is closed.
pub fn show_textured(options: TexturedOptions) -> Result<()> {
    App::new(
        "glint - texturing",
        Box::new(move |engine| Box::new(TexturedScene::procedural(engine, options))),
    )
    .run()
}
