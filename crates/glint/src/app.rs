//! Application window and frame loop.
//!
//! The loop is cooperative and single-threaded: each redraw callback runs
//! one full tick (animate, three passes, present) and then asks the host
//! for the next one. Timestamps come from a monotonic clock started when
//! the window appears.

use std::sync::Arc;
use std::time::Instant;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use glint_core::{GlintError, Result};
use glint_render::{RenderEngine, RenderError};

use crate::scene::Scene;

/// Builds a scene once the GPU engine exists.
pub type SceneBuilder = Box<dyn FnOnce(&RenderEngine) -> Box<dyn Scene>>;

/// The demo application driving one scene.
pub struct App {
    title: String,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    scene: Option<Box<dyn Scene>>,
    build_scene: Option<SceneBuilder>,
    start: Option<Instant>,
}

impl App {
    /// Creates an application that will show `title` and drive the scene
    /// produced by `build_scene`.
    #[must_use]
    pub fn new(title: impl Into<String>, build_scene: SceneBuilder) -> Self {
        Self {
            title: title.into(),
            window: None,
            engine: None,
            scene: None,
            build_scene: Some(build_scene),
            start: None,
        }
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| GlintError::Render(format!("event loop creation failed: {e}")))?;
        event_loop
            .run_app(&mut self)
            .map_err(|e| GlintError::Render(format!("event loop failed: {e}")))
    }

    #[allow(clippy::cast_precision_loss)]
    fn redraw(&mut self) {
        let (Some(engine), Some(scene), Some(start)) =
            (self.engine.as_ref(), self.scene.as_mut(), self.start)
        else {
            return;
        };

        let frame = match engine.current_frame() {
            Ok(frame) => frame,
            Err(RenderError::SurfaceLost | RenderError::SurfaceOutdated) => {
                // Reconfiguring at the current size brings the swapchain
                // back; skip this tick and try again on the next one.
                if let Some(surface) = &engine.surface {
                    surface.configure(&engine.device, &engine.surface_config);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            Err(e) => {
                log::error!("frame acquisition failed: {e}");
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let millis = start.elapsed().as_secs_f64() as f32 * 1000.0;
        scene.render(engine, &view, millis);
        frame.present();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1024, 768));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let engine = match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("render engine creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Some(build) = self.build_scene.take() {
            self.scene = Some(build(&engine));
        }
        self.engine = Some(engine);
        self.window = Some(window.clone());
        self.start = Some(Instant::now());
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.resize(size.width, size.height);
                    if let (Some(scene), Some(engine)) =
                        (self.scene.as_mut(), self.engine.as_ref())
                    {
                        scene.resize(engine);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}
