//! Demo for `webgpu-bridge`.
//!
//! Opens one window, resolves a surface for it, acquires an adapter and a device,
//! validates a shader, then idles until the window is closed.

mod app;
mod config;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use webgpu_bridge::logging::{init_logging, LoggingConfig};

use app::DemoApp;
use config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = DemoApp::new(DemoConfig::default());

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    app.finish()
}
