use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use webgpu_bridge::request::{request_adapter, request_device, validate_shader};
use webgpu_bridge::{NativeWindow, SurfaceResolver};

use crate::config::DemoConfig;

const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// GPU objects created for the demo window.
///
/// Holds a surface built from the window's raw handles, so it must be dropped
/// before the window.
struct GpuSession {
    _surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    _device: wgpu::Device,
    _queue: wgpu::Queue,
    _shader: wgpu::ShaderModule,
}

impl GpuSession {
    fn new(window: &Window, config: &DemoConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let native = NativeWindow::query(window).context("failed to query native window")?;
        log::info!("window runs on {}", native.subsystem());

        let resolver = SurfaceResolver::new().with_label(c"webgpu-bridge demo surface");
        // SAFETY: `DemoApp` drops the session before the window it was created from.
        let surface = unsafe { resolver.create_surface_for(&native, &instance) }
            .context("failed to create surface")?;

        let adapter = request_adapter(&instance, &config.adapter, Some(&surface))
            .context("failed to acquire adapter")?;

        let (device, queue) =
            request_device(&adapter, &config.device).context("failed to acquire device")?;
        device.on_uncaptured_error(Arc::new(report_uncaptured_error));

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("demo shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let outcome = validate_shader(&shader, config.shader_wait)
            .context("failed to compile shader")?;
        log::info!(
            "shader compiled with {} warning(s)",
            outcome.warnings().count()
        );

        Ok(Self {
            _surface: surface,
            _adapter: adapter,
            _device: device,
            _queue: queue,
            _shader: shader,
        })
    }
}

/// Logs device errors no error scope captured.
fn report_uncaptured_error(error: wgpu::Error) {
    log::error!("{}", uncaptured_error_message(&error));
}

fn uncaptured_error_message(error: &wgpu::Error) -> String {
    format!("uncaptured wgpu error: {error}")
}

/// Single-window application driving the bridge.
pub struct DemoApp {
    config: DemoConfig,
    // Declared before `window` so it is dropped first.
    session: Option<GpuSession>,
    window: Option<Window>,
    started: Option<Instant>,
    failure: Option<anyhow::Error>,
}

impl DemoApp {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            session: None,
            window: None,
            started: None,
            failure: None,
        }
    }

    /// Returns the startup failure, if any, once the event loop has ended.
    pub fn finish(mut self) -> Result<()> {
        self.session = None;
        self.window = None;

        if let Some(started) = self.started {
            log::info!("ran for {:.2?}", started.elapsed());
        }

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let session = GpuSession::new(&window, &self.config)?;

        self.window = Some(window);
        self.session = Some(session);
        self.started = Some(Instant::now());
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        log::error!("startup failed: {e:#}");
        self.failure = Some(e);
        event_loop.exit();
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else {
            return;
        };
        if window.id() != id {
            return;
        }

        if let WindowEvent::CloseRequested = event {
            log::debug!("close requested");
            self.session = None;
            self.window = None;
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncaptured_error_message_keeps_description() {
        let error = wgpu::Error::Validation {
            source: Box::new(std::fmt::Error),
            description: "buffer is still mapped".to_string(),
        };

        let message = uncaptured_error_message(&error);
        assert!(message.starts_with("uncaptured wgpu error: "));
        assert!(message.contains("buffer is still mapped"));

        report_uncaptured_error(error);
    }
}
