use winit::dpi::LogicalSize;

use webgpu_bridge::{AdapterOptions, DeviceOptions, WaitPolicy};

/// Demo window and GPU configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub adapter: AdapterOptions,
    pub device: DeviceOptions,
    /// Wait policy for the shader compilation-info request.
    pub shader_wait: WaitPolicy,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "webgpu-bridge demo".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            adapter: AdapterOptions::default(),
            device: DeviceOptions {
                label: "demo device".to_string(),
                ..Default::default()
            },
            shader_wait: WaitPolicy::Forever,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn shader_wait_is_independent_of_device_wait() {
        let mut config = DemoConfig::default();
        assert_eq!(config.shader_wait, WaitPolicy::Forever);

        config.device.wait = WaitPolicy::Timeout(Duration::from_secs(5));
        assert_eq!(config.shader_wait, WaitPolicy::Forever);
    }
}
