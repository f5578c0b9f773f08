use std::time::Duration;

/// How long a blocking request waits for its completion.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WaitPolicy {
    /// Block until the completion fires, however long that takes.
    #[default]
    Forever,
    /// Give up after the duration. The GPU request keeps running; its late
    /// result is discarded.
    Timeout(Duration),
}

/// Parameters for adapter acquisition.
///
/// The compatible surface is passed separately since it is owned by the caller.
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub power_preference: wgpu::PowerPreference,

    /// Ask for a software adapter instead of hardware.
    pub force_fallback_adapter: bool,

    pub wait: WaitPolicy,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::None,
            force_fallback_adapter: false,
            wait: WaitPolicy::Forever,
        }
    }
}

/// Parameters for device acquisition.
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    pub label: String,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter.
    pub required_limits: wgpu::Limits,

    pub memory_hints: wgpu::MemoryHints,

    pub wait: WaitPolicy,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            label: "webgpu-bridge device".to_string(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            wait: WaitPolicy::Forever,
        }
    }
}
