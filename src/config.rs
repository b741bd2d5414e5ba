pub struct CameraConfig {
  pub position: [f32; 3],
  pub fov_dgr: f32,
  pub z_near: f32,
  pub z_far: f32,
  pub move_speed: f32,
  pub rotate_sensitivity: f32,
}

impl Default for CameraConfig {
  fn default() -> Self {
    Self {
      position: [0.0, 1.5, 4.0],
      fov_dgr: 80.0,
      z_near: 0.1,
      z_far: 100.0,
      move_speed: 5.0,
      rotate_sensitivity: 0.002,
    }
  }
}

pub struct Config {
  // window
  pub window_width: f64,
  pub window_height: f64,
  /// VK_LAYER_KHRONOS_validation + debug utils messenger
  pub vulkan_validation: bool,
  pub camera: CameraConfig,
  /// HUD (crosshair, panel) visible on start
  pub show_hud: bool,
  /// imgui diagnostics panel visible on start
  pub show_diagnostics: bool,
}

impl Config {
  /// Frame slots cycled by the sequencer. Every per-frame ring (parameter
  /// buffers, descriptor sets, sync objects) has exactly this many entries.
  pub const FRAMES_IN_FLIGHT: usize = 2;

  pub fn new() -> Config {
    Config {
      window_width: 1280f64,
      window_height: 720f64,
      vulkan_validation: cfg!(debug_assertions),
      camera: CameraConfig::default(),
      show_hud: true,
      show_diagnostics: false,
    }
  }
}
