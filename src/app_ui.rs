use ash;
use ash::vk;
use imgui::{Condition, Context};
use imgui_rs_vulkan_renderer::{Options, Renderer};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::event::Event;

use crate::config::Config;
use crate::vk_ctx::VkCtx;

/// Numbers shown in the diagnostics panel, gathered by the app each frame.
pub struct DiagnosticPanelStats {
  pub frame_time_ms: f32,
  pub fps: f32,
  pub resolution: (u32, u32),
  pub image_count: usize,
  pub present_mode: String,
}

pub struct AppUI {
  imgui: imgui::Context,
  renderer: Renderer,
  platform: WinitPlatform,
}

impl AppUI {
  pub fn new(
    window: &winit::window::Window,
    vk_ctx: &VkCtx,
    render_pass: vk::RenderPass,
    command_pool: vk::CommandPool,
  ) -> Self {
    let mut imgui = Context::create();
    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), window, HiDpiMode::Rounded);

    let renderer = Renderer::with_default_allocator(
      &vk_ctx.instance,
      vk_ctx.device.phys_device,
      vk_ctx.device.device.clone(),
      vk_ctx.device.queue,
      command_pool,
      render_pass,
      &mut imgui,
      Some(Options {
        in_flight_frames: Config::FRAMES_IN_FLIGHT,
        ..Default::default()
      }),
    )
    .expect("Failed to initialize GUI");

    Self {
      imgui,
      renderer,
      platform,
    }
  }

  pub fn handle_event(&mut self, window: &winit::window::Window, event: &Event<()>) {
    self
      .platform
      .handle_event(self.imgui.io_mut(), window, event);
  }

  /// True when imgui has focus and the app should not react to the event.
  pub fn intercepted_input(&self) -> bool {
    let io = self.imgui.io();
    io.want_capture_keyboard || io.want_capture_mouse
  }

  /// Builds and records the diagnostics panel. Must run inside an active
  /// render pass, in the subpass the overlay renderer was created for.
  pub fn render_ui(
    &mut self,
    window: &winit::window::Window,
    command_buffer: vk::CommandBuffer,
    stats: &DiagnosticPanelStats,
  ) {
    self
      .platform
      .prepare_frame(self.imgui.io_mut(), window)
      .expect("Failed to prepare overlay frame");
    {
      let ui = self.imgui.frame();

      ui.window("Diagnostics")
        .position([10.0, 10.0], Condition::FirstUseEver)
        .size([280.0, 140.0], Condition::FirstUseEver)
        .resizable(false)
        .build(|| {
          ui.text(format!(
            "Frame: {:.2} ms ({:.0} fps)",
            stats.frame_time_ms, stats.fps
          ));
          ui.text(format!(
            "Resolution: {}x{}",
            stats.resolution.0, stats.resolution.1
          ));
          ui.text(format!("Swapchain images: {}", stats.image_count));
          ui.text(format!("Present mode: {}", stats.present_mode));
        });

      self.platform.prepare_render(&ui, window);
    }

    let draw_data = self.imgui.render();
    self
      .renderer
      .cmd_draw(command_buffer, draw_data)
      .expect("Failed to render overlay");
  }
}
