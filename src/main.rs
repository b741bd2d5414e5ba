use log::info;
use winit::{
  dpi::LogicalSize,
  event::{Event, VirtualKeyCode},
  event_loop::{ControlFlow, EventLoop},
  window::WindowBuilder,
};

mod app_input;
mod app_timer;
mod app_ui;
mod camera;
mod config;
mod error;
mod render_graph;
mod vk_ctx;
mod vk_utils;

use crate::app_input::AppInput;
use crate::app_timer::AppTimer;
use crate::app_ui::{AppUI, DiagnosticPanelStats};
use crate::camera::Camera;
use crate::config::Config;
use crate::render_graph::RenderGraph;
use crate::vk_ctx::vk_ctx_initialize;

// glslangValidator -V assets/shaders/raymarch.frag.glsl -o assets/shaders-compiled/raymarch.frag.spv

fn main() {
  simple_logger::SimpleLogger::new().init().unwrap();
  log::set_max_level(log::LevelFilter::Debug);
  info!("-- Start --");

  let config = Config::new();

  // init window
  let event_loop = EventLoop::new();
  let window = WindowBuilder::new()
    .with_title("Rust Vulkan Raymarcher")
    .with_resizable(false)
    .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
    .build(&event_loop)
    .unwrap();

  // init renderer
  let mut vk_ctx = vk_ctx_initialize(&window, &config).expect("Failed to initialize Vulkan");
  let mut render_graph = RenderGraph::new(&vk_ctx).expect("Failed to create render graph");
  info!("Render init went OK!");

  // overlay lives in an Option so we can drop it first during teardown
  let mut app_ui = Some(AppUI::new(
    &window,
    &vk_ctx,
    render_graph.render_pass(),
    render_graph.command_pool(),
  ));

  let aspect_ratio = (config.window_width / config.window_height) as f32;
  let mut camera = Camera::new(&config.camera, aspect_ratio);
  let mut timer = AppTimer::new();
  let mut input = AppInput::new();
  let mut show_hud = config.show_hud;
  let mut show_diagnostics = config.show_diagnostics;

  info!("Starting event loop");
  event_loop.run(move |event, _, control_flow| {
    *control_flow = ControlFlow::Poll;

    if let Some(ui) = app_ui.as_mut() {
      ui.handle_event(&window, &event);
    }
    let imgui_intercepted = show_diagnostics
      && app_ui
        .as_ref()
        .map_or(false, |ui| ui.intercepted_input());
    input.handle_event(&event, imgui_intercepted);

    match event {
      Event::MainEventsCleared => {
        let delta_time = timer.mark_start_frame();

        if input.was_pressed(VirtualKeyCode::F3) {
          show_diagnostics = !show_diagnostics;
          info!("Diagnostics panel: {}", show_diagnostics);
        }
        if input.was_pressed(VirtualKeyCode::F4) {
          show_hud = !show_hud;
          info!("HUD: {}", show_hud);
        }
        input.update_camera(&mut camera, delta_time);

        render_graph.update_params(
          &vk_ctx,
          camera.view_matrix(),
          camera.perspective_matrix(),
          camera.position(),
          camera.forward(),
          camera.rotation(),
          timer.elapsed_time(),
          show_hud,
        );

        let stats = DiagnosticPanelStats {
          frame_time_ms: timer.delta_time_ms(),
          fps: timer.fps(),
          resolution: (vk_ctx.window_size.width, vk_ctx.window_size.height),
          image_count: render_graph.image_count(),
          present_mode: format!("{:?}", vk_ctx.present_mode),
        };
        let ui = app_ui.as_mut().expect("Overlay used after teardown");
        render_graph.draw_frame(&vk_ctx, &window, ui, show_hud, show_diagnostics, &stats);

        input.reset_transient_state();
        if input.close_requested {
          *control_flow = ControlFlow::Exit;
        }
      }

      // before destroy
      Event::LoopDestroyed => {
        info!("EventLoop is shutting down");
        unsafe {
          vk_ctx
            .device
            .device
            .device_wait_idle()
            .expect("Failed to wait for device idle on shutdown");
          // overlay renderer frees its GPU resources on drop
          app_ui.take();
          render_graph.destroy(&vk_ctx);
          vk_ctx.destroy();
        }
      }

      _ => (),
    }
  });
}
