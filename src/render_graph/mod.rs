use ash;
use ash::vk;
use glam::{Mat4, Quat, Vec3};
use log::{info, warn};

use crate::app_ui::{AppUI, DiagnosticPanelStats};
use crate::config::Config;
use crate::error::RenderError;
use crate::vk_ctx::VkCtx;
use crate::vk_utils::*;

pub mod _shared;
mod frame_plan;
mod frame_sequence;
mod hud_pass;
mod world_pass;

pub use self::frame_plan::*;
pub use self::frame_sequence::*;
pub use self::hud_pass::*;
pub use self::world_pass::*;

use self::_shared::HudParamsUBO;

/// Sync objects for one frame in flight. Semaphores pace the GPU within
/// a frame, the fence paces the CPU across frames.
struct FrameSlot {
  image_acquired: vk::Semaphore,
  render_finished: vk::Semaphore,
  in_flight: vk::Fence,
}

/// Owns everything per-swapchain: the presentable image chain, the single
/// 2-subpass render pass (world, then HUD + overlay), both passes, command
/// buffers and per-frame sync. `draw_frame` runs one full frame.
pub struct RenderGraph {
  swapchain: vk::SwapchainKHR,
  image_views: Vec<vk::ImageView>,
  framebuffers: Vec<vk::Framebuffer>,
  render_pass: vk::RenderPass,
  command_pool: vk::CommandPool,
  /// One per swapchain image, indexed by the acquired image index.
  command_buffers: Vec<vk::CommandBuffer>,
  frame_slots: Vec<FrameSlot>,
  sequencer: FrameSequencer,
  world_pass: WorldPass,
  hud_pass: HudPass,
}

impl RenderGraph {
  pub fn new(vk_ctx: &VkCtx) -> Result<Self, RenderError> {
    let device = &vk_ctx.device.device;

    let surface_capabilities = get_surface_capabilities(
      vk_ctx.device.phys_device,
      &vk_ctx.surface_loader,
      vk_ctx.surface_khr,
    );
    let swapchain = create_swapchain_khr(
      &vk_ctx.swapchain_loader,
      vk_ctx.surface_khr,
      &vk_ctx.surface_format,
      surface_capabilities,
      &vk_ctx.window_size,
      vk_ctx.device.queue_family_index,
      vk_ctx.present_mode,
    );
    let (swapchain_images, image_views) = create_swapchain_images(
      &vk_ctx.swapchain_loader,
      swapchain,
      device,
      vk_ctx.surface_format.format,
    );
    info!("Swapchain has {} images", swapchain_images.len());

    let render_pass = create_render_pass(device, vk_ctx.surface_format.format);
    let framebuffers =
      create_framebuffers_with_one_attachment(device, render_pass, &image_views, &vk_ctx.window_size);

    let command_pool = create_command_pool(device, vk_ctx.device.queue_family_index);
    let command_buffers =
      create_command_buffers(device, command_pool, swapchain_images.len() as u32);

    let fences = create_fences(device, Config::FRAMES_IN_FLIGHT);
    let image_acquired_semaphores = create_semaphores(device, Config::FRAMES_IN_FLIGHT);
    let render_finished_semaphores = create_semaphores(device, Config::FRAMES_IN_FLIGHT);
    let frame_slots = fences
      .into_iter()
      .zip(image_acquired_semaphores)
      .zip(render_finished_semaphores)
      .map(|((in_flight, image_acquired), render_finished)| FrameSlot {
        image_acquired,
        render_finished,
        in_flight,
      })
      .collect();

    let world_pass = WorldPass::new(vk_ctx, render_pass)?;
    let hud_pass = HudPass::new(vk_ctx, render_pass)?;

    Ok(Self {
      swapchain,
      image_views,
      framebuffers,
      render_pass,
      command_pool,
      command_buffers,
      frame_slots,
      sequencer: FrameSequencer::new(Config::FRAMES_IN_FLIGHT),
      world_pass,
      hud_pass,
    })
  }

  pub fn render_pass(&self) -> vk::RenderPass {
    self.render_pass
  }

  pub fn command_pool(&self) -> vk::CommandPool {
    self.command_pool
  }

  pub fn image_count(&self) -> usize {
    self.image_views.len()
  }

  /// Uploads this frame's parameters into the next ring slot of both
  /// passes. Call exactly once before `draw_frame`.
  #[allow(clippy::too_many_arguments)]
  pub fn update_params(
    &mut self,
    vk_ctx: &VkCtx,
    view: Mat4,
    proj: Mat4,
    camera_pos: Vec3,
    camera_forward: Vec3,
    camera_rotation: Quat,
    elapsed_time: f32,
    show_hud: bool,
  ) {
    let device = &vk_ctx.device.device;
    self.world_pass.update_params(device, view, proj, camera_pos);

    // aspect recovered from the projection matrix, not the window - keeps
    // whatever convention the caller's projection uses
    let aspect = proj.y_axis.y / proj.x_axis.x;
    let hud_params = HudParamsUBO {
      u_view: view,
      u_proj: proj,
      u_camera_position: camera_pos,
      _pad0: 0.0,
      u_time: elapsed_time,
      u_aspect: aspect,
      u_show_hud: show_hud as i32,
      _pad1: 0.0,
    };
    let hud_layout =
      compute_hud_layout(&vk_ctx.window_size, camera_pos, camera_forward, camera_rotation);
    self.hud_pass.update_params(device, &hud_params, &hud_layout);
  }

  /// Returns `false` when the frame was dropped (swapchain out of date).
  pub fn draw_frame(
    &mut self,
    vk_ctx: &VkCtx,
    window: &winit::window::Window,
    app_ui: &mut AppUI,
    show_hud: bool,
    show_diagnostics: bool,
    stats: &DiagnosticPanelStats,
  ) -> bool {
    let mut ctx = FrameContext {
      vk_ctx,
      swapchain: self.swapchain,
      framebuffers: &self.framebuffers,
      command_buffers: &self.command_buffers,
      frame_slots: &self.frame_slots,
      render_pass: self.render_pass,
      world_pass: &self.world_pass,
      hud_pass: &self.hud_pass,
      app_ui,
      window,
      show_hud,
      show_diagnostics,
      stats,
    };
    self.sequencer.draw_frame(&mut ctx)
  }

  pub unsafe fn destroy(&mut self, vk_ctx: &VkCtx) {
    info!("RenderGraph::destroy()");
    let device = &vk_ctx.device.device;
    device
      .device_wait_idle()
      .expect("Failed to wait for device idle during destroy");

    self.world_pass.destroy(device);
    self.hud_pass.destroy(device);
    for &fb in &self.framebuffers {
      device.destroy_framebuffer(fb, None);
    }
    device.destroy_render_pass(self.render_pass, None);
    device.destroy_command_pool(self.command_pool, None);
    for &iv in &self.image_views {
      device.destroy_image_view(iv, None);
    }
    vk_ctx
      .swapchain_loader
      .destroy_swapchain(self.swapchain, None);
    for slot in &self.frame_slots {
      device.destroy_semaphore(slot.image_acquired, None);
      device.destroy_semaphore(slot.render_finished, None);
      device.destroy_fence(slot.in_flight, None);
    }
  }
}

/// Single color attachment, two subpasses:
/// - subpass 0: raymarched world, opaque
/// - subpass 1: HUD + diagnostic overlay, alpha blended over subpass 0
fn create_render_pass(device: &ash::Device, image_format: vk::Format) -> vk::RenderPass {
  let attachments = [vk::AttachmentDescription::builder()
    .format(image_format)
    .samples(vk::SampleCountFlags::TYPE_1)
    .load_op(vk::AttachmentLoadOp::CLEAR)
    .store_op(vk::AttachmentStoreOp::STORE)
    .initial_layout(vk::ImageLayout::UNDEFINED)
    .final_layout(vk::ImageLayout::PRESENT_SRC_KHR)
    .build()];

  let color_refs = [vk::AttachmentReference {
    attachment: 0,
    layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
  }];

  let subpasses = [
    vk::SubpassDescription::builder()
      .color_attachments(&color_refs)
      .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
      .build(),
    vk::SubpassDescription::builder()
      .color_attachments(&color_refs)
      .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
      .build(),
  ];

  let dependencies = [
    // acquire -> world
    vk::SubpassDependency::builder()
      .src_subpass(vk::SUBPASS_EXTERNAL)
      .dst_subpass(0)
      .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
      .src_access_mask(vk::AccessFlags::empty())
      .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
      .dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE)
      .build(),
    // world writes -> HUD blend reads
    vk::SubpassDependency::builder()
      .src_subpass(0)
      .dst_subpass(1)
      .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
      .src_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE)
      .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
      .dst_access_mask(
        vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
      )
      .build(),
  ];

  let create_info = vk::RenderPassCreateInfo::builder()
    .attachments(&attachments)
    .subpasses(&subpasses)
    .dependencies(&dependencies)
    .build();
  unsafe {
    device
      .create_render_pass(&create_info, None)
      .expect("Failed creating render pass")
  }
}

/// Real-Vulkan implementation of the sequencer's engine trait. Borrows
/// disjoint pieces of the graph for the duration of one frame.
struct FrameContext<'a> {
  vk_ctx: &'a VkCtx,
  swapchain: vk::SwapchainKHR,
  framebuffers: &'a [vk::Framebuffer],
  command_buffers: &'a [vk::CommandBuffer],
  frame_slots: &'a [FrameSlot],
  render_pass: vk::RenderPass,
  world_pass: &'a WorldPass,
  hud_pass: &'a HudPass,
  app_ui: &'a mut AppUI,
  window: &'a winit::window::Window,
  show_hud: bool,
  show_diagnostics: bool,
  stats: &'a DiagnosticPanelStats,
}

impl<'a> FrameContext<'a> {
  fn device(&self) -> &ash::Device {
    &self.vk_ctx.device.device
  }

  fn execute_plan(&mut self, plan: &[FrameCmd], command_buffer: vk::CommandBuffer, image_index: u32) {
    let device = &self.vk_ctx.device.device;
    let size = self.vk_ctx.window_size;
    let viewport = create_viewport(&size);
    let scissor = size_to_rect_vk(&size);
    let clear_values = [vk::ClearValue {
      color: vk::ClearColorValue {
        float32: [0.0, 0.0, 0.0, 1.0],
      },
    }];
    let render_pass_begin_info = vk::RenderPassBeginInfo::builder()
      .render_pass(self.render_pass)
      .framebuffer(self.framebuffers[image_index as usize])
      .render_area(scissor)
      .clear_values(&clear_values)
      .build();

    for cmd in plan {
      match *cmd {
        FrameCmd::BeginRenderPass => unsafe {
          device.cmd_begin_render_pass(
            command_buffer,
            &render_pass_begin_info,
            vk::SubpassContents::INLINE,
          );
          device.cmd_set_viewport(command_buffer, 0, &[viewport]);
          device.cmd_set_scissor(command_buffer, 0, &[scissor]);
        },
        FrameCmd::BindWorldPipeline => {
          self.world_pass.bind_pipeline(device, command_buffer);
        }
        FrameCmd::BindWorldParams { frame_slot } => {
          self.world_pass.bind_params(device, command_buffer, frame_slot);
        }
        FrameCmd::Draw {
          vertex_count,
          instance_count,
        } => unsafe {
          device.cmd_draw(command_buffer, vertex_count, instance_count, 0, 0);
        },
        FrameCmd::NextSubpass => unsafe {
          device.cmd_next_subpass(command_buffer, vk::SubpassContents::INLINE);
        },
        FrameCmd::BindHudPipeline => {
          self.hud_pass.bind_pipeline(device, command_buffer);
        }
        FrameCmd::BindHudParams { frame_slot } => {
          self.hud_pass.bind_params(device, command_buffer, frame_slot);
        }
        FrameCmd::DrawOverlay => {
          self.app_ui.render_ui(self.window, command_buffer, self.stats);
        }
        FrameCmd::EndRenderPass => unsafe {
          device.cmd_end_render_pass(command_buffer);
        },
      }
    }
  }
}

impl<'a> PresentationEngine for FrameContext<'a> {
  fn wait_for_fence(&mut self, frame_slot: usize) {
    unsafe {
      self
        .device()
        .wait_for_fences(&[self.frame_slots[frame_slot].in_flight], true, u64::MAX)
        .expect("Failed to wait for frame fence");
    }
  }

  fn reset_fence(&mut self, frame_slot: usize) {
    unsafe {
      self
        .device()
        .reset_fences(&[self.frame_slots[frame_slot].in_flight])
        .expect("Failed to reset frame fence");
    }
  }

  fn acquire_image(&mut self, frame_slot: usize) -> AcquireOutcome {
    let result = unsafe {
      self.vk_ctx.swapchain_loader.acquire_next_image(
        self.swapchain,
        u64::MAX,
        self.frame_slots[frame_slot].image_acquired,
        vk::Fence::null(),
      )
    };
    match result {
      // suboptimal is still usable, the window never resizes
      Ok((image_index, _suboptimal)) => AcquireOutcome::Ok(image_index),
      Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => AcquireOutcome::OutOfDate,
      Err(e) => panic!("Failed to acquire swapchain image: {}", e),
    }
  }

  fn record(&mut self, frame_slot: usize, image_index: u32) {
    let command_buffer = self.command_buffers[image_index as usize];
    let begin_info = vk::CommandBufferBeginInfo::builder()
      .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)
      .build();
    unsafe {
      self
        .device()
        .begin_command_buffer(command_buffer, &begin_info)
        .expect("Failed to begin command buffer");
    }

    let plan = frame_command_plan(frame_slot, self.show_hud, self.show_diagnostics);
    self.execute_plan(&plan, command_buffer, image_index);

    unsafe {
      self
        .device()
        .end_command_buffer(command_buffer)
        .expect("Failed to end command buffer");
    }
  }

  fn submit(&mut self, frame_slot: usize, image_index: u32) {
    let slot = &self.frame_slots[frame_slot];
    let wait_semaphores = [slot.image_acquired];
    let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
    let command_buffers = [self.command_buffers[image_index as usize]];
    let signal_semaphores = [slot.render_finished];

    let submit_info = vk::SubmitInfo::builder()
      .wait_semaphores(&wait_semaphores)
      .wait_dst_stage_mask(&wait_stages)
      .command_buffers(&command_buffers)
      .signal_semaphores(&signal_semaphores)
      .build();

    unsafe {
      self
        .device()
        .queue_submit(self.vk_ctx.device.queue, &[submit_info], slot.in_flight)
        .expect("Failed to submit frame");
    }
  }

  fn present(&mut self, frame_slot: usize, image_index: u32) {
    let slot = &self.frame_slots[frame_slot];
    let wait_semaphores = [slot.render_finished];
    let swapchains = [self.swapchain];
    let image_indices = [image_index];

    let present_info = vk::PresentInfoKHR::builder()
      .wait_semaphores(&wait_semaphores)
      .swapchains(&swapchains)
      .image_indices(&image_indices)
      .build();

    // fire-and-forget: a failed present only matters on the NEXT acquire
    let result = unsafe {
      self
        .vk_ctx
        .swapchain_loader
        .queue_present(self.vk_ctx.device.queue, &present_info)
    };
    if let Err(e) = result {
      warn!("Present failed ({}), frame dropped", e);
    }
  }
}
