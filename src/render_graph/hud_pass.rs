use ash;
use ash::vk;
use glam::{vec2, vec4, Quat, Vec3};
use log::trace;

use crate::config::Config;
use crate::error::RenderError;
use crate::render_graph::_shared::{HudLayoutSSBO, HudParamsUBO, RingIndex};
use crate::vk_ctx::VkCtx;
use crate::vk_utils::*;

const BINDING_INDEX_HUD_PARAMS: u32 = 0;
const BINDING_INDEX_HUD_LAYOUT: u32 = 1;

const SHADER_PATHS: (&str, &str) = (
  "./assets/shaders-compiled/hud.vert.spv",
  "./assets/shaders-compiled/hud.frag.spv",
);

/// Subpass 1: HUD drawn over the already-rendered world with classic alpha
/// blending. Two rings per frame slot: a UBO with scalar params and an SSBO
/// with widget placement, both rewritten from scratch every frame.
pub struct HudPass {
  pipeline: vk::Pipeline,
  pipeline_layout: vk::PipelineLayout,
  uniforms_layout: vk::DescriptorSetLayout,
  descriptor_pool: vk::DescriptorPool,
  descriptor_sets: Vec<vk::DescriptorSet>,
  params_buffers: Vec<VkBuffer>,
  layout_buffers: Vec<VkBuffer>,
  params_ring: RingIndex,
}

impl HudPass {
  pub fn new(vk_ctx: &VkCtx, render_pass: vk::RenderPass) -> Result<Self, RenderError> {
    trace!("Creating HudPass");
    let device = &vk_ctx.device.device;
    let frames = Config::FRAMES_IN_FLIGHT;

    let uniforms_layout = create_descriptor_set_layout(
      device,
      &[
        create_ubo_binding(BINDING_INDEX_HUD_PARAMS, vk::ShaderStageFlags::FRAGMENT),
        create_ssbo_binding(BINDING_INDEX_HUD_LAYOUT, vk::ShaderStageFlags::FRAGMENT),
      ],
    );

    let (pipeline, pipeline_layout) =
      Self::create_pipeline(device, vk_ctx.pipeline_cache, render_pass, uniforms_layout)?;

    let params_buffers = (0..frames)
      .map(|idx| {
        VkBuffer::new(
          device,
          &vk_ctx.device.memory_properties,
          format!("hud_params.{}", idx),
          std::mem::size_of::<HudParamsUBO>(),
          vk::BufferUsageFlags::UNIFORM_BUFFER,
        )
      })
      .collect::<Result<Vec<_>, _>>()?;
    let layout_buffers = (0..frames)
      .map(|idx| {
        VkBuffer::new(
          device,
          &vk_ctx.device.memory_properties,
          format!("hud_layout.{}", idx),
          std::mem::size_of::<HudLayoutSSBO>(),
          vk::BufferUsageFlags::STORAGE_BUFFER,
        )
      })
      .collect::<Result<Vec<_>, _>>()?;

    let pool_sizes = [
      vk::DescriptorPoolSize {
        ty: vk::DescriptorType::UNIFORM_BUFFER,
        descriptor_count: frames as u32,
      },
      vk::DescriptorPoolSize {
        ty: vk::DescriptorType::STORAGE_BUFFER,
        descriptor_count: frames as u32,
      },
    ];
    let descriptor_pool = create_descriptor_pool(device, &pool_sizes, frames as u32);

    let layouts = vec![uniforms_layout; frames];
    let descriptor_sets = allocate_descriptor_sets(device, descriptor_pool, &layouts)?;
    for (idx, set) in descriptor_sets.iter().enumerate() {
      bind_buffer_to_descriptor(
        device,
        *set,
        BINDING_INDEX_HUD_PARAMS,
        vk::DescriptorType::UNIFORM_BUFFER,
        &params_buffers[idx],
      );
      bind_buffer_to_descriptor(
        device,
        *set,
        BINDING_INDEX_HUD_LAYOUT,
        vk::DescriptorType::STORAGE_BUFFER,
        &layout_buffers[idx],
      );
    }

    Ok(Self {
      pipeline,
      pipeline_layout,
      uniforms_layout,
      descriptor_pool,
      descriptor_sets,
      params_buffers,
      layout_buffers,
      params_ring: RingIndex::new(frames),
    })
  }

  fn create_pipeline(
    device: &ash::Device,
    pipeline_cache: vk::PipelineCache,
    render_pass: vk::RenderPass,
    uniforms_layout: vk::DescriptorSetLayout,
  ) -> Result<(vk::Pipeline, vk::PipelineLayout), RenderError> {
    let pipeline_layout = create_pipeline_layout(device, &[uniforms_layout]);

    let (module_vs, stage_vs, module_fs, stage_fs) =
      load_render_shaders(device, SHADER_PATHS.0, SHADER_PATHS.1)?;

    let stages = [stage_vs, stage_fs];
    let vertex_input_state = ps_vertex_empty();
    let input_assembly_state = ps_ia_triangle_list();
    let viewport_state = ps_viewport_single_dynamic();
    let rasterization_state = ps_raster_polygons(vk::CullModeFlags::NONE);
    let multisample_state = ps_multisample_disabled();
    let depth_stencil_state = ps_depth_stencil_disabled();
    let blend_attachments = ps_color_blend_alpha();
    let color_blend_state = vk::PipelineColorBlendStateCreateInfo::builder()
      .attachments(&blend_attachments)
      .build();
    let dynamic_state = ps_dynamic_state(&[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]);

    let pipeline_create_info = vk::GraphicsPipelineCreateInfo::builder()
      .stages(&stages)
      .vertex_input_state(&vertex_input_state)
      .input_assembly_state(&input_assembly_state)
      .viewport_state(&viewport_state)
      .rasterization_state(&rasterization_state)
      .multisample_state(&multisample_state)
      .depth_stencil_state(&depth_stencil_state)
      .color_blend_state(&color_blend_state)
      .dynamic_state(&dynamic_state)
      .layout(pipeline_layout)
      .render_pass(render_pass)
      .subpass(1)
      .build();

    let pipeline = create_pipeline(device, pipeline_cache, pipeline_create_info)?;

    unsafe {
      device.destroy_shader_module(module_vs, None);
      device.destroy_shader_module(module_fs, None);
    }

    Ok((pipeline, pipeline_layout))
  }

  /// Writes both parameter blocks into the next ring slot. Called once per
  /// frame even when the HUD is hidden, so the ring cursor never drifts
  /// from the sequencer's frame slot.
  pub fn update_params(
    &mut self,
    device: &ash::Device,
    params: &HudParamsUBO,
    layout: &HudLayoutSSBO,
  ) {
    let slot = self.params_ring.next();
    self.params_buffers[slot].write_bytes(device, bytemuck::bytes_of(params));
    self.layout_buffers[slot].write_bytes(device, bytemuck::bytes_of(layout));
  }

  pub fn bind_pipeline(&self, device: &ash::Device, command_buffer: vk::CommandBuffer) {
    unsafe {
      device.cmd_bind_pipeline(
        command_buffer,
        vk::PipelineBindPoint::GRAPHICS,
        self.pipeline,
      );
    }
  }

  pub fn bind_params(
    &self,
    device: &ash::Device,
    command_buffer: vk::CommandBuffer,
    frame_slot: usize,
  ) {
    unsafe {
      device.cmd_bind_descriptor_sets(
        command_buffer,
        vk::PipelineBindPoint::GRAPHICS,
        self.pipeline_layout,
        0,
        &[self.descriptor_sets[frame_slot]],
        &[],
      );
    }
  }

  pub unsafe fn destroy(&self, device: &ash::Device) {
    for buffer in self.params_buffers.iter().chain(self.layout_buffers.iter()) {
      buffer.destroy(device);
    }
    device.destroy_descriptor_pool(self.descriptor_pool, None);
    device.destroy_descriptor_set_layout(self.uniforms_layout, None);
    device.destroy_pipeline_layout(self.pipeline_layout, None);
    device.destroy_pipeline(self.pipeline, None);
  }
}

/// Recomputed from camera state every tick, entirely on the CPU. The
/// crosshair is sized in pixels (32px) and the compass panel hugs the
/// bottom edge, both expressed in NDC for the fragment shader.
pub fn compute_hud_layout(
  framebuffer_size: &vk::Extent2D,
  player_pos: Vec3,
  player_forward: Vec3,
  player_rotation: Quat,
) -> HudLayoutSSBO {
  let aspect = framebuffer_size.width as f32 / framebuffer_size.height as f32;
  HudLayoutSSBO {
    crosshair_pos: vec2(0.0, 0.0), // NDC center
    crosshair_size: 32.0 / framebuffer_size.height as f32,
    _pad0: 0.0,
    crosshair_color: vec4(1.0, 1.0, 1.0, 1.0),
    panel_pos: vec2(0.0, -0.9),
    panel_size: vec2(0.1 * aspect, 0.1),
    panel_alpha: 0.5,
    _pad1: [0.0; 3],
    player_pos,
    _pad2: 0.0,
    player_forward,
    _pad3: 0.0,
    player_rotation,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glam::vec3;

  fn extent_720p() -> vk::Extent2D {
    vk::Extent2D {
      width: 1280,
      height: 720,
    }
  }

  #[test]
  fn hud_layout_keeps_crosshair_centered() {
    let layout = compute_hud_layout(&extent_720p(), vec3(1.0, 2.0, 3.0), Vec3::NEG_Z, Quat::IDENTITY);
    assert_eq!(layout.crosshair_pos, vec2(0.0, 0.0));
    assert!(layout.panel_alpha > 0.0 && layout.panel_alpha < 1.0);
    assert_eq!(layout.player_pos, vec3(1.0, 2.0, 3.0));
  }

  #[test]
  fn hud_layout_sizes_crosshair_in_pixels() {
    let layout = compute_hud_layout(&extent_720p(), Vec3::ZERO, Vec3::NEG_Z, Quat::IDENTITY);
    assert!((layout.crosshair_size - 32.0 / 720.0).abs() < 1e-6);
    // panel stays square on screen regardless of aspect ratio
    assert!((layout.panel_size.x - 0.1 * 1280.0 / 720.0).abs() < 1e-6);
    assert!((layout.panel_size.y - 0.1).abs() < 1e-6);
  }
}
