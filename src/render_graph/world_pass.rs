use ash;
use ash::vk;
use glam::{Mat4, Vec3};
use log::trace;

use crate::config::Config;
use crate::error::RenderError;
use crate::render_graph::_shared::{RingIndex, WorldParamsUBO};
use crate::vk_ctx::VkCtx;
use crate::vk_utils::*;

const BINDING_INDEX_WORLD_PARAMS: u32 = 0;

const SHADER_PATHS: (&str, &str) = (
  "./assets/shaders-compiled/raymarch.vert.spv",
  "./assets/shaders-compiled/raymarch.frag.spv",
);

/// Subpass 0: raymarched scene, opaque, fullscreen triangle. Camera
/// parameters come from a ring of `WorldParamsUBO` buffers so the CPU can
/// write slot N while the GPU still reads slot N-1.
pub struct WorldPass {
  pipeline: vk::Pipeline,
  pipeline_layout: vk::PipelineLayout,
  uniforms_layout: vk::DescriptorSetLayout,
  descriptor_pool: vk::DescriptorPool,
  descriptor_sets: Vec<vk::DescriptorSet>,
  params_buffers: Vec<VkBuffer>,
  params_ring: RingIndex,
}

impl WorldPass {
  pub fn new(vk_ctx: &VkCtx, render_pass: vk::RenderPass) -> Result<Self, RenderError> {
    trace!("Creating WorldPass");
    let device = &vk_ctx.device.device;
    let frames = Config::FRAMES_IN_FLIGHT;

    let uniforms_layout = create_descriptor_set_layout(
      device,
      &[create_ubo_binding(
        BINDING_INDEX_WORLD_PARAMS,
        vk::ShaderStageFlags::FRAGMENT,
      )],
    );

    let (pipeline, pipeline_layout) =
      Self::create_pipeline(device, vk_ctx.pipeline_cache, render_pass, uniforms_layout)?;

    let params_buffers = (0..frames)
      .map(|idx| {
        VkBuffer::new(
          device,
          &vk_ctx.device.memory_properties,
          format!("world_params.{}", idx),
          std::mem::size_of::<WorldParamsUBO>(),
          vk::BufferUsageFlags::UNIFORM_BUFFER,
        )
      })
      .collect::<Result<Vec<_>, _>>()?;

    let pool_sizes = [vk::DescriptorPoolSize {
      ty: vk::DescriptorType::UNIFORM_BUFFER,
      descriptor_count: frames as u32,
    }];
    let descriptor_pool = create_descriptor_pool(device, &pool_sizes, frames as u32);

    let layouts = vec![uniforms_layout; frames];
    let descriptor_sets = allocate_descriptor_sets(device, descriptor_pool, &layouts)?;
    for (set, buffer) in descriptor_sets.iter().zip(params_buffers.iter()) {
      bind_buffer_to_descriptor(
        device,
        *set,
        BINDING_INDEX_WORLD_PARAMS,
        vk::DescriptorType::UNIFORM_BUFFER,
        buffer,
      );
    }

    Ok(Self {
      pipeline,
      pipeline_layout,
      uniforms_layout,
      descriptor_pool,
      descriptor_sets,
      params_buffers,
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
    let rasterization_state = ps_raster_polygons(vk::CullModeFlags::BACK);
    let multisample_state = ps_multisample_disabled();
    let depth_stencil_state = ps_depth_stencil_disabled();
    let blend_attachments = ps_color_blend_override();
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
      .subpass(0)
      .build();

    let pipeline = create_pipeline(device, pipeline_cache, pipeline_create_info)?;

    unsafe {
      device.destroy_shader_module(module_vs, None);
      device.destroy_shader_module(module_fs, None);
    }

    Ok((pipeline, pipeline_layout))
  }

  /// Writes this frame's camera state into the next ring slot. Must be
  /// called exactly once per frame - the ring cursor stays in lockstep
  /// with the sequencer's frame slot because both wrap at the same count.
  pub fn update_params(&mut self, device: &ash::Device, view: Mat4, proj: Mat4, camera_pos: Vec3) {
    let slot = self.params_ring.next();
    let data = WorldParamsUBO::new(view, proj, camera_pos);
    self.params_buffers[slot].write_bytes(device, bytemuck::bytes_of(&data));
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
    for buffer in &self.params_buffers {
      buffer.destroy(device);
    }
    device.destroy_descriptor_pool(self.descriptor_pool, None);
    device.destroy_descriptor_set_layout(self.uniforms_layout, None);
    device.destroy_pipeline_layout(self.pipeline_layout, None);
    device.destroy_pipeline(self.pipeline, None);
  }
}
