use ash;
use ash::vk;

use crate::error::RenderError;
use crate::vk_utils::VkBuffer;

pub fn create_ubo_binding(
  binding: u32,
  stage_flags: vk::ShaderStageFlags,
) -> vk::DescriptorSetLayoutBinding {
  vk::DescriptorSetLayoutBinding::builder()
    .binding(binding)
    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
    .descriptor_count(1)
    .stage_flags(stage_flags)
    .build()
}

pub fn create_ssbo_binding(
  binding: u32,
  stage_flags: vk::ShaderStageFlags,
) -> vk::DescriptorSetLayoutBinding {
  vk::DescriptorSetLayoutBinding::builder()
    .binding(binding)
    .descriptor_type(vk::DescriptorType::STORAGE_BUFFER)
    .descriptor_count(1)
    .stage_flags(stage_flags)
    .build()
}

pub fn create_descriptor_set_layout(
  device: &ash::Device,
  bindings: &[vk::DescriptorSetLayoutBinding],
) -> vk::DescriptorSetLayout {
  let create_info = vk::DescriptorSetLayoutCreateInfo::builder()
    .bindings(bindings)
    .build();

  unsafe {
    device
      .create_descriptor_set_layout(&create_info, None)
      .expect("Failed to create DescriptorSetLayout")
  }
}

/// Pool sized for exactly what the pass asks for, nothing spare.
pub fn create_descriptor_pool(
  device: &ash::Device,
  pool_sizes: &[vk::DescriptorPoolSize],
  max_sets: u32,
) -> vk::DescriptorPool {
  let create_info = vk::DescriptorPoolCreateInfo::builder()
    .pool_sizes(pool_sizes)
    .max_sets(max_sets)
    .build();

  unsafe {
    device
      .create_descriptor_pool(&create_info, None)
      .expect("Failed to create descriptor pool")
  }
}

/// One descriptor set per layout entry. Callers pass the same layout
/// repeated once per frame slot.
pub fn allocate_descriptor_sets(
  device: &ash::Device,
  pool: vk::DescriptorPool,
  layouts: &[vk::DescriptorSetLayout],
) -> Result<Vec<vk::DescriptorSet>, RenderError> {
  let alloc_info = vk::DescriptorSetAllocateInfo::builder()
    .descriptor_pool(pool)
    .set_layouts(layouts)
    .build();

  unsafe {
    device
      .allocate_descriptor_sets(&alloc_info)
      .map_err(RenderError::DescriptorAllocationFailed)
  }
}

/// Points (descriptor_set, binding) at the whole buffer.
pub fn bind_buffer_to_descriptor(
  device: &ash::Device,
  descriptor_set: vk::DescriptorSet,
  binding: u32,
  descriptor_type: vk::DescriptorType,
  buffer: &VkBuffer,
) {
  let buffer_info = [vk::DescriptorBufferInfo::builder()
    .buffer(buffer.buffer)
    .offset(0)
    .range(buffer.size as u64)
    .build()];

  let write = vk::WriteDescriptorSet::builder()
    .dst_set(descriptor_set)
    .dst_binding(binding)
    .descriptor_type(descriptor_type)
    .buffer_info(&buffer_info)
    .build();

  unsafe { device.update_descriptor_sets(&[write], &[]) };
}
