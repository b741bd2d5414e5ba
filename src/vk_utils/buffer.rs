use ash::vk;

use crate::error::RenderError;
use crate::vk_utils::find_memory_type;

/// Host-visible buffer with its own dedicated `vk::DeviceMemory`, bound at
/// offset 0. No pooling or sub-allocation - every buffer pays for a full
/// allocation. Wasteful, but these are a handful of small per-frame parameter
/// buffers and nothing else.
pub struct VkBuffer {
  /// For debugging
  pub name: String,
  /// Size in bytes
  pub size: usize,
  pub buffer: vk::Buffer,
  pub memory: vk::DeviceMemory,
}

impl VkBuffer {
  pub fn new(
    device: &ash::Device,
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    name: String,
    size: usize,
    usage: vk::BufferUsageFlags,
  ) -> Result<Self, RenderError> {
    let buffer_info = vk::BufferCreateInfo::builder()
      .size(size as u64)
      .usage(usage)
      .sharing_mode(vk::SharingMode::EXCLUSIVE)
      .build();
    let buffer = unsafe { device.create_buffer(&buffer_info, None)? };

    let mem_requirements = unsafe { device.get_buffer_memory_requirements(buffer) };
    let memory_type_index = find_memory_type(
      memory_properties,
      mem_requirements.memory_type_bits,
      vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
    )?;

    let alloc_info = vk::MemoryAllocateInfo::builder()
      .allocation_size(mem_requirements.size)
      .memory_type_index(memory_type_index)
      .build();
    let memory = unsafe { device.allocate_memory(&alloc_info, None)? };
    unsafe { device.bind_buffer_memory(buffer, memory, 0)? };

    Ok(Self {
      name,
      size,
      buffer,
      memory,
    })
  }

  /// Single map->copy->unmap. Not safe to call while the GPU reads this
  /// buffer - the frame fence guarantees that never happens for ring slots.
  pub fn write_bytes(&self, device: &ash::Device, bytes: &[u8]) {
    assert!(
      bytes.len() <= self.size,
      "Tried to write {} bytes into '{}' ({} bytes)",
      bytes.len(),
      self.name,
      self.size
    );

    unsafe {
      let mapped_ptr = device
        .map_memory(
          self.memory,
          0,
          bytes.len() as u64,
          vk::MemoryMapFlags::empty(),
        )
        .expect("Failed to map parameter buffer memory");
      let slice = std::slice::from_raw_parts_mut(mapped_ptr as *mut u8, bytes.len());
      slice.copy_from_slice(bytes);
      device.unmap_memory(self.memory);
    }
  }

  pub unsafe fn destroy(&self, device: &ash::Device) {
    device.destroy_buffer(self.buffer, None);
    device.free_memory(self.memory, None);
  }
}
