use ash;
use ash::vk;

pub struct VkCtxDevice {
  pub phys_device: vk::PhysicalDevice,
  pub memory_properties: vk::PhysicalDeviceMemoryProperties,
  pub queue_family_index: u32,
  pub device: ash::Device,
  pub queue: vk::Queue,
}
