use log::info;

use ash;
use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::{Surface, Swapchain};
use ash::vk;

use super::*;

/// Kitchen sink for device-level Vulkan stuff. Everything that outlives
/// a swapchain: instance, physical/logical device, surface, loaders.
pub struct VkCtx {
  pub entry: ash::Entry,
  pub instance: ash::Instance,
  pub device: VkCtxDevice,
  pub pipeline_cache: vk::PipelineCache,

  // surface
  pub surface_loader: Surface,
  pub surface_khr: vk::SurfaceKHR,
  pub surface_format: vk::SurfaceFormatKHR,
  pub present_mode: vk::PresentModeKHR,
  pub window_size: vk::Extent2D,

  pub swapchain_loader: Swapchain,

  // debug, only with validation layers on
  pub debug_utils_loader: DebugUtils,
  pub debug_messenger: vk::DebugUtilsMessengerEXT,
}

impl VkCtx {
  pub unsafe fn destroy(&mut self) {
    info!("VkCtx::destroy()");
    let device = &self.device.device;

    device.destroy_pipeline_cache(self.pipeline_cache, None);
    self.surface_loader.destroy_surface(self.surface_khr, None);

    if self.debug_messenger != vk::DebugUtilsMessengerEXT::null() {
      self
        .debug_utils_loader
        .destroy_debug_utils_messenger(self.debug_messenger, None);
    }

    device.destroy_device(None);
    self.instance.destroy_instance(None);
    info!("VkCtx::destroy() finished");
  }
}
