use log::trace;

use ash::extensions::khr::{Surface, Swapchain};
use ash::vk;
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

use crate::vk_utils::create_image_view;

pub fn size_to_rect_vk(size: &vk::Extent2D) -> vk::Rect2D {
  vk::Rect2D {
    offset: vk::Offset2D { x: 0, y: 0 },
    extent: *size,
  }
}

/// Gets surface from OS window
pub fn create_surface_khr(
  entry: &ash::Entry,
  instance: &ash::Instance,
  window: &winit::window::Window,
) -> vk::SurfaceKHR {
  unsafe {
    ash_window::create_surface(
      entry,
      instance,
      window.raw_display_handle(),
      window.raw_window_handle(),
      None,
    )
    .expect("Failed to create VkSurfaceKHR from OS window")
  }
}

/// Prefer `B8G8R8A8_SRGB` so the fragment shader writes linear values and the
/// hardware does the sRGB encode. Anything else means manual gamma, so fall
/// back to whatever the driver lists first only when we must.
pub fn get_swapchain_format(
  surface_loader: &Surface,
  surface_khr: vk::SurfaceKHR,
  phys_device: vk::PhysicalDevice,
) -> Option<vk::SurfaceFormatKHR> {
  let surface_formats = unsafe {
    surface_loader
      .get_physical_device_surface_formats(phys_device, surface_khr)
      .expect("Failed to get surface formats")
  };

  let preferred = surface_formats.iter().find(|surface_fmt| {
    let fmt_ok = surface_fmt.format == vk::Format::B8G8R8A8_SRGB;
    let color_space_ok = surface_fmt.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR;
    fmt_ok && color_space_ok
  });

  preferred.or_else(|| surface_formats.first()).map(|x| x.to_owned())
}

pub fn get_surface_capabilities(
  device: vk::PhysicalDevice,
  surface_loader: &Surface,
  surface_khr: vk::SurfaceKHR,
) -> vk::SurfaceCapabilitiesKHR {
  let surface_capabilities = unsafe {
    surface_loader
      .get_physical_device_surface_capabilities(device, surface_khr)
      .expect("Failed to get surface capabilities")
  };
  trace!("Surface_capabilities {:?}", surface_capabilities);
  surface_capabilities
}

fn get_pre_transform(
  surface_capabilities: vk::SurfaceCapabilitiesKHR,
) -> vk::SurfaceTransformFlagsKHR {
  let can_identity = surface_capabilities
    .supported_transforms
    .contains(vk::SurfaceTransformFlagsKHR::IDENTITY);
  if can_identity {
    vk::SurfaceTransformFlagsKHR::IDENTITY
  } else {
    surface_capabilities.current_transform
  }
}

/// MAILBOX if the driver has it (latest-ready image wins, no tearing),
/// otherwise FIFO - the only mode Vulkan guarantees.
pub fn get_present_mode(
  surface_loader: &Surface,
  surface_khr: vk::SurfaceKHR,
  phys_device: vk::PhysicalDevice,
) -> vk::PresentModeKHR {
  let present_modes = unsafe {
    surface_loader
      .get_physical_device_surface_present_modes(phys_device, surface_khr)
      .expect("Failed to get surface present modes")
  };

  if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
    vk::PresentModeKHR::MAILBOX
  } else {
    vk::PresentModeKHR::FIFO
  }
}

/// Ask for one image more than the driver's minimum so acquire rarely blocks
/// on the compositor, but never exceed the driver's maximum.
/// `max_image_count == 0` means 'no upper limit'.
pub fn select_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
  let wanted = capabilities.min_image_count + 1;
  if capabilities.max_image_count == 0 {
    wanted
  } else {
    wanted.min(capabilities.max_image_count)
  }
}

pub fn create_swapchain_khr(
  swapchain_loader: &Swapchain,
  surface_khr: vk::SurfaceKHR,
  surface_format: &vk::SurfaceFormatKHR,
  surface_capabilities: vk::SurfaceCapabilitiesKHR,
  size: &vk::Extent2D,
  queue_family_idx: u32,
  present_mode: vk::PresentModeKHR,
) -> vk::SwapchainKHR {
  let image_count = select_image_count(&surface_capabilities);

  let create_info = vk::SwapchainCreateInfoKHR::builder()
    .surface(surface_khr)
    .min_image_count(image_count)
    .image_format(surface_format.format)
    .image_color_space(surface_format.color_space)
    .image_extent(*size)
    .image_array_layers(1)
    .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
    .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
    .queue_family_indices(&[queue_family_idx])
    .present_mode(present_mode)
    .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
    .pre_transform(get_pre_transform(surface_capabilities))
    .clipped(true)
    .build();

  let swapchain = unsafe {
    swapchain_loader
      .create_swapchain(&create_info, None)
      .expect("Failed to create swapchain")
  };
  trace!("Swapchain created ({} images requested)", image_count);
  swapchain
}

pub fn create_swapchain_images(
  swapchain_loader: &Swapchain,
  swapchain: vk::SwapchainKHR,
  device: &ash::Device,
  image_format: vk::Format,
) -> (Vec<vk::Image>, Vec<vk::ImageView>) {
  // auto destroyed with swapchain
  let swapchain_images = unsafe {
    swapchain_loader
      .get_swapchain_images(swapchain)
      .expect("Failed to get swapchain images from swapchain")
  };
  trace!("Swapchain returned {} images", swapchain_images.len());

  let aspect_mask_flags = vk::ImageAspectFlags::COLOR;
  let swapchain_image_views: Vec<vk::ImageView> = swapchain_images
    .iter()
    .map(|&swapchain_image| {
      create_image_view(device, swapchain_image, image_format, aspect_mask_flags)
    })
    .collect();

  (swapchain_images, swapchain_image_views)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn capabilities(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
    let mut caps = vk::SurfaceCapabilitiesKHR::default();
    caps.min_image_count = min;
    caps.max_image_count = max;
    caps
  }

  #[test]
  fn asks_for_one_image_above_the_minimum() {
    assert_eq!(select_image_count(&capabilities(2, 8)), 3);
  }

  #[test]
  fn clamps_to_the_driver_maximum() {
    assert_eq!(select_image_count(&capabilities(3, 3)), 3);
  }

  #[test]
  fn treats_zero_maximum_as_unbounded() {
    assert_eq!(select_image_count(&capabilities(4, 0)), 5);
  }
}
