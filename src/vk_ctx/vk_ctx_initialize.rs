use log::{info, trace};
use std::ffi::{CStr, CString};

use ash;
use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::{Surface, Swapchain};
use ash::vk;
use raw_window_handle::HasRawDisplayHandle;

use crate::config::Config;
use crate::error::RenderError;
use crate::vk_ctx::vk_ctx::VkCtx;
use crate::vk_ctx::vk_ctx_device::VkCtxDevice;
use crate::vk_utils::*;

fn from_c_str<'a>(s: &[std::os::raw::c_char]) -> &'a CStr {
  unsafe { CStr::from_ptr(s.as_ptr()) }
}

fn get_app_version() -> u32 {
  let to_u32 = |s: &str| s.parse::<u32>().unwrap_or(0);
  vk::make_api_version(
    0,
    to_u32(env!("CARGO_PKG_VERSION_MAJOR")),
    to_u32(env!("CARGO_PKG_VERSION_MINOR")),
    to_u32(env!("CARGO_PKG_VERSION_PATCH")),
  )
}

fn get_layer_names(graphics_debugging: bool) -> Vec<CString> {
  let mut layer_names = Vec::new();
  if graphics_debugging {
    layer_names.push(CString::new("VK_LAYER_KHRONOS_validation").unwrap());
  }
  layer_names
}

fn create_instance(
  window: &winit::window::Window,
  graphics_debugging: bool,
) -> Result<(ash::Entry, ash::Instance), RenderError> {
  let entry = unsafe {
    ash::Entry::load().map_err(|e| RenderError::InitFailed(format!("Vulkan loader: {}", e)))?
  };

  let app_name = CString::new(env!("CARGO_PKG_NAME")).unwrap();
  let app_info = vk::ApplicationInfo::builder()
    .application_name(&app_name)
    .application_version(get_app_version())
    .api_version(vk::make_api_version(0, 1, 2, 0))
    .build();

  let layer_names = get_layer_names(graphics_debugging);
  let layers_names_raw: Vec<*const i8> = layer_names
    .iter()
    .map(|raw_name| raw_name.as_ptr())
    .collect();

  let mut extension_names =
    ash_window::enumerate_required_extensions(window.raw_display_handle())?.to_vec();
  if graphics_debugging {
    extension_names.push(DebugUtils::name().as_ptr());
  }

  let create_info = vk::InstanceCreateInfo::builder()
    .application_info(&app_info)
    .enabled_layer_names(&layers_names_raw)
    .enabled_extension_names(&extension_names)
    .build();

  let instance: ash::Instance = unsafe { entry.create_instance(&create_info, None)? };
  trace!("Ash instance created");
  Ok((entry, instance))
}

fn find_queue_family(
  instance: &ash::Instance,
  surface_loader: &Surface,
  surface_khr: vk::SurfaceKHR,
  phys_device: vk::PhysicalDevice,
) -> Option<u32> {
  let q_props = unsafe { instance.get_physical_device_queue_family_properties(phys_device) };

  q_props.iter().enumerate().find_map(|(index, &q)| {
    let is_gfx = q.queue_flags.contains(vk::QueueFlags::GRAPHICS);
    let is_present_support = unsafe {
      surface_loader
        .get_physical_device_surface_support(phys_device, index as u32, surface_khr)
        .unwrap_or(false)
    };

    if is_gfx && is_present_support {
      Some(index as u32)
    } else {
      None
    }
  })
}

/// Picks physical device e.g. "GeForce GTX 1050 Ti" and graphic queue family
/// index. Same queue will also present. Discrete GPU preferred, any GPU with
/// a graphics+present queue accepted.
fn pick_physical_device_and_queue_family_idx(
  instance: &ash::Instance,
  surface_loader: &Surface,
  surface_khr: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, u32), RenderError> {
  let phys_devices = unsafe { instance.enumerate_physical_devices()? };
  trace!("Found {} physical devices", phys_devices.len());

  let candidates: Vec<(vk::PhysicalDevice, u32, bool)> = phys_devices
    .iter()
    .filter_map(|&phys_device| {
      let props = unsafe { instance.get_physical_device_properties(phys_device) };
      let is_discrete = props.device_type == vk::PhysicalDeviceType::DISCRETE_GPU;
      find_queue_family(instance, surface_loader, surface_khr, phys_device)
        .map(|idx| (phys_device, idx, is_discrete))
    })
    .collect();

  let best = candidates
    .iter()
    .find(|(_, _, is_discrete)| *is_discrete)
    .or_else(|| candidates.first());

  match best {
    None => Err(RenderError::InitFailed(
      "No physical device with a graphics queue that can present".to_string(),
    )),
    Some(&(p_device, idx, _)) => {
      let props = unsafe { instance.get_physical_device_properties(p_device) };
      let device_name = from_c_str(&props.device_name);
      info!("Using physical device: {:?}", device_name);
      Ok((p_device, idx))
    }
  }
}

fn pick_device_and_queue(
  instance: &ash::Instance,
  phys_device: vk::PhysicalDevice,
  queue_family_index: u32,
) -> Result<(ash::Device, vk::Queue), RenderError> {
  trace!("Will pick logical device");
  let queue_prio = [1.0f32]; // only one queue
  let queue_create_infos = [vk::DeviceQueueCreateInfo::builder()
    .queue_family_index(queue_family_index)
    .queue_priorities(&queue_prio)
    .build()];

  let device_extension_names_raw = [Swapchain::name().as_ptr()];
  let device_create_info = vk::DeviceCreateInfo::builder()
    .queue_create_infos(&queue_create_infos)
    .enabled_extension_names(&device_extension_names_raw)
    .build();

  let device: ash::Device =
    unsafe { instance.create_device(phys_device, &device_create_info, None)? };
  trace!("Logical device selected");

  let queue = unsafe { device.get_device_queue(queue_family_index, 0) };
  Ok((device, queue))
}

fn get_window_size(window: &winit::window::Window) -> vk::Extent2D {
  let size = window.inner_size();
  vk::Extent2D {
    width: size.width,
    height: size.height,
  }
}

pub fn vk_ctx_initialize(
  window: &winit::window::Window,
  config: &Config,
) -> Result<VkCtx, RenderError> {
  let (entry, instance) = create_instance(window, config.vulkan_validation)?;

  let (debug_utils_loader, debug_messenger) = if config.vulkan_validation {
    setup_debug_reporting(&entry, &instance)
  } else {
    (
      DebugUtils::new(&entry, &instance),
      vk::DebugUtilsMessengerEXT::null(),
    )
  };

  // surface data
  let surface_loader = Surface::new(&entry, &instance);
  let surface_khr = create_surface_khr(&entry, &instance, window);

  // devices
  let (phys_device, queue_family_index) =
    pick_physical_device_and_queue_family_idx(&instance, &surface_loader, surface_khr)?;
  let memory_properties = unsafe { instance.get_physical_device_memory_properties(phys_device) };
  let (device, queue) = pick_device_and_queue(&instance, phys_device, queue_family_index)?;

  // presentation - decided once, the window is not resizable
  let window_size = get_window_size(window);
  trace!("window_size {:?}", window_size);
  let surface_format = get_swapchain_format(&surface_loader, surface_khr, phys_device)
    .ok_or_else(|| RenderError::InitFailed("Could not find valid surface format".to_string()))?;
  let present_mode = get_present_mode(&surface_loader, surface_khr, phys_device);
  info!(
    "Surface format: {:?}, present mode: {:?}",
    surface_format.format, present_mode
  );

  let swapchain_loader = Swapchain::new(&instance, &device);
  let pipeline_cache = create_pipeline_cache(&device);

  Ok(VkCtx {
    entry,
    instance,
    device: VkCtxDevice {
      phys_device,
      memory_properties,
      queue_family_index,
      device,
      queue,
    },
    pipeline_cache,
    surface_loader,
    surface_khr,
    surface_format,
    present_mode,
    window_size,
    swapchain_loader,
    debug_utils_loader,
    debug_messenger,
  })
}
