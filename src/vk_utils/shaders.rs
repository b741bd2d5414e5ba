use log::trace;
use std::ffi::CStr;
use std::path::Path;

use ash::vk;

use crate::error::RenderError;

fn shader_entry_point() -> &'static CStr {
  unsafe { CStr::from_bytes_with_nul_unchecked(b"main\0") }
}

fn load_shader_module(device: &ash::Device, path: &Path) -> Result<vk::ShaderModule, RenderError> {
  trace!("Loading shader from {}", path.to_string_lossy());

  let mut file = std::fs::File::open(path)
    .map_err(|_| RenderError::ShaderNotFound(path.to_string_lossy().into_owned()))?;
  let spirv_code = ash::util::read_spv(&mut file)
    .map_err(|_| RenderError::ShaderModuleInvalid(path.to_string_lossy().into_owned()))?;

  let create_info = vk::ShaderModuleCreateInfo::builder().code(&spirv_code).build();
  let shader_module = unsafe {
    device
      .create_shader_module(&create_info, None)
      .map_err(|_| RenderError::ShaderModuleInvalid(path.to_string_lossy().into_owned()))?
  };

  Ok(shader_module)
}

pub fn load_shader(
  device: &ash::Device,
  stage: vk::ShaderStageFlags,
  path: &Path,
) -> Result<(vk::ShaderModule, vk::PipelineShaderStageCreateInfo), RenderError> {
  let shader_module = load_shader_module(device, path)?;

  let shader_stage = vk::PipelineShaderStageCreateInfo::builder()
    .stage(stage)
    .module(shader_module)
    .name(shader_entry_point())
    .build();
  trace!("Shader {:?} loaded from {}", stage, path.to_string_lossy());

  Ok((shader_module, shader_stage))
}

/// Vertex + fragment pair for one graphics pipeline.
pub fn load_render_shaders(
  device: &ash::Device,
  vs_path: &str,
  fs_path: &str,
) -> Result<
  (
    vk::ShaderModule,
    vk::PipelineShaderStageCreateInfo,
    vk::ShaderModule,
    vk::PipelineShaderStageCreateInfo,
  ),
  RenderError,
> {
  let (module_vs, stage_vs) = load_shader(device, vk::ShaderStageFlags::VERTEX, Path::new(vs_path))?;
  let (module_fs, stage_fs) =
    load_shader(device, vk::ShaderStageFlags::FRAGMENT, Path::new(fs_path))?;
  Ok((module_vs, stage_vs, module_fs, stage_fs))
}
