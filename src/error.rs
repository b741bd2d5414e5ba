use ash::vk;
use thiserror::Error;

/// Everything here is a one-time construction failure and fatal - there is no
/// partial-construction recovery beyond normal scope-exit cleanup. Per-frame
/// GPU errors do not go through this type, they panic (see `RenderGraph`).
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("no compatible memory type for requirement mask {type_bits:#034b} with flags {required:?}")]
  NoCompatibleMemoryType {
    type_bits: u32,
    required: vk::MemoryPropertyFlags,
  },
  #[error("shader binary not found: '{0}'")]
  ShaderNotFound(String),
  #[error("shader module invalid: '{0}'")]
  ShaderModuleInvalid(String),
  #[error("pipeline creation failed: {0}")]
  PipelineCreationFailed(vk::Result),
  #[error("descriptor allocation failed: {0}")]
  DescriptorAllocationFailed(vk::Result),
  #[error("initialization failed: {0}")]
  InitFailed(String),
  #[error("vulkan call failed: {0}")]
  Vk(#[from] vk::Result),
}
