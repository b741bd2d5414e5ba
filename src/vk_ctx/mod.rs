mod vk_ctx;
mod vk_ctx_device;
mod vk_ctx_initialize;

pub use self::vk_ctx::*;
pub use self::vk_ctx_device::*;
pub use self::vk_ctx_initialize::*;
