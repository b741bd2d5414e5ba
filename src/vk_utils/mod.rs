mod buffer;
mod debug;
mod memory;
mod pipeline;
mod resources;
mod shaders;
mod swapchain;
mod uniforms;

pub use self::buffer::*;
pub use self::debug::*;
pub use self::memory::*;
pub use self::pipeline::*;
pub use self::resources::*;
pub use self::shaders::*;
pub use self::swapchain::*;
pub use self::uniforms::*;
