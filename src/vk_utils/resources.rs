use ash::vk;
use log::trace;

pub fn create_image_view(
  device: &ash::Device,
  image: vk::Image,
  image_format: vk::Format,
  aspect_mask_flags: vk::ImageAspectFlags,
) -> vk::ImageView {
  let subresource_range = vk::ImageSubresourceRange::builder()
    .aspect_mask(aspect_mask_flags)
    .base_array_layer(0)
    .layer_count(1)
    .base_mip_level(0)
    .level_count(1)
    .build();

  let create_info = vk::ImageViewCreateInfo::builder()
    .image(image)
    .view_type(vk::ImageViewType::TYPE_2D)
    .format(image_format)
    .subresource_range(subresource_range)
    .build();

  unsafe {
    device
      .create_image_view(&create_info, None)
      .expect("Failed creating image view")
  }
}

pub fn create_framebuffers_with_one_attachment(
  device: &ash::Device,
  render_pass: vk::RenderPass,
  image_views: &Vec<vk::ImageView>,
  size: &vk::Extent2D,
) -> Vec<vk::Framebuffer> {
  trace!("Will create {} framebuffers {:?}", image_views.len(), size);
  image_views
    .iter()
    .map(|&iv| create_framebuffer(device, render_pass, &[iv], size))
    .collect()
}

pub fn create_framebuffer(
  device: &ash::Device,
  render_pass: vk::RenderPass,
  image_views: &[vk::ImageView],
  size: &vk::Extent2D,
) -> vk::Framebuffer {
  let create_info = vk::FramebufferCreateInfo::builder()
    .render_pass(render_pass)
    .attachments(image_views)
    .width(size.width)
    .height(size.height)
    .layers(1)
    .build();
  unsafe {
    device
      .create_framebuffer(&create_info, None)
      .expect("Failed to create framebuffer")
  }
}

/// Created SIGNALED so the first wait on every frame slot passes through.
pub fn create_fences(device: &ash::Device, count: usize) -> Vec<vk::Fence> {
  let create_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);
  let mut result = Vec::<vk::Fence>::with_capacity(count);

  for _ in 0..count {
    let obj = unsafe {
      device
        .create_fence(&create_info, None)
        .expect("Failed to create fence")
    };
    result.push(obj);
  }

  result
}

pub fn create_semaphores(device: &ash::Device, count: usize) -> Vec<vk::Semaphore> {
  let semaphore_create_info = vk::SemaphoreCreateInfo::builder()
    .flags(vk::SemaphoreCreateFlags::empty())
    .build();
  let mut result = Vec::<vk::Semaphore>::with_capacity(count);

  for _ in 0..count {
    let obj = unsafe {
      device
        .create_semaphore(&semaphore_create_info, None)
        .expect("Failed to create semaphore")
    };
    result.push(obj);
  }

  result
}

pub fn create_command_pool(device: &ash::Device, queue_family_index: u32) -> vk::CommandPool {
  let cmd_pool_create_info = vk::CommandPoolCreateInfo::builder()
    .queue_family_index(queue_family_index)
    .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
    .build();

  unsafe {
    device
      .create_command_pool(&cmd_pool_create_info, None)
      .expect("Failed creating command pool")
  }
}

pub fn create_command_buffers(
  device: &ash::Device,
  cmd_pool: vk::CommandPool,
  count: u32,
) -> Vec<vk::CommandBuffer> {
  let cmd_buf_create_info = vk::CommandBufferAllocateInfo::builder()
    .command_buffer_count(count)
    .command_pool(cmd_pool)
    .level(vk::CommandBufferLevel::PRIMARY)
    .build();

  unsafe {
    device
      .allocate_command_buffers(&cmd_buf_create_info)
      .expect("Failed allocating command buffers")
  }
}

/// Negative-height viewport keeps GL-style clip space (y up), so projection
/// matrices stay unflipped and `proj[1][1]` stays positive.
pub fn create_viewport(size: &vk::Extent2D) -> vk::Viewport {
  vk::Viewport {
    x: 0f32,
    y: size.height as f32, // flip vulkan coord system - important!
    width: size.width as f32,
    height: -(size.height as f32), // flip vulkan coord system - important!
    min_depth: 0f32,
    max_depth: 1.0f32,
  }
}
