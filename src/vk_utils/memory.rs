use ash::vk;

use crate::error::RenderError;

/// Find an index into the device's memory-type table that is compatible with
/// `type_bits` (from `vkGetBufferMemoryRequirements`) and has all of the
/// `required` property flags.
///
/// Explicit linear scan, first satisfying type wins - ties broken by table
/// order. No attempt to pick the "best" heap for bandwidth/locality.
pub fn find_memory_type(
  memory_properties: &vk::PhysicalDeviceMemoryProperties,
  type_bits: u32,
  required: vk::MemoryPropertyFlags,
) -> Result<u32, RenderError> {
  for idx in 0..memory_properties.memory_type_count {
    let type_compatible = type_bits & (1u32 << idx) != 0;
    let flags = memory_properties.memory_types[idx as usize].property_flags;
    if type_compatible && flags.contains(required) {
      return Ok(idx);
    }
  }

  Err(RenderError::NoCompatibleMemoryType {
    type_bits,
    required,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const HOST_FLAGS: vk::MemoryPropertyFlags = vk::MemoryPropertyFlags::from_raw(
    vk::MemoryPropertyFlags::HOST_VISIBLE.as_raw() | vk::MemoryPropertyFlags::HOST_COHERENT.as_raw(),
  );

  fn memory_table(flags_per_type: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
    let mut props = vk::PhysicalDeviceMemoryProperties::default();
    props.memory_type_count = flags_per_type.len() as u32;
    for (i, &flags) in flags_per_type.iter().enumerate() {
      props.memory_types[i].property_flags = flags;
    }
    props
  }

  #[test]
  fn returns_the_only_compatible_host_visible_type() {
    let props = memory_table(&[
      vk::MemoryPropertyFlags::DEVICE_LOCAL,
      HOST_FLAGS,
      vk::MemoryPropertyFlags::DEVICE_LOCAL,
    ]);

    let idx = find_memory_type(&props, 0b111, HOST_FLAGS).unwrap();
    assert_eq!(idx, 1);
  }

  #[test]
  fn first_match_wins_on_ties() {
    // both type 1 and type 2 qualify, table order decides
    let props = memory_table(&[
      vk::MemoryPropertyFlags::DEVICE_LOCAL,
      HOST_FLAGS,
      HOST_FLAGS,
    ]);

    let idx = find_memory_type(&props, 0b111, HOST_FLAGS).unwrap();
    assert_eq!(idx, 1);
  }

  #[test]
  fn respects_the_requirement_bitmask() {
    // type 1 has the right flags but is excluded by the mask
    let props = memory_table(&[vk::MemoryPropertyFlags::DEVICE_LOCAL, HOST_FLAGS, HOST_FLAGS]);

    let idx = find_memory_type(&props, 0b100, HOST_FLAGS).unwrap();
    assert_eq!(idx, 2);
  }

  #[test]
  fn partial_flag_match_is_not_enough() {
    let props = memory_table(&[vk::MemoryPropertyFlags::HOST_VISIBLE]);

    let result = find_memory_type(&props, 0b1, HOST_FLAGS);
    assert!(matches!(
      result,
      Err(RenderError::NoCompatibleMemoryType { .. })
    ));
  }

  #[test]
  fn fails_when_no_type_is_compatible() {
    let props = memory_table(&[
      vk::MemoryPropertyFlags::DEVICE_LOCAL,
      vk::MemoryPropertyFlags::DEVICE_LOCAL,
    ]);

    let result = find_memory_type(&props, 0b11, HOST_FLAGS);
    assert!(matches!(
      result,
      Err(RenderError::NoCompatibleMemoryType { .. })
    ));
  }
}
