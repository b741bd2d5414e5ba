use bytemuck;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// All structs below must match the shader-side layout exactly (std140 for
// UBOs, std430 for the SSBO). Explicit `_pad` fields instead of trusting
// the compiler - the size asserts in tests are the contract.

/// Per-frame camera parameters for the raymarch pass.
/// Matches `WorldParams` in `raymarch.frag.glsl`.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct WorldParamsUBO {
  pub u_view: Mat4,
  pub u_proj: Mat4,
  pub u_camera_position: Vec3,
  pub _pad0: f32,
}

unsafe impl bytemuck::Zeroable for WorldParamsUBO {}
unsafe impl bytemuck::Pod for WorldParamsUBO {}

impl WorldParamsUBO {
  pub fn new(view: Mat4, proj: Mat4, camera_position: Vec3) -> Self {
    Self {
      u_view: view,
      u_proj: proj,
      u_camera_position: camera_position,
      _pad0: 0.0,
    }
  }
}

/// Per-frame parameters for the HUD pass: same camera block as the world
/// pass plus animation time and toggles.
/// Matches `HudParams` in `hud.frag.glsl`.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct HudParamsUBO {
  pub u_view: Mat4,
  pub u_proj: Mat4,
  pub u_camera_position: Vec3,
  pub _pad0: f32,
  pub u_time: f32,
  pub u_aspect: f32,
  pub u_show_hud: i32,
  pub _pad1: f32,
}

unsafe impl bytemuck::Zeroable for HudParamsUBO {}
unsafe impl bytemuck::Pod for HudParamsUBO {}

/// Screen-space placement of HUD widgets, recomputed every frame on the CPU.
/// Matches `HudLayout` in `hud.frag.glsl` (std430).
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct HudLayoutSSBO {
  /// Crosshair center in NDC
  pub crosshair_pos: Vec2,
  pub crosshair_size: f32,
  pub _pad0: f32,
  pub crosshair_color: Vec4,
  pub panel_pos: Vec2,
  pub panel_size: Vec2,
  pub panel_alpha: f32,
  pub _pad1: [f32; 3],
  pub player_pos: Vec3,
  pub _pad2: f32,
  pub player_forward: Vec3,
  pub _pad3: f32,
  pub player_rotation: Quat,
}

unsafe impl bytemuck::Zeroable for HudLayoutSSBO {}
unsafe impl bytemuck::Pod for HudLayoutSSBO {}

#[cfg(test)]
mod tests {
  use super::*;
  use std::mem::size_of;

  fn offset_of<S, F>(base: &S, field: &F) -> usize {
    (field as *const F as usize) - (base as *const S as usize)
  }

  #[test]
  fn world_params_match_std140_layout() {
    assert_eq!(size_of::<WorldParamsUBO>(), 144);

    let v = WorldParamsUBO::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO);
    assert_eq!(offset_of(&v, &v.u_view), 0);
    assert_eq!(offset_of(&v, &v.u_proj), 64);
    assert_eq!(offset_of(&v, &v.u_camera_position), 128);
  }

  #[test]
  fn hud_params_match_std140_layout() {
    assert_eq!(size_of::<HudParamsUBO>(), 160);

    let v: HudParamsUBO = bytemuck::Zeroable::zeroed();
    assert_eq!(offset_of(&v, &v.u_camera_position), 128);
    assert_eq!(offset_of(&v, &v.u_time), 144);
    assert_eq!(offset_of(&v, &v.u_aspect), 148);
    assert_eq!(offset_of(&v, &v.u_show_hud), 152);
  }

  #[test]
  fn hud_layout_matches_std430_layout() {
    assert_eq!(size_of::<HudLayoutSSBO>(), 112);

    let v: HudLayoutSSBO = bytemuck::Zeroable::zeroed();
    assert_eq!(offset_of(&v, &v.crosshair_pos), 0);
    assert_eq!(offset_of(&v, &v.crosshair_color), 16);
    assert_eq!(offset_of(&v, &v.panel_pos), 32);
    assert_eq!(offset_of(&v, &v.panel_alpha), 48);
    assert_eq!(offset_of(&v, &v.player_pos), 64);
    assert_eq!(offset_of(&v, &v.player_forward), 80);
    assert_eq!(offset_of(&v, &v.player_rotation), 96);
  }
}
