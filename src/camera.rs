use glam::{vec3, Mat4, Quat, Vec3};

use crate::config::CameraConfig;

const WORLD_UP: Vec3 = Vec3::Y;
/// No extremes pls! Limit 90dgr up/down to only [-85, 85].
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 * 0.95;

/// First-person camera: position + yaw/pitch, no roll. GL-convention
/// projection - the Vulkan clip-space difference is absorbed by the
/// negative-height viewport (see `create_viewport`).
pub struct Camera {
  position: Vec3,
  yaw: f32,
  pitch: f32,
  move_speed: f32,
  rotate_sensitivity: f32,
  perspective_matrix: Mat4,
}

impl Camera {
  pub fn new(cfg: &CameraConfig, aspect_ratio: f32) -> Camera {
    // https://matthewwellings.com/blog/the-new-vulkan-coordinate-system/
    let perspective_matrix = Mat4::perspective_rh(
      cfg.fov_dgr.to_radians(),
      aspect_ratio,
      cfg.z_near,
      cfg.z_far,
    );

    Camera {
      position: Vec3::from_array(cfg.position),
      yaw: 0.0,
      pitch: 0.0,
      move_speed: cfg.move_speed,
      rotate_sensitivity: cfg.rotate_sensitivity,
      perspective_matrix,
    }
  }

  pub fn position(&self) -> Vec3 {
    self.position
  }

  pub fn rotation(&self) -> Quat {
    Quat::from_axis_angle(WORLD_UP, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch)
  }

  pub fn forward(&self) -> Vec3 {
    self.rotation() * Vec3::NEG_Z
  }

  pub fn view_matrix(&self) -> Mat4 {
    Mat4::from_rotation_translation(self.rotation(), self.position).inverse()
  }

  pub fn perspective_matrix(&self) -> Mat4 {
    self.perspective_matrix
  }

  pub fn rotate_yaw_pitch(&mut self, delta_x: f32, delta_y: f32) {
    self.yaw -= delta_x * self.rotate_sensitivity;
    self.pitch = (self.pitch - delta_y * self.rotate_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
  }

  /// `direction` is in camera-local axes (x right, y up, -z forward),
  /// scaled by delta time so speed is framerate-independent.
  pub fn move_local(&mut self, direction: Vec3, delta_time: f32) {
    if direction == Vec3::ZERO {
      return;
    }
    let world_dir = self.rotation() * direction.normalize();
    self.position += world_dir * self.move_speed * delta_time;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CameraConfig;

  fn test_camera() -> Camera {
    Camera::new(&CameraConfig::default(), 16.0 / 9.0)
  }

  #[test]
  fn looks_down_negative_z_by_default() {
    let camera = test_camera();
    let fwd = camera.forward();
    assert!((fwd - vec3(0.0, 0.0, -1.0)).length() < 1e-5);
  }

  #[test]
  fn pitch_is_clamped_short_of_straight_up() {
    let mut camera = test_camera();
    camera.rotate_yaw_pitch(0.0, -1e6);
    assert!(camera.forward().y < 1.0);
    assert!(camera.pitch <= PITCH_LIMIT);
  }

  #[test]
  fn view_matrix_moves_world_opposite_to_camera() {
    let mut camera = test_camera();
    camera.move_local(vec3(0.0, 0.0, -1.0), 1.0);

    // a point at the camera position maps to the view-space origin
    let at_camera = camera.view_matrix().transform_point3(camera.position());
    assert!(at_camera.length() < 1e-4);
  }

  #[test]
  fn aspect_is_recoverable_from_the_projection() {
    let camera = test_camera();
    let proj = camera.perspective_matrix();
    let aspect = proj.y_axis.y / proj.x_axis.x;
    assert!((aspect - 16.0 / 9.0).abs() < 1e-5);
  }

  #[test]
  fn movement_follows_the_yaw() {
    let mut camera = test_camera();
    let start = camera.position();
    camera.rotate_yaw_pitch(std::f32::consts::FRAC_PI_2 / camera.rotate_sensitivity, 0.0);
    camera.move_local(vec3(0.0, 0.0, -1.0), 1.0);
    let moved = camera.position() - start;
    // yawed -90dgr: forward is now along -X.. or +X depending on sign, but
    // definitely not -Z anymore
    assert!(moved.z.abs() < 1e-3);
    assert!(moved.x.abs() > 0.1);
  }
}
