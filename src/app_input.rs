use std::collections::HashSet;

use glam::Vec3;
use log::info;
use winit::event::{ElementState, Event, MouseButton, VirtualKeyCode, WindowEvent};

use crate::camera::Camera;

/// Other implementations:
/// * https://github.com/rukai/winit_input_helper/blob/main/src/current_input.rs
pub struct AppInput {
  pub close_requested: bool,
  pub key_held: HashSet<VirtualKeyCode>,
  /// Keys that went down THIS frame, cleared in `reset_transient_state`
  key_pressed: HashSet<VirtualKeyCode>,
  pub mouse_buttons_held: HashSet<MouseButton>,
  /// Accumulated cursor movement this frame
  mouse_delta: (f32, f32),
  last_cursor_pos: Option<(f32, f32)>,
  /// handle losing focus, cursor moving out of window etc.
  pub can_intercept_mouse_events: bool,
}

impl AppInput {
  pub fn new() -> Self {
    Self {
      close_requested: false,
      key_held: HashSet::new(),
      key_pressed: HashSet::new(),
      mouse_buttons_held: HashSet::new(),
      mouse_delta: (0.0, 0.0),
      last_cursor_pos: None,
      can_intercept_mouse_events: false, // wait to make sure we REALLY have mouse focus
    }
  }

  pub fn reset_transient_state(&mut self) {
    self.key_pressed.clear();
    self.mouse_delta = (0.0, 0.0);
  }

  pub fn handle_event<T>(&mut self, event: &Event<T>, imgui_intercepted: bool) {
    if let Event::WindowEvent { event, .. } = &event {
      self.handle_window_event(event, imgui_intercepted);
    }

    // prevents imgui intercepting `Release` events
    if imgui_intercepted {
      self.key_held.clear();
      self.reset_transient_state();
    }
  }

  fn handle_window_event(&mut self, event: &WindowEvent, imgui_intercepted: bool) {
    match event {
      // on clicked 'x'
      WindowEvent::CloseRequested => {
        self.close_requested = true;
      }
      // keyboard
      WindowEvent::KeyboardInput { input, .. } => match (input.state, input.virtual_keycode) {
        (_, Some(VirtualKeyCode::Escape)) => {
          self.close_requested = true;
        }
        (ElementState::Pressed, Some(key)) if !imgui_intercepted => {
          if self.key_held.insert(key) {
            self.key_pressed.insert(key);
          }
        }
        (ElementState::Released, Some(key)) => {
          // always handle, regardless of imgui
          self.key_held.remove(&key);
        }
        _ => {}
      },
      // mouse look - only deltas matter
      WindowEvent::CursorMoved { position, .. } => {
        let pos = (position.x as f32, position.y as f32);
        if let Some(last) = self.last_cursor_pos {
          self.mouse_delta.0 += pos.0 - last.0;
          self.mouse_delta.1 += pos.1 - last.1;
        }
        self.last_cursor_pos = Some(pos);
      }
      // mouse buttons
      WindowEvent::MouseInput { button, state, .. } => {
        self.can_intercept_mouse_events = true;
        match *state {
          ElementState::Pressed if !imgui_intercepted => {
            self.mouse_buttons_held.insert(*button);
          }
          ElementState::Released => {
            // always handle, regardless of imgui
            self.mouse_buttons_held.remove(button);
          }
          _ => (),
        }
      }
      // window focus
      WindowEvent::Focused(is_focused) => {
        info!("Window focus change. Are we in focus: {:?}", is_focused);
        self.can_intercept_mouse_events = false;
      }
      // cursor left
      WindowEvent::CursorLeft { .. } => {
        self.can_intercept_mouse_events = false;
        self.last_cursor_pos = None;
      }
      _ => {}
    }
  }

  fn is_held(&self, key: VirtualKeyCode) -> bool {
    self.key_held.contains(&key)
  }

  /// Edge-triggered, true for one frame only. Used for toggles.
  pub fn was_pressed(&self, key: VirtualKeyCode) -> bool {
    self.key_pressed.contains(&key)
  }

  fn is_mouse_button_held(&self, btn: MouseButton) -> bool {
    self.can_intercept_mouse_events && self.mouse_buttons_held.contains(&btn)
  }

  /// Rust's `Winit` has problem with keyboard keys:
  /// "When user holds the key, winit emits `KEY_PRESS`, waits 0.5s and then
  /// starts emitting subsequent `KEY_PRESS` events".
  /// This results in initial camera movement stutter for 0.5s - bad!
  /// Update per-frame with local set of pressed keys instead.
  pub fn update_camera(&self, camera: &mut Camera, delta_time: f32) {
    let mut move_vector = Vec3::ZERO;

    if self.is_held(VirtualKeyCode::W) {
      move_vector.z = -1.0;
    }
    if self.is_held(VirtualKeyCode::S) {
      move_vector.z = 1.0;
    }
    if self.is_held(VirtualKeyCode::A) {
      move_vector.x = -1.0;
    }
    if self.is_held(VirtualKeyCode::D) {
      move_vector.x = 1.0;
    }
    if self.is_held(VirtualKeyCode::Z) {
      move_vector.y = -1.0;
    }
    if self.is_held(VirtualKeyCode::Space) {
      move_vector.y = 1.0;
    }

    camera.move_local(move_vector, delta_time);

    if self.is_mouse_button_held(MouseButton::Left) {
      camera.rotate_yaw_pitch(self.mouse_delta.0, self.mouse_delta.1);
    }
  }
}
