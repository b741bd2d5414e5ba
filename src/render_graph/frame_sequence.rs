use crate::render_graph::_shared::RingIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
  /// Index of the presentable image the driver handed out. NOT the same
  /// thing as the frame slot - the chain usually has more images than
  /// there are frames in flight.
  Ok(u32),
  /// Surface changed under us, the frame must be dropped.
  OutOfDate,
}

/// The handful of device operations a frame consists of. `RenderGraph`
/// implements this over real Vulkan; tests drive the sequencer with a fake.
pub trait PresentationEngine {
  fn wait_for_fence(&mut self, frame_slot: usize);
  fn reset_fence(&mut self, frame_slot: usize);
  fn acquire_image(&mut self, frame_slot: usize) -> AcquireOutcome;
  fn record(&mut self, frame_slot: usize, image_index: u32);
  fn submit(&mut self, frame_slot: usize, image_index: u32);
  fn present(&mut self, frame_slot: usize, image_index: u32);
}

/// Owns the frame-slot cursor and the per-frame ordering rules:
/// - fence wait BEFORE touching any slot resource (CPU back-pressure)
/// - fence reset only AFTER a successful acquire, so a dropped frame
///   leaves the fence signaled and the slot immediately reusable
/// - slot advances only when the frame was actually submitted
pub struct FrameSequencer {
  frame_slot: RingIndex,
}

impl FrameSequencer {
  pub fn new(frames_in_flight: usize) -> Self {
    Self {
      frame_slot: RingIndex::new(frames_in_flight),
    }
  }

  pub fn frame_slot(&self) -> usize {
    self.frame_slot.current()
  }

  /// Returns `false` when the frame was dropped (swapchain out of date).
  pub fn draw_frame<E: PresentationEngine>(&mut self, engine: &mut E) -> bool {
    let slot = self.frame_slot.current();
    engine.wait_for_fence(slot);

    let image_index = match engine.acquire_image(slot) {
      AcquireOutcome::OutOfDate => return false,
      AcquireOutcome::Ok(idx) => idx,
    };

    engine.reset_fence(slot);
    engine.record(slot, image_index);
    engine.submit(slot, image_index);
    engine.present(slot, image_index);

    self.frame_slot.next();
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Pretend GPU: a submit leaves the slot's fence unsignaled until the
  /// CPU waits on it again. `image_index` cycles over a 3-image chain.
  struct FakeEngine {
    chain_image_count: u32,
    next_image: u32,
    fence_signaled: Vec<bool>,
    out_of_date_on_acquire: bool,
    events: Vec<String>,
    max_frames_on_gpu: usize,
  }

  impl FakeEngine {
    fn new(frames_in_flight: usize, chain_image_count: u32) -> Self {
      Self {
        chain_image_count,
        next_image: 0,
        fence_signaled: vec![true; frames_in_flight],
        out_of_date_on_acquire: false,
        events: Vec::new(),
        max_frames_on_gpu: 0,
      }
    }

    fn frames_on_gpu(&self) -> usize {
      self.fence_signaled.iter().filter(|s| !**s).count()
    }
  }

  impl PresentationEngine for FakeEngine {
    fn wait_for_fence(&mut self, frame_slot: usize) {
      self.events.push(format!("wait f{}", frame_slot));
      // a real wait blocks until the GPU retires the slot's work
      self.fence_signaled[frame_slot] = true;
    }

    fn reset_fence(&mut self, frame_slot: usize) {
      assert!(
        self.fence_signaled[frame_slot],
        "reset of an in-flight fence would deadlock the slot"
      );
      self.events.push(format!("reset f{}", frame_slot));
    }

    fn acquire_image(&mut self, frame_slot: usize) -> AcquireOutcome {
      self.events.push(format!("acquire f{}", frame_slot));
      if self.out_of_date_on_acquire {
        return AcquireOutcome::OutOfDate;
      }
      let idx = self.next_image;
      self.next_image = (self.next_image + 1) % self.chain_image_count;
      AcquireOutcome::Ok(idx)
    }

    fn record(&mut self, frame_slot: usize, image_index: u32) {
      self.events.push(format!("record f{} i{}", frame_slot, image_index));
    }

    fn submit(&mut self, frame_slot: usize, image_index: u32) {
      self.fence_signaled[frame_slot] = false;
      self.max_frames_on_gpu = self.max_frames_on_gpu.max(self.frames_on_gpu());
      self.events.push(format!("submit f{} i{}", frame_slot, image_index));
    }

    fn present(&mut self, frame_slot: usize, image_index: u32) {
      self.events.push(format!("present f{} i{}", frame_slot, image_index));
    }
  }

  #[test]
  fn frame_slots_cycle_independently_of_image_indices() {
    let mut engine = FakeEngine::new(2, 3);
    let mut sequencer = FrameSequencer::new(2);

    for _ in 0..6 {
      assert!(sequencer.draw_frame(&mut engine));
    }

    let submits: Vec<&String> = engine
      .events
      .iter()
      .filter(|e| e.starts_with("submit"))
      .collect();
    assert_eq!(
      submits,
      vec![
        "submit f0 i0",
        "submit f1 i1",
        "submit f0 i2",
        "submit f1 i0",
        "submit f0 i1",
        "submit f1 i2",
      ]
    );
  }

  #[test]
  fn never_more_frames_on_gpu_than_frames_in_flight() {
    let mut engine = FakeEngine::new(2, 3);
    let mut sequencer = FrameSequencer::new(2);

    for _ in 0..20 {
      sequencer.draw_frame(&mut engine);
    }

    assert!(engine.max_frames_on_gpu <= 2);
  }

  #[test]
  fn out_of_date_drops_the_frame_without_touching_the_slot() {
    let mut engine = FakeEngine::new(2, 3);
    let mut sequencer = FrameSequencer::new(2);
    engine.out_of_date_on_acquire = true;

    assert!(!sequencer.draw_frame(&mut engine));

    // no reset, record, submit or present after the failed acquire
    assert_eq!(engine.events, vec!["wait f0", "acquire f0"]);
    // slot unchanged, fence still signaled - next attempt reuses slot 0
    assert_eq!(sequencer.frame_slot(), 0);
    assert!(engine.fence_signaled[0]);

    engine.out_of_date_on_acquire = false;
    assert!(sequencer.draw_frame(&mut engine));
    assert!(engine.events.contains(&"submit f0 i0".to_string()));
    assert_eq!(sequencer.frame_slot(), 1);
  }

  #[test]
  fn each_frame_runs_the_steps_in_order() {
    let mut engine = FakeEngine::new(2, 3);
    let mut sequencer = FrameSequencer::new(2);
    sequencer.draw_frame(&mut engine);

    assert_eq!(
      engine.events,
      vec![
        "wait f0",
        "acquire f0",
        "reset f0",
        "record f0 i0",
        "submit f0 i0",
        "present f0 i0",
      ]
    );
  }
}
