/// Cursor into a ring of per-frame resources (parameter buffers, descriptor
/// sets). Advances once per frame, wraps at `len`.
pub struct RingIndex {
  current: usize,
  len: usize,
}

impl RingIndex {
  pub fn new(len: usize) -> Self {
    assert!(len > 0, "RingIndex over an empty ring makes no sense");
    Self { current: 0, len }
  }

  pub fn current(&self) -> usize {
    self.current
  }

  /// Returns the slot to use this frame, then moves the cursor.
  pub fn next(&mut self) -> usize {
    let idx = self.current;
    self.current = (self.current + 1) % self.len;
    idx
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_at_zero() {
    let ring = RingIndex::new(2);
    assert_eq!(ring.current(), 0);
  }

  #[test]
  fn next_returns_the_slot_then_advances() {
    let mut ring = RingIndex::new(2);
    assert_eq!(ring.next(), 0);
    assert_eq!(ring.current(), 1);
    assert_eq!(ring.next(), 1);
    assert_eq!(ring.current(), 0);
  }

  #[test]
  fn wraps_after_len_frames() {
    let mut ring = RingIndex::new(3);
    let seen: Vec<usize> = (0..7).map(|_| ring.next()).collect();
    assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
  }
}
