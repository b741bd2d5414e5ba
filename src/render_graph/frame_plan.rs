/// One renderable step of a frame, in submission order. The plan is pure
/// data so frame logic (what gets drawn when, with which ring slot) is
/// testable without a device; `RenderGraph::execute_plan` replays it into
/// a real command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCmd {
  BeginRenderPass,
  BindWorldPipeline,
  BindWorldParams { frame_slot: usize },
  /// Fullscreen triangle: 3 vertices, no buffers.
  Draw {
    vertex_count: u32,
    instance_count: u32,
  },
  NextSubpass,
  BindHudPipeline,
  BindHudParams { frame_slot: usize },
  /// imgui diagnostic panel, recorded by the overlay renderer.
  DrawOverlay,
  EndRenderPass,
}

const FULLSCREEN_TRIANGLE: FrameCmd = FrameCmd::Draw {
  vertex_count: 3,
  instance_count: 1,
};

/// The world pass always runs. The subpass transition always happens too,
/// even with the HUD hidden - the render pass structure is baked into the
/// pipelines, only the draws inside subpass 1 are conditional.
pub fn frame_command_plan(
  frame_slot: usize,
  show_hud: bool,
  show_diagnostics: bool,
) -> Vec<FrameCmd> {
  let mut plan = vec![
    FrameCmd::BeginRenderPass,
    FrameCmd::BindWorldPipeline,
    FrameCmd::BindWorldParams { frame_slot },
    FULLSCREEN_TRIANGLE,
    FrameCmd::NextSubpass,
  ];

  if show_hud {
    plan.push(FrameCmd::BindHudPipeline);
    plan.push(FrameCmd::BindHudParams { frame_slot });
    plan.push(FULLSCREEN_TRIANGLE);
  }
  if show_diagnostics {
    plan.push(FrameCmd::DrawOverlay);
  }

  plan.push(FrameCmd::EndRenderPass);
  plan
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_frame_orders_world_before_hud_before_overlay() {
    let plan = frame_command_plan(1, true, true);
    assert_eq!(
      plan,
      vec![
        FrameCmd::BeginRenderPass,
        FrameCmd::BindWorldPipeline,
        FrameCmd::BindWorldParams { frame_slot: 1 },
        FrameCmd::Draw {
          vertex_count: 3,
          instance_count: 1
        },
        FrameCmd::NextSubpass,
        FrameCmd::BindHudPipeline,
        FrameCmd::BindHudParams { frame_slot: 1 },
        FrameCmd::Draw {
          vertex_count: 3,
          instance_count: 1
        },
        FrameCmd::DrawOverlay,
        FrameCmd::EndRenderPass,
      ]
    );
  }

  #[test]
  fn hidden_hud_still_transitions_subpass() {
    let plan = frame_command_plan(0, false, false);
    assert!(plan.contains(&FrameCmd::NextSubpass));
    assert!(!plan.contains(&FrameCmd::BindHudPipeline));
    assert!(!plan.contains(&FrameCmd::DrawOverlay));
    assert_eq!(plan.last(), Some(&FrameCmd::EndRenderPass));
  }

  #[test]
  fn diagnostics_can_show_without_hud() {
    let plan = frame_command_plan(0, false, true);
    assert!(plan.contains(&FrameCmd::DrawOverlay));
    assert!(!plan.contains(&FrameCmd::BindHudPipeline));

    // overlay draws inside subpass 1
    let next_subpass_at = plan
      .iter()
      .position(|c| *c == FrameCmd::NextSubpass)
      .unwrap();
    let overlay_at = plan
      .iter()
      .position(|c| *c == FrameCmd::DrawOverlay)
      .unwrap();
    assert!(overlay_at > next_subpass_at);
  }

  #[test]
  fn both_param_binds_use_the_same_ring_slot() {
    let plan = frame_command_plan(1, true, false);
    let slots: Vec<usize> = plan
      .iter()
      .filter_map(|c| match c {
        FrameCmd::BindWorldParams { frame_slot } => Some(*frame_slot),
        FrameCmd::BindHudParams { frame_slot } => Some(*frame_slot),
        _ => None,
      })
      .collect();
    assert_eq!(slots, vec![1, 1]);
  }
}
