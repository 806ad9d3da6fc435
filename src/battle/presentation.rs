use crate::battle::menu::{BagCursor, ConfirmChoice};
use crate::battle::phase::BattlePhase;
use crate::pokemon::Combatant;
use tracing::trace;

/// Which menu is on screen and where its cursor sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuView {
    None,
    Actions { cursor: usize },
    Moves { cursor: usize },
    Bag { cursor: BagCursor },
    Confirm { choice: ConfirmChoice },
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub phase: BattlePhase,
    pub player: &'a Combatant,
    pub wild: &'a Combatant,
    /// Visible part of both dialogue lines.
    pub dialogue: Option<(&'a str, &'a str)>,
    /// True once every character of the dialogue is visible.
    pub dialogue_complete: bool,
    pub menu: MenuView,
    /// Position of the running slide, throw or bounce animation.
    pub tween_position: Option<f32>,
    /// Experience shown on the xp bar while it fills.
    pub xp_display: Option<f32>,
    /// 0 is fully visible, 1 fully black.
    pub fade_opacity: f32,
}

impl Frame<'_> {
    /// Dialogue joined into one line, once fully typed.
    pub fn completed_text(&self) -> Option<String> {
        if !self.dialogue_complete {
            return None;
        }
        let (first, second) = self.dialogue?;
        let text = if second.is_empty() {
            first.to_string()
        } else {
            format!("{} {}", first, second)
        };
        Some(text)
    }
}

/// Drawing side of a battle. Called once per tick after the phase has advanced.
pub trait PresentationPort {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl PresentationPort for NullPresentation {
    fn present(&mut self, _frame: &Frame<'_>) {}
}

/// Records each completed dialogue and the sequence of phases shown.
#[derive(Debug, Clone, Default)]
pub struct TranscriptPresentation {
    pub lines: Vec<String>,
    pub phases: Vec<BattlePhase>,
    last_text: Option<(BattlePhase, String)>,
}

impl TranscriptPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self, phase: BattlePhase) -> bool {
        self.phases.contains(&phase)
    }
}

impl PresentationPort for TranscriptPresentation {
    fn present(&mut self, frame: &Frame<'_>) {
        if self.phases.last() != Some(&frame.phase) {
            self.phases.push(frame.phase);
        }

        if let Some(text) = frame.completed_text() {
            let key = (frame.phase, text);
            if self.last_text.as_ref() != Some(&key) {
                trace!(text = %key.1, "dialogue");
                self.lines.push(key.1.clone());
                self.last_text = Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;

    #[test]
    fn test_transcript_records_each_dialogue_once() {
        let player = TestCombatantBuilder::new(258, 5).build();
        let wild = TestCombatantBuilder::new(263, 3).build();
        let mut transcript = TranscriptPresentation::new();

        let mut frame = Frame {
            phase: BattlePhase::WildAppeared,
            player: &player,
            wild: &wild,
            dialogue: Some(("Wild ZIG", "")),
            dialogue_complete: false,
            menu: MenuView::None,
            tween_position: None,
            xp_display: None,
            fade_opacity: 0.0,
        };
        transcript.present(&frame);
        assert!(transcript.lines.is_empty());

        frame.dialogue = Some(("Wild ZIGZAGOON", "appeared!"));
        frame.dialogue_complete = true;
        transcript.present(&frame);
        transcript.present(&frame);

        frame.phase = BattlePhase::GoPokemon;
        frame.dialogue = Some(("Go! MUDKIP!", ""));
        transcript.present(&frame);

        assert_eq!(
            transcript.lines,
            vec!["Wild ZIGZAGOON appeared!".to_string(), "Go! MUDKIP!".to_string()]
        );
        assert_eq!(
            transcript.phases,
            vec![BattlePhase::WildAppeared, BattlePhase::GoPokemon]
        );
        assert!(transcript.visited(BattlePhase::GoPokemon));
    }
}
