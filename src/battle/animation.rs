//! Per-frame progress counters standing in for suspended animations.
//!
//! Each type is advanced by the frame delta and reports completion; the controller keeps
//! one of them as the continuation state of the current phase.
use crate::config::TweenSettings;

/// Linear movement toward a target at a fixed speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub position: f32,
    pub target: f32,
    pub speed: f32,
}

impl Tween {
    pub fn new(settings: TweenSettings) -> Self {
        Self {
            position: 0.0,
            target: settings.distance,
            speed: settings.speed,
        }
    }

    pub fn advance(&mut self, delta: f32) -> bool {
        if self.position < self.target {
            self.position = (self.position + self.speed * delta).min(self.target);
        }
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.target
    }
}

/// A value moving toward a target at a fixed rate; used for health and xp bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meter {
    pub value: f32,
    pub target: f32,
    pub rate: f32,
}

impl Meter {
    pub fn new(value: f32, target: f32, rate: f32) -> Self {
        Self { value, target, rate }
    }

    pub fn advance(&mut self, delta: f32) -> bool {
        let step = self.rate * delta;
        if self.value < self.target {
            self.value = (self.value + step).min(self.target);
        } else if self.value > self.target {
            self.value = (self.value - step).max(self.target);
        }
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.value == self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    elapsed: f32,
    duration: f32,
}

impl Delay {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    pub fn advance(&mut self, delta: f32) -> bool {
        self.elapsed += delta;
        self.elapsed >= self.duration
    }
}

/// Screen opacity transition. Fading out waits `delay` seconds first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    waited: f32,
    delay: f32,
    speed: f32,
    /// 0 is fully visible, 1 fully black.
    pub opacity: f32,
    fading_in: bool,
}

impl Fade {
    pub fn out(delay: f32, speed: f32) -> Self {
        Self {
            waited: 0.0,
            delay,
            speed,
            opacity: 0.0,
            fading_in: false,
        }
    }

    pub fn into_view(speed: f32) -> Self {
        Self {
            waited: 0.0,
            delay: 0.0,
            speed,
            opacity: 1.0,
            fading_in: true,
        }
    }

    pub fn advance(&mut self, delta: f32) -> bool {
        if self.waited < self.delay {
            self.waited += delta;
            return false;
        }
        if self.fading_in {
            self.opacity = (self.opacity - self.speed * delta).max(0.0);
            self.opacity <= 0.0
        } else {
            self.opacity = (self.opacity + self.speed * delta).min(1.0);
            self.opacity >= 1.0
        }
    }
}

/// Two-line dialogue typed out character by character.
///
/// After both lines are typed the box holds for `hold * speed * hold_factor` more
/// characters of time. Completion is never reported on the frame the last character
/// appears, so a full line is always on screen for at least one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWriter {
    pub line1: String,
    pub line2: String,
    hold: f32,
    typed: f32,
}

impl TextWriter {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>, hold: f32) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
            hold,
            typed: 0.0,
        }
    }

    fn lengths(&self) -> (usize, usize) {
        (self.line1.chars().count(), self.line2.chars().count())
    }

    /// Type `delta * speed` more characters. Returns true once the hold has elapsed.
    pub fn advance(&mut self, delta: f32, speed: f32, hold_factor: f32) -> bool {
        let was_typed = self.is_typed();
        self.typed += delta * speed;
        let (first, second) = self.lengths();
        was_typed && self.typed.floor() >= (first + second) as f32 + self.hold * speed * hold_factor
    }

    /// Whether every character is on screen.
    pub fn is_typed(&self) -> bool {
        let (first, second) = self.lengths();
        self.typed.floor() as usize >= first + second
    }

    /// Portions of both lines currently visible.
    pub fn visible(&self) -> (&str, &str) {
        let (first, _) = self.lengths();
        let typed = self.typed.max(0.0).floor() as usize;
        let line1 = char_prefix(&self.line1, typed);
        let line2 = char_prefix(&self.line2, typed.saturating_sub(first));
        (line1, line2)
    }
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target_and_stops() {
        let mut tween = Tween::new(TweenSettings::new(176.0, 176.0));
        assert!(!tween.advance(0.5));
        assert_eq!(tween.position, 88.0);
        assert!(tween.advance(0.75));
        assert_eq!(tween.position, 176.0);
    }

    #[test]
    fn test_zero_distance_tween_is_done() {
        let mut tween = Tween::new(TweenSettings::new(0.0, 192.0));
        assert!(tween.advance(0.0));
    }

    #[test]
    fn test_meter_drains_both_ways() {
        let mut health = Meter::new(20.0, 12.0, 16.0);
        assert!(!health.advance(0.25));
        assert_eq!(health.value, 16.0);
        assert!(health.advance(0.25));
        assert_eq!(health.value, 12.0);

        let mut xp = Meter::new(135.0, 159.0, 48.0);
        assert!(xp.advance(0.5));
        assert_eq!(xp.value, 159.0);
    }

    #[test]
    fn test_fade_waits_before_darkening() {
        let mut fade = Fade::out(0.1, 3.0);
        assert!(!fade.advance(0.1));
        assert_eq!(fade.opacity, 0.0);
        assert!(!fade.advance(0.2));
        assert!(fade.advance(0.25));
        assert_eq!(fade.opacity, 1.0);

        let mut fade = Fade::into_view(3.0);
        assert!(!fade.advance(0.2));
        assert!(fade.advance(0.25));
    }

    #[test]
    fn test_text_types_both_lines_then_holds() {
        // 10 + 5 characters at 48/s, hold of 1 adds 38.4 characters
        let mut text = TextWriter::new("Wild LOTAD", "came!", 1.0);
        assert!(!text.advance(0.125, 48.0, 0.8));
        assert_eq!(text.visible(), ("Wild L", ""));
        assert!(!text.advance(0.25, 48.0, 0.8));
        assert!(text.is_typed());
        assert_eq!(text.visible(), ("Wild LOTAD", "came!"));
        assert!(!text.advance(0.5, 48.0, 0.8));
        assert!(text.advance(0.5, 48.0, 0.8));
    }

    #[test]
    fn test_text_without_hold_finishes_after_one_full_frame() {
        let mut text = TextWriter::new("MUDKIP used", "TACKLE!", 0.0);
        assert!(!text.advance(0.25, 48.0, 0.8));
        // Fully typed on this frame; done on the next.
        assert!(!text.advance(0.25, 48.0, 0.8));
        assert!(text.is_typed());
        assert!(text.advance(0.0, 48.0, 0.8));
    }

    #[test]
    fn test_visible_respects_multibyte_characters() {
        let mut text = TextWriter::new("POKé", "", 0.0);
        text.advance(0.1, 48.0, 0.8);
        assert_eq!(text.visible().0, "POKé");
    }
}
