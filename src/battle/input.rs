use std::collections::VecDeque;

/// The five keys a battle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
}

impl Key {
    /// Priority order when several keys are held.
    pub const ALL: [Key; 5] = [Key::Left, Key::Right, Key::Up, Key::Down, Key::Enter];
}

/// Level-triggered key source polled once per frame.
pub trait InputPort {
    fn is_down(&self, key: Key) -> bool;

    /// Called at the end of every frame with the key the controller acted on, if any.
    fn frame_finished(&mut self, _consumed: Option<Key>) {}
}

/// Turns held keys into single presses.
///
/// A key is latched once a phase acts on it; nothing else registers until every key is
/// released.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    latched: bool,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// First held key in priority order, unless a previous press is still held.
    pub fn pressed(&self, input: &dyn InputPort) -> Option<Key> {
        if self.latched {
            return None;
        }
        Key::ALL.into_iter().find(|key| input.is_down(*key))
    }

    pub fn latch(&mut self) {
        self.latched = true;
    }

    /// Clear the latch once no key is held.
    pub fn release_if_idle(&mut self, input: &dyn InputPort) {
        if self.latched && Key::ALL.iter().all(|key| !input.is_down(*key)) {
            self.latched = false;
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

/// Replays a queue of key presses.
///
/// The front key stays held until the controller acts on it, then every key is released
/// for one frame before the next press.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    presses: VecDeque<Key>,
    releasing: bool,
}

impl ScriptedInput {
    pub fn new(presses: impl IntoIterator<Item = Key>) -> Self {
        Self {
            presses: presses.into_iter().collect(),
            releasing: false,
        }
    }

    pub fn push(&mut self, key: Key) {
        self.presses.push_back(key);
    }

    pub fn remaining(&self) -> usize {
        self.presses.len()
    }
}

impl InputPort for ScriptedInput {
    fn is_down(&self, key: Key) -> bool {
        !self.releasing && self.presses.front() == Some(&key)
    }

    fn frame_finished(&mut self, consumed: Option<Key>) {
        if self.releasing {
            self.releasing = false;
        } else if consumed.is_some() && consumed == self.presses.front().copied() {
            self.presses.pop_front();
            self.releasing = true;
        }
    }
}

/// Input source with nothing ever held.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputPort for NoInput {
    fn is_down(&self, _key: Key) -> bool {
        false
    }
}
