use minifb::{Key, KeyRepeat, Window};
use std::collections::VecDeque;
use std::collections::vec_deque::Drain;

/// Discrete user requests produced from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Flip light `n` (zero-based) on or off.
    ToggleLight(usize),
    RequestClose,
}

/// `1`/`2`/`3` (top row or keypad) toggle lights 0..2, `Escape` closes.
pub fn map_key(key: Key) -> Option<InputEvent> {
    match key {
        Key::Key1 | Key::NumPad1 => Some(InputEvent::ToggleLight(0)),
        Key::Key2 | Key::NumPad2 => Some(InputEvent::ToggleLight(1)),
        Key::Key3 | Key::NumPad3 => Some(InputEvent::ToggleLight(2)),
        Key::Escape => Some(InputEvent::RequestClose),
        _ => None,
    }
}

/// FIFO of pending input events, filled once per frame and drained before rendering.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Queues the events for `keys`, in order. Unmapped keys are dropped.
    pub fn extend_from_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.events.extend(keys.into_iter().filter_map(map_key));
    }

    /// Queues keys freshly pressed since the last window update. Repeats are ignored.
    pub fn collect_from_window(&mut self, window: &Window) {
        self.extend_from_keys(window.get_keys_pressed(KeyRepeat::No));
    }

    pub fn drain(&mut self) -> Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
