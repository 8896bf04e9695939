/// Browser `keyCode` values for the keys the games listen to.
pub mod keys {
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const G: u32 = 71;
    pub const S: u32 = 83;
}

/// Pointer button numbers (`MouseEvent.button`).
pub mod buttons {
    pub const LEFT: u32 = 0;
    pub const RIGHT: u32 = 2;
}

/// Input events the engine understands.
/// Pointer coordinates are in display pixels (the host undoes any window scaling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: u32 },
    PointerUp { x: f32, y: f32, button: u32 },
    PointerMove { x: f32, y: f32 },
    /// Mouse wheel; only the sign of `delta` is meaningful (negative = up).
    Wheel { delta: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
}

/// A queue of input events.
/// The host pushes events between frames; the runner drains them after each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Discard all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Whether a key-down for `key_code` is pending this frame.
    pub fn key_pressed(&self, key_code: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyDown { key_code: k } if *k == key_code))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, button: buttons::LEFT });
        q.push(InputEvent::KeyDown { key_code: keys::SPACE });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn key_pressed_ignores_releases() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyUp { key_code: keys::S });
        assert!(!q.key_pressed(keys::S));
        q.push(InputEvent::KeyDown { key_code: keys::S });
        assert!(q.key_pressed(keys::S));
        assert!(!q.key_pressed(keys::G));
    }
}
