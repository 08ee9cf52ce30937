//! Keyboard state table indexed by key code.
//!
//! - **Level-triggered (held):** `is_down(code)` returns true every frame the
//!   key is physically down. Used for continuous actions like movement.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened. Cleared by `end_frame()`, which the main
//!   loop calls only after at least one fixed simulation step has consumed
//!   them, so a press cannot be silently lost on a zero-step frame.
//!
//! Raw key codes come straight from the platform layer. Codes at or above
//! `MAX_KEY_CODE` are dropped without touching the table; this bounds check is
//! a contract, not an optimization.

pub const MAX_KEY_CODE: usize = 256;

/// Stable key codes used by the table. Direction controls map to two codes
/// each: an arrow key and a WASD alternate, both honored at once.
pub mod keys {
    pub const ESCAPE: usize = 27;
    pub const SPACE: usize = 32;
    pub const LEFT: usize = 37;
    pub const UP: usize = 38;
    pub const RIGHT: usize = 39;
    pub const DOWN: usize = 40;
    pub const A: usize = 65;
    pub const D: usize = 68;
    pub const P: usize = 80;
    pub const R: usize = 82;
    pub const S: usize = 83;
    pub const W: usize = 87;
}

pub struct InputState {
    down: [bool; MAX_KEY_CODE],
    just_pressed: [bool; MAX_KEY_CODE],
    just_released: [bool; MAX_KEY_CODE],
}

impl InputState {
    pub fn new() -> Self {
        Self {
            down: [false; MAX_KEY_CODE],
            just_pressed: [false; MAX_KEY_CODE],
            just_released: [false; MAX_KEY_CODE],
        }
    }

    pub fn key_down(&mut self, code: usize) {
        if code >= MAX_KEY_CODE {
            return;
        }
        if !self.down[code] {
            self.down[code] = true;
            self.just_pressed[code] = true;
        }
    }

    pub fn key_up(&mut self, code: usize) {
        if code >= MAX_KEY_CODE {
            return;
        }
        if self.down[code] {
            self.down[code] = false;
            self.just_released[code] = true;
        }
    }

    pub fn is_down(&self, code: usize) -> bool {
        code < MAX_KEY_CODE && self.down[code]
    }

    pub fn is_just_pressed(&self, code: usize) -> bool {
        code < MAX_KEY_CODE && self.just_pressed[code]
    }

    pub fn is_just_released(&self, code: usize) -> bool {
        code < MAX_KEY_CODE && self.just_released[code]
    }

    pub fn end_frame(&mut self) {
        self.just_pressed = [false; MAX_KEY_CODE];
        self.just_released = [false; MAX_KEY_CODE];
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(keys::A);
        assert!(input.is_down(keys::A));
        assert!(input.is_just_pressed(keys::A));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(keys::A);
        input.key_up(keys::A);
        assert!(!input.is_down(keys::A));
        assert!(input.is_just_released(keys::A));
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut input = InputState::new();
        input.key_down(keys::A);
        input.end_frame();
        // OS auto-repeat delivers further presses while held; they must not
        // re-arm the edge.
        input.key_down(keys::A);
        assert!(input.is_down(keys::A));
        assert!(!input.is_just_pressed(keys::A));
    }

    #[test]
    fn key_up_without_down_is_a_no_op() {
        let mut input = InputState::new();
        input.key_up(keys::A);
        assert!(!input.is_down(keys::A));
        assert!(!input.is_just_released(keys::A));
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        let mut input = InputState::new();
        input.key_down(MAX_KEY_CODE);
        input.key_down(usize::MAX);
        input.key_up(MAX_KEY_CODE);
        assert!(!input.is_down(MAX_KEY_CODE));
        assert!(!input.is_down(usize::MAX));
        // The table itself is untouched.
        for code in 0..MAX_KEY_CODE {
            assert!(!input.is_down(code));
            assert!(!input.is_just_pressed(code));
        }
    }

    #[test]
    fn end_frame_clears_edges_keeps_held() {
        let mut input = InputState::new();
        input.key_down(keys::UP);
        input.key_down(keys::SPACE);
        input.end_frame();
        assert!(!input.is_just_pressed(keys::UP));
        assert!(!input.is_just_pressed(keys::SPACE));
        assert!(input.is_down(keys::UP));
        assert!(input.is_down(keys::SPACE));

        input.key_up(keys::UP);
        assert!(input.is_just_released(keys::UP));
        input.end_frame();
        assert!(!input.is_just_released(keys::UP));
    }

    #[test]
    fn keys_track_independently() {
        let mut input = InputState::new();
        input.key_down(keys::LEFT);
        input.key_down(keys::D);
        assert!(input.is_down(keys::LEFT));
        assert!(input.is_down(keys::D));

        input.key_up(keys::LEFT);
        assert!(!input.is_down(keys::LEFT));
        assert!(input.is_just_released(keys::LEFT));
        assert!(input.is_down(keys::D));
        assert!(!input.is_just_released(keys::D));
    }
}
