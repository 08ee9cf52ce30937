//! The object collection and its fixed-step update rule.

use crate::input::{keys, InputState};
use crate::transform::Rect;

pub const DEFAULT_MOVE_SPEED: f32 = 0.05;
pub const DEFAULT_ROTATE_SPEED: f32 = 0.005;

/// One drawable rectangle. `rect` is rewritten every fixed step; `color`
/// never changes after creation.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub rect: Rect,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub objects: Vec<RenderObject>,
    /// World units moved per fixed step while a direction is held.
    pub move_speed: f32,
    /// Radians per fixed step for object index 0; index `i` spins at
    /// `(i + 1)` times this rate.
    pub rotate_speed: f32,
}

impl Scene {
    pub fn new(move_speed: f32, rotate_speed: f32) -> Self {
        Self {
            objects: Vec::new(),
            move_speed,
            rotate_speed,
        }
    }

    /// Advance every object by exactly one fixed step.
    ///
    /// Movement reads the held-key table only. Each axis contributes
    /// independently and additively — holding up and right moves the full
    /// `move_speed` on BOTH axes. The diagonal is deliberately not
    /// normalized.
    pub fn step(&mut self, input: &InputState) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.is_down(keys::UP) || input.is_down(keys::W) {
            dy += self.move_speed;
        }
        if input.is_down(keys::DOWN) || input.is_down(keys::S) {
            dy -= self.move_speed;
        }
        if input.is_down(keys::RIGHT) || input.is_down(keys::D) {
            dx += self.move_speed;
        }
        if input.is_down(keys::LEFT) || input.is_down(keys::A) {
            dx -= self.move_speed;
        }

        for (index, object) in self.objects.iter_mut().enumerate() {
            // Later objects spin faster: index-scaled rate, not per-object
            // configuration.
            object.rect.rotate += self.rotate_speed * (index as f32 + 1.0);
            object.rect.x += dx;
            object.rect.y += dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn two_rect_scene() -> Scene {
        let mut scene = Scene::new(DEFAULT_MOVE_SPEED, DEFAULT_ROTATE_SPEED);
        scene.objects = vec![
            RenderObject {
                rect: Rect {
                    x: -1.5,
                    y: 0.0,
                    width: 2.0,
                    height: 2.0,
                    rotate: 0.0,
                },
                color: [1.0, 1.0, 1.0, 1.0],
            },
            RenderObject {
                rect: Rect {
                    x: 1.5,
                    y: 0.0,
                    width: 1.5,
                    height: 1.5,
                    rotate: 0.0,
                },
                color: [1.0, 0.0, 0.0, 1.0],
            },
        ];
        scene
    }

    #[test]
    fn rotation_rate_scales_with_object_index() {
        let mut scene = two_rect_scene();
        let input = InputState::new();
        for _ in 0..100 {
            scene.step(&input);
        }
        assert!((scene.objects[0].rect.rotate - 0.5).abs() < EPS);
        assert!((scene.objects[1].rect.rotate - 1.0).abs() < EPS);
    }

    #[test]
    fn rotation_accumulates_from_initial_angle() {
        let mut scene = two_rect_scene();
        scene.objects[0].rect.rotate = 2.0;
        let input = InputState::new();
        for _ in 0..10 {
            scene.step(&input);
        }
        assert!((scene.objects[0].rect.rotate - (2.0 + 10.0 * 0.005)).abs() < EPS);
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let mut scene = two_rect_scene();
        let start = scene.objects[0].rect;
        let mut input = InputState::new();
        input.key_down(keys::UP);
        input.key_down(keys::RIGHT);
        scene.step(&input);
        assert!((scene.objects[0].rect.x - (start.x + DEFAULT_MOVE_SPEED)).abs() < EPS);
        assert!((scene.objects[0].rect.y - (start.y + DEFAULT_MOVE_SPEED)).abs() < EPS);
    }

    #[test]
    fn wasd_alternates_are_honored() {
        let mut scene = two_rect_scene();
        let start = scene.objects[1].rect;
        let mut input = InputState::new();
        input.key_down(keys::W);
        input.key_down(keys::A);
        scene.step(&input);
        assert!((scene.objects[1].rect.x - (start.x - DEFAULT_MOVE_SPEED)).abs() < EPS);
        assert!((scene.objects[1].rect.y - (start.y + DEFAULT_MOVE_SPEED)).abs() < EPS);
    }

    #[test]
    fn arrow_and_alternate_together_move_once() {
        let mut scene = two_rect_scene();
        let start = scene.objects[0].rect;
        let mut input = InputState::new();
        // Both codes for the same direction are an OR, not a sum.
        input.key_down(keys::UP);
        input.key_down(keys::W);
        scene.step(&input);
        assert!((scene.objects[0].rect.y - (start.y + DEFAULT_MOVE_SPEED)).abs() < EPS);
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut scene = two_rect_scene();
        let start = scene.objects[0].rect;
        let mut input = InputState::new();
        input.key_down(keys::UP);
        input.key_down(keys::DOWN);
        scene.step(&input);
        assert!((scene.objects[0].rect.y - start.y).abs() < EPS);
    }

    #[test]
    fn movement_applies_to_every_object() {
        let mut scene = two_rect_scene();
        let mut input = InputState::new();
        input.key_down(keys::RIGHT);
        scene.step(&input);
        assert!((scene.objects[0].rect.x - (-1.5 + DEFAULT_MOVE_SPEED)).abs() < EPS);
        assert!((scene.objects[1].rect.x - (1.5 + DEFAULT_MOVE_SPEED)).abs() < EPS);
    }

    #[test]
    fn color_is_untouched_by_stepping() {
        let mut scene = two_rect_scene();
        let input = InputState::new();
        for _ in 0..50 {
            scene.step(&input);
        }
        assert_eq!(scene.objects[0].color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(scene.objects[1].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn identical_input_sequences_are_deterministic() {
        let mut run_a = two_rect_scene();
        let mut run_b = two_rect_scene();

        let mut input = InputState::new();
        for step in 0..240 {
            if step == 30 {
                input.key_down(keys::RIGHT);
            }
            if step == 90 {
                input.key_up(keys::RIGHT);
                input.key_down(keys::UP);
            }
            if step == 180 {
                input.key_up(keys::UP);
            }
            run_a.step(&input);
        }

        let mut input = InputState::new();
        for step in 0..240 {
            if step == 30 {
                input.key_down(keys::RIGHT);
            }
            if step == 90 {
                input.key_up(keys::RIGHT);
                input.key_down(keys::UP);
            }
            if step == 180 {
                input.key_up(keys::UP);
            }
            run_b.step(&input);
        }

        for (a, b) in run_a.objects.iter().zip(&run_b.objects) {
            assert!((a.rect.x - b.rect.x).abs() < EPS);
            assert!((a.rect.y - b.rect.y).abs() < EPS);
            assert!((a.rect.rotate - b.rect.rotate).abs() < EPS);
        }
    }
}
