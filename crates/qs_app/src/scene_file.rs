use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use qs_core::scene::{RenderObject, Scene, DEFAULT_MOVE_SPEED, DEFAULT_ROTATE_SPEED};
use qs_core::transform::Rect;

#[derive(Debug, Deserialize, Clone)]
pub struct SceneFile {
    pub version: String,
    pub scene_id: String,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f64; 4],
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
    pub rects: Vec<SceneRect>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WorldConfig {
    #[serde(default = "default_world_width")]
    pub width: f32,
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    #[serde(default)]
    pub center: [f32; 2],
    #[serde(default)]
    pub viewport_offset: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_width(),
            camera_distance: default_camera_distance(),
            center: [0.0, 0.0],
            viewport_offset: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneRect {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotate: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
}

impl SceneFile {
    /// The scene the binary falls back to when no file loads: the classic
    /// two-rect layout on a teal clear.
    pub fn built_in_default() -> Self {
        Self {
            version: "0.1".to_string(),
            scene_id: "built-in-default".to_string(),
            world: WorldConfig::default(),
            clear_color: [0.0, 0.5, 0.75, 1.0],
            move_speed: DEFAULT_MOVE_SPEED,
            rotate_speed: DEFAULT_ROTATE_SPEED,
            rects: vec![
                SceneRect {
                    id: "white".to_string(),
                    x: -1.5,
                    y: 0.0,
                    width: 2.0,
                    height: 2.0,
                    rotate: 0.2,
                    color: [1.0, 1.0, 1.0, 1.0],
                },
                SceneRect {
                    id: "red".to_string(),
                    x: 1.5,
                    y: 0.0,
                    width: 1.5,
                    height: 1.5,
                    rotate: 0.0,
                    color: [1.0, 0.0, 0.0, 1.0],
                },
            ],
        }
    }

    pub fn build_scene(&self) -> Scene {
        let mut scene = Scene::new(self.move_speed, self.rotate_speed);
        scene.objects = self
            .rects
            .iter()
            .map(|r| RenderObject {
                rect: Rect {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                    rotate: r.rotate,
                },
                color: r.color,
            })
            .collect();
        scene
    }
}

/// Mtime poller for frame-boundary hot reload.
pub struct SceneWatcher {
    scene_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl SceneWatcher {
    pub fn new(scene_path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&scene_path);
        Self {
            scene_path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.scene_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

pub fn load_scene_from_path(scene_path: &Path) -> Result<SceneFile, String> {
    let raw = fs::read_to_string(scene_path)
        .map_err(|e| format!("Failed to read scene file {}: {e}", scene_path.display()))?;
    let scene: SceneFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse scene JSON {}: {e}", scene_path.display()))?;
    validate_scene(&scene)?;
    Ok(scene)
}

fn validate_scene(scene: &SceneFile) -> Result<(), String> {
    if scene.world.width <= 0.0 {
        return Err("Scene validation failed: world.width must be > 0".to_string());
    }
    if scene.world.camera_distance <= 0.0 {
        return Err("Scene validation failed: world.camera_distance must be > 0".to_string());
    }
    if scene.rects.is_empty() {
        log::warn!(
            "Scene '{}' has no rects; only the clear color will be visible.",
            scene.scene_id
        );
    }

    let mut rect_ids = HashSet::new();
    for rect in &scene.rects {
        if !rect_ids.insert(rect.id.clone()) {
            return Err(format!(
                "Scene validation failed: duplicate rect id '{}'",
                rect.id
            ));
        }
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(format!(
                "Scene validation failed: rect '{}' must have positive extents",
                rect.id
            ));
        }
    }
    Ok(())
}

fn default_clear_color() -> [f64; 4] {
    [0.0, 0.5, 0.75, 1.0]
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_move_speed() -> f32 {
    DEFAULT_MOVE_SPEED
}

fn default_rotate_speed() -> f32 {
    DEFAULT_ROTATE_SPEED
}

const fn default_world_width() -> f32 {
    20.0
}

const fn default_camera_distance() -> f32 {
    10.0
}
