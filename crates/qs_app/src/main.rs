//! quadspin -- fixed-timestep rectangle spinner, main loop and entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame(now)` -- measure wall-clock delta, feed the accumulator
//!   2. `while should_step()` -- consume fixed-dt slices for deterministic
//!      simulation; keyboard movement and rotation advance here
//!   3. one render pass -- clear, set the inset viewport, draw every rect
//!
//! Keyboard events are delivered on the same thread between frames and only
//! flip entries in the input table; the scene JSON is hot-reloaded at frame
//! boundaries via mtime polling or the R key.

mod scene_file;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use qs_core::input::{keys, InputState};
use qs_core::scene::Scene;
use qs_core::time::TimeState;
use qs_platform::window::PlatformConfig;
use qs_render::{
    GpuContext, ObjectUniform, QuadPipeline, Viewport, WorldSpace, QUAD_VERTEX_COUNT,
};
use scene_file::{load_scene_from_path, SceneFile, SceneWatcher};

const SCENE_PATH: &str = "assets/scenes/default.json";
const FPS_LOG_INTERVAL_FRAMES: u64 = 600;

/// GPU residency for one scene object: its uniform buffer and bind group.
/// Kept index-aligned with `Scene::objects`.
struct ObjectGpu {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    pipeline: QuadPipeline,
    /// Origin for scheduler timestamps fed to the accumulator.
    epoch: Instant,

    scene_path: PathBuf,
    scene_watcher: SceneWatcher,
    scene_file: SceneFile,
    scene: Scene,
    clear_color: wgpu::Color,
    paused: bool,

    viewport: Viewport,
    world: WorldSpace,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    objects_gpu: Vec<ObjectGpu>,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        use wgpu::util::DeviceExt;

        let gpu = GpuContext::new(window.clone())
            .unwrap_or_else(|err| panic!("Failed to initialize GPU context: {err}"));
        let time = TimeState::new();
        let input = InputState::new();
        let pipeline = QuadPipeline::new(&gpu.device, gpu.surface_format);

        let scene_path = PathBuf::from(SCENE_PATH);
        let scene_watcher = SceneWatcher::new(scene_path.clone());
        let scene_file = match load_scene_from_path(&scene_path) {
            Ok(file) => {
                log::info!("Scene loaded: {} ({})", file.scene_id, file.version);
                file
            }
            Err(err) => {
                log::error!("{err}; falling back to the built-in scene");
                SceneFile::built_in_default()
            }
        };
        let scene = scene_file.build_scene();
        let clear_color = clear_color_of(&scene_file);

        let viewport = Viewport::inset(gpu.size.0, gpu.size.1, scene_file.world.viewport_offset);
        let world = WorldSpace::new(
            scene_file.world.width,
            Vec2::from_array(scene_file.world.center),
            scene_file.world.camera_distance,
            &viewport,
        );

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("camera_uniform"),
                contents: bytemuck::bytes_of(&world.build_uniform()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let objects_gpu = build_object_bindings(&gpu.device, &pipeline, &scene);

        Self {
            window,
            gpu,
            time,
            input,
            pipeline,
            epoch: Instant::now(),
            scene_path,
            scene_watcher,
            scene_file,
            scene,
            clear_color,
            paused: false,
            viewport,
            world,
            camera_buffer,
            camera_bind_group,
            objects_gpu,
        }
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Viewport, world space, and the camera uniform change together; a
    /// partial update would break the projection.
    fn rebuild_projection(&mut self) {
        self.viewport = Viewport::inset(
            self.gpu.size.0,
            self.gpu.size.1,
            self.scene_file.world.viewport_offset,
        );
        self.world = WorldSpace::new(
            self.scene_file.world.width,
            Vec2::from_array(self.scene_file.world.center),
            self.scene_file.world.camera_distance,
            &self.viewport,
        );
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.world.build_uniform()),
        );
    }

    fn reload_scene(&mut self, reason: &str) {
        match load_scene_from_path(&self.scene_path) {
            Ok(file) => {
                self.scene = file.build_scene();
                self.clear_color = clear_color_of(&file);
                self.scene_file = file;
                self.rebuild_projection();
                self.objects_gpu =
                    build_object_bindings(&self.gpu.device, &self.pipeline, &self.scene);
                log::info!(
                    "Scene reloaded ({reason}): {} ({})",
                    self.scene_file.scene_id,
                    self.scene_file.version
                );
            }
            Err(err) => {
                // Keep running the previous scene.
                log::error!("Scene reload failed ({reason}): {err}");
            }
        }
    }

    fn render(&self) {
        for (object, gpu_object) in self.scene.objects.iter().zip(&self.objects_gpu) {
            let uniform = ObjectUniform {
                model: object.rect.model_matrix().to_cols_array_2d(),
                color: object.color,
            };
            self.gpu
                .queue
                .write_buffer(&gpu_object.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_viewport(
                self.viewport.offset_x as f32,
                self.viewport.offset_y as f32,
                self.viewport.width as f32,
                self.viewport.height as f32,
                0.0,
                1.0,
            );
            render_pass.set_pipeline(&self.pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.pipeline.vertex_buffer.slice(..));

            // List order is draw order; later rects paint over earlier ones.
            for gpu_object in &self.objects_gpu {
                render_pass.set_bind_group(1, &gpu_object.bind_group, &[]);
                render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn build_object_bindings(
    device: &wgpu::Device,
    pipeline: &QuadPipeline,
    scene: &Scene,
) -> Vec<ObjectGpu> {
    scene
        .objects
        .iter()
        .map(|_| {
            let uniform_buffer = pipeline.create_object_uniform_buffer(device);
            let bind_group = pipeline.create_object_bind_group(device, &uniform_buffer);
            ObjectGpu {
                uniform_buffer,
                bind_group,
            }
        })
        .collect()
}

fn clear_color_of(file: &SceneFile) -> wgpu::Color {
    wgpu::Color {
        r: file.clear_color[0],
        g: file.clear_color[1],
        b: file.clear_color[2],
        a: file.clear_color[3],
    }
}

fn map_key(key_code: KeyCode) -> Option<usize> {
    match key_code {
        KeyCode::ArrowLeft => Some(keys::LEFT),
        KeyCode::ArrowRight => Some(keys::RIGHT),
        KeyCode::ArrowUp => Some(keys::UP),
        KeyCode::ArrowDown => Some(keys::DOWN),
        KeyCode::Escape => Some(keys::ESCAPE),
        KeyCode::Space => Some(keys::SPACE),
        KeyCode::KeyW => Some(keys::W),
        KeyCode::KeyA => Some(keys::A),
        KeyCode::KeyS => Some(keys::S),
        KeyCode::KeyD => Some(keys::D),
        KeyCode::KeyP => Some(keys::P),
        KeyCode::KeyR => Some(keys::R),
        _ => None,
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = qs_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.time.alive {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.time.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.rebuild_projection();
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(code) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(code),
                            ElementState::Released => state.input.key_up(code),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !state.time.alive {
                    return;
                }
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                let now = state.now_ms();
                state.time.begin_frame(now);

                while state.time.should_step() {
                    // Edge-triggered commands fire on the first step of the
                    // frame only; the edges stay armed until end_frame so a
                    // press is never lost to a zero-step frame.
                    if state.time.steps_this_frame == 1 {
                        if state.input.is_just_pressed(keys::ESCAPE) {
                            state.time.stop();
                            event_loop.exit();
                            return;
                        }
                        if state.input.is_just_pressed(keys::P) {
                            state.paused = !state.paused;
                            log::info!(
                                "Simulation {}",
                                if state.paused { "PAUSED" } else { "RESUMED" }
                            );
                        }
                        if state.input.is_just_pressed(keys::R) {
                            state.reload_scene("manual trigger (R)");
                        } else if state.scene_watcher.should_reload() {
                            state.reload_scene("file watcher");
                        }
                    }

                    // The accumulator keeps draining while paused so that
                    // unpausing does not replay the wait as a burst of steps.
                    if !state.paused {
                        state.scene.step(&state.input);
                    }
                }

                // Exactly one draw per callback, however many steps ran.
                state.render();

                // Only clear edge-triggered input after at least one fixed
                // step consumed it. Otherwise a press that lands on a frame
                // with 0 simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }

                if state.time.frame_count % FPS_LOG_INTERVAL_FRAMES == 0 {
                    log::debug!(
                        "{:.1} fps ({:.2} ms/frame)",
                        state.time.smoothed_fps,
                        state.time.smoothed_frame_time_ms
                    );
                }
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("quadspin starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
