pub mod camera;
pub mod gpu_context;
pub mod quad_pipeline;
pub mod vertex;

pub use camera::{CameraUniform, Viewport, WorldSpace};
pub use gpu_context::GpuContext;
pub use quad_pipeline::{ObjectUniform, QuadPipeline, QUAD_VERTEX_COUNT};
pub use vertex::QuadVertex;
