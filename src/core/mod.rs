pub mod color;
pub mod frame_buffer;
pub mod projector;
pub mod rasterizer;
pub mod renderer;
