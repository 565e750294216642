use crate::core::color::Color4;
use crate::core::frame_buffer::FrameBuffer;
use crate::core::projector::Projector;
use crate::core::rasterizer;
use crate::error::Result;
use crate::geometry::transform::TransformFactory;
use crate::scene::{Camera, Face, Mesh};
use log::{debug, info};
use nalgebra::Matrix4;
use rayon::prelude::*;
use std::time::Instant;

/// 渲染模式。历史沿革中的三个互斥变体，统一为一个枚举而非三条并行代码路径。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// 仅投影顶点并绘制单色点，不需要面信息
    Points,
    /// 每个面投影三个顶点并绘制三条边，无深度测试
    Wireframe,
    /// 扫描线填充 + Z-Buffer深度测试（规范模式）
    #[default]
    Filled,
}

/// 渲染配置，纯数据结构，Default + 链式构建器
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// 垂直视场角（弧度）
    pub fov_y: f32,
    /// 近裁剪平面距离
    pub near: f32,
    /// 远裁剪平面距离
    pub far: f32,
    /// 是否把逐面工作分发到rayon线程池
    pub parallel: bool,
    /// 点云与线框模式使用的描边颜色
    pub stroke_color: Color4,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            mode: RenderMode::default(),
            fov_y: 0.78,
            near: 0.01,
            far: 1.0,
            parallel: true,
            stroke_color: Color4::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

impl RenderConfig {
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_frustum(mut self, fov_y_rad: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y_rad;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_stroke_color(mut self, color: Color4) -> Self {
        self.stroke_color = color;
        self
    }
}

/// 逐面平面着色：面索引到灰度的单调映射，用于在无光照模型时区分相邻面
#[inline]
fn face_shade(face_index: usize, face_count: usize) -> Color4 {
    let t = face_index as f32 / face_count.max(1) as f32;
    Color4::grey((155.0 + 100.0 * t) / 255.0)
}

/// 渲染器编排：每帧构建一次视图/投影矩阵，逐网格构建组合矩阵，
/// 再把逐面的投影+填充工作按配置串行或并行分发。
/// 自身不持有帧间状态，同一帧内可安全重入（模—共享的FrameBuffer除外）。
pub struct Renderer {
    pub frame_buffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Renderer {
            frame_buffer: FrameBuffer::new(width, height),
        }
    }

    /// 渲染一帧。返回时所有已分发的面都已完成（rayon的for_each是同步屏障），
    /// 调用者可以立即present。
    ///
    /// 面索引越界在写入任何像素之前快速失败，帧缓冲保持原状。
    pub fn render(&self, camera: &Camera, meshes: &[Mesh], config: &RenderConfig) -> Result<()> {
        let start = Instant::now();

        for mesh in meshes {
            mesh.validate()?;
        }

        let projector = Projector::new(self.frame_buffer.width, self.frame_buffer.height);
        let view = projector.view_matrix(camera);
        let projection = projector.projection_matrix(config.fov_y, config.near, config.far);

        for mesh in meshes {
            let world = TransformFactory::world(&mesh.rotation, &mesh.position);
            let composite = projection * view * world;
            self.render_mesh(mesh, &projector, &composite, config);
            debug!("网格 '{}' 渲染完毕 ({} 个面)", mesh.name, mesh.faces.len());
        }

        info!(
            "渲染完成: {} 个网格, 模式 {:?}, 耗时 {:?}",
            meshes.len(),
            config.mode,
            start.elapsed()
        );
        Ok(())
    }

    fn render_mesh(
        &self,
        mesh: &Mesh,
        projector: &Projector,
        composite: &Matrix4<f32>,
        config: &RenderConfig,
    ) {
        let fb = &self.frame_buffer;

        match config.mode {
            RenderMode::Points => {
                let plot = |vertex: &nalgebra::Point3<f32>| {
                    let p = projector.project(vertex, composite);
                    rasterizer::draw_point(fb, p, config.stroke_color);
                };
                if config.parallel {
                    mesh.vertices.par_iter().for_each(plot);
                } else {
                    mesh.vertices.iter().for_each(plot);
                }
            }
            RenderMode::Wireframe => {
                let draw_edges = |face: &Face| {
                    let a = projector.project(&mesh.vertices[face.a], composite);
                    let b = projector.project(&mesh.vertices[face.b], composite);
                    let c = projector.project(&mesh.vertices[face.c], composite);
                    rasterizer::draw_line(fb, a, b, config.stroke_color);
                    rasterizer::draw_line(fb, b, c, config.stroke_color);
                    rasterizer::draw_line(fb, c, a, config.stroke_color);
                };
                if config.parallel {
                    mesh.faces.par_iter().for_each(draw_edges);
                } else {
                    mesh.faces.iter().for_each(draw_edges);
                }
            }
            RenderMode::Filled => {
                let face_count = mesh.faces.len();
                let fill = |(index, face): (usize, &Face)| {
                    let a = projector.project(&mesh.vertices[face.a], composite);
                    let b = projector.project(&mesh.vertices[face.b], composite);
                    let c = projector.project(&mesh.vertices[face.c], composite);
                    rasterizer::draw_triangle(fb, a, b, c, face_shade(index, face_count));
                };
                if config.parallel {
                    mesh.faces.par_iter().enumerate().for_each(fill);
                } else {
                    mesh.faces.iter().enumerate().for_each(fill);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use nalgebra::{Point3, Vector3};

    const CLEAR: Color4 = Color4::new(0.0, 0.0, 0.0, 1.0);

    fn test_camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 10.0), Point3::origin())
    }

    #[test]
    fn cube_render_stays_in_projected_bounds_with_expected_shades() {
        let renderer = Renderer::new(640, 480);
        renderer.frame_buffer.clear(CLEAR);

        let cube = Mesh::cube();
        let camera = test_camera();
        let config = RenderConfig::default();
        renderer.render(&camera, &[cube.clone()], &config).unwrap();

        // 用同一套矩阵投影8个角点，得到立方体的屏幕空间包围盒
        let projector = Projector::new(640, 480);
        let view = projector.view_matrix(&camera);
        let projection = projector.projection_matrix(config.fov_y, config.near, config.far);
        let composite = projection * view;

        let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for vertex in &cube.vertices {
            let p = projector.project(vertex, &composite);
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let clear = CLEAR.to_bgra_bytes();
        let mut drawn = 0usize;
        for y in 0..480usize {
            for x in 0..640usize {
                let [b, g, r, a] = renderer.frame_buffer.pixel_color(x, y).unwrap();
                if [b, g, r, a] == clear {
                    continue;
                }
                drawn += 1;
                // 面索引着色产生的灰度范围
                assert_eq!(r, g);
                assert_eq!(g, b);
                assert!((155..=255).contains(&r), "灰度越界: {r}");
                assert_eq!(a, 255);
                // 绘制的像素不得超出投影包围盒（留1像素舍入余量）
                assert!(
                    (x as f32) >= min_x - 1.0 && (x as f32) <= max_x + 1.0,
                    "像素({x},{y})超出X包围盒"
                );
                assert!(
                    (y as f32) >= min_y - 1.0 && (y as f32) <= max_y + 1.0,
                    "像素({x},{y})超出Y包围盒"
                );
            }
        }
        assert!(drawn > 0, "立方体应当覆盖至少一个像素");
    }

    #[test]
    fn parallel_and_serial_render_identical_single_face() {
        let mesh = Mesh::new(
            "tri",
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Face::new(0, 1, 2)],
        );
        let camera = test_camera();

        let render_with = |parallel: bool| {
            let renderer = Renderer::new(64, 64);
            renderer.frame_buffer.clear(CLEAR);
            let config = RenderConfig::default().with_parallel(parallel);
            renderer.render(&camera, &[mesh.clone()], &config).unwrap();
            renderer.frame_buffer.color_buffer_bytes()
        };

        assert_eq!(render_with(true), render_with(false));
    }

    #[test]
    fn invalid_face_fails_fast_without_touching_pixels() {
        let renderer = Renderer::new(32, 32);
        renderer.frame_buffer.clear(CLEAR);

        let broken = Mesh::new(
            "broken",
            vec![Point3::origin()],
            vec![Face::new(0, 0, 7)],
        );
        let result = renderer.render(&test_camera(), &[broken], &RenderConfig::default());
        assert!(matches!(result, Err(Error::MeshIntegrity { .. })));

        let clear = CLEAR.to_bgra_bytes();
        for pixel in renderer.frame_buffer.color_buffer_bytes().chunks_exact(4) {
            assert_eq!(pixel, clear);
        }
    }

    #[test]
    fn wireframe_mode_uses_stroke_color_only() {
        let renderer = Renderer::new(128, 128);
        renderer.frame_buffer.clear(CLEAR);
        let config = RenderConfig::default().with_mode(RenderMode::Wireframe);
        renderer
            .render(&test_camera(), &[Mesh::cube()], &config)
            .unwrap();

        let clear = CLEAR.to_bgra_bytes();
        let stroke = config.stroke_color.to_bgra_bytes();
        let mut drawn = 0usize;
        for pixel in renderer.frame_buffer.color_buffer_bytes().chunks_exact(4) {
            if pixel != clear {
                assert_eq!(pixel, stroke);
                drawn += 1;
            }
        }
        assert!(drawn > 0);
    }

    #[test]
    fn points_mode_plots_at_most_one_pixel_per_vertex() {
        let renderer = Renderer::new(128, 128);
        renderer.frame_buffer.clear(CLEAR);
        let config = RenderConfig::default().with_mode(RenderMode::Points);
        let cube = Mesh::cube();
        renderer.render(&test_camera(), &[cube.clone()], &config).unwrap();

        let clear = CLEAR.to_bgra_bytes();
        let drawn = renderer
            .frame_buffer
            .color_buffer_bytes()
            .chunks_exact(4)
            .filter(|pixel| *pixel != clear)
            .count();
        assert!(drawn > 0);
        assert!(drawn <= cube.vertices.len());
    }

    #[test]
    fn rotated_mesh_renders_without_error() {
        let renderer = Renderer::new(64, 64);
        renderer.frame_buffer.clear(CLEAR);
        let mut cube = Mesh::cube();
        cube.rotation = Vector3::new(0.3, 0.8, 0.1);
        cube.position = Vector3::new(0.5, 0.0, 0.0);
        renderer
            .render(&test_camera(), &[cube], &RenderConfig::default())
            .unwrap();
    }
}
