use crate::geometry::transform::TransformFactory;
use crate::scene::Camera;
use nalgebra::{Matrix4, Point3};

/// 透视除法的|w|保护阈值，低于它的点视为退化
const W_EPSILON: f32 = 1e-8;

/// 投影器：构建视图/投影矩阵，并把模型空间顶点映射到屏幕空间。
/// 输出点的z分量携带透视除法后的深度值（供扫描线插值与深度测试），
/// 不是归一化到[0,1]的深度——相机平面之后或[near,far]之外的点会反号，
/// 这是继承自原始实现的已知局限。
pub struct Projector {
    pub width: usize,
    pub height: usize,
}

impl Projector {
    pub fn new(width: usize, height: usize) -> Self {
        Projector { width, height }
    }

    /// 标准左手系lookAt视图矩阵，上方向为世界+Y
    pub fn view_matrix(&self, camera: &Camera) -> Matrix4<f32> {
        TransformFactory::view(&camera.position, &camera.target)
    }

    /// 标准右手系透视投影矩阵，宽高比取自渲染目标
    pub fn projection_matrix(&self, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        let aspect = self.width as f32 / self.height as f32;
        TransformFactory::perspective(aspect, fov_y_rad, near, far)
    }

    /// 用组合矩阵变换顶点，做透视除法，再把NDC映射到像素空间：
    /// `x = ndc.x * width + width/2`，`y = -ndc.y * height + height/2`
    /// （光栅行向下增长而NDC的Y向上增长，故翻转Y）。
    /// 退化变换（|w|≈0）返回非有限坐标，由下游的像素边界检查吸收，
    /// 上游不做特殊分支。
    pub fn project(&self, vertex: &Point3<f32>, composite: &Matrix4<f32>) -> Point3<f32> {
        let clip = composite * vertex.to_homogeneous();
        if clip.w.abs() < W_EPSILON {
            return Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let width = self.width as f32;
        let height = self.height as f32;
        Point3::new(
            ndc_x * width + width / 2.0,
            -ndc_y * height + height / 2.0,
            depth,
        )
    }
}
