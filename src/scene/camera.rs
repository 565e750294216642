use nalgebra::Point3;

/// 相机：眼睛位置与观察目标。
/// 不存储上方向，上方向固定为世界+Y轴。
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// 相机位置（眼睛位置）
    pub position: Point3<f32>,
    /// 相机观察点（目标位置）
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>, target: Point3<f32>) -> Self {
        Camera { position, target }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Point3::new(0.0, 0.0, 10.0),
            target: Point3::origin(),
        }
    }
}
