use nalgebra::{Matrix4, Point3, Vector3};

/// 变换矩阵工厂，提供创建各种变换矩阵的静态方法
pub struct TransformFactory;

impl TransformFactory {
    /// 创建绕X轴旋转的变换矩阵
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        Matrix4::from_euler_angles(angle_rad, 0.0, 0.0)
    }

    /// 创建绕Y轴旋转的变换矩阵
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        Matrix4::from_euler_angles(0.0, angle_rad, 0.0)
    }

    /// 创建绕Z轴旋转的变换矩阵
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        Matrix4::from_euler_angles(0.0, 0.0, angle_rad)
    }

    /// 欧拉角组合旋转，组合顺序为 Rz(roll)·Rx(pitch)·Ry(yaw)，
    /// 即先偏航、再俯仰、最后翻滚
    pub fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Matrix4<f32> {
        Self::rotation_z(roll) * Self::rotation_x(pitch) * Self::rotation_y(yaw)
    }

    /// 创建平移矩阵
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
    }

    /// 创建视图矩阵 (左手系 lookAt，上方向固定为世界+Y)
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_lh(eye, target, &Vector3::y())
    }

    /// 创建透视投影矩阵 (右手系)
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect_ratio, fov_y_rad, near, far)
    }

    /// 由网格的旋转和位置构建世界矩阵（先旋转后平移）
    pub fn world(rotation: &Vector3<f32>, position: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation(position)
            * Self::rotation_yaw_pitch_roll(rotation.y, rotation.x, rotation.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_y_quarter_turn_maps_x_axis() {
        let m = TransformFactory::rotation_y(FRAC_PI_2);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn world_translates_after_rotating() {
        let world = TransformFactory::world(
            &Vector3::new(0.0, FRAC_PI_2, 0.0),
            &Vector3::new(5.0, 0.0, 0.0),
        );
        let p = world.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_keeps_forward_point_on_axis() {
        // 相机在原点看向+Z，轴上的点应保持在视线轴上
        let view = TransformFactory::view(&Point3::origin(), &Point3::new(0.0, 0.0, 1.0));
        let p = view.transform_point(&Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }
}
