use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// 三角面：三个顶点在网格顶点数组中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Face { a, b, c }
    }
}

/// 多边形网格：顶点列表 + 三角面索引 + 位置与欧拉旋转。
/// 旋转只由宿主的动画步骤在两帧之间推进，光栅化期间不可变。
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face>,
    /// 世界空间位置
    pub position: Vector3<f32>,
    /// 欧拉角 (x=俯仰, y=偏航, z=翻滚)，弧度
    pub rotation: Vector3<f32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Point3<f32>>, faces: Vec<Face>) -> Self {
        Mesh {
            name: name.into(),
            vertices,
            faces,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }

    /// 校验所有面索引都落在顶点数组范围内。
    /// 越界是数据完整性故障，渲染前快速失败，绝不越界读取。
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            for vertex in [face.a, face.b, face.c] {
                if vertex >= vertex_count {
                    return Err(Error::MeshIntegrity {
                        mesh: self.name.clone(),
                        face: i,
                        vertex,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// 内建的8顶点单位立方体（默认演示模型）
    pub fn cube() -> Self {
        let vertices = vec![
            Point3::new(-1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, -1.0, -1.0),
        ];
        let faces = vec![
            Face::new(0, 1, 2),
            Face::new(1, 2, 3),
            Face::new(1, 3, 6),
            Face::new(1, 5, 6),
            Face::new(0, 1, 4),
            Face::new(1, 4, 5),
            Face::new(2, 3, 7),
            Face::new(3, 6, 7),
            Face::new(0, 2, 7),
            Face::new(0, 4, 7),
            Face::new(4, 5, 6),
            Face::new(4, 6, 7),
        ];
        Mesh::new("Cube", vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_eight_vertices_and_twelve_faces() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 12);
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn out_of_range_face_index_is_rejected() {
        let mesh = Mesh::new(
            "broken",
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            vec![Face::new(0, 1, 2)],
        );
        match mesh.validate() {
            Err(Error::MeshIntegrity {
                face,
                vertex,
                vertex_count,
                ..
            }) => {
                assert_eq!(face, 0);
                assert_eq!(vertex, 2);
                assert_eq!(vertex_count, 2);
            }
            other => panic!("期望MeshIntegrity错误, 得到 {other:?}"),
        }
    }
}
