use crate::error::{Error, Result};
use crate::scene::{Face, Mesh};
use log::info;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// .babylon文件的顶层结构（只消费网格数组，其余字段忽略）
#[derive(Debug, Deserialize)]
struct BabylonFile {
    #[serde(default)]
    meshes: Vec<BabylonMesh>,
}

#[derive(Debug, Deserialize)]
struct BabylonMesh {
    #[serde(default)]
    name: String,
    /// 扁平的顶点属性序列，步长由uvCount决定
    vertices: Vec<f32>,
    /// 扁平的索引序列，每3个构成一个三角面
    indices: Vec<u32>,
    #[serde(rename = "uvCount", default)]
    uv_count: u32,
    #[serde(default)]
    position: [f32; 3],
}

/// 根据uvCount确定每顶点的浮点数步长：
/// 0 → 6 (位置+法线)，1 → 8 (+一组UV)，2 → 10 (+两组UV)
fn vertex_stride(uv_count: u32) -> Result<usize> {
    match uv_count {
        0 => Ok(6),
        1 => Ok(8),
        2 => Ok(10),
        other => Err(Error::UnsupportedUvCount(other)),
    }
}

fn build_mesh(raw: BabylonMesh) -> Result<Mesh> {
    let stride = vertex_stride(raw.uv_count)?;
    let vertex_count = raw.vertices.len() / stride;

    // 每个步长只消费前3个浮点数 (x, y, z)，法线与UV对本引擎无意义
    let vertices = (0..vertex_count)
        .map(|i| {
            let base = i * stride;
            Point3::new(
                raw.vertices[base],
                raw.vertices[base + 1],
                raw.vertices[base + 2],
            )
        })
        .collect();

    let faces = raw
        .indices
        .chunks_exact(3)
        .map(|idx| Face::new(idx[0] as usize, idx[1] as usize, idx[2] as usize))
        .collect();

    let mut mesh = Mesh::new(raw.name, vertices, faces);
    mesh.position = Vector3::new(raw.position[0], raw.position[1], raw.position[2]);
    mesh.validate()?;
    Ok(mesh)
}

/// 从JSON文本解析网格集合，索引越界在此处即告失败
pub fn parse_babylon(json: &str) -> Result<Vec<Mesh>> {
    let file: BabylonFile = serde_json::from_str(json)?;
    file.meshes.into_iter().map(build_mesh).collect()
}

/// 从.babylon文件加载网格集合
pub fn load_babylon(path: impl AsRef<Path>) -> Result<Vec<Mesh>> {
    let json = fs::read_to_string(&path)?;
    let meshes = parse_babylon(&json)?;
    info!(
        "从 {} 加载了 {} 个网格",
        path.as_ref().display(),
        meshes.len()
    );
    Ok(meshes)
}
