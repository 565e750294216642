use thiserror::Error;

/// 引擎统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("网格文件解析错误: {0}")]
    MeshParse(#[from] serde_json::Error),

    #[error("不支持的uvCount: {0} (只允许 0, 1, 2)")]
    UnsupportedUvCount(u32),

    #[error("网格 '{mesh}' 数据损坏: 面 {face} 引用了顶点 {vertex}, 但只有 {vertex_count} 个顶点")]
    MeshIntegrity {
        mesh: String,
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
