// io/mod.rs
// 网格文件输入
pub mod babylon_loader;
