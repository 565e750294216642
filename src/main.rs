use clap::{Parser, ValueEnum};
use log::info;
use nalgebra::Point3;

use softengine::core::color::Color4;
use softengine::core::frame_buffer::PresentTarget;
use softengine::core::renderer::{RenderConfig, RenderMode, Renderer};
use softengine::io::babylon_loader::load_babylon;
use softengine::scene::{Camera, Mesh};

/// CPU软件光栅化渲染器演示程序
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// .babylon网格文件路径；缺省使用内建立方体
    #[arg(long)]
    mesh: Option<String>,

    /// 渲染目标宽度
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// 渲染目标高度
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// 渲染模式
    #[arg(long, value_enum, default_value = "filled")]
    mode: ModeArg,

    /// 推进旋转动画的帧数（每帧绕Y轴加0.01弧度）
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// 输出PNG路径（保存最后一帧）
    #[arg(long, default_value = "render.png")]
    output: String,

    /// 相机位置，格式 "x,y,z"
    #[arg(long, default_value = "0,0,10")]
    camera_from: String,

    /// 相机目标，格式 "x,y,z"
    #[arg(long, default_value = "0,0,0")]
    camera_at: String,

    /// 禁用并行逐面分发，改为串行渲染
    #[arg(long)]
    serial: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Points,
    Wireframe,
    Filled,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Points => RenderMode::Points,
            ModeArg::Wireframe => RenderMode::Wireframe,
            ModeArg::Filled => RenderMode::Filled,
        }
    }
}

/// 解析 "x,y,z" 格式的点
fn parse_point3(s: &str) -> Result<Point3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("无效的坐标格式: '{s}' (期望 \"x,y,z\")"));
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse()
            .map_err(|e| format!("无效的坐标分量 '{part}': {e}"))?;
    }
    Ok(Point3::new(values[0], values[1], values[2]))
}

/// 离屏呈现表面：接收颜色平面并保留副本，最后一帧转存为PNG
struct ImageTarget {
    width: usize,
    height: usize,
    plane: Vec<u8>,
}

impl ImageTarget {
    fn new(width: usize, height: usize) -> Self {
        ImageTarget {
            width,
            height,
            plane: vec![0; width * height * 4],
        }
    }

    /// 颜色平面是BGRA字节序，PNG需要RGBA
    fn to_rgba(&self) -> Vec<u8> {
        self.plane
            .chunks_exact(4)
            .flat_map(|bgra| [bgra[2], bgra[1], bgra[0], bgra[3]])
            .collect()
    }
}

impl PresentTarget for ImageTarget {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_color_plane(&mut self, bytes: &[u8]) {
        self.plane.copy_from_slice(bytes);
    }
}

fn save_image(path: &str, target: &ImageTarget) -> Result<(), String> {
    image::save_buffer(
        path,
        &target.to_rgba(),
        target.width as u32,
        target.height as u32,
        image::ColorType::Rgba8,
    )
    .map_err(|e| format!("保存图像到 {path} 失败: {e}"))?;
    info!("图像已保存到 {path}");
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    let mut meshes = match &args.mesh {
        Some(path) => load_babylon(path).map_err(|e| e.to_string())?,
        None => vec![Mesh::cube()],
    };

    let camera = Camera::new(
        parse_point3(&args.camera_from)?,
        parse_point3(&args.camera_at)?,
    );
    let renderer = Renderer::new(args.width, args.height);
    let config = RenderConfig::default()
        .with_mode(args.mode.into())
        .with_parallel(!args.serial);
    let clear_color = Color4::new(0.0, 0.0, 0.0, 1.0);
    let mut target = ImageTarget::new(args.width, args.height);

    // 帧驱动：清屏 → 推进网格旋转（外部动画步骤）→ 渲染 → 呈现
    for frame in 0..args.frames.max(1) {
        renderer.frame_buffer.clear(clear_color);
        for mesh in &mut meshes {
            mesh.rotation.y += 0.01;
        }
        renderer
            .render(&camera, &meshes, &config)
            .map_err(|e| e.to_string())?;
        renderer.frame_buffer.present(&mut target);
        log::debug!("第 {frame} 帧完成");
    }

    save_image(&args.output, &target)
}
