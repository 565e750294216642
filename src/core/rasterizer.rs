use crate::core::color::Color4;
use crate::core::frame_buffer::FrameBuffer;
use nalgebra::Point3;

/// 线性插值，梯度clamp到[0,1]以吸收端点行的舍入过冲
#[inline]
fn interpolate(min: f32, max: f32, gradient: f32) -> f32 {
    min + (max - min) * gradient.clamp(0.0, 1.0)
}

/// 沿一条边的归一化梯度；水平边（起止Y相同）定义为1
#[inline]
fn edge_gradient(y: f32, start_y: f32, end_y: f32) -> f32 {
    if start_y != end_y {
        (y - start_y) / (end_y - start_y)
    } else {
        1.0
    }
}

/// 处理一条扫描线：pa→pb为左边界边，pc→pd为右边界边。
/// 两个边界X与边界Z沿各自的边线性插值，跨度内的Z再做线性插值。
fn process_scan_line(
    fb: &FrameBuffer,
    y: i32,
    pa: &Point3<f32>,
    pb: &Point3<f32>,
    pc: &Point3<f32>,
    pd: &Point3<f32>,
    color: Color4,
) {
    let gradient1 = edge_gradient(y as f32, pa.y, pb.y);
    let gradient2 = edge_gradient(y as f32, pc.y, pd.y);

    let sx = interpolate(pa.x, pb.x, gradient1) as i32;
    let ex = interpolate(pc.x, pd.x, gradient2) as i32;

    // 两个边界重合（或反转）时视为零宽跨度，不产生像素
    if ex <= sx {
        return;
    }

    let z1 = interpolate(pa.z, pb.z, gradient1);
    let z2 = interpolate(pc.z, pd.z, gradient2);
    let inv_span = 1.0 / ((ex as f32) - (sx as f32));

    // X方向裁剪到缓冲区范围，梯度仍按原始跨度计算
    let x_begin = sx.max(0);
    let x_end = ex.min(fb.width as i32);
    for x in x_begin..x_end {
        let gradient = ((x as f32) - (sx as f32)) * inv_span;
        let z = interpolate(z1, z2, gradient);
        fb.put_pixel(x, y, z, color);
    }
}

/// 扫描线填充一个三角形，X边界与深度沿边线性插值，逐像素深度测试写入。
/// 产生平面填充轮廓，无抗锯齿、无子像素覆盖累积。
pub fn draw_triangle(
    fb: &FrameBuffer,
    p1: Point3<f32>,
    p2: Point3<f32>,
    p3: Point3<f32>,
    color: Color4,
) {
    // 退化投影产生的非有限坐标无法界定扫描范围，整个丢弃
    for p in [&p1, &p2, &p3] {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
    }

    // 按Y升序排序（三次比较交换）
    let (mut p1, mut p2, mut p3) = (p1, p2, p3);
    if p2.y < p1.y {
        std::mem::swap(&mut p2, &mut p1);
    }
    if p3.y < p2.y {
        std::mem::swap(&mut p2, &mut p3);
    }
    if p2.y < p1.y {
        std::mem::swap(&mut p2, &mut p1);
    }

    // 判定三角形手性：p2在p1→p3连线的右侧还是左侧。
    // 等价于比较p1→p2与p1→p3两条边的逆斜率，且对水平上边也能正确分类。
    let p2_on_right =
        (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y) > 0.0;

    // 扫描行裁剪到缓冲区范围
    let y_begin = (p1.y as i32).max(0);
    let y_end = (p3.y as i32).min(fb.height as i32 - 1);

    for y in y_begin..=y_end {
        if (y as f32) < p2.y {
            // 上半部分：p1.Y 到 p2.Y
            if p2_on_right {
                process_scan_line(fb, y, &p1, &p3, &p1, &p2, color);
            } else {
                process_scan_line(fb, y, &p1, &p2, &p1, &p3, color);
            }
        } else {
            // 下半部分：p2.Y 到 p3.Y
            if p2_on_right {
                process_scan_line(fb, y, &p1, &p3, &p2, &p3, color);
            } else {
                process_scan_line(fb, y, &p2, &p3, &p1, &p3, color);
            }
        }
    }
}

/// 整数Bresenham直线（线框模式），无深度测试
pub fn draw_line(fb: &FrameBuffer, p1: Point3<f32>, p2: Point3<f32>, color: Color4) {
    if !p1.x.is_finite() || !p1.y.is_finite() || !p2.x.is_finite() || !p2.y.is_finite() {
        return;
    }
    for_each_line_point(
        p1.x as i32,
        p1.y as i32,
        p2.x as i32,
        p2.y as i32,
        |x, y| fb.set_pixel(x, y, color),
    );
}

/// 绘制单个点（点云模式），越界由set_pixel的边界检查吸收
pub fn draw_point(fb: &FrameBuffer, p: Point3<f32>, color: Color4) {
    if !p.x.is_finite() || !p.y.is_finite() {
        return;
    }
    fb.set_pixel(p.x as i32, p.y as i32, color);
}

/// Bresenham核心：按顺序访问从(x0,y0)到(x1,y1)的每个整数点
fn for_each_line_point(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    // 误差项用i64累积，极端坐标差下不会回绕
    let dx = (i64::from(x1) - i64::from(x0)).abs();
    let dy = (i64::from(y1) - i64::from(y0)).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
