use crate::core::color::{Color4, bgra_word_to_bytes};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// 外部呈现表面：拥有可显示的像素缓冲，每帧接收完整颜色平面。
/// 引擎只消费该能力，不定义任何窗口或合成器细节。
pub trait PresentTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// 接收整个颜色平面，每像素4字节，通道顺序 B,G,R,A
    fn write_color_plane(&mut self, bytes: &[u8]);
}

/// 帧缓冲区：颜色平面与深度平面，按 `y * width + x` 索引。
///
/// 每个像素物理上是一个打包的原子字：高32位为单调深度键，低32位为BGRA颜色。
/// 深度测试和颜色写入因此是同一次原子读-改-写，多个三角形并发命中同一像素时
/// 不会出现深度与颜色不一致的撕裂写入，"更近者胜"的结果与处理顺序无关。
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pixels: Vec<AtomicU64>,
}

/// 将f32深度映射为保序的u32键（键的整数序与浮点数值序一致，负值也正确排序）
#[inline]
fn depth_key(z: f32) -> u32 {
    let bits = z.to_bits();
    if bits & 0x8000_0000 != 0 {
        !bits
    } else {
        bits | 0x8000_0000
    }
}

/// depth_key的逆映射
#[inline]
fn key_depth(key: u32) -> f32 {
    if key & 0x8000_0000 != 0 {
        f32::from_bits(key & 0x7fff_ffff)
    } else {
        f32::from_bits(!key)
    }
}

#[inline]
fn pack(key: u32, bgra: u32) -> u64 {
    (u64::from(key) << 32) | u64::from(bgra)
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let pixels = (0..width * height)
            .map(|_| AtomicU64::new(pack(depth_key(f32::INFINITY), 0)))
            .collect();
        FrameBuffer {
            width,
            height,
            pixels,
        }
    }

    /// 将每个像素重置为给定颜色，深度平面重置为+∞哨兵
    /// （"尚未绘制任何东西，一切都比这更远"）
    pub fn clear(&self, color: Color4) {
        let word = pack(depth_key(f32::INFINITY), color.to_bgra_word());
        self.pixels.par_iter().for_each(|pixel| {
            pixel.store(word, Ordering::Relaxed);
        });
    }

    /// 深度测试写入。越界坐标与非有限深度直接丢弃；
    /// 若该像素已存的深度严格更近则丢弃，否则同时覆盖深度与颜色。
    pub fn put_pixel(&self, x: i32, y: i32, z: f32, color: Color4) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        if !z.is_finite() {
            return;
        }

        let new_key = depth_key(z);
        let new_word = pack(new_key, color.to_bgra_word());
        let pixel = &self.pixels[y as usize * self.width + x as usize];

        // CAS循环：已存深度严格更近时放弃，否则整字替换
        let _ = pixel.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            if ((current >> 32) as u32) < new_key {
                None
            } else {
                Some(new_word)
            }
        });
    }

    /// 无深度测试的写入（点云与线框模式使用）。
    /// 存入最近的深度键，保持打包字始终自洽。
    pub fn set_pixel(&self, x: i32, y: i32, color: Color4) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let word = pack(depth_key(f32::NEG_INFINITY), color.to_bgra_word());
        self.pixels[y as usize * self.width + x as usize].store(word, Ordering::Relaxed);
    }

    /// 将完整颜色平面交给外部呈现表面
    pub fn present(&self, target: &mut dyn PresentTarget) {
        target.write_color_plane(&self.color_buffer_bytes());
    }

    /// 获取颜色平面快照，每像素4字节 (B,G,R,A)
    pub fn color_buffer_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            let word = pixel.load(Ordering::Relaxed);
            bytes.extend_from_slice(&bgra_word_to_bytes(word as u32));
        }
        bytes
    }

    /// 获取深度平面快照
    pub fn depth_buffer_f32(&self) -> Vec<f32> {
        self.pixels
            .iter()
            .map(|pixel| key_depth((pixel.load(Ordering::Relaxed) >> 32) as u32))
            .collect()
    }

    /// 读取单个像素的颜色 (B,G,R,A)
    pub fn pixel_color(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let word = self.pixels[y * self.width + x].load(Ordering::Relaxed);
        Some(bgra_word_to_bytes(word as u32))
    }

    /// 读取单个像素的深度
    pub fn pixel_depth(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let word = self.pixels[y * self.width + x].load(Ordering::Relaxed);
        Some(key_depth((word >> 32) as u32))
    }
}
