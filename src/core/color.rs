/// RGBA浮点颜色，各通道约定范围 [0, 1]。
/// 原始着色值不保证在范围内，因此字节转换处统一clamp，防止溢出回绕。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color4 { r, g, b, a }
    }

    /// 不透明灰度颜色
    pub const fn grey(value: f32) -> Self {
        Color4::new(value, value, value, 1.0)
    }

    /// 打包为单个u32字（字节序 B,G,R,A，与颜色平面的像素布局一致）
    pub fn to_bgra_word(self) -> u32 {
        let [b, g, r, a] = self.to_bgra_bytes();
        u32::from_le_bytes([b, g, r, a])
    }

    /// 转换为 B,G,R,A 字节，通道clamp到[0,1]后乘255
    pub fn to_bgra_bytes(self) -> [u8; 4] {
        [
            channel_to_u8(self.b),
            channel_to_u8(self.g),
            channel_to_u8(self.r),
            channel_to_u8(self.a),
        ]
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// 从打包字还原 B,G,R,A 字节
#[inline]
pub fn bgra_word_to_bytes(word: u32) -> [u8; 4] {
    word.to_le_bytes()
}
