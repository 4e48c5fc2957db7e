//! Packed RGBA colors.
//!
//! The canonical representation at every API boundary is a `u32` laid out as
//! `0xRRGGBBAA`: red in the most significant byte, alpha in the least.

/// Packed `0xRRGGBBAA` color.
pub type Rgba = u32;

pub const WHITE: Rgba = 0xFFFF_FFFF;
pub const BLACK: Rgba = 0x0000_00FF;
pub const CLEAR: Rgba = 0x0000_0000;

/// Splits a packed color into `[r, g, b, a]` floats in `[0, 1]`.
#[inline]
pub fn unpack_color(rgba: Rgba) -> [f32; 4] {
    let channel = |shift: u32| ((rgba >> shift) & 0xFF) as f32 / 255.0;
    [channel(24), channel(16), channel(8), channel(0)]
}

/// Packs `[r, g, b, a]` floats into `0xRRGGBBAA`.
///
/// Each channel is scaled by 255, clamped to `[0, 255]` and truncated toward
/// zero, so `pack_color(unpack_color(x)) == x` for every `x`.
#[inline]
pub fn pack_color(color: [f32; 4]) -> Rgba {
    let byte = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u8 as u32;
    let [r, g, b, a] = color;
    (byte(r) << 24) | (byte(g) << 16) | (byte(b) << 8) | byte(a)
}

/// Reverses the byte order: `0xRRGGBBAA` becomes `0xAABBGGRR`.
///
/// This is the layout a little-endian `u32` view of an RGBA8 byte buffer has.
#[inline]
pub const fn rgba_to_abgr(rgba: Rgba) -> u32 {
    rgba.swap_bytes()
}

/// Inverse of [`rgba_to_abgr`].
#[inline]
pub const fn abgr_to_rgba(abgr: u32) -> Rgba {
    abgr.swap_bytes()
}

/// Bytes of a packed color in memory order `[r, g, b, a]`.
#[inline]
pub const fn to_bytes(rgba: Rgba) -> [u8; 4] {
    rgba.to_be_bytes()
}

/// Packs `[r, g, b, a]` bytes.
#[inline]
pub const fn from_bytes(bytes: [u8; 4]) -> Rgba {
    Rgba::from_be_bytes(bytes)
}

/// Converts to the clear-color type used by render passes.
pub fn to_wgpu_color(rgba: Rgba) -> wgpu::Color {
    let [r, g, b, a] = unpack_color(rgba);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
