//! CPU-side RGBA8 images.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::color::{self, Rgba};
use crate::math::IVec2;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to load image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("image '{}' has no pixels", path.display())]
    Empty { path: PathBuf },

    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    PixelCount { expected: usize, actual: usize },
}

/// Owned RGBA8 pixel buffer, 4 bytes per pixel in `0xRRGGBBAA` byte order.
///
/// Not `Clone`: images are moved, like the GPU textures made from them.
#[derive(Debug, PartialEq, Eq)]
pub struct Image {
    size: IVec2,
    pixels: Vec<u8>,
}

impl Image {
    /// Decodes any format the `image` crate understands into RGBA8.
    ///
    /// With `flip_vertical` the first stored row is the bottom of the
    /// picture, which is what bottom-left texture coordinates expect.
    pub fn load(path: impl AsRef<Path>, flip_vertical: bool) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let decoded = ::image::open(path).map_err(|source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = if flip_vertical { decoded.flipv() } else { decoded };
        let rgba = decoded.to_rgba8();

        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty {
                path: path.to_path_buf(),
            });
        }
        log::debug!("loaded image '{}' ({width}x{height})", path.display());

        Ok(Self {
            size: IVec2::new(width as i32, height as i32),
            pixels: rgba.into_raw(),
        })
    }

    pub fn from_pixels(size: IVec2, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if size.x <= 0 || size.y <= 0 {
            return Err(ImageError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        let expected = size.area() * 4;
        if pixels.len() != expected {
            return Err(ImageError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { size, pixels })
    }

    /// Builds an image from packed colors, row by row.
    pub fn from_colors(size: IVec2, colors: &[Rgba]) -> Result<Self, ImageError> {
        let pixels = colors.iter().flat_map(|&c| color::to_bytes(c)).collect();
        Self::from_pixels(size, pixels)
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_data(self) -> Vec<u8> {
        self.pixels
    }

    /// Packed color at column `x` of stored row `y`.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.size.x || y >= self.size.y {
            return None;
        }
        let at = 4 * (y as usize * self.size.x as usize + x as usize);
        let bytes: [u8; 4] = self.pixels.get(at..at + 4)?.try_into().ok()?;
        Some(color::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = 0xFF00_00FF;
    const BLUE: Rgba = 0x0000_FFFF;

    /// 1 column, 2 rows: red on top, blue below.
    fn write_test_png(dir: &Path) -> PathBuf {
        let path = dir.join("two.png");
        let img = ::image::RgbaImage::from_raw(1, 2, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_png_top_row_first() {
        let dir = tempfile::tempdir().unwrap();
        let image = Image::load(write_test_png(dir.path()), false).unwrap();
        assert_eq!(image.size(), IVec2::new(1, 2));
        assert_eq!(image.pixel(0, 0), Some(RED));
        assert_eq!(image.pixel(0, 1), Some(BLUE));
    }

    #[test]
    fn into_data_yields_rgba_rows_in_storage_order() {
        let dir = tempfile::tempdir().unwrap();
        let image = Image::load(write_test_png(dir.path()), true).unwrap();
        assert_eq!(image.into_data(), vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn flip_puts_bottom_row_first() {
        let dir = tempfile::tempdir().unwrap();
        let image = Image::load(write_test_png(dir.path()), true).unwrap();
        assert_eq!(image.pixel(0, 0), Some(BLUE));
        assert_eq!(image.pixel(0, 1), Some(RED));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Image::load(dir.path().join("missing.png"), false).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn from_colors_packs_msb_first() {
        let image = Image::from_colors(IVec2::new(2, 1), &[0x1122_3344, 0xAABB_CCDD]).unwrap();
        assert_eq!(image.data(), &[0x11, 0x22, 0x33, 0x44, 0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(image.pixel(1, 0), Some(0xAABB_CCDD));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, -1), None);
    }

    #[test]
    fn buffer_size_must_match() {
        assert!(matches!(
            Image::from_pixels(IVec2::new(2, 2), vec![0; 15]),
            Err(ImageError::PixelCount { expected: 16, actual: 15 })
        ));
        assert!(matches!(
            Image::from_pixels(IVec2::new(0, 2), Vec::new()),
            Err(ImageError::InvalidSize { .. })
        ));
    }
}
