//! GPU textures and a path-keyed texture cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assets::{AssetError, AssetLocator};
use crate::color::Rgba;
use crate::gpu::{Filtering, GpuDriver, GpuError, TextureHandle, Wrapping};
use crate::image::{Image, ImageError};
use crate::math::{IVec2, TransformationMatrix, Vec2};
use crate::render::Renderer2D;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// A GPU texture plus its size in texels.
///
/// The handle is owned: release it with [`Texture::release`] through the
/// driver that created it. Dropping a `Texture` does not free GPU memory.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    handle: TextureHandle,
    size: IVec2,
}

impl Texture {
    pub fn from_image<D: GpuDriver + ?Sized>(
        gpu: &mut D,
        image: &Image,
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<Self, GpuError> {
        let handle = gpu.create_texture(image.size(), Some(image.data()), filtering, wrapping)?;
        Ok(Self {
            handle,
            size: image.size(),
        })
    }

    /// Texture from packed colors, first row at the bottom.
    pub fn from_colors<D: GpuDriver + ?Sized>(
        gpu: &mut D,
        size: IVec2,
        colors: &[Rgba],
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<Self, TextureError> {
        let image = Image::from_colors(size, colors)?;
        Ok(Self::from_image(gpu, &image, filtering, wrapping)?)
    }

    /// Texture with undefined contents.
    pub fn empty<D: GpuDriver + ?Sized>(
        gpu: &mut D,
        size: IVec2,
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<Self, GpuError> {
        let handle = gpu.create_texture(size, None, filtering, wrapping)?;
        Ok(Self { handle, size })
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Draws the whole texture. See [`Texture::draw_frame`].
    pub fn draw<R: Renderer2D + ?Sized>(
        &self,
        renderer: &mut R,
        display_matrix: &TransformationMatrix,
        tint: Rgba,
    ) {
        self.draw_frame(renderer, display_matrix, IVec2::new(0, 0), self.size, tint);
    }

    /// Draws the `frame_size` texels starting at `texel_position`, measured
    /// from the top-left of the texture, as a `frame_size`-pixel quad.
    ///
    /// `display_matrix` places the frame's bottom-left corner. The identity
    /// matrix is reserved for backgrounds: a full-size frame then covers
    /// `[0,w]×[0,h]` of the screen.
    pub fn draw_frame<R: Renderer2D + ?Sized>(
        &self,
        renderer: &mut R,
        display_matrix: &TransformationMatrix,
        texel_position: IVec2,
        frame_size: IVec2,
        tint: Rgba,
    ) {
        if !self.handle.is_valid() {
            return;
        }

        let size = Vec2::from(self.size);
        let pos = Vec2::from(texel_position);
        let frame = Vec2::from(frame_size);

        let uv_bl = Vec2::new(pos.x / size.x, 1.0 - (pos.y + frame.y) / size.y);
        let uv_tr = Vec2::new((pos.x + frame.x) / size.x, 1.0 - pos.y / size.y);

        let scale = TransformationMatrix::scale(frame);
        let transform = if *display_matrix == TransformationMatrix::IDENTITY {
            if frame_size == self.size {
                TransformationMatrix::translation(frame * 0.5) * scale
            } else {
                scale
            }
        } else {
            *display_matrix * scale * TransformationMatrix::translation(Vec2::splat(0.5))
        };

        renderer.draw_quad(&transform, self.handle, uv_bl, uv_tr, tint);
    }

    /// Frees the GPU texture.
    pub fn release<D: GpuDriver + ?Sized>(self, gpu: &mut D) {
        gpu.destroy_texture(self.handle);
    }
}

/// Loads each texture file once and hands out shared references.
///
/// Textures are flipped on load, sampled nearest-pixel and clamped to edge.
#[derive(Debug)]
pub struct TextureManager {
    assets: AssetLocator,
    cache: HashMap<PathBuf, Texture>,
}

impl TextureManager {
    pub fn new(assets: AssetLocator) -> Self {
        Self {
            assets,
            cache: HashMap::new(),
        }
    }

    /// Returns the cached texture for `path`, loading it on first use.
    pub fn load<D: GpuDriver + ?Sized>(
        &mut self,
        gpu: &mut D,
        path: impl AsRef<Path>,
    ) -> Result<&Texture, TextureError> {
        match self.cache.entry(path.as_ref().to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let file = self.assets.locate(entry.key())?;
                let image = Image::load(&file, true)?;
                let texture =
                    Texture::from_image(gpu, &image, Filtering::NearestPixel, Wrapping::ClampToEdge)?;
                log::debug!("cached texture '{}' as {:?}", entry.key().display(), texture.handle);
                Ok(entry.insert(texture))
            }
        }
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Texture> {
        self.cache.get(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Releases every cached texture.
    pub fn unload<D: GpuDriver + ?Sized>(&mut self, gpu: &mut D) {
        let count = self.cache.len();
        for (_, texture) in self.cache.drain() {
            texture.release(gpu);
        }
        if count > 0 {
            log::debug!("released {count} cached textures");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use crate::gpu::recording::{GpuCommand, RecordingDriver};

    #[derive(Debug, Clone, PartialEq)]
    struct Quad {
        transform: TransformationMatrix,
        texture: TextureHandle,
        uv_bl: Vec2,
        uv_tr: Vec2,
        tint: Rgba,
    }

    #[derive(Default)]
    struct QuadLog {
        quads: Vec<Quad>,
    }

    impl Renderer2D for QuadLog {
        fn init(&mut self) -> Result<(), GpuError> {
            Ok(())
        }
        fn shutdown(&mut self) {}
        fn begin_scene(&mut self, _: &TransformationMatrix) {}
        fn end_scene(&mut self) {}
        fn draw_quad(
            &mut self,
            transform: &TransformationMatrix,
            texture: TextureHandle,
            uv_bl: Vec2,
            uv_tr: Vec2,
            tint: Rgba,
        ) {
            self.quads.push(Quad {
                transform: *transform,
                texture,
                uv_bl,
                uv_tr,
                tint,
            });
        }
        fn draw_circle(&mut self, _: &TransformationMatrix, _: Rgba, _: Rgba, _: f64) {}
        fn draw_rectangle(&mut self, _: &TransformationMatrix, _: Rgba, _: Rgba, _: f64) {}
        fn draw_line(&mut self, _: &TransformationMatrix, _: Vec2, _: Vec2, _: Rgba, _: f64) {}
    }

    fn sheet() -> Texture {
        Texture {
            handle: TextureHandle(9),
            size: IVec2::new(64, 32),
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn background_covers_the_screen_from_origin() {
        let mut log = QuadLog::default();
        sheet().draw(&mut log, &TransformationMatrix::IDENTITY, WHITE);

        let q = &log.quads[0];
        assert!(close(q.transform * Vec2::new(-0.5, -0.5), Vec2::new(0.0, 0.0)));
        assert!(close(q.transform * Vec2::new(0.5, 0.5), Vec2::new(64.0, 32.0)));
        assert_eq!((q.uv_bl, q.uv_tr), (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)));
        assert_eq!(q.texture, TextureHandle(9));
    }

    #[test]
    fn frame_uvs_count_rows_from_the_top() {
        let mut log = QuadLog::default();
        let display = TransformationMatrix::translation(Vec2::new(100.0, 50.0));
        sheet().draw_frame(&mut log, &display, IVec2::new(16, 0), IVec2::new(16, 16), 0x8080_80FF);

        let q = &log.quads[0];
        assert!(close(q.uv_bl, Vec2::new(0.25, 0.5)));
        assert!(close(q.uv_tr, Vec2::new(0.5, 1.0)));
        assert_eq!(q.tint, 0x8080_80FF);
    }

    #[test]
    fn display_matrix_places_bottom_left_corner() {
        let mut log = QuadLog::default();
        let display = TransformationMatrix::translation(Vec2::new(100.0, 50.0));
        sheet().draw_frame(&mut log, &display, IVec2::new(0, 16), IVec2::new(16, 16), WHITE);

        let q = &log.quads[0];
        assert!(close(q.transform * Vec2::new(-0.5, -0.5), Vec2::new(100.0, 50.0)));
        assert!(close(q.transform * Vec2::new(0.5, 0.5), Vec2::new(116.0, 66.0)));
    }

    #[test]
    fn partial_frame_with_identity_stays_centered() {
        let mut log = QuadLog::default();
        sheet().draw_frame(&mut log, &TransformationMatrix::IDENTITY, IVec2::new(0, 0), IVec2::new(16, 16), WHITE);

        let q = &log.quads[0];
        assert!(close(q.transform * Vec2::zero(), Vec2::zero()));
        assert!(close(q.transform * Vec2::new(0.5, 0.5), Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn empty_handle_draws_nothing() {
        let mut log = QuadLog::default();
        let texture = Texture {
            handle: TextureHandle::NONE,
            size: IVec2::new(4, 4),
        };
        texture.draw(&mut log, &TransformationMatrix::IDENTITY, WHITE);
        assert!(log.quads.is_empty());
    }

    #[test]
    fn colors_upload_as_rgba_bytes() {
        let mut gpu = RecordingDriver::new();
        let texture = Texture::from_colors(
            &mut gpu,
            IVec2::new(2, 1),
            &[0xFF00_00FF, 0x00FF_00FF],
            Filtering::Linear,
            Wrapping::Repeat,
        )
        .unwrap();
        assert_eq!(texture.size(), IVec2::new(2, 1));
        assert_eq!(
            gpu.last_texture_pixels.as_deref(),
            Some(&[255, 0, 0, 255, 0, 255, 0, 255][..])
        );

        texture.release(&mut gpu);
        assert_eq!(gpu.live_resources(), 0);
    }

    #[test]
    fn empty_texture_allocates_without_pixels() {
        let mut gpu = RecordingDriver::new();
        let texture =
            Texture::empty(&mut gpu, IVec2::new(8, 4), Filtering::NearestPixel, Wrapping::MirroredRepeat).unwrap();
        assert_eq!(texture.size(), IVec2::new(8, 4));
        assert!(texture.handle().is_valid());
        assert_eq!(gpu.last_texture_pixels, None);
        assert!(matches!(
            gpu.commands.last(),
            Some(GpuCommand::CreateTexture {
                size,
                filtering: Filtering::NearestPixel,
                wrapping: Wrapping::MirroredRepeat,
                ..
            }) if *size == IVec2::new(8, 4)
        ));

        let err = Texture::empty(&mut gpu, IVec2::new(0, 4), Filtering::Linear, Wrapping::Repeat).unwrap_err();
        assert!(matches!(err, GpuError::TextureSize { width: 0, height: 4 }));
    }

    #[test]
    fn mismatched_color_count_is_rejected() {
        let mut gpu = RecordingDriver::new();
        let err = Texture::from_colors(&mut gpu, IVec2::new(2, 2), &[WHITE], Filtering::Linear, Wrapping::Repeat)
            .unwrap_err();
        assert!(matches!(err, TextureError::Image(ImageError::PixelCount { .. })));
        assert_eq!(gpu.live_resources(), 0);
    }

    fn write_png(dir: &Path, name: &str) {
        ::image::RgbaImage::from_pixel(4, 2, ::image::Rgba([10, 20, 30, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn manager_loads_each_path_once() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "duck.png");

        let mut gpu = RecordingDriver::new();
        let mut textures = TextureManager::new(AssetLocator::new([dir.path()]));

        let first = textures.load(&mut gpu, "duck.png").unwrap().handle();
        let second = textures.load(&mut gpu, "duck.png").unwrap().handle();
        assert_eq!(first, second);
        assert_eq!(textures.len(), 1);
        assert_eq!(textures.get("duck.png").map(Texture::size), Some(IVec2::new(4, 2)));

        let created: Vec<_> = gpu
            .commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::CreateTexture { filtering, wrapping, .. } => Some((*filtering, *wrapping)),
                _ => None,
            })
            .collect();
        assert_eq!(created, vec![(Filtering::NearestPixel, Wrapping::ClampToEdge)]);
    }

    #[test]
    fn manager_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut gpu = RecordingDriver::new();
        let mut textures = TextureManager::new(AssetLocator::new([dir.path()]));
        assert!(matches!(
            textures.load(&mut gpu, "missing.png"),
            Err(TextureError::Asset(_))
        ));
        assert!(textures.is_empty());
    }

    #[test]
    fn unload_releases_every_texture() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");

        let mut gpu = RecordingDriver::new();
        let mut textures = TextureManager::new(AssetLocator::new([dir.path()]));
        textures.load(&mut gpu, "a.png").unwrap();
        textures.load(&mut gpu, "b.png").unwrap();
        assert_eq!(gpu.live_resources(), 2);

        textures.unload(&mut gpu);
        assert!(textures.is_empty());
        assert_eq!(gpu.live_resources(), 0);
    }
}
