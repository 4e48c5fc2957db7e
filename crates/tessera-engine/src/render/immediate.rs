//! Renderer that issues one GPU draw per primitive.

use crate::color::{unpack_color, Rgba};
use crate::gpu::{
    Attribute, BufferHandle, BufferKind, BufferLayout, CompiledShader, GpuDriver, GpuError,
    IndexFormat, ShaderHandle, ShaderSource, TextureHandle, UniformDecl, UniformKind,
    UniformLocation, VertexArrayHandle,
};
use crate::math::{TransformationMatrix, Vec2};

use super::utils::{calculate_line_transform, calculate_sdf_transform, sdf_world_size, to_gpu_mat3};
use super::{Renderer2D, RendererConfig};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 0.0] },
    QuadVertex { pos: [0.5, -0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [0.5, 0.5], uv: [1.0, 1.0] },
    QuadVertex { pos: [-0.5, 0.5], uv: [0.0, 1.0] },
];

const SDF_VERTICES: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

const QUAD_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("uModel", UniformKind::Mat3),
    UniformDecl::new("uTexCoordTransform", UniformKind::Mat3),
    UniformDecl::new("uViewProjection", UniformKind::Mat3),
    UniformDecl::new("uTint", UniformKind::Vec4),
    UniformDecl::new("uDepth", UniformKind::Float),
    UniformDecl::new("uTexture", UniformKind::Int),
];

const SDF_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("uModel", UniformKind::Mat3),
    UniformDecl::new("uViewProjection", UniformKind::Mat3),
    UniformDecl::new("uFillColor", UniformKind::Vec4),
    UniformDecl::new("uLineColor", UniformKind::Vec4),
    UniformDecl::new("uWorldSize", UniformKind::Vec2),
    UniformDecl::new("uQuadSize", UniformKind::Vec2),
    UniformDecl::new("uLineWidth", UniformKind::Float),
    UniformDecl::new("uShape", UniformKind::Int),
    UniformDecl::new("uDepth", UniformKind::Float),
];

/// Value of `uShape` in the SDF fragment shader.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
enum SdfShape {
    Circle = 0,
    Rectangle = 1,
}

struct QuadUniforms {
    model: UniformLocation,
    tex_coord_transform: UniformLocation,
    view_projection: UniformLocation,
    tint: UniformLocation,
    depth: UniformLocation,
    texture: UniformLocation,
}

impl QuadUniforms {
    fn resolve(shader: &CompiledShader) -> Result<Self, GpuError> {
        Ok(Self {
            model: shader.location("uModel")?,
            tex_coord_transform: shader.location("uTexCoordTransform")?,
            view_projection: shader.location("uViewProjection")?,
            tint: shader.location("uTint")?,
            depth: shader.location("uDepth")?,
            texture: shader.location("uTexture")?,
        })
    }
}

struct SdfUniforms {
    model: UniformLocation,
    view_projection: UniformLocation,
    fill_color: UniformLocation,
    line_color: UniformLocation,
    world_size: UniformLocation,
    quad_size: UniformLocation,
    line_width: UniformLocation,
    shape: UniformLocation,
    depth: UniformLocation,
}

impl SdfUniforms {
    fn resolve(shader: &CompiledShader) -> Result<Self, GpuError> {
        Ok(Self {
            model: shader.location("uModel")?,
            view_projection: shader.location("uViewProjection")?,
            fill_color: shader.location("uFillColor")?,
            line_color: shader.location("uLineColor")?,
            world_size: shader.location("uWorldSize")?,
            quad_size: shader.location("uQuadSize")?,
            line_width: shader.location("uLineWidth")?,
            shape: shader.location("uShape")?,
            depth: shader.location("uDepth")?,
        })
    }
}

/// Every GPU object the renderer owns. Zero handles are skipped on release.
#[derive(Default)]
struct Handles {
    vbo: BufferHandle,
    ibo: BufferHandle,
    vao: VertexArrayHandle,
    sdf_vbo: BufferHandle,
    sdf_vao: VertexArrayHandle,
    quad_shader: ShaderHandle,
    sdf_shader: ShaderHandle,
}

impl Handles {
    fn release<D: GpuDriver>(&mut self, gpu: &mut D) {
        gpu.destroy_shader(self.quad_shader);
        gpu.destroy_shader(self.sdf_shader);
        gpu.destroy_vertex_array(self.vao);
        gpu.destroy_vertex_array(self.sdf_vao);
        gpu.destroy_buffer(self.vbo);
        gpu.destroy_buffer(self.sdf_vbo);
        gpu.destroy_buffer(self.ibo);
        *self = Self::default();
    }
}

struct Resources {
    handles: Handles,
    index_count: u32,
    quad: QuadUniforms,
    sdf: SdfUniforms,
}

impl Resources {
    fn create<D: GpuDriver>(gpu: &mut D, config: &RendererConfig) -> Result<Self, GpuError> {
        let mut handles = Handles::default();
        match Self::build(gpu, config, &mut handles) {
            Ok((quad, sdf)) => Ok(Self {
                handles,
                index_count: QUAD_INDICES.len() as u32,
                quad,
                sdf,
            }),
            Err(err) => {
                handles.release(gpu);
                Err(err)
            }
        }
    }

    /// Fills `handles` as it goes so a failure can release what was made.
    fn build<D: GpuDriver>(
        gpu: &mut D,
        config: &RendererConfig,
        handles: &mut Handles,
    ) -> Result<(QuadUniforms, SdfUniforms), GpuError> {
        handles.vbo = gpu.create_buffer(BufferKind::Vertices, bytemuck::cast_slice(&QUAD_VERTICES))?;
        handles.ibo = gpu.create_buffer(BufferKind::Indices, bytemuck::cast_slice(&QUAD_INDICES))?;
        handles.vao = gpu.create_vertex_array(
            handles.vbo,
            &BufferLayout::new([Attribute::Float2, Attribute::Float2]),
            handles.ibo,
            IndexFormat::U32,
        )?;

        handles.sdf_vbo = gpu.create_buffer(BufferKind::Vertices, bytemuck::cast_slice(&SDF_VERTICES))?;
        handles.sdf_vao = gpu.create_vertex_array(
            handles.sdf_vbo,
            &BufferLayout::new([Attribute::Float2]),
            handles.ibo,
            IndexFormat::U32,
        )?;

        let quad_shader = gpu.create_shader(&ShaderSource {
            label: "immediate quad",
            vertex_path: config.quad_vertex.clone(),
            fragment_path: config.quad_fragment.clone(),
            uniforms: QUAD_UNIFORMS,
        })?;
        handles.quad_shader = quad_shader.handle;

        let sdf_shader = gpu.create_shader(&ShaderSource {
            label: "immediate sdf",
            vertex_path: config.sdf_vertex.clone(),
            fragment_path: config.sdf_fragment.clone(),
            uniforms: SDF_UNIFORMS,
        })?;
        handles.sdf_shader = sdf_shader.handle;

        Ok((
            QuadUniforms::resolve(&quad_shader)?,
            SdfUniforms::resolve(&sdf_shader)?,
        ))
    }
}

/// [`Renderer2D`] that draws each primitive as soon as it is requested.
///
/// Owns its driver and every GPU object it creates; dropping the renderer
/// shuts it down. Draw calls made before `init` or outside a scene issue no
/// GPU commands and log a single warning.
pub struct ImmediateRenderer2D<D: GpuDriver> {
    gpu: D,
    config: RendererConfig,
    resources: Option<Resources>,
    view_projection: Option<TransformationMatrix>,
    warned_uninitialized: bool,
    warned_outside_scene: bool,
}

impl<D: GpuDriver> ImmediateRenderer2D<D> {
    /// `config` paths must already be resolved (see [`RendererConfig::resolve`]).
    pub fn new(gpu: D, config: RendererConfig) -> Self {
        Self {
            gpu,
            config,
            resources: None,
            view_projection: None,
            warned_uninitialized: false,
            warned_outside_scene: false,
        }
    }

    pub fn gpu(&self) -> &D {
        &self.gpu
    }

    /// Driver access for creating textures and other shared resources.
    pub fn gpu_mut(&mut self) -> &mut D {
        &mut self.gpu
    }

    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    pub fn in_scene(&self) -> bool {
        self.view_projection.is_some()
    }

    /// The scene's view-projection in GPU layout, or `None` (with a one-time
    /// warning) when drawing is not currently allowed.
    fn scene_view_projection(&mut self, op: &str) -> Option<[f32; 9]> {
        if self.resources.is_none() {
            if !self.warned_uninitialized {
                log::warn!("{op} called before init; ignored");
                self.warned_uninitialized = true;
            }
            return None;
        }
        match &self.view_projection {
            Some(vp) => Some(to_gpu_mat3(vp)),
            None => {
                if !self.warned_outside_scene {
                    log::warn!("{op} called outside begin_scene/end_scene; ignored");
                    self.warned_outside_scene = true;
                }
                None
            }
        }
    }

    fn draw_sdf(
        &mut self,
        op: &str,
        transform: &TransformationMatrix,
        fill: Rgba,
        line: Rgba,
        line_width: f64,
        shape: SdfShape,
    ) {
        let Some(view_projection) = self.scene_view_projection(op) else { return };

        let world_size = sdf_world_size(transform);
        if world_size[0] == 0.0 || world_size[1] == 0.0 {
            log::warn!("skipping {shape:?} with zero-sized transform {world_size:?}");
            return;
        }
        let sdf = calculate_sdf_transform(transform, line_width);

        let Some(res) = self.resources.as_ref() else { return };
        let u = &res.sdf;
        let gpu = &mut self.gpu;

        gpu.use_program(res.handles.sdf_shader);
        gpu.set_uniform_mat3(u.model, &sdf.quad_transform);
        gpu.set_uniform_mat3(u.view_projection, &view_projection);
        gpu.set_uniform_vec4(u.fill_color, unpack_color(fill));
        gpu.set_uniform_vec4(u.line_color, unpack_color(line));
        gpu.set_uniform_vec2(u.world_size, sdf.world_size);
        gpu.set_uniform_vec2(u.quad_size, sdf.quad_size);
        gpu.set_uniform_f32(u.line_width, line_width as f32);
        gpu.set_uniform_i32(u.shape, shape as i32);
        gpu.set_uniform_f32(u.depth, 0.0);

        gpu.bind_vertex_array(res.handles.sdf_vao);
        gpu.draw_indexed(res.index_count);

        gpu.use_program(ShaderHandle::NONE);
    }
}

impl<D: GpuDriver> Renderer2D for ImmediateRenderer2D<D> {
    fn init(&mut self) -> Result<(), GpuError> {
        if self.resources.is_some() {
            log::warn!("renderer already initialized; init ignored");
            return Ok(());
        }
        let resources = Resources::create(&mut self.gpu, &self.config)?;
        log::debug!(
            "immediate renderer initialized (quad shader {:?}, sdf shader {:?})",
            resources.handles.quad_shader,
            resources.handles.sdf_shader
        );
        self.resources = Some(resources);
        self.warned_uninitialized = false;
        self.warned_outside_scene = false;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.view_projection = None;
        if let Some(mut resources) = self.resources.take() {
            resources.handles.release(&mut self.gpu);
            log::debug!("immediate renderer shut down");
        }
    }

    fn begin_scene(&mut self, view_projection: &TransformationMatrix) {
        if self.view_projection.is_some() {
            log::warn!("begin_scene called inside an active scene; view-projection replaced");
        }
        self.view_projection = Some(*view_projection);
    }

    fn end_scene(&mut self) {
        self.view_projection = None;
    }

    fn draw_quad(
        &mut self,
        transform: &TransformationMatrix,
        texture: TextureHandle,
        uv_bl: Vec2,
        uv_tr: Vec2,
        tint: Rgba,
    ) {
        let Some(view_projection) = self.scene_view_projection("draw_quad") else { return };
        let Some(res) = self.resources.as_ref() else { return };

        let tex_coord_transform =
            TransformationMatrix::translation(uv_bl) * TransformationMatrix::scale(uv_tr - uv_bl);

        let u = &res.quad;
        let gpu = &mut self.gpu;

        gpu.use_program(res.handles.quad_shader);
        gpu.set_uniform_mat3(u.model, &to_gpu_mat3(transform));
        gpu.set_uniform_mat3(u.tex_coord_transform, &to_gpu_mat3(&tex_coord_transform));
        gpu.set_uniform_mat3(u.view_projection, &view_projection);
        gpu.set_uniform_vec4(u.tint, unpack_color(tint));
        gpu.set_uniform_f32(u.depth, 0.0);
        gpu.set_uniform_i32(u.texture, 0);

        gpu.bind_texture(0, texture);
        gpu.bind_vertex_array(res.handles.vao);
        gpu.draw_indexed(res.index_count);

        gpu.use_program(ShaderHandle::NONE);
    }

    fn draw_circle(&mut self, transform: &TransformationMatrix, fill: Rgba, line: Rgba, line_width: f64) {
        self.draw_sdf("draw_circle", transform, fill, line, line_width, SdfShape::Circle);
    }

    fn draw_rectangle(&mut self, transform: &TransformationMatrix, fill: Rgba, line: Rgba, line_width: f64) {
        self.draw_sdf("draw_rectangle", transform, fill, line, line_width, SdfShape::Rectangle);
    }

    fn draw_line(
        &mut self,
        transform: &TransformationMatrix,
        start: Vec2,
        end: Vec2,
        color: Rgba,
        line_width: f64,
    ) {
        let placed = calculate_line_transform(transform, start, end, line_width);
        self.draw_sdf("draw_line", &placed, color, color, 0.0, SdfShape::Rectangle);
    }
}

impl<D: GpuDriver> Drop for ImmediateRenderer2D<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use crate::gpu::recording::{GpuCommand, RecordingDriver, UniformValue};
    use crate::gpu::reflect::{check_stage, Stage};
    use crate::gpu::uniform_block::UniformBlock;
    use crate::math::IVec2;
    use crate::render::build_ndc_matrix;

    fn renderer() -> ImmediateRenderer2D<RecordingDriver> {
        let mut r = ImmediateRenderer2D::new(RecordingDriver::new(), RendererConfig::default());
        r.init().unwrap();
        r.gpu_mut().clear_commands();
        r
    }

    /// Applies a column-major GPU matrix to a point.
    fn apply(m: &[f32; 9], p: (f32, f32)) -> (f32, f32) {
        (m[0] * p.0 + m[3] * p.1 + m[6], m[1] * p.0 + m[4] * p.1 + m[7])
    }

    #[test]
    fn shipped_shaders_match_uniform_declarations() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/shaders/immediate_renderer_2d");
        for (name, decls) in [("quad", QUAD_UNIFORMS), ("sdf", SDF_UNIFORMS)] {
            let block = UniformBlock::new(decls);
            for (stage, ext) in [(Stage::Vertex, "vert"), (Stage::Fragment, "frag")] {
                let source = std::fs::read_to_string(dir.join(format!("{name}.{ext}.wgsl"))).unwrap();
                if let Err(err) = check_stage(name, stage, &source, decls, &block) {
                    panic!("{name}.{ext}.wgsl: {err}");
                }
            }
        }
    }

    #[test]
    fn init_creates_buffers_arrays_and_both_shaders() {
        let mut r = ImmediateRenderer2D::new(RecordingDriver::new(), RendererConfig::default());
        r.init().unwrap();
        assert!(r.is_initialized());
        // 3 buffers, 2 vertex arrays, 2 shaders.
        assert_eq!(r.gpu().live_resources(), 7);

        let layouts: Vec<_> = r
            .gpu()
            .commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::CreateVertexArray { layout, .. } => Some(layout.stride()),
                _ => None,
            })
            .collect();
        assert_eq!(layouts, vec![16, 8]);
    }

    #[test]
    fn centered_quad_lands_in_expected_ndc_rectangle() {
        let mut r = renderer();
        let white = r
            .gpu_mut()
            .create_texture(IVec2::new(1, 1), Some(&[255; 4]), Default::default(), Default::default())
            .unwrap();

        r.begin_scene(&build_ndc_matrix(IVec2::new(800, 600)));
        let transform = TransformationMatrix::translation(Vec2::new(400.0, 300.0))
            * TransformationMatrix::scale(Vec2::new(100.0, 100.0));
        r.draw_texture(&transform, white);
        r.end_scene();

        let gpu = r.gpu();
        assert_eq!(gpu.draw_count(), 1);

        let model = gpu.last_mat3("uModel").unwrap();
        let view_projection = gpu.last_mat3("uViewProjection").unwrap();
        let corner = |p| apply(&view_projection, apply(&model, p));

        let (x0, y0) = corner((-0.5, -0.5));
        let (x1, y1) = corner((0.5, 0.5));
        assert!((x0 + 0.125).abs() < 1e-5 && (y0 + 1.0 / 6.0).abs() < 1e-5);
        assert!((x1 - 0.125).abs() < 1e-5 && (y1 - 1.0 / 6.0).abs() < 1e-5);

        assert_eq!(gpu.last_uniform("uTint"), Some(&UniformValue::Vec4([1.0; 4])));
        assert_eq!(gpu.last_uniform("uDepth"), Some(&UniformValue::Float(0.0)));
        assert_eq!(gpu.last_uniform("uTexture"), Some(&UniformValue::Int(0)));
    }

    #[test]
    fn draw_quad_binds_state_and_unbinds_program() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_quad(
            &TransformationMatrix::IDENTITY,
            TextureHandle(42),
            Vec2::zero(),
            Vec2::splat(1.0),
            WHITE,
        );

        let cmds = &r.gpu().commands;
        assert!(matches!(cmds.first(), Some(GpuCommand::UseProgram(h)) if h.is_valid()));
        assert!(cmds.contains(&GpuCommand::BindTexture { unit: 0, texture: TextureHandle(42) }));
        assert!(cmds.contains(&GpuCommand::DrawIndexed { index_count: 6 }));
        assert_eq!(cmds.last(), Some(&GpuCommand::UseProgram(ShaderHandle::NONE)));
    }

    #[test]
    fn uv_subrectangle_becomes_texcoord_transform() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_quad(
            &TransformationMatrix::IDENTITY,
            TextureHandle(1),
            Vec2::new(0.25, 0.5),
            Vec2::new(0.75, 1.0),
            0xFF80_40FF,
        );

        let tex = r.gpu().last_mat3("uTexCoordTransform").unwrap();
        assert_eq!(apply(&tex, (0.0, 0.0)), (0.25, 0.5));
        assert_eq!(apply(&tex, (1.0, 1.0)), (0.75, 1.0));
        assert_eq!(
            r.gpu().last_uniform("uTint"),
            Some(&UniformValue::Vec4(unpack_color(0xFF80_40FF)))
        );
    }

    #[test]
    fn draws_outside_a_scene_issue_no_commands() {
        let mut r = renderer();
        r.draw_texture(&TransformationMatrix::IDENTITY, TextureHandle(1));
        r.draw_circle(&TransformationMatrix::scale_uniform(5.0), WHITE, WHITE, 1.0);
        r.draw_rectangle(&TransformationMatrix::scale_uniform(5.0), WHITE, WHITE, 1.0);
        r.draw_line(&TransformationMatrix::IDENTITY, Vec2::zero(), Vec2::splat(1.0), WHITE, 1.0);

        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.end_scene();
        r.draw_texture(&TransformationMatrix::IDENTITY, TextureHandle(1));

        assert!(r.gpu().commands.is_empty());
    }

    #[test]
    fn draws_before_init_issue_no_commands() {
        let mut r = ImmediateRenderer2D::new(RecordingDriver::new(), RendererConfig::default());
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_texture(&TransformationMatrix::IDENTITY, TextureHandle(1));
        r.draw_line(&TransformationMatrix::IDENTITY, Vec2::zero(), Vec2::splat(1.0), WHITE, 1.0);
        assert!(r.gpu().commands.is_empty());
    }

    #[test]
    fn nested_begin_scene_replaces_view_projection() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        let ndc = build_ndc_matrix(IVec2::new(200, 100));
        r.begin_scene(&ndc);
        r.draw_texture(&TransformationMatrix::IDENTITY, TextureHandle(1));
        assert_eq!(r.gpu().last_mat3("uViewProjection"), Some(to_gpu_mat3(&ndc)));
    }

    #[test]
    fn circle_uploads_expanded_quad_and_shape() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_circle(&TransformationMatrix::scale_uniform(10.0), 0xFF00_00FF, 0x0000_FFFF, 1.0);

        let gpu = r.gpu();
        assert_eq!(gpu.draw_count(), 1);
        let model = gpu.last_mat3("uModel").unwrap();
        assert!((model[0] - 12.0).abs() < 1e-5 && (model[4] - 12.0).abs() < 1e-5);
        assert_eq!(gpu.last_uniform("uWorldSize"), Some(&UniformValue::Vec2([10.0, 10.0])));
        assert_eq!(gpu.last_uniform("uQuadSize"), Some(&UniformValue::Vec2([12.0, 12.0])));
        assert_eq!(gpu.last_uniform("uShape"), Some(&UniformValue::Int(0)));
        assert_eq!(
            gpu.last_uniform("uFillColor"),
            Some(&UniformValue::Vec4([1.0, 0.0, 0.0, 1.0]))
        );
        assert_eq!(gpu.commands.last(), Some(&GpuCommand::UseProgram(ShaderHandle::NONE)));
    }

    #[test]
    fn rectangle_and_quad_use_different_vertex_arrays() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_rectangle(&TransformationMatrix::scale_uniform(4.0), WHITE, WHITE, 0.0);
        r.draw_texture(&TransformationMatrix::IDENTITY, TextureHandle(1));

        let arrays: Vec<_> = r
            .gpu()
            .commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::BindVertexArray(h) => Some(*h),
                _ => None,
            })
            .collect();
        assert_eq!(arrays.len(), 2);
        assert_ne!(arrays[0], arrays[1]);
        assert_eq!(r.gpu().last_uniform("uShape"), Some(&UniformValue::Int(1)));
    }

    #[test]
    fn line_is_a_filled_rectangle_along_the_segment() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_line(
            &TransformationMatrix::IDENTITY,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            0x00FF_00FF,
            2.0,
        );

        let gpu = r.gpu();
        assert_eq!(gpu.last_uniform("uWorldSize"), Some(&UniformValue::Vec2([10.0, 2.0])));
        assert_eq!(gpu.last_uniform("uLineWidth"), Some(&UniformValue::Float(0.0)));
        let model = gpu.last_mat3("uModel").unwrap();
        assert_eq!(apply(&model, (0.5, 0.0)), (10.0, 0.0));
    }

    #[test]
    fn zero_sized_shapes_are_skipped() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.draw_line(&TransformationMatrix::IDENTITY, Vec2::splat(3.0), Vec2::splat(3.0), WHITE, 1.0);
        r.draw_circle(&TransformationMatrix::scale(Vec2::new(0.0, 5.0)), WHITE, WHITE, 1.0);
        assert_eq!(r.gpu().draw_count(), 0);
    }

    #[test]
    fn failed_init_releases_everything() {
        let mut gpu = RecordingDriver::new();
        gpu.fail_shaders = true;
        let mut r = ImmediateRenderer2D::new(gpu, RendererConfig::default());

        assert!(matches!(r.init(), Err(GpuError::ShaderCompile { .. })));
        assert!(!r.is_initialized());
        assert_eq!(r.gpu().live_resources(), 0);
    }

    #[test]
    fn shutdown_is_idempotent_and_allows_reinit() {
        let mut r = renderer();
        r.begin_scene(&TransformationMatrix::IDENTITY);
        r.shutdown();
        assert!(!r.in_scene());
        assert_eq!(r.gpu().live_resources(), 0);
        r.shutdown();
        assert_eq!(r.gpu().live_resources(), 0);

        r.init().unwrap();
        assert_eq!(r.gpu().live_resources(), 7);
    }

    #[test]
    fn second_init_is_ignored() {
        let mut r = renderer();
        r.init().unwrap();
        assert!(r.gpu().commands.is_empty());
        assert_eq!(r.gpu().live_resources(), 7);
    }
}
