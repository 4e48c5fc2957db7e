//! [`GpuDriver`] implemented on top of wgpu.
//!
//! wgpu has no global bind state, so the driver keeps one: the current
//! program, vertex array and texture, plus a CPU copy of each program's
//! uniform block. Every `draw_indexed` uploads that state into a fresh
//! uniform buffer and submits a single render pass that loads and stores
//! the current target. Draw order therefore equals call order.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use wgpu::util::DeviceExt;

use crate::math::IVec2;

use super::reflect::{self, Stage};
use super::uniform_block::UniformBlock;
use super::{
    Attribute, BufferHandle, BufferKind, BufferLayout, CompiledShader, Filtering, GpuDriver,
    GpuError, IndexFormat, ShaderHandle, ShaderSource, TextureHandle, UniformLocation,
    VertexArrayHandle, Wrapping,
};

struct VertexArray {
    vertices: BufferHandle,
    indices: BufferHandle,
    index_format: IndexFormat,
    layout: BufferLayout,
}

struct Program {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    uniforms: UniformBlock,
    pipelines: HashMap<BufferLayout, wgpu::RenderPipeline>,
    /// Layouts the backend refused to build a pipeline for.
    rejected: HashSet<BufferLayout>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

/// Driver state mirrored from GL-style bind calls.
#[derive(Default)]
struct Bindings {
    program: ShaderHandle,
    vertex_array: VertexArrayHandle,
    texture: TextureHandle,
}

pub struct WgpuDriver {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target_format: wgpu::TextureFormat,
    target: Option<wgpu::TextureView>,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    white: GpuTexture,

    next_id: u32,
    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    vertex_arrays: HashMap<VertexArrayHandle, VertexArray>,
    programs: HashMap<ShaderHandle, Program>,
    textures: HashMap<TextureHandle, GpuTexture>,
    bound: Bindings,

    warned_no_target: bool,
}

impl WgpuDriver {
    /// Creates a driver whose pipelines render into `target_format` views.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera uniforms+texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let white = upload_texture(
            &device,
            &queue,
            "tessera white texture",
            (1, 1),
            &[0xFF; 4],
            Filtering::NearestPixel,
            Wrapping::Repeat,
        );

        Self {
            device,
            queue,
            target_format,
            target: None,
            bind_group_layout,
            pipeline_layout,
            white,
            next_id: 0,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            bound: Bindings::default(),
            warned_no_target: false,
        }
    }

    /// Sets the view subsequent draws render into. `None` disables drawing.
    pub fn set_target(&mut self, target: Option<wgpu::TextureView>) {
        if target.is_some() {
            self.warned_no_target = false;
        }
        self.target = target;
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Changes the format pipelines are built for, dropping cached pipelines.
    pub fn set_target_format(&mut self, format: wgpu::TextureFormat) {
        if format == self.target_format {
            return;
        }
        self.target_format = format;
        for program in self.programs.values_mut() {
            program.pipelines.clear();
            program.rejected.clear();
        }
    }

    fn mint(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn bound_program(&mut self) -> Option<&mut Program> {
        let program = self.programs.get_mut(&self.bound.program);
        if program.is_none() {
            log::warn!("uniform set with no valid program in use");
        }
        program
    }
}

fn read_source(path: &Path) -> Result<String, GpuError> {
    std::fs::read_to_string(path).map_err(|source| GpuError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

fn vertex_format(attribute: Attribute) -> wgpu::VertexFormat {
    match attribute {
        Attribute::Float => wgpu::VertexFormat::Float32,
        Attribute::Float2 => wgpu::VertexFormat::Float32x2,
        Attribute::Float3 => wgpu::VertexFormat::Float32x3,
        Attribute::Float4 => wgpu::VertexFormat::Float32x4,
    }
}

fn filter_mode(filtering: Filtering) -> wgpu::FilterMode {
    match filtering {
        Filtering::NearestPixel => wgpu::FilterMode::Nearest,
        Filtering::Linear => wgpu::FilterMode::Linear,
    }
}

fn address_mode(wrapping: Wrapping) -> wgpu::AddressMode {
    match wrapping {
        Wrapping::Repeat => wgpu::AddressMode::Repeat,
        Wrapping::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        Wrapping::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    (width, height): (u32, u32),
    pixels: &[u8],
    filtering: Filtering,
    wrapping: Wrapping,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    if !pixels.is_empty() {
        queue.write_texture(
            texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let address = address_mode(wrapping);
    let filter = filter_mode(filtering);
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    });

    GpuTexture {
        _texture: texture,
        view,
        sampler,
    }
}

/// Builds the pipeline for `program` over `layout`, or returns the
/// validation error wgpu raised while doing so.
fn build_pipeline(
    device: &wgpu::Device,
    pipeline_layout: &wgpu::PipelineLayout,
    program: &Program,
    layout: &BufferLayout,
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, wgpu::Error> {
    let attributes: Vec<wgpu::VertexAttribute> = layout
        .offsets()
        .enumerate()
        .map(|(location, (attribute, offset))| wgpu::VertexAttribute {
            format: vertex_format(attribute),
            offset: u64::from(offset),
            shader_location: location as u32,
        })
        .collect();

    let label = format!("tessera {} pipeline", program.label);
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(pipeline_layout),

        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some(Stage::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: u64::from(layout.stride()),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
        },

        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some(Stage::Fragment.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(err),
        None => Ok(pipeline),
    }
}

impl GpuDriver for WgpuDriver {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle, GpuError> {
        let usage = match kind {
            BufferKind::Vertices => wgpu::BufferUsages::VERTEX,
            BufferKind::Indices => wgpu::BufferUsages::INDEX,
        };
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera buffer"),
            contents: data,
            usage,
        });

        let handle = BufferHandle(self.mint());
        self.buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buffer) = self.buffers.remove(&buffer) {
            buffer.destroy();
        }
    }

    fn create_vertex_array(
        &mut self,
        vertices: BufferHandle,
        layout: &BufferLayout,
        indices: BufferHandle,
        index_format: IndexFormat,
    ) -> Result<VertexArrayHandle, GpuError> {
        for buffer in [vertices, indices] {
            if !self.buffers.contains_key(&buffer) {
                return Err(GpuError::InvalidHandle {
                    kind: "buffer",
                    id: buffer.0,
                });
            }
        }

        let handle = VertexArrayHandle(self.mint());
        self.vertex_arrays.insert(
            handle,
            VertexArray {
                vertices,
                indices,
                index_format,
                layout: layout.clone(),
            },
        );
        Ok(handle)
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array);
        if self.bound.vertex_array == vertex_array {
            self.bound.vertex_array = VertexArrayHandle::NONE;
        }
    }

    fn create_shader(&mut self, source: &ShaderSource<'_>) -> Result<CompiledShader, GpuError> {
        let vertex_src = read_source(&source.vertex_path)?;
        let fragment_src = read_source(&source.fragment_path)?;

        let uniforms = UniformBlock::new(source.uniforms);
        for (stage, src) in [(Stage::Vertex, &vertex_src), (Stage::Fragment, &fragment_src)] {
            reflect::check_stage(source.label, stage, src, source.uniforms, &uniforms)?;
        }

        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", source.label)),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", source.label)),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(GpuError::ShaderCompile {
                label: source.label.to_string(),
                details: err.to_string(),
            });
        }

        let uniform_locations = uniforms.locations().clone();

        let handle = ShaderHandle(self.mint());
        self.programs.insert(
            handle,
            Program {
                label: source.label.to_string(),
                vertex,
                fragment,
                uniforms,
                pipelines: HashMap::new(),
                rejected: HashSet::new(),
            },
        );
        log::debug!("compiled shader '{}' as {:?}", source.label, handle);

        Ok(CompiledShader {
            label: source.label.to_string(),
            handle,
            uniform_locations,
        })
    }

    fn destroy_shader(&mut self, shader: ShaderHandle) {
        self.programs.remove(&shader);
        if self.bound.program == shader {
            self.bound.program = ShaderHandle::NONE;
        }
    }

    fn create_texture(
        &mut self,
        size: IVec2,
        pixels: Option<&[u8]>,
        filtering: Filtering,
        wrapping: Wrapping,
    ) -> Result<TextureHandle, GpuError> {
        let max = self.device.limits().max_texture_dimension_2d;
        let (width, height) = match (u32::try_from(size.x), u32::try_from(size.y)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 && w <= max && h <= max => (w, h),
            _ => {
                return Err(GpuError::TextureSize {
                    width: size.x,
                    height: size.y,
                })
            }
        };

        let pixels = pixels.unwrap_or(&[]);
        let expected = size.area() * 4;
        if !pixels.is_empty() && pixels.len() != expected {
            return Err(GpuError::TextureData {
                expected,
                actual: pixels.len(),
            });
        }

        let texture = upload_texture(
            &self.device,
            &self.queue,
            "tessera texture",
            (width, height),
            pixels,
            filtering,
            wrapping,
        );
        let handle = TextureHandle(self.mint());
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture);
        if self.bound.texture == texture {
            self.bound.texture = TextureHandle::NONE;
        }
    }

    fn use_program(&mut self, shader: ShaderHandle) {
        self.bound.program = shader;
    }

    fn set_uniform_mat3(&mut self, location: UniformLocation, value: &[f32; 9]) {
        if let Some(p) = self.bound_program() {
            p.uniforms.write_mat3(location, value);
        }
    }

    fn set_uniform_vec2(&mut self, location: UniformLocation, value: [f32; 2]) {
        if let Some(p) = self.bound_program() {
            p.uniforms.write_vec2(location, value);
        }
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        if let Some(p) = self.bound_program() {
            p.uniforms.write_vec4(location, value);
        }
    }

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32) {
        if let Some(p) = self.bound_program() {
            p.uniforms.write_f32(location, value);
        }
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        if let Some(p) = self.bound_program() {
            p.uniforms.write_i32(location, value);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if unit != 0 {
            log::warn!("texture unit {unit} is not supported; only unit 0 is sampled");
            return;
        }
        self.bound.texture = texture;
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.bound.vertex_array = vertex_array;
    }

    fn draw_indexed(&mut self, index_count: u32) {
        let Some(target) = self.target.as_ref() else {
            if !self.warned_no_target {
                log::warn!("draw issued with no render target; skipped");
                self.warned_no_target = true;
            }
            return;
        };

        let Some(vertex_array) = self.vertex_arrays.get(&self.bound.vertex_array) else {
            log::warn!("draw issued with no valid vertex array bound; skipped");
            return;
        };
        let (Some(vbo), Some(ibo)) = (
            self.buffers.get(&vertex_array.vertices),
            self.buffers.get(&vertex_array.indices),
        ) else {
            log::warn!("vertex array {:?} refers to destroyed buffers", self.bound.vertex_array);
            return;
        };

        let Some(program) = self.programs.get_mut(&self.bound.program) else {
            log::warn!("draw issued with no valid program in use; skipped");
            return;
        };
        if program.rejected.contains(&vertex_array.layout) {
            return;
        }
        if !program.pipelines.contains_key(&vertex_array.layout) {
            match build_pipeline(
                &self.device,
                &self.pipeline_layout,
                program,
                &vertex_array.layout,
                self.target_format,
            ) {
                Ok(pipeline) => {
                    program.pipelines.insert(vertex_array.layout.clone(), pipeline);
                }
                Err(err) => {
                    log::error!("pipeline for shader '{}' rejected; draws skipped: {err}", program.label);
                    program.rejected.insert(vertex_array.layout.clone());
                    return;
                }
            }
        }
        let Some(pipeline) = program.pipelines.get(&vertex_array.layout) else { return };

        let texture = self.textures.get(&self.bound.texture).unwrap_or(&self.white);

        let ubo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera draw ubo"),
            contents: program.uniforms.bytes(),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera draw bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        let index_format = match vertex_array.index_format {
            IndexFormat::U16 => wgpu::IndexFormat::Uint16,
            IndexFormat::U32 => wgpu::IndexFormat::Uint32,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera draw encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), index_format);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
