//! Draws the cached glyph mesh in the current render mode.
//!
//! One shader, one (mvp, color) uniform, two pipelines over it:
//! - a triangle-list pipeline for solid fill,
//! - a line-list pipeline for wireframe edges and contour loops.
//!
//! Geometry is small (one glyph), so the renderer uploads the mode's
//! vertex/index set on each draw into grow-on-demand buffers rather than
//! keeping per-mode GPU caches.

use std::{borrow::Cow, mem};

use glam::Mat4;

use crate::mesh::GlyphMesh;
use crate::render::gpu::Gpu;
use crate::viewer::RenderMode;

/// Canvas clear color (the frame is all background when no mesh is cached).
pub const BACKGROUND: wgpu::Color = wgpu::Color::WHITE;
/// Ink color for contours, wireframe edges, and solid fill.
const FOREGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}

fn round_up_to(v: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (v + (align - 1)) & !(align - 1)
}

pub struct GlyphRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    vertex_buffer: wgpu::Buffer,
    vertex_capacity_bytes: u64,
    index_buffer: wgpu::Buffer,
    index_capacity_bytes: u64,
}

impl GlyphRenderer {
    pub fn new(gpu: &Gpu) -> Self {
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("glyph_shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/glyph.wgsl"
                ))),
            });

        let uniform_layout = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glyph_uniform_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            mem::size_of::<Uniforms>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glyph_uniforms"),
            size: mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glyph_uniform_bg"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("glyph_pipeline_layout"),
                bind_group_layouts: &[&uniform_layout],
                immediate_size: 0,
            });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            gpu.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        buffers: &[Vertex::layout()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: gpu.surface_format.add_srgb_suffix(),
                            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
        };

        let fill_pipeline = make_pipeline("glyph_fill", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = make_pipeline("glyph_lines", wgpu::PrimitiveTopology::LineList);

        let initial = 1024u64;
        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glyph_vertices"),
            size: initial,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glyph_indices"),
            size: initial,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            fill_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            vertex_capacity_bytes: initial,
            index_buffer,
            index_capacity_bytes: initial,
        }
    }

    /// Draw the mesh (if any) in the given mode into an already-cleared pass.
    ///
    /// An absent mesh draws nothing: the caller's clear is the whole frame.
    pub fn draw(
        &mut self,
        gpu: &Gpu,
        pass: &mut wgpu::RenderPass<'_>,
        mesh: Option<&GlyphMesh>,
        mode: RenderMode,
        mvp: Mat4,
    ) {
        let Some(mesh) = mesh else {
            return;
        };

        let (vertices, indices) = match mode {
            RenderMode::Contours => contour_lines(mesh),
            RenderMode::Wireframe => (mesh_vertices(mesh), mesh.wire_indices()),
            RenderMode::Solid => (mesh_vertices(mesh), mesh.indices.clone()),
        };

        if vertices.is_empty() || indices.is_empty() {
            return;
        }

        let vb_bytes = (vertices.len() * mem::size_of::<Vertex>()) as u64;
        let ib_bytes = (indices.len() * mem::size_of::<u16>()) as u64;
        self.ensure_capacity(
            gpu,
            round_up_to(vb_bytes, wgpu::COPY_BUFFER_ALIGNMENT),
            round_up_to(ib_bytes, wgpu::COPY_BUFFER_ALIGNMENT),
        );

        write_padded(gpu, &self.vertex_buffer, bytemuck::cast_slice(&vertices));
        write_padded(gpu, &self.index_buffer, bytemuck::cast_slice(&indices));

        let uniforms = Uniforms {
            mvp: mvp.to_cols_array_2d(),
            color: FOREGROUND,
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let pipeline = match mode {
            RenderMode::Solid => &self.fill_pipeline,
            RenderMode::Contours | RenderMode::Wireframe => &self.line_pipeline,
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vb_bytes));
        pass.set_index_buffer(self.index_buffer.slice(..ib_bytes), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..(indices.len() as u32), 0, 0..1);
    }

    fn ensure_capacity(&mut self, gpu: &Gpu, vb_bytes: u64, ib_bytes: u64) {
        if vb_bytes > self.vertex_capacity_bytes {
            let new_size = vb_bytes.next_power_of_two().max(1024);
            self.vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("glyph_vertices"),
                size: new_size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.vertex_capacity_bytes = new_size;
        }

        if ib_bytes > self.index_capacity_bytes {
            let new_size = ib_bytes.next_power_of_two().max(1024);
            self.index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("glyph_indices"),
                size: new_size,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.index_capacity_bytes = new_size;
        }
    }
}

/// Queue a buffer write padded to `COPY_BUFFER_ALIGNMENT`.
fn write_padded(gpu: &Gpu, buffer: &wgpu::Buffer, data: &[u8]) {
    let padded_len = round_up_to(data.len() as u64, wgpu::COPY_BUFFER_ALIGNMENT) as usize;
    if padded_len == data.len() {
        gpu.queue.write_buffer(buffer, 0, data);
    } else {
        let mut padded = Vec::with_capacity(padded_len);
        padded.extend_from_slice(data);
        padded.resize(padded_len, 0);
        gpu.queue.write_buffer(buffer, 0, &padded);
    }
}

fn mesh_vertices(mesh: &GlyphMesh) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .map(|&position| Vertex { position })
        .collect()
}

/// Line-list geometry for the outline contours: each contour becomes a
/// closed loop of edges over its own vertex run.
fn contour_lines(mesh: &GlyphMesh) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for contour in &mesh.contours {
        if contour.len() < 2 {
            continue;
        }
        assert!(
            vertices.len() + contour.len() <= usize::from(u16::MAX),
            "contour vertex count overflows u16 indices"
        );

        let base = vertices.len() as u16;
        let n = contour.len() as u16;
        vertices.extend(contour.iter().map(|&position| Vertex { position }));
        for k in 0..n {
            indices.extend_from_slice(&[base + k, base + (k + 1) % n]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with_contours(contours: Vec<Vec<[f32; 2]>>) -> GlyphMesh {
        GlyphMesh {
            positions: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
            contours,
        }
    }

    #[test]
    fn contour_lines_close_each_loop() {
        let mesh = mesh_with_contours(vec![
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 3.0]],
        ]);
        let (vertices, indices) = contour_lines(&mesh);

        assert_eq!(vertices.len(), 7);
        // One edge per contour point, two indices per edge.
        assert_eq!(indices.len(), (3 + 4) * 2);
        // The last edge of the first loop returns to its start.
        assert_eq!(&indices[4..6], &[2, 0]);
        // The second loop indexes its own vertex run.
        assert_eq!(indices[6], 3);
        assert_eq!(&indices[12..14], &[6, 3]);
    }

    #[test]
    fn degenerate_contours_are_skipped() {
        let mesh = mesh_with_contours(vec![vec![[0.0, 0.0]], vec![]]);
        let (vertices, indices) = contour_lines(&mesh);
        assert!(vertices.is_empty());
        assert!(indices.is_empty());
    }
}
