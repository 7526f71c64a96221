//! wgpu molecule renderer
//!
//! Implements [`Canvas`] by collecting one instance per filled circle; the
//! collected frame is drawn by [`MoleculeRenderer::render`] as instanced quads
//! whose fragment shader cuts out the circle.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::canvas::{background_color, Canvas, Rgba};
use crate::projection::{ProjectionUniform, ScreenProjection};

/// Initial instance buffer capacity, in circles
const MIN_CAPACITY: usize = 64;

/// One filled circle (matches WGSL `Circle`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _padding: f32,
    /// Linear-light RGBA
    pub color: [f32; 4],
}

impl CircleInstance {
    pub fn new(center: DVec2, radius: f64, color: Rgba) -> Self {
        Self {
            center: center.as_vec2().to_array(),
            radius: radius as f32,
            _padding: 0.0,
            color: color.to_linear(),
        }
    }
}

pub struct MoleculeRenderer {
    render_pipeline: wgpu::RenderPipeline,
    projection_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    bind_group: wgpu::BindGroup,
    projection: ScreenProjection,

    // Frame being recorded through `Canvas`
    clear_color: Rgba,
    instances: Vec<CircleInstance>,
}

impl MoleculeRenderer {
    /// `canvas_width`/`canvas_height` are the simulation extent in pixels.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let projection = ScreenProjection::new(canvas_width, canvas_height);

        let projection_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Projection Buffer"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let instance_buffer = Self::create_instance_buffer(device, MIN_CAPACITY);

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Molecule Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/molecule.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Molecule Bind Group Layout"),
            entries: &[
                // Projection (Uniform) - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Circles (Storage) - Binding 1
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = Self::create_bind_group(
            device,
            &bind_group_layout,
            &projection_buffer,
            &instance_buffer,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Molecule Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Molecule Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vertex"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fragment"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::info!(
            "Molecule renderer ready ({}x{} canvas, {:?})",
            canvas_width,
            canvas_height,
            format
        );

        Self {
            render_pipeline,
            projection_buffer,
            bind_group_layout,
            instance_buffer,
            instance_capacity: MIN_CAPACITY,
            bind_group,
            projection,
            clear_color: background_color(),
            instances: Vec::with_capacity(MIN_CAPACITY),
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Circle Instance Buffer"),
            size: (capacity * std::mem::size_of::<CircleInstance>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        projection_buffer: &wgpu::Buffer,
        instance_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Molecule Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: projection_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: instance_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Grow the instance buffer (and rebuild its bind group) if the recorded
    /// frame does not fit.
    fn ensure_capacity(&mut self, device: &wgpu::Device) {
        if self.instances.len() <= self.instance_capacity {
            return;
        }

        let capacity = self.instances.len().next_power_of_two();
        log::debug!(
            "Growing circle buffer from {} to {} instances",
            self.instance_capacity,
            capacity
        );

        self.instance_buffer = Self::create_instance_buffer(device, capacity);
        self.instance_capacity = capacity;
        self.bind_group = Self::create_bind_group(
            device,
            &self.bind_group_layout,
            &self.projection_buffer,
            &self.instance_buffer,
        );
    }

    /// Circles recorded since the last clear
    pub fn instances(&self) -> &[CircleInstance] {
        &self.instances
    }

    pub fn projection(&self) -> &ScreenProjection {
        &self.projection
    }

    /// Draw the recorded frame into `view`.
    pub fn render(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        self.ensure_capacity(device);

        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::cast_slice(&[self.projection.to_uniform()]),
        );
        if !self.instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }

        let [r, g, b, a] = self.clear_color.to_linear();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Molecule Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Molecule Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..6, 0..self.instances.len() as u32);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

impl Canvas for MoleculeRenderer {
    fn size(&self) -> (u32, u32) {
        (self.projection.width as u32, self.projection.height as u32)
    }

    fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.instances.clear();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.instances.push(CircleInstance::new(center, radius, color));
    }
}
