//! WebGPU dot surface
//!
//! One instanced quad per dot; the fragment shader cuts the circle out with a
//! signed distance and anti-aliases the edge. The instance vector is reused
//! across frames and the GPU buffer only grows when the dot count does.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

use super::DotSurface;
use crate::color::Rgb;
use crate::error::GridError;
use crate::grid::geometry::{RasterSpec, SurfaceSize};

// ============================================================================
// GPU DATA STRUCTURES (must match dots.wgsl)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Globals {
    /// Logical surface size
    resolution: [f32; 2],
    pixel_ratio: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DotInstance {
    pub center: [f32; 2],
    pub radius: f32,
    _pad: f32,
    pub color: [f32; 4],
}

impl DotInstance {
    pub fn new(center: Vec2, radius: f32, color: Rgb) -> Self {
        Self {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            color: color.to_f32(1.0),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DotInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Initial instance capacity (an 800×400 grid is 153 dots)
const INITIAL_INSTANCES: usize = 256;

pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<DotInstance>,
    layout: RasterSpec,
}

impl GpuSurface {
    pub async fn new(surface: wgpu::Surface<'static>, adapter: &wgpu::Adapter) -> Result<Self, GridError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("dot-grid-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| GridError::Gpu(format!("request_device: {e}")))?;

        let caps = surface.get_capabilities(adapter);
        log::debug!("Surface formats: {:?}", caps.formats);
        log::debug!("Surface alpha modes: {:?}", caps.alpha_modes);

        // Colors are sRGB bytes already; write them through untouched
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| GridError::Gpu("surface reports no formats".into()))?;
        let alpha_mode = if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        log::info!("GPU surface format {format:?}, alpha {alpha_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: 1,
            height: 1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dots_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("dots.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [1.0, 1.0],
                pixel_ratio: 1.0,
                _pad: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dots_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dots_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("dots_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dots_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[DotInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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

        let instance_buffer = Self::create_instance_buffer(&device, INITIAL_INSTANCES);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            bind_group,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCES,
            instances: Vec::with_capacity(INITIAL_INSTANCES),
            layout: RasterSpec::default(),
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dot_instances"),
            size: (std::mem::size_of::<DotInstance>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn reconfigure(&mut self) {
        if self.config.width > 0 && self.config.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let count = self.instances.len();
        if count > self.instance_capacity {
            let capacity = count.next_power_of_two();
            log::debug!("Growing instance buffer {} -> {}", self.instance_capacity, capacity);
            self.instance_buffer = Self::create_instance_buffer(&self.device, capacity);
            self.instance_capacity = capacity;
        }
        if count > 0 {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("dots_encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dots_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if count > 0 {
                let used = (std::mem::size_of::<DotInstance>() * count) as u64;
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..used));
                render_pass.draw(0..6, 0..count as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl DotSurface for GpuSurface {
    fn configure(&mut self, raster: &RasterSpec) {
        self.layout = *raster;
        if raster.is_empty() {
            return;
        }
        let max = self.device.limits().max_texture_dimension_2d;
        self.config.width = raster.pixel_width.min(max);
        self.config.height = raster.pixel_height.min(max);
        self.surface.configure(&self.device, &self.config);

        let globals = Globals {
            resolution: [raster.width, raster.height],
            pixel_ratio: raster.pixel_ratio,
            _pad: 0.0,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    fn logical_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.layout.width, self.layout.height)
    }

    fn begin_frame(&mut self) -> bool {
        if self.layout.is_empty() {
            return false;
        }
        self.instances.clear();
        true
    }

    fn clear(&mut self) {
        // Cleared by the render pass load op
    }

    fn fill_dot(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.instances.push(DotInstance::new(center, radius, color));
    }

    fn end_frame(&mut self) {
        match self.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("GPU out of memory"),
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }

    fn name(&self) -> &'static str {
        "webgpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DotInstance>(), 32);
        assert_eq!(std::mem::size_of::<Globals>(), 16);
        let desc = DotInstance::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes[2].offset, 16);
    }

    #[test]
    fn test_instance_color_is_normalized() {
        let inst = DotInstance::new(Vec2::new(3.0, 4.0), 8.0, Rgb::new(255, 0, 51));
        assert_eq!(inst.center, [3.0, 4.0]);
        assert_eq!(inst.color, [1.0, 0.0, 0.2, 1.0]);
    }
}
