//! Vertex and index buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertex and index buffers ready for indexed drawing.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    /// Bind the buffers and draw every index once.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Index data in either width.
pub enum IndexData<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexData<'_> {
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            IndexData::U16(data) => data.len() as u32,
            IndexData::U32(data) => data.len() as u32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(data) => bytemuck::cast_slice(data),
            IndexData::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Creates labeled GPU buffers on one device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_mesh<V: Pod>(&self, label: &str, vertices: &[V], indices: IndexData) -> MeshBuffer {
        let vertex_buffer = self.init_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = self.init_buffer(
            &format!("{label}-indices"),
            indices.as_bytes(),
            wgpu::BufferUsages::INDEX,
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.count(),
            index_format: indices.format(),
        }
    }

    /// A uniform buffer initialized with `value`, writable every frame.
    pub fn create_uniform<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.init_buffer(
            label,
            bytemuck::bytes_of(value),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn init_buffer(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_device;

    #[test]
    fn test_index_data_format_and_count() {
        let small = [0u16, 1, 2, 2, 1, 3];
        let large = [0u32, 1, 2];
        assert_eq!(IndexData::U16(&small).format(), wgpu::IndexFormat::Uint16);
        assert_eq!(IndexData::U16(&small).count(), 6);
        assert_eq!(IndexData::U16(&small).as_bytes().len(), 12);
        assert_eq!(IndexData::U32(&large).format(), wgpu::IndexFormat::Uint32);
        assert_eq!(IndexData::U32(&large).as_bytes().len(), 12);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<_> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn test_create_mesh_sizes() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let vertices = [VertexPositionNormalUv::zeroed(); 4];
        let indices = [0u32, 1, 2, 2, 1, 3];
        let mesh = BufferAllocator::new(&device).create_mesh("quad", &vertices, IndexData::U32(&indices));
        assert_eq!(mesh.index_count, 6);
        assert_eq!(mesh.vertex_buffer.size(), 4 * 32);
        assert_eq!(mesh.index_format, wgpu::IndexFormat::Uint32);
    }
}
