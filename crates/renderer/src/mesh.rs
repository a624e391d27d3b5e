//! Hard-coded cube geometry and its GPU upload.

use std::mem::size_of;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glow::HasContext;

/// Position + normal vertex used by the lit cube.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LitVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const fn lit(position: [f32; 3], normal: [f32; 3]) -> LitVertex {
    LitVertex { position, normal }
}

/// Unit cube as 12 independent triangles, face normals per vertex.
#[rustfmt::skip]
pub const LIT_CUBE_VERTICES: [LitVertex; 36] = [
    // -Z
    lit([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]), lit([ 0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    lit([ 0.5,  0.5, -0.5], [0.0, 0.0, -1.0]), lit([ 0.5,  0.5, -0.5], [0.0, 0.0, -1.0]),
    lit([-0.5,  0.5, -0.5], [0.0, 0.0, -1.0]), lit([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0]),
    // +Z
    lit([-0.5, -0.5,  0.5], [0.0, 0.0, 1.0]), lit([ 0.5, -0.5,  0.5], [0.0, 0.0, 1.0]),
    lit([ 0.5,  0.5,  0.5], [0.0, 0.0, 1.0]), lit([ 0.5,  0.5,  0.5], [0.0, 0.0, 1.0]),
    lit([-0.5,  0.5,  0.5], [0.0, 0.0, 1.0]), lit([-0.5, -0.5,  0.5], [0.0, 0.0, 1.0]),
    // -X
    lit([-0.5,  0.5,  0.5], [-1.0, 0.0, 0.0]), lit([-0.5,  0.5, -0.5], [-1.0, 0.0, 0.0]),
    lit([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]), lit([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0]),
    lit([-0.5, -0.5,  0.5], [-1.0, 0.0, 0.0]), lit([-0.5,  0.5,  0.5], [-1.0, 0.0, 0.0]),
    // +X
    lit([ 0.5,  0.5,  0.5], [1.0, 0.0, 0.0]), lit([ 0.5,  0.5, -0.5], [1.0, 0.0, 0.0]),
    lit([ 0.5, -0.5, -0.5], [1.0, 0.0, 0.0]), lit([ 0.5, -0.5, -0.5], [1.0, 0.0, 0.0]),
    lit([ 0.5, -0.5,  0.5], [1.0, 0.0, 0.0]), lit([ 0.5,  0.5,  0.5], [1.0, 0.0, 0.0]),
    // -Y
    lit([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]), lit([ 0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    lit([ 0.5, -0.5,  0.5], [0.0, -1.0, 0.0]), lit([ 0.5, -0.5,  0.5], [0.0, -1.0, 0.0]),
    lit([-0.5, -0.5,  0.5], [0.0, -1.0, 0.0]), lit([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
    // +Y
    lit([-0.5,  0.5, -0.5], [0.0, 1.0, 0.0]), lit([ 0.5,  0.5, -0.5], [0.0, 1.0, 0.0]),
    lit([ 0.5,  0.5,  0.5], [0.0, 1.0, 0.0]), lit([ 0.5,  0.5,  0.5], [0.0, 1.0, 0.0]),
    lit([-0.5,  0.5,  0.5], [0.0, 1.0, 0.0]), lit([-0.5,  0.5, -0.5], [0.0, 1.0, 0.0]),
];

/// The eight shared corners of the outline cube.
#[rustfmt::skip]
pub const OUTLINE_CUBE_POSITIONS: [[f32; 3]; 8] = [
    [-0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5],
    [ 0.5,  0.5,  0.5],
    [-0.5,  0.5,  0.5],
    [-0.5, -0.5, -0.5],
    [ 0.5, -0.5, -0.5],
    [ 0.5,  0.5, -0.5],
    [-0.5,  0.5, -0.5],
];

/// `triangles_adjacency` indices: even slots hold the triangle, odd slots the
/// opposite vertex of the neighbour across each edge.
#[rustfmt::skip]
pub const OUTLINE_CUBE_INDICES: [u32; 72] = [
    6, 2, 5, 1, 4, 7,
    7, 2, 6, 5, 4, 3,
    0, 4, 1, 5, 2, 3,
    2, 7, 3, 4, 0, 1,
    3, 2, 7, 6, 4, 0,
    3, 7, 4, 1, 0, 2,
    2, 1, 5, 4, 6, 7,
    2, 0, 1, 4, 5, 6,
    4, 6, 5, 2, 1, 0,
    4, 5, 1, 2, 0, 3,
    2, 5, 6, 4, 7, 3,
    2, 6, 7, 4, 3, 0,
];

/// How a mesh is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawCall {
    Arrays { mode: u32, count: i32 },
    Elements { mode: u32, count: i32 },
}

/// A vertex array plus the buffers it owns.
pub struct Mesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    draw: DrawCall,
}

impl Mesh {
    /// Uploads [`LIT_CUBE_VERTICES`] with position at location 0 and normal at location 1.
    pub fn lit_cube(gl: &glow::Context) -> Result<Self> {
        let stride = size_of::<LitVertex>() as i32;
        unsafe {
            let vao = gl.create_vertex_array().map_err(|err| anyhow!(err))?;
            let vbo = gl.create_buffer().map_err(|err| anyhow!(err))?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&LIT_CUBE_VERTICES),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * size_of::<f32>() as i32);
            gl.enable_vertex_attrib_array(1);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                vao,
                vbo,
                ebo: None,
                draw: DrawCall::Arrays {
                    mode: glow::TRIANGLES,
                    count: LIT_CUBE_VERTICES.len() as i32,
                },
            })
        }
    }

    /// Uploads the shared-corner cube with its adjacency index buffer.
    pub fn outline_cube(gl: &glow::Context) -> Result<Self> {
        let stride = size_of::<[f32; 3]>() as i32;
        unsafe {
            let vao = gl.create_vertex_array().map_err(|err| anyhow!(err))?;
            let vbo = gl.create_buffer().map_err(|err| anyhow!(err))?;
            let ebo = gl.create_buffer().map_err(|err| anyhow!(err))?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&OUTLINE_CUBE_POSITIONS),
                glow::STATIC_DRAW,
            );
            // The element binding is recorded in the VAO, so it stays bound until the VAO is released.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&OUTLINE_CUBE_INDICES),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                vao,
                vbo,
                ebo: Some(ebo),
                draw: DrawCall::Elements {
                    mode: glow::TRIANGLES_ADJACENCY,
                    count: OUTLINE_CUBE_INDICES.len() as i32,
                },
            })
        }
    }

    pub fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            match self.draw {
                DrawCall::Arrays { mode, count } => gl.draw_arrays(mode, 0, count),
                DrawCall::Elements { mode, count } => {
                    gl.draw_elements(mode, count, glow::UNSIGNED_INT, 0)
                }
            }
            gl.bind_vertex_array(None);
        }
    }

    pub fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                gl.delete_buffer(ebo);
            }
        }
    }
}
