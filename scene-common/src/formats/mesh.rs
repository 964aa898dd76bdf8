//! Mesh record format
//!
//! Each geometry component carries one submesh, stored as its name followed
//! by this record.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: face_count u32
//! 0x08: material_count u32
//! 0x0C: skinned u8
//! 0x0D: padding (3 bytes)
//! 0x10: vertex_data (vertex_count × VERTEX_SIZE)
//! var:  face_data (face_count × 3 × u32)
//! var:  material indices (material_count × i32, -1 = no material)
//! ```
//!
//! Vertex layout (76 bytes): position f32×3, normal f32×3, tangent f32×3,
//! uv f32×2, weights f32×4, bone indices i32×4 (-1 = unused slot).

/// Size of one exported vertex in bytes
pub const VERTEX_SIZE: usize = 76;

/// Mesh record header (16 bytes)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct MeshHeader {
    pub vertex_count: u32,
    pub face_count: u32,
    pub material_count: u32,
    pub skinned: u8,
    pub _padding: [u8; 3],
}

impl MeshHeader {
    pub const SIZE: usize = 16;

    pub fn new(vertex_count: u32, face_count: u32, material_count: u32, skinned: bool) -> Self {
        Self {
            vertex_count,
            face_count,
            material_count,
            skinned: skinned as u8,
            _padding: [0; 3],
        }
    }

    pub fn is_skinned(&self) -> bool {
        self.skinned != 0
    }

    /// Size of the record body following the header
    pub fn body_size(&self) -> usize {
        self.vertex_count as usize * VERTEX_SIZE
            + self.face_count as usize * 12
            + self.material_count as usize * 4
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.face_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.material_count.to_le_bytes());
        bytes[12] = self.skinned;
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            face_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            material_count: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            skinned: bytes[12],
            _padding: [0; 3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_header_roundtrip() {
        let header = MeshHeader::new(8, 12, 1, false);
        let parsed = MeshHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed.vertex_count, 8);
        assert_eq!(parsed.face_count, 12);
        assert_eq!(parsed.material_count, 1);
        assert!(!parsed.is_skinned());
    }

    #[test]
    fn test_mesh_body_size() {
        let header = MeshHeader::new(8, 12, 1, false);
        assert_eq!(header.body_size(), 8 * VERTEX_SIZE + 12 * 12 + 4);
    }
}
