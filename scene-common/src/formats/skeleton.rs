//! Skeleton record format
//!
//! # Layout
//! ```text
//! 0x00: bone_count u32
//! 0x04: reserved u32
//! 0x08: bones (bone_count × variable)
//! ```
//!
//! The header is preceded by the skeleton name. Each bone is stored as: name
//! (u32 length + UTF-8 bytes), parent index i32 (-1 = root), rest matrix
//! (48 bytes, 3×4 column-major), length f32.

use glam::Mat4;

/// Size of one 3×4 bone matrix in bytes (12 floats × 4 bytes = 48)
pub const BONE_MATRIX_SIZE: usize = 48;

/// Skeleton record header (8 bytes)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SkeletonHeader {
    pub bone_count: u32,
    pub reserved: u32,
}

impl SkeletonHeader {
    pub const SIZE: usize = 8;

    pub fn new(bone_count: u32) -> Self {
        Self {
            bone_count,
            reserved: 0,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.bone_count.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            bone_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            reserved: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Flatten an affine matrix to 3×4 column-major: [col0.xyz, col1.xyz, col2.xyz, translation]
///
/// The projective row is dropped; exported transforms are always affine.
pub fn mat4_to_3x4(m: &Mat4) -> [f32; 12] {
    let c = m.to_cols_array();
    [
        c[0], c[1], c[2], // col0.xyz
        c[4], c[5], c[6], // col1.xyz
        c[8], c[9], c[10], // col2.xyz
        c[12], c[13], c[14], // translation
    ]
}
