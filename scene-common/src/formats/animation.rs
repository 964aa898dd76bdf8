//! Animation record format
//!
//! # Layout
//! ```text
//! Header (20 bytes):
//! 0x00: skeleton i32          - target skeleton index (-1 = none)
//! 0x04: entity i32            - animated entity index
//! 0x08: playback_rate f32     - frames per second
//! 0x0C: frame_count u32
//! 0x10: pose_track_count u32
//!
//! Preceded by the animation name and followed by the pose tracks, then the
//! motion track. Each track is:
//! name (u32 length + UTF-8), track index i32, frame_count × KEYFRAME_SIZE.
//! ```
//!
//! A keyframe is translation f32×3 followed by the rotation quaternion in
//! (x, y, z, w) order.

/// Size of one keyframe in bytes (7 floats × 4 bytes = 28)
pub const KEYFRAME_SIZE: usize = 28;

/// Animation record header (20 bytes)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct AnimationHeader {
    pub skeleton: i32,
    pub entity: i32,
    pub playback_rate: f32,
    pub frame_count: u32,
    pub pose_track_count: u32,
}

impl AnimationHeader {
    pub const SIZE: usize = 20;

    pub fn new(
        skeleton: i32,
        entity: i32,
        playback_rate: f32,
        frame_count: u32,
        pose_track_count: u32,
    ) -> Self {
        Self {
            skeleton,
            entity,
            playback_rate,
            frame_count,
            pose_track_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.skeleton.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.entity.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.playback_rate.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.frame_count.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.pose_track_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let word = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        Some(Self {
            skeleton: i32::from_le_bytes(word(0)),
            entity: i32::from_le_bytes(word(4)),
            playback_rate: f32::from_le_bytes(word(8)),
            frame_count: u32::from_le_bytes(word(12)),
            pose_track_count: u32::from_le_bytes(word(16)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_header_roundtrip() {
        let header = AnimationHeader::new(-1, 3, 24.0, 48, 2);
        let parsed = AnimationHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed.skeleton, -1);
        assert_eq!(parsed.entity, 3);
        assert_eq!(parsed.playback_rate, 24.0);
        assert_eq!(parsed.frame_count, 48);
        assert_eq!(parsed.pose_track_count, 2);
    }

    #[test]
    fn test_animation_header_from_short_bytes() {
        assert!(AnimationHeader::from_bytes(&[0u8; 4]).is_none());
    }
}
