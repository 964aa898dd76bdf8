//! Scene file header
//!
//! # Layout
//! ```text
//! 0x00: magic [u8; 4]   - "TSCN"
//! 0x04: version u32
//! 0x08: node_count u32  - entities + components
//! 0x0C: flags u32       - ExportFlags bits
//! ```

use crate::SCENE_FORMAT;

/// Option bits recorded in the scene header.
///
/// Mirrors the exporter's save toggles so a loader knows which sections were
/// populated on purpose and which are empty because they were switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportFlags(pub u32);

impl ExportFlags {
    pub const ANIMATIONS: u32 = 1 << 0;
    pub const MATERIALS: u32 = 1 << 1;
    pub const MESHES: u32 = 1 << 2;
    pub const PREFABS: u32 = 1 << 3;
    pub const OBJECTS: u32 = 1 << 4;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(Self::ANIMATIONS | Self::MATERIALS | Self::MESHES | Self::PREFABS | Self::OBJECTS)
    }

    pub fn set(&mut self, bit: u32, enabled: bool) {
        if enabled {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn contains(&self, bit: u32) -> bool {
        self.0 & bit == bit
    }
}

/// Scene file header (16 bytes)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SceneFileHeader {
    pub magic: [u8; 4],
    pub version: u32,
    /// Number of scene nodes (entities + components)
    pub node_count: u32,
    pub flags: ExportFlags,
}

impl SceneFileHeader {
    pub const SIZE: usize = 16;

    pub fn new(node_count: u32, flags: ExportFlags) -> Self {
        Self {
            magic: *SCENE_FORMAT.magic,
            version: SCENE_FORMAT.version,
            node_count,
            flags,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.node_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.flags.0.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` on short input or a magic mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if &magic != SCENE_FORMAT.magic {
            return None;
        }
        Some(Self {
            magic,
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            node_count: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            flags: ExportFlags(u32::from_le_bytes([
                bytes[12], bytes[13], bytes[14], bytes[15],
            ])),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_header_roundtrip() {
        let header = SceneFileHeader::new(7, ExportFlags::all());
        let parsed = SceneFileHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(&parsed.magic, b"TSCN");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.node_count, 7);
        assert_eq!(parsed.flags, ExportFlags::all());
    }

    #[test]
    fn test_scene_header_rejects_bad_magic() {
        let mut bytes = SceneFileHeader::new(1, ExportFlags::empty()).to_bytes();
        bytes[0] = b'X';
        assert!(SceneFileHeader::from_bytes(&bytes).is_none());
    }

    #[test]
    fn test_export_flags() {
        let mut flags = ExportFlags::all();
        assert!(flags.contains(ExportFlags::MESHES));
        flags.set(ExportFlags::MESHES, false);
        assert!(!flags.contains(ExportFlags::MESHES));
        assert!(flags.contains(ExportFlags::ANIMATIONS));
        flags.set(ExportFlags::MESHES, true);
        assert_eq!(flags, ExportFlags::all());
    }
}
