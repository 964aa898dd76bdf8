//! Section header
//!
//! # Layout
//! ```text
//! 0x00: kind u32   - SectionKind discriminant
//! 0x04: count u32  - number of records that follow
//! ```

/// Scene file sections, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SectionKind {
    Textures = 1,
    Materials = 2,
    Skeletons = 3,
    Animations = 4,
    Entities = 5,
    Components = 6,
    World = 7,
    Scene = 8,
}

impl SectionKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            1 => Self::Textures,
            2 => Self::Materials,
            3 => Self::Skeletons,
            4 => Self::Animations,
            5 => Self::Entities,
            6 => Self::Components,
            7 => Self::World,
            8 => Self::Scene,
            _ => return None,
        })
    }
}

/// Section header (8 bytes)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct SectionHeader {
    pub kind: SectionKind,
    pub count: u32,
}

impl SectionHeader {
    pub const SIZE: usize = 8;

    pub fn new(kind: SectionKind, count: u32) -> Self {
        Self { kind, count }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&(self.kind as u32).to_le_bytes());
        bytes[4..8].copy_from_slice(&self.count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let kind = SectionKind::from_u32(u32::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ]))?;
        Some(Self {
            kind,
            count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_matches_export_order() {
        let order = [
            SectionKind::Textures,
            SectionKind::Materials,
            SectionKind::Skeletons,
            SectionKind::Animations,
            SectionKind::Entities,
            SectionKind::Components,
            SectionKind::World,
            SectionKind::Scene,
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unknown_section_kind() {
        let mut bytes = SectionHeader::new(SectionKind::World, 1).to_bytes();
        bytes[0] = 42;
        assert!(SectionHeader::from_bytes(&bytes).is_none());
    }
}
