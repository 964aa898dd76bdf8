//! Scene file format constants.
//!
//! `SceneFormat` is the single source of truth for the exported scene file
//! constants (extension, magic bytes, version).
//!
//! # Example
//!
//! ```
//! use scene_common::SCENE_FORMAT;
//!
//! assert_eq!(SCENE_FORMAT.extension, "tscene");
//! assert_eq!(SCENE_FORMAT.magic, b"TSCN");
//! ```

/// Scene file format constants.
#[derive(Debug, Clone, Copy)]
pub struct SceneFormat {
    /// Scene file extension without dot (e.g., "tscene")
    pub extension: &'static str,

    /// Magic bytes at start of the scene file (4 bytes)
    pub magic: &'static [u8; 4],

    /// Format version for backward compatibility
    pub version: u32,
}

impl SceneFormat {
    /// Create a new scene format description.
    pub const fn new(extension: &'static str, magic: &'static [u8; 4], version: u32) -> Self {
        Self {
            extension,
            magic,
            version,
        }
    }
}

/// Engine scene format.
///
/// - Scene extension: `.tscene`
/// - Magic bytes: `TSCN`
pub const SCENE_FORMAT: SceneFormat = SceneFormat::new("tscene", b"TSCN", 1);
