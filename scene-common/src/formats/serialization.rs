//! Binary serialization trait for format headers.
//!
//! Every scene section header implements `BinarySerializable`, giving generic
//! code one interface while each header keeps its type-specific `to_bytes()`
//! returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait returns `Vec<u8>` because associated const generics in return
/// types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use scene_common::formats::{BinarySerializable, SkeletonHeader};
///
/// let header = SkeletonHeader::new(12);
///
/// // Using the trait (returns Vec<u8>)
/// let bytes = header.serialize();
/// let parsed = SkeletonHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.bone_count, 12);
///
/// // Using the type-specific method (returns [u8; 8])
/// let bytes_array = header.to_bytes();
/// assert_eq!(bytes_array.len(), 8);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_binary_serializable {
    ($($header:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $header {
                const SIZE: usize = <$header>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    self.to_bytes().to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    Self::from_bytes(bytes)
                }
            }
        )*
    };
}

impl_binary_serializable!(
    super::SceneFileHeader,
    super::SectionHeader,
    super::MeshHeader,
    super::SkeletonHeader,
    super::AnimationHeader,
);
