//! Integer types usable as triangle indices.

use std::fmt::Debug;

/// An unsigned integer type that can be stored in a mesh index buffer.
pub trait MeshIndex: Copy + Debug + PartialEq + bytemuck::Pod + 'static {
    /// Number of distinct vertices this type can address.
    const MAX_VERTICES: usize;

    /// Converts a vertex position, or `None` if it does not fit.
    fn from_usize(index: usize) -> Option<Self>;

    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($ty:ty),*) => {
        $(
            impl MeshIndex for $ty {
                const MAX_VERTICES: usize = (<$ty>::MAX as usize).saturating_add(1);

                #[inline]
                fn from_usize(index: usize) -> Option<Self> {
                    <$ty>::try_from(index).ok()
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u8, u16, u32);
