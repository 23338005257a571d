//! Render context error types.

use spinsphere_mesh::MeshError;

/// Errors surfaced to the host by the render context.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The sphere mesh could not be built.
    #[error("failed to build sphere mesh: {0}")]
    Mesh(#[from] MeshError),

    /// The host reported a surface with a zero dimension.
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    /// A frame was requested before the surface size was known.
    #[error("draw_frame called before surface_changed")]
    SurfaceNotReady,

    /// The host passed a touch state code outside 0..=2.
    #[error("unknown touch state {0}")]
    UnknownTouchState(i32),
}
