//! Per-surface render state and per-frame camera computation.
//!
//! The host view drives a [`RenderContext`] through its lifecycle callbacks:
//! `surface_created`, `surface_changed`, `draw_frame`, and `touch_event`. All
//! state lives in the context, so a torn-down surface is simply a dropped or
//! reset context.

use spinsphere_config::{AnimationConfig, CameraConfig, Config};
use spinsphere_math::{Mat4, Vec4};
use spinsphere_mesh::{ColoredVertex, SphereMesh};
use tracing::{debug, info};

use crate::error::RenderError;
use crate::input::TouchPhase;

/// Surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Everything the GPU layer needs to present one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Zero-based frame number since the surface was created.
    pub index: u64,
    /// RGBA clear color for the background.
    pub clear_color: [f32; 4],
    /// `projection * invert(rotation * translation)`.
    pub camera: Mat4,
}

/// Owns the sphere mesh and all animation state for one surface.
pub struct RenderContext {
    mesh: SphereMesh<u16>,
    vertices: Vec<ColoredVertex>,
    camera: CameraConfig,
    animation: AnimationConfig,
    viewport: Option<Viewport>,
    projection: Mat4,
    angle: f32,
    gray: f32,
    hold: bool,
    frame_index: u64,
}

impl RenderContext {
    /// Builds the sphere mesh described by `config`.
    ///
    /// Indices are 16-bit, the widest element type GLES 2 draws from.
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let mesh = SphereMesh::<u16>::generate(config.sphere.quality)?;
        let vertices = mesh.colored_vertices(config.sphere.radius);
        info!(
            quality = mesh.quality(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "sphere mesh ready"
        );

        Ok(Self {
            mesh,
            vertices,
            camera: config.camera.clone(),
            animation: config.animation.clone(),
            viewport: None,
            projection: Mat4::identity(),
            angle: 0.0,
            gray: 0.0,
            hold: false,
            frame_index: 0,
        })
    }

    /// Resets animation state for a fresh surface.
    pub fn surface_created(&mut self) {
        self.viewport = None;
        self.projection = Mat4::identity();
        self.angle = 0.0;
        self.gray = 0.0;
        self.hold = false;
        self.frame_index = 0;
        debug!("surface created");
    }

    /// Records the new surface size and rebuilds the projection.
    pub fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurface { width, height });
        }

        let viewport = Viewport { width, height };
        self.projection = Mat4::projection(
            self.camera.near,
            self.camera.fov_x,
            viewport.aspect_ratio(),
        );
        self.viewport = Some(viewport);
        debug!(width, height, "surface changed");
        Ok(())
    }

    /// Pressing lights the background and holds it; releasing lets it fade.
    pub fn touch_event(&mut self, x: f32, y: f32, phase: TouchPhase) {
        match phase {
            TouchPhase::Down => {
                self.gray = 1.0;
                self.hold = true;
            }
            TouchPhase::Move => {}
            TouchPhase::Up => self.hold = false,
        }
        debug!(x, y, ?phase, "touch");
    }

    /// Advances the animation by one frame.
    pub fn draw_frame(&mut self) -> Result<Frame, RenderError> {
        if self.viewport.is_none() {
            return Err(RenderError::SurfaceNotReady);
        }

        if !self.hold {
            self.gray = (self.gray - self.animation.fade_step).max(0.0);
        }

        let frame = Frame {
            index: self.frame_index,
            clear_color: [self.gray * 0.5, self.gray, self.gray, 1.0],
            camera: self.camera_matrix(),
        };

        self.angle += self.animation.rotation_speed;
        self.frame_index += 1;
        Ok(frame)
    }

    /// Camera matrix for the current rotation angle.
    ///
    /// The camera sits `distance` along +z, rotated about the configured axis
    /// around the sphere center, and looks back at the origin.
    pub fn camera_matrix(&self) -> Mat4 {
        let [x, y, z] = self.animation.rotation_axis;
        let rotation = Mat4::from_quat(Vec4::rotation(x, y, z, self.angle));
        let translation = Mat4::translation(0.0, 0.0, self.camera.distance);
        self.projection * (rotation * translation).invert()
    }

    pub fn mesh(&self) -> &SphereMesh<u16> {
        &self.mesh
    }

    /// Colored vertices at the configured radius.
    pub fn vertices(&self) -> &[ColoredVertex] {
        &self.vertices
    }

    /// Vertex buffer contents as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.mesh.indices())
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn gray(&self) -> f32 {
        self.gray
    }

    pub fn is_held(&self) -> bool {
        self.hold
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}
