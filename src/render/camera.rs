//! Orbit camera and perspective projection.
//!
//! Pure math, no egui types: the app shell converts [`Projected`] points to
//! screen primitives itself. 40 degree fov, near 1, far 10000, orbit
//! distance clamped to 800..6000.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

pub const FOV_Y_DEG: f32 = 40.0;
pub const NEAR: f32 = 1.0;
pub const FAR: f32 = 10_000.0;
pub const MIN_DISTANCE: f32 = 800.0;
pub const MAX_DISTANCE: f32 = 6_000.0;
pub const ROTATE_SPEED: f32 = 0.7;

/// Orbit camera state.
#[derive(Debug, Clone, Copy)]
pub struct CameraParams {
    /// Horizontal orbit angle in radians (0 = front).
    pub azimuth: f32,
    /// Vertical orbit angle in radians (positive = looking down).
    pub elevation: f32,
    /// Distance from the camera to the target point.
    pub distance: f32,
    /// Target point the camera looks at.
    pub target: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 3_000.0,
            target: Vec3::ZERO,
        }
    }
}

impl CameraParams {
    pub fn eye(&self) -> Vec3 {
        self.target
            + self.distance
                * Vec3::new(
                    self.azimuth.sin() * self.elevation.cos(),
                    self.elevation.sin(),
                    self.azimuth.cos() * self.elevation.cos(),
                )
    }

    /// Apply a drag delta in screen pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * ROTATE_SPEED * 0.005;
        self.elevation = (self.elevation + delta.y * ROTATE_SPEED * 0.005)
            .clamp(-1.5, 1.5);
    }

    /// Apply scroll input; positive scroll zooms in.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.001)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// A world point mapped to the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Projected {
    /// Screen position in viewport pixels (origin top-left).
    pub screen: Vec2,
    /// Distance along the view direction, for painter's-algorithm sorting.
    pub depth: f32,
    /// Pixels per world unit at that depth.
    pub scale: f32,
}

/// Precomputed view/projection for one frame.
pub struct Projector {
    view: Mat4,
    proj: Mat4,
    eye: Vec3,
    half_w: f32,
    half_h: f32,
    /// Vertical focal length in pixels.
    focal: f32,
}

impl Projector {
    pub fn new(camera: &CameraParams, width: f32, height: f32) -> Self {
        let aspect = (width / height.max(1.0)).max(1e-3);
        let eye = camera.eye();
        Self {
            view: Mat4::look_at_rh(eye, camera.target, Vec3::Y),
            proj: Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, NEAR, FAR),
            eye,
            half_w: width / 2.0,
            half_h: height / 2.0,
            focal: (height / 2.0) / (FOV_Y_DEG.to_radians() / 2.0).tan(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Project a world point; `None` when it is behind the near plane.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let view_pos = self.view * world.extend(1.0);
        // Camera looks down -Z in view space.
        if view_pos.z > -NEAR {
            return None;
        }
        let clip = self.proj * view_pos;
        let ndc = clip.xyz() / clip.w;
        let depth = -view_pos.z;
        Some(Projected {
            screen: Vec2::new(
                self.half_w * (1.0 + ndc.x),
                self.half_h * (1.0 - ndc.y),
            ),
            depth,
            scale: self.focal / depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_viewport_center() {
        let cam = CameraParams::default();
        let projector = Projector::new(&cam, 1280.0, 800.0);
        let p = projector.project(cam.target).unwrap();
        assert!((p.screen - Vec2::new(640.0, 400.0)).length() < 1e-2);
        assert!((p.depth - cam.distance).abs() < 1e-2);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = CameraParams::default();
        let projector = Projector::new(&cam, 1280.0, 800.0);
        // Default camera sits at +Z looking at the origin; a point beyond
        // the eye is behind it.
        assert!(projector.project(Vec3::new(0.0, 0.0, 4_000.0)).is_none());
    }

    #[test]
    fn closer_points_draw_larger() {
        let cam = CameraParams::default();
        let projector = Projector::new(&cam, 1280.0, 800.0);
        let near = projector.project(Vec3::new(0.0, 0.0, 1_000.0)).unwrap();
        let far = projector.project(Vec3::new(0.0, 0.0, -1_000.0)).unwrap();
        assert!(near.scale > far.scale);
        assert!(near.depth < far.depth);
    }

    #[test]
    fn zoom_clamps_to_orbit_range() {
        let mut cam = CameraParams::default();
        cam.zoom(1e9);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(-1e9);
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn orbit_clamps_elevation() {
        let mut cam = CameraParams::default();
        cam.orbit(Vec2::new(0.0, 1e6));
        assert_eq!(cam.elevation, 1.5);
    }
}
