//! Scene data model: poses, scene objects and formation names.
//!
//! Everything here is pure pose math — no egui types, no HTTP, no person
//! fields. The renderer consumes poses through `SceneObject`, the generator
//! produces them in `formation`, and `transition` moves objects between them.

pub mod formation;
pub mod transition;

pub use formation::{generate_formations, FormationSet};
pub use transition::{apply_formation, TransitionError, Tween};

use glam::{DMat3, DMat4, DQuat, DVec3};

/// Position + orientation for one scene object.
///
/// Stored in f64 like the spreadsheet source's numbers; the renderer casts
/// down to f32 at projection time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Pose at `position` with no rotation (facing forward, +Z).
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Pose at `position`, rotated so the local +Z axis points at `target`.
    pub fn looking_at(position: DVec3, target: DVec3) -> Self {
        Self {
            position,
            rotation: look_rotation(target - position),
        }
    }

    /// The direction the pose faces (local +Z in world space).
    pub fn facing(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }
}

/// Rotation that points the local +Z axis along `forward` with +Y up.
///
/// A zero or vertical `forward` degrades gracefully: zero keeps the identity,
/// vertical falls back to +X as the right axis.
pub fn look_rotation(forward: DVec3) -> DQuat {
    let f = forward.normalize_or_zero();
    if f == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let mut right = DVec3::Y.cross(f);
    if right.length_squared() < 1e-12 {
        right = DVec3::X;
    } else {
        right = right.normalize();
    }
    let up = f.cross(right);
    DQuat::from_mat3(&DMat3::from_cols(right, up, f))
}

/// One renderable card slot in the 3D scene.
///
/// Owns a mutable current pose plus the cached local transform. The fields
/// are private so the matrix can never go stale: every pose write goes
/// through [`SceneObject::set_pose`], which recomputes it.
#[derive(Debug, Clone)]
pub struct SceneObject {
    position: DVec3,
    rotation: DQuat,
    matrix: DMat4,
}

impl SceneObject {
    pub fn new(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            matrix: DMat4::from_rotation_translation(pose.rotation, pose.position),
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Overwrite the full pose and recompute the transform matrix.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.matrix = DMat4::from_rotation_translation(pose.rotation, pose.position);
    }

    pub fn matrix(&self) -> &DMat4 {
        &self.matrix
    }
}

/// The five recognized formation layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormationName {
    Table,
    Sphere,
    Helix,
    Grid,
    Tetra,
}

impl FormationName {
    pub const ALL: [FormationName; 5] = [
        FormationName::Table,
        FormationName::Sphere,
        FormationName::Helix,
        FormationName::Grid,
        FormationName::Tetra,
    ];

    /// Parse a formation request string. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "table" => Some(FormationName::Table),
            "sphere" => Some(FormationName::Sphere),
            "helix" => Some(FormationName::Helix),
            "grid" => Some(FormationName::Grid),
            "tetra" => Some(FormationName::Tetra),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormationName::Table => "table",
            FormationName::Sphere => "sphere",
            FormationName::Helix => "helix",
            FormationName::Grid => "grid",
            FormationName::Tetra => "tetra",
        }
    }
}

impl std::fmt::Display for FormationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
