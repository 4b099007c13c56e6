//! Formation generator: five named pose layouts for N card slots.
//!
//! Pure geometry — given a count, each layout assigns one pose per slot:
//!   - `table`  — flat 20-column wall
//!   - `sphere` — Fibonacci-style distribution on a radius-900 sphere
//!   - `helix`  — two interleaved strands winding down the Y axis
//!   - `grid`   — 5x4x10 lattice, wrapping by modulo
//!   - `tetra`  — random scatter on the faces of an upright tetrahedron
//!
//! All five are generated in one call so a session can switch between any
//! pair without recomputation. Only `tetra` consumes entropy; the rng is
//! caller-supplied so tests (and reproducible sessions) can pin the scatter.

use std::f64::consts::PI;

use glam::DVec3;
use rand::Rng;

use super::{FormationName, Pose};

// Table: 20 columns, centered on a nominal 20x10 page.
const TABLE_COLS: usize = 20;
const TABLE_ROWS: usize = 10;
const TABLE_COL_SPACING: f64 = 200.0;
const TABLE_ROW_SPACING: f64 = 260.0;

const SPHERE_RADIUS: f64 = 900.0;

const HELIX_RADIUS: f64 = 780.0;
const HELIX_SEPARATION: f64 = 40.0;
const HELIX_STEP: f64 = 0.45;
const HELIX_Y_STEP: f64 = 55.0;

const GRID_DIMS: [usize; 3] = [5, 4, 10];
const GRID_SPACING: [f64; 3] = [360.0, 270.0, 420.0];

const TETRA_BASE: f64 = 1600.0;
const TETRA_BASE_Y: f64 = -700.0;
const TETRA_APEX_Y: f64 = 1300.0;
const TETRA_SURFACE_OFFSET: f64 = 60.0;
// Barycentric bias toward edges/vertices; points stay on the face.
const TETRA_EDGE_BIAS: f64 = 0.5;

/// Three sides + base, as indices into [`tetra_vertices`].
const TETRA_FACES: [[usize; 3]; 4] = [[0, 1, 3], [1, 2, 3], [2, 0, 3], [0, 1, 2]];

fn tetra_vertices() -> [DVec3; 4] {
    [
        DVec3::new(-TETRA_BASE, TETRA_BASE_Y, -TETRA_BASE),
        DVec3::new(TETRA_BASE, TETRA_BASE_Y, -TETRA_BASE),
        DVec3::new(0.0, TETRA_BASE_Y, TETRA_BASE),
        DVec3::new(0.0, TETRA_APEX_Y, 0.0),
    ]
}

/// One pose sequence per formation, all generated for the same count.
///
/// Invariant: every sequence holds exactly `count` poses.
#[derive(Debug, Clone)]
pub struct FormationSet {
    count: usize,
    table: Vec<Pose>,
    sphere: Vec<Pose>,
    helix: Vec<Pose>,
    grid: Vec<Pose>,
    tetra: Vec<Pose>,
}

impl FormationSet {
    /// The count the set was generated for.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The pose sequence for one formation, index-aligned to record order.
    pub fn poses(&self, name: FormationName) -> &[Pose] {
        match name {
            FormationName::Table => &self.table,
            FormationName::Sphere => &self.sphere,
            FormationName::Helix => &self.helix,
            FormationName::Grid => &self.grid,
            FormationName::Tetra => &self.tetra,
        }
    }
}

/// Generate all five formations for `count` slots.
///
/// `count` may be zero (five empty sequences). Everything except `tetra` is
/// deterministic in `count`; `tetra` draws two uniform samples per slot from
/// `rng`.
pub fn generate_formations(count: usize, rng: &mut impl Rng) -> FormationSet {
    FormationSet {
        count,
        table: table_poses(count),
        sphere: sphere_poses(count),
        helix: helix_poses(count),
        grid: grid_poses(count),
        tetra: tetra_poses(count, rng),
    }
}

/// Flat wall of 20 columns, facing forward.
fn table_poses(count: usize) -> Vec<Pose> {
    (0..count)
        .map(|i| {
            let col = (i % TABLE_COLS) as f64;
            let row = (i / TABLE_COLS) as f64;
            Pose::at(DVec3::new(
                (col - (TABLE_COLS - 1) as f64 / 2.0) * TABLE_COL_SPACING,
                -(row - (TABLE_ROWS - 1) as f64 / 2.0) * TABLE_ROW_SPACING,
                0.0,
            ))
        })
        .collect()
}

/// Fibonacci-style near-uniform sphere distribution.
///
/// theta = sqrt(N*pi) * phi traces a spiral over the latitudes; spacing is
/// close to uniform but not exactly so.
fn sphere_poses(count: usize) -> Vec<Pose> {
    let n = count as f64;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f64 / n).acos();
            let theta = (n * PI).sqrt() * phi;
            let position = SPHERE_RADIUS
                * DVec3::new(
                    theta.cos() * phi.sin(),
                    theta.sin() * phi.sin(),
                    phi.cos(),
                );
            // Face outward, away from the sphere center.
            Pose::looking_at(position, position * 2.0)
        })
        .collect()
}

/// Double helix: even indices on strand 0, odd on strand 1 (offset by pi).
fn helix_poses(count: usize) -> Vec<Pose> {
    (0..count)
        .map(|i| {
            let strand = i % 2;
            let j = (i / 2) as f64;
            let theta = j * HELIX_STEP + strand as f64 * PI;
            let half_sep = if strand == 0 {
                HELIX_SEPARATION / 2.0
            } else {
                -HELIX_SEPARATION / 2.0
            };
            let position = DVec3::new(
                HELIX_RADIUS * theta.sin(),
                -(j * HELIX_Y_STEP) + half_sep,
                HELIX_RADIUS * theta.cos(),
            );
            // Face outward from the helix axis: double x/z, keep y.
            let target = DVec3::new(position.x * 2.0, position.y, position.z * 2.0);
            Pose::looking_at(position, target)
        })
        .collect()
}

/// 5x4x10 lattice; indices beyond capacity wrap around by modulo.
fn grid_poses(count: usize) -> Vec<Pose> {
    let [gx, gy, gz] = GRID_DIMS;
    let [sx, sy, sz] = GRID_SPACING;
    (0..count)
        .map(|i| {
            let x = (i % gx) as f64;
            let y = ((i / gx) % gy) as f64;
            let z = ((i / (gx * gy)) % gz) as f64;
            Pose::at(DVec3::new(
                (x - (gx - 1) as f64 / 2.0) * sx,
                -(y - (gy - 1) as f64 / 2.0) * sy,
                (z - (gz - 1) as f64 / 2.0) * sz,
            ))
        })
        .collect()
}

/// Random scatter on the four faces of an upright tetrahedron.
///
/// Each point is a biased barycentric sample on the face `i % 4`, pushed 60
/// units out along the face normal so cards sit clearly on the surface.
fn tetra_poses(count: usize, rng: &mut impl Rng) -> Vec<Pose> {
    let verts = tetra_vertices();
    (0..count)
        .map(|i| {
            let [ai, bi, ci] = TETRA_FACES[i % TETRA_FACES.len()];
            let (a, b, c) = (verts[ai], verts[bi], verts[ci]);

            let mut u: f64 = rng.gen();
            let mut v: f64 = rng.gen::<f64>() * (1.0 - u);
            u = u * TETRA_EDGE_BIAS + u * u * (1.0 - TETRA_EDGE_BIAS);
            v = v * TETRA_EDGE_BIAS + v * v * (1.0 - TETRA_EDGE_BIAS);
            if u + v > 1.0 {
                u = 1.0 - u;
                v = 1.0 - v;
            }
            let w = 1.0 - u - v;

            let on_face = a * u + b * v + c * w;
            let normal = (b - a).cross(c - a).normalize();
            let position = on_face + normal * TETRA_SURFACE_OFFSET;

            // Face away from the tetrahedron's center.
            let target = position.normalize() * 4000.0;
            Pose::looking_at(position, target)
        })
        .collect()
}
