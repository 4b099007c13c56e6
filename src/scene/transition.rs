//! Transition engine: apply a formation's poses to the live object list.
//!
//! The core apply is an instant snap — every object's pose is overwritten
//! and its transform recomputed, after which the caller issues one redraw.
//! Animated transitions are layered on top as an explicit [`Tween`] that the
//! host advances once per frame; the engine never schedules frames itself.

use std::time::Duration;

use super::{Pose, SceneObject};

/// Error during a formation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Requested name is not one of the five recognized formations.
    UnknownFormation(String),
    /// Object list and pose list were generated for different counts.
    CountMismatch { objects: usize, poses: usize },
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::UnknownFormation(name) => {
                write!(f, "unknown formation \"{}\"", name)
            }
            TransitionError::CountMismatch { objects, poses } => {
                write!(f, "count mismatch: {} objects vs {} poses", objects, poses)
            }
        }
    }
}

/// Snap every object to its index-aligned pose.
///
/// The length check runs before any mutation: on `CountMismatch` all poses
/// are left untouched. A mismatch can only arise from a caller bug (poses
/// generated for a different N), so it is reported, never recovered here.
pub fn apply_formation(
    objects: &mut [SceneObject],
    poses: &[Pose],
) -> Result<(), TransitionError> {
    if objects.len() != poses.len() {
        return Err(TransitionError::CountMismatch {
            objects: objects.len(),
            poses: poses.len(),
        });
    }
    for (object, pose) in objects.iter_mut().zip(poses) {
        object.set_pose(pose);
    }
    Ok(())
}

/// An in-flight animated transition.
///
/// Captures start poses at creation, then interpolates toward the targets:
/// positions lerp, rotations slerp, both under a cubic ease-in-out. The last
/// step snaps exactly onto the targets.
#[derive(Debug, Clone)]
pub struct Tween {
    start: Vec<Pose>,
    target: Vec<Pose>,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    /// Begin a tween from the objects' current poses toward `target`.
    ///
    /// `duration` must be nonzero (use [`apply_formation`] for an instant
    /// snap) and the counts must match.
    pub fn new(
        objects: &[SceneObject],
        target: Vec<Pose>,
        duration: Duration,
    ) -> Result<Self, TransitionError> {
        if objects.len() != target.len() {
            return Err(TransitionError::CountMismatch {
                objects: objects.len(),
                poses: target.len(),
            });
        }
        let duration = duration.max(Duration::from_millis(1));
        Ok(Self {
            start: objects.iter().map(|o| o.pose()).collect(),
            target,
            duration,
            elapsed: Duration::ZERO,
        })
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and write interpolated poses onto `objects`.
    ///
    /// Returns true once the tween has reached (and snapped onto) the
    /// targets. `objects` must be the same list the tween was created from.
    pub fn advance(&mut self, dt: Duration, objects: &mut [SceneObject]) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let eased = ease_in_out_cubic(t);

        for (i, object) in objects.iter_mut().enumerate() {
            let (from, to) = match (self.start.get(i), self.target.get(i)) {
                (Some(from), Some(to)) => (from, to),
                _ => break,
            };
            let pose = if t >= 1.0 {
                *to
            } else {
                Pose {
                    position: from.position.lerp(to.position, eased),
                    rotation: from.rotation.slerp(to.rotation, eased),
                }
            };
            object.set_pose(&pose);
        }
        self.finished()
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{generate_formations, FormationName};
    use glam::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn objects(n: usize) -> Vec<SceneObject> {
        (0..n)
            .map(|i| SceneObject::new(Pose::at(DVec3::splat(i as f64))))
            .collect()
    }

    #[test]
    fn apply_copies_every_pose() {
        for n in [0usize, 1, 100] {
            let mut objs = objects(n);
            let mut rng = StdRng::seed_from_u64(3);
            let set = generate_formations(n, &mut rng);
            let poses = set.poses(FormationName::Sphere);
            apply_formation(&mut objs, poses).unwrap();
            for (obj, pose) in objs.iter().zip(poses) {
                assert_eq!(obj.position(), pose.position);
                assert_eq!(obj.rotation(), pose.rotation);
            }
        }
    }

    #[test]
    fn mismatch_leaves_objects_untouched() {
        let mut objs = objects(5);
        let before: Vec<Pose> = objs.iter().map(|o| o.pose()).collect();
        let poses: Vec<Pose> = (0..4).map(|_| Pose::at(DVec3::new(9.0, 9.0, 9.0))).collect();

        let err = apply_formation(&mut objs, &poses).unwrap_err();
        assert_eq!(err, TransitionError::CountMismatch { objects: 5, poses: 4 });
        for (obj, pose) in objs.iter().zip(&before) {
            assert_eq!(obj.pose(), *pose);
        }
    }

    #[test]
    fn tween_rejects_mismatched_counts() {
        let objs = objects(3);
        let target: Vec<Pose> = vec![Pose::IDENTITY; 2];
        assert!(matches!(
            Tween::new(&objs, target, Duration::from_secs(1)),
            Err(TransitionError::CountMismatch { objects: 3, poses: 2 })
        ));
    }

    #[test]
    fn tween_midpoint_is_strictly_between() {
        let mut objs = objects(1);
        let start = objs[0].position();
        let end = DVec3::new(1000.0, 0.0, 0.0);
        let mut tween =
            Tween::new(&objs, vec![Pose::at(end)], Duration::from_secs(1)).unwrap();

        let done = tween.advance(Duration::from_millis(500), &mut objs);
        assert!(!done);
        let mid = objs[0].position();
        assert!(mid.x > start.x && mid.x < end.x, "mid={:?}", mid);
    }

    #[test]
    fn tween_end_snaps_exactly_onto_targets() {
        let mut objs = objects(4);
        let target: Vec<Pose> = (0..4)
            .map(|i| {
                Pose::looking_at(DVec3::new(i as f64 * 10.0, 5.0, -3.0), DVec3::ZERO)
            })
            .collect();
        let mut tween = Tween::new(&objs, target.clone(), Duration::from_millis(300)).unwrap();

        // Overshoot past the end; poses must be bit-exact targets.
        assert!(tween.advance(Duration::from_secs(2), &mut objs));
        for (obj, pose) in objs.iter().zip(&target) {
            assert_eq!(obj.position(), pose.position);
            assert_eq!(obj.rotation(), pose.rotation);
        }
    }

    #[test]
    fn easing_hits_the_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
    }
}
