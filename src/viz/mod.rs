//! Visualization session: the explicit context object tying scene objects,
//! formations and transitions together.
//!
//! One session owns one object list and one formation set, both sized for
//! the record count given to [`Visualization::open`]. The host drives it
//! from its frame loop: `transform_to` on user input, `tick` once per frame,
//! and drops (or `dispose`s) the session when the view closes.

use std::time::Duration;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scene::{
    apply_formation, generate_formations, FormationName, FormationSet, Pose, SceneObject,
    TransitionError, Tween,
};

/// Initial scatter range: each coordinate uniform in [-2000, 2000].
const SCATTER_HALF_RANGE: f64 = 2000.0;

pub struct Visualization {
    objects: Vec<SceneObject>,
    formations: FormationSet,
    current: FormationName,
    tween: Option<Tween>,
}

impl Visualization {
    /// Open a session for `count` records.
    ///
    /// Objects come up at random scatter positions, all five formations are
    /// generated once, and the session immediately snaps to `table` — the
    /// starting formation. Pass a seed to pin the scatter (and the `tetra`
    /// face sampling); `None` draws from OS entropy.
    pub fn open(count: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let objects: Vec<SceneObject> = (0..count)
            .map(|_| {
                let scatter = DVec3::new(
                    rng.gen::<f64>() * 2.0 * SCATTER_HALF_RANGE - SCATTER_HALF_RANGE,
                    rng.gen::<f64>() * 2.0 * SCATTER_HALF_RANGE - SCATTER_HALF_RANGE,
                    rng.gen::<f64>() * 2.0 * SCATTER_HALF_RANGE - SCATTER_HALF_RANGE,
                );
                SceneObject::new(Pose::at(scatter))
            })
            .collect();

        let formations = generate_formations(count, &mut rng);

        let mut session = Self {
            objects,
            formations,
            current: FormationName::Table,
            tween: None,
        };
        // Counts match by construction; a failure here would be a bug.
        if let Err(e) = apply_formation(&mut session.objects, session.formations.poses(FormationName::Table)) {
            log::error!("initial table formation failed: {}", e);
        }
        session
    }

    /// Request a formation by its string name.
    ///
    /// An unrecognized name is reported and nothing moves. A zero duration
    /// snaps instantly; otherwise a tween starts (replacing any in-flight
    /// one — the newest request wins).
    pub fn transform_to(
        &mut self,
        name: &str,
        duration: Duration,
    ) -> Result<FormationName, TransitionError> {
        let formation = FormationName::parse(name)
            .ok_or_else(|| TransitionError::UnknownFormation(name.to_string()))?;
        self.transform(formation, duration)?;
        Ok(formation)
    }

    /// Request a formation by name, already parsed.
    pub fn transform(
        &mut self,
        formation: FormationName,
        duration: Duration,
    ) -> Result<(), TransitionError> {
        let poses = self.formations.poses(formation);
        if duration.is_zero() {
            apply_formation(&mut self.objects, poses)?;
            self.tween = None;
        } else {
            self.tween = Some(Tween::new(&self.objects, poses.to_vec(), duration)?);
        }
        log::debug!("formation -> {} ({} objects)", formation, self.objects.len());
        self.current = formation;
        Ok(())
    }

    /// Advance an in-flight transition by `dt`.
    ///
    /// Returns true when object poses changed, i.e. the host should redraw.
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.tween.as_mut() {
            Some(tween) => {
                if tween.advance(dt, &mut self.objects) {
                    self.tween = None;
                }
                true
            }
            None => false,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn current_formation(&self) -> FormationName {
        self.current
    }

    pub fn in_transition(&self) -> bool {
        self.tween.is_some()
    }

    /// End the session, releasing the object list.
    pub fn dispose(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_in_table_formation() {
        let viz = Visualization::open(30, Some(5));
        assert_eq!(viz.current_formation(), FormationName::Table);
        assert_eq!(viz.object_count(), 30);
        let table = viz.formations.poses(FormationName::Table);
        for (obj, pose) in viz.objects().iter().zip(table) {
            assert_eq!(obj.position(), pose.position);
        }
    }

    #[test]
    fn empty_session_is_a_no_op() {
        let mut viz = Visualization::open(0, Some(5));
        assert_eq!(viz.object_count(), 0);
        viz.transform_to("sphere", Duration::ZERO).unwrap();
        assert_eq!(viz.current_formation(), FormationName::Sphere);
        assert!(!viz.tick(Duration::from_millis(16)));
    }

    #[test]
    fn unknown_name_moves_nothing() {
        let mut viz = Visualization::open(10, Some(5));
        let before: Vec<_> = viz.objects().iter().map(|o| o.pose()).collect();

        let err = viz.transform_to("cube", Duration::ZERO).unwrap_err();
        assert_eq!(err, TransitionError::UnknownFormation("cube".into()));
        assert_eq!(viz.current_formation(), FormationName::Table);
        for (obj, pose) in viz.objects().iter().zip(&before) {
            assert_eq!(obj.pose(), *pose);
        }
    }

    #[test]
    fn instant_transform_snaps_to_the_formation() {
        let mut viz = Visualization::open(25, Some(5));
        viz.transform_to("helix", Duration::ZERO).unwrap();
        let helix = viz.formations.poses(FormationName::Helix);
        for (obj, pose) in viz.objects().iter().zip(helix) {
            assert_eq!(obj.position(), pose.position);
            assert_eq!(obj.rotation(), pose.rotation);
        }
        assert!(!viz.in_transition());
    }

    #[test]
    fn timed_transform_tweens_then_settles() {
        let mut viz = Visualization::open(8, Some(5));
        viz.transform_to("grid", Duration::from_millis(200)).unwrap();
        assert!(viz.in_transition());

        assert!(viz.tick(Duration::from_millis(50)));
        assert!(viz.in_transition());

        assert!(viz.tick(Duration::from_secs(1)));
        assert!(!viz.in_transition());
        let grid = viz.formations.poses(FormationName::Grid);
        for (obj, pose) in viz.objects().iter().zip(grid) {
            assert_eq!(obj.position(), pose.position);
        }
        // Settled: nothing left to animate.
        assert!(!viz.tick(Duration::from_millis(16)));
    }

    #[test]
    fn newest_request_replaces_a_running_tween() {
        let mut viz = Visualization::open(8, Some(5));
        viz.transform_to("sphere", Duration::from_millis(500)).unwrap();
        viz.tick(Duration::from_millis(100));
        viz.transform_to("tetra", Duration::from_millis(500)).unwrap();
        assert_eq!(viz.current_formation(), FormationName::Tetra);

        viz.tick(Duration::from_secs(2));
        let tetra = viz.formations.poses(FormationName::Tetra);
        for (obj, pose) in viz.objects().iter().zip(tetra) {
            assert_eq!(obj.position(), pose.position);
        }
    }

    #[test]
    fn scatter_is_reproducible_with_a_seed() {
        let a = Visualization::open(12, Some(77));
        let b = Visualization::open(12, Some(77));
        let ta = a.formations.poses(FormationName::Tetra);
        let tb = b.formations.poses(FormationName::Tetra);
        for (pa, pb) in ta.iter().zip(tb) {
            assert_eq!(pa.position, pb.position);
        }
    }
}
