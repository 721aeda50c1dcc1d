//! The source registry: an ordered, owned list of wave sources.
//!
//! Every mutation of the source set funnels through [`Registry`], so the
//! two invariants live here and nowhere else:
//!
//! - ids come from a counter that only increases and are never reused;
//! - a removal that would leave the registry empty is refused.
//!
//! Iteration order is insertion order. It matters: the field evaluator
//! composites proximity markers in this order.

use glam::Vec2;
use tracing::{debug, warn};

use crate::error::WaveError;
use crate::source::{Source, SourceId, SourceSpec};

/// Radius within which a pointer coordinate hits a source.
pub const HIT_RADIUS: f32 = 0.05;

/// Ordered collection of [`Source`]s with monotonic id assignment.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sources: Vec<Source>,
    next_id: u64,
}

impl Registry {
    /// Creates an empty registry whose first id will be 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `specs` in order, with ids 0, 1, 2, ...
    pub fn from_specs(specs: impl IntoIterator<Item = SourceSpec>) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            registry.add(spec);
        }
        registry
    }

    /// Appends a new source and returns its id.
    pub fn add(&mut self, spec: SourceSpec) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.sources.push(Source::from_spec(id, spec));
        debug!(id = id.0, x = spec.position.x, y = spec.position.y, "source added");
        id
    }

    /// Removes the source with `id`.
    ///
    /// Returns `false` if the id is unknown or the source is the last one.
    pub fn remove(&mut self, id: SourceId) -> bool {
        self.try_remove(id).is_ok()
    }

    /// Removes the source with `id`, reporting why a removal was refused.
    pub fn try_remove(&mut self, id: SourceId) -> Result<Source, WaveError> {
        let index = self.index_of(id).ok_or(WaveError::UnknownSource(id))?;
        self.remove_index(index)
    }

    /// Removes the source at `index` (0-based registry position).
    ///
    /// The last-source check runs before the bounds check, so an empty or
    /// single-source registry always answers `LastSource`.
    pub fn remove_index(&mut self, index: usize) -> Result<Source, WaveError> {
        if self.sources.len() <= 1 {
            warn!("refused to remove the last source");
            return Err(WaveError::LastSource);
        }
        let len = self.sources.len();
        let id = self
            .sources
            .get(index)
            .map(Source::id)
            .ok_or(WaveError::IndexOutOfRange { index, len })?;
        debug!(id = id.0, index, "source removed");
        Ok(self.sources.remove(index))
    }

    /// All sources in insertion order.
    pub fn all(&self) -> &[Source] {
        &self.sources
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the registry holds no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registry position of the source with `id`.
    pub fn index_of(&self, id: SourceId) -> Option<usize> {
        self.sources.iter().position(|s| s.id() == id)
    }

    /// The source with `id`, if present.
    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Mutable access to the source with `id`, if present.
    pub fn get_mut(&mut self, id: SourceId) -> Option<&mut Source> {
        self.sources.iter_mut().find(|s| s.id() == id)
    }

    /// The source at registry position `index`.
    pub fn at(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// Mutable access to the source at registry position `index`.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut Source> {
        self.sources.get_mut(index)
    }

    /// Appends default sources until `len() >= len`.
    ///
    /// Returns the ids of the sources created, in creation order. Nothing
    /// bounds `len`: a huge request allocates that many sources.
    pub fn extend_to(&mut self, len: usize) -> Vec<SourceId> {
        let missing = len.saturating_sub(self.sources.len());
        self.sources.reserve(missing);
        (0..missing)
            .map(|_| self.add(SourceSpec::command_default()))
            .collect()
    }

    /// First source (in registry order) within [`HIT_RADIUS`] of `coord`.
    pub fn hit_test(&self, coord: Vec2) -> Option<SourceId> {
        self.sources
            .iter()
            .find(|s| s.position.distance(coord) < HIT_RADIUS)
            .map(Source::id)
    }

    /// Moves the source with `id` to `coord`.
    pub fn move_source(&mut self, id: SourceId, coord: Vec2) -> Result<(), WaveError> {
        let source = self.get_mut(id).ok_or(WaveError::UnknownSource(id))?;
        source.position = coord;
        Ok(())
    }

    /// Advances every source's phase by `phase_speed * dt`.
    pub fn advance_phases(&mut self, dt: f32) {
        for source in &mut self.sources {
            source.phase += source.phase_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_at(x: f32, y: f32) -> SourceSpec {
        SourceSpec {
            position: Vec2::new(x, y),
            ..SourceSpec::command_default()
        }
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let mut reg = Registry::new();
        let a = reg.add(spec_at(0.1, 0.1));
        let b = reg.add(spec_at(0.2, 0.2));
        assert_eq!(a, SourceId(0));
        assert_eq!(b, SourceId(1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut reg = Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2)]);
        assert!(reg.remove(SourceId(1)));
        let c = reg.add(spec_at(0.3, 0.3));
        assert_eq!(c, SourceId(2));
    }

    #[test]
    fn remove_refuses_last_source() {
        let mut reg = Registry::from_specs([spec_at(0.5, 0.5)]);
        assert!(!reg.remove(SourceId(0)));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.try_remove(SourceId(0)), Err(WaveError::LastSource));
    }

    #[test]
    fn remove_unknown_id_returns_false() {
        let mut reg = Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2)]);
        assert!(!reg.remove(SourceId(99)));
        assert_eq!(
            reg.try_remove(SourceId(99)),
            Err(WaveError::UnknownSource(SourceId(99)))
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn removal_preserves_order_of_remaining() {
        let mut reg =
            Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2), spec_at(0.3, 0.3)]);
        reg.remove(SourceId(1));
        let ids: Vec<_> = reg.all().iter().map(Source::id).collect();
        assert_eq!(ids, vec![SourceId(0), SourceId(2)]);
    }

    #[test]
    fn remove_index_past_end_is_out_of_range() {
        let mut reg = Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2)]);
        assert_eq!(
            reg.remove_index(7).unwrap_err(),
            WaveError::IndexOutOfRange { index: 7, len: 2 }
        );
    }

    #[test]
    fn extend_to_appends_command_defaults() {
        let mut reg = Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2)]);
        let created = reg.extend_to(5);
        assert_eq!(created, vec![SourceId(2), SourceId(3), SourceId(4)]);
        assert_eq!(reg.len(), 5);
        let last = reg.at(4).unwrap();
        assert_eq!(last.spec(), SourceSpec::command_default());
    }

    #[test]
    fn extend_to_smaller_len_is_noop() {
        let mut reg = Registry::from_specs([spec_at(0.1, 0.1), spec_at(0.2, 0.2)]);
        assert!(reg.extend_to(1).is_empty());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn hit_test_returns_first_source_in_radius() {
        let reg = Registry::from_specs([spec_at(0.5, 0.5), spec_at(0.51, 0.5)]);
        assert_eq!(reg.hit_test(Vec2::new(0.52, 0.5)), Some(SourceId(0)));
        assert_eq!(reg.hit_test(Vec2::new(0.9, 0.9)), None);
    }

    #[test]
    fn move_source_updates_position_without_clamping() {
        let mut reg = Registry::from_specs([spec_at(0.5, 0.5)]);
        reg.move_source(SourceId(0), Vec2::new(1.5, -0.2)).unwrap();
        assert_eq!(reg.at(0).unwrap().position, Vec2::new(1.5, -0.2));
    }

    #[test]
    fn advance_phases_scales_by_dt() {
        let mut reg = Registry::from_specs([SourceSpec {
            phase_speed: 2.0,
            ..SourceSpec::command_default()
        }]);
        reg.advance_phases(0.25);
        assert!((reg.at(0).unwrap().phase - 0.5).abs() < 1e-6);
    }
}
