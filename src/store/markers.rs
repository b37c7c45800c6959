use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{Mode, PointId};
use crate::map::MarkerHandle;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    pub point_id: PointId,
    pub handle: MarkerHandle,
    pub role: Mode,
}

#[derive(Clone, Debug, Default)]
pub struct MarkerRegistry {
    entries: BTreeMap<PointId, MarkerEntry>,
}

impl MarkerRegistry {
    /// Returns the entry it replaced, which the caller must destroy.
    pub fn register(&mut self, point_id: PointId, handle: MarkerHandle, role: Mode) -> Option<MarkerEntry> {
        self.entries.insert(
            point_id,
            MarkerEntry {
                point_id,
                handle,
                role,
            },
        )
    }

    pub fn detach(&mut self, point_id: PointId) -> Option<MarkerEntry> {
        self.entries.remove(&point_id)
    }

    pub fn drain(&mut self) -> Vec<MarkerEntry> {
        std::mem::take(&mut self.entries).into_values().collect()
    }

    pub fn get(&self, point_id: PointId) -> Option<&MarkerEntry> {
        self.entries.get(&point_id)
    }

    pub fn point_for(&self, handle: MarkerHandle) -> Option<PointId> {
        self.entries
            .values()
            .find(|entry| entry.handle == handle)
            .map(|entry| entry.point_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &MarkerEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[test]
fn register_detach_and_lookup() {
    let mut registry = MarkerRegistry::default();
    let handle = MarkerHandle::new();

    assert!(registry.register(PointId(1), handle, Mode::From).is_none());
    registry.register(PointId(2), MarkerHandle::new(), Mode::To);

    assert_eq!(registry.point_for(handle), Some(PointId(1)));
    assert_eq!(registry.get(PointId(2)).map(|entry| entry.role), Some(Mode::To));

    let entry = registry.detach(PointId(1)).unwrap();
    assert_eq!(entry.handle, handle);
    assert_eq!(registry.len(), 1);
    assert!(registry.detach(PointId(1)).is_none());
    assert_eq!(registry.point_for(handle), None);
}

#[test]
fn drain_empties_the_registry() {
    let mut registry = MarkerRegistry::default();
    registry.register(PointId(1), MarkerHandle::new(), Mode::From);
    registry.register(PointId(2), MarkerHandle::new(), Mode::To);

    let drained = registry.drain();

    assert_eq!(drained.len(), 2);
    assert!(registry.is_empty());
}
