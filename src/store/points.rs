use crate::entities::{Coordinates, Mode, PointId, RouteData, RouteDataPoint, RoutePair, RoutePoint};

#[derive(Clone, Debug, Default)]
pub struct PointStore {
    from_points: Vec<RoutePoint>,
    to_points: Vec<RoutePoint>,
    last_id: u64,
}

impl PointStore {
    pub fn next_id(&mut self) -> PointId {
        self.last_id += 1;
        PointId(self.last_id)
    }

    pub fn create(&mut self, mode: Mode, coordinates: Coordinates, address: String) -> RoutePoint {
        let point = RoutePoint::new(self.next_id(), coordinates, address);
        self.append(mode, point.clone());
        point
    }

    pub fn append(&mut self, mode: Mode, point: RoutePoint) {
        match mode {
            Mode::From => self.from_points.push(point),
            Mode::To => self.to_points.push(point),
        }
    }

    pub fn remove(&mut self, id: PointId) -> Option<(Mode, RoutePoint)> {
        if let Some(position) = self.from_points.iter().position(|point| point.id == id) {
            return Some((Mode::From, self.from_points.remove(position)));
        }

        if let Some(position) = self.to_points.iter().position(|point| point.id == id) {
            return Some((Mode::To, self.to_points.remove(position)));
        }

        None
    }

    pub fn clear(&mut self) {
        self.from_points.clear();
        self.to_points.clear();
    }

    pub fn from_points(&self) -> &[RoutePoint] {
        &self.from_points
    }

    pub fn to_points(&self) -> &[RoutePoint] {
        &self.to_points
    }

    pub fn len(&self) -> usize {
        self.from_points.len() + self.to_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            store: self,
            index: 0,
        }
    }

    pub fn pair(&self, index: usize) -> Option<RoutePair> {
        self.pairs().nth(index)
    }

    pub fn route_data(&self) -> RouteData {
        RouteData {
            from_points: self.from_points.iter().map(RouteDataPoint::from).collect(),
            to_points: self.to_points.iter().map(RouteDataPoint::from).collect(),
        }
    }
}

pub struct Pairs<'a> {
    store: &'a PointStore,
    index: usize,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = RoutePair;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let from = self.store.from_points.get(index);
        let to = self.store.to_points.get(index);

        if from.is_none() && to.is_none() {
            return None;
        }

        self.index += 1;

        Some(RoutePair {
            index,
            from: from.cloned(),
            to: to.cloned(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self
            .store
            .from_points
            .len()
            .max(self.store.to_points.len());
        let remaining = total.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Pairs<'a> {}

#[cfg(test)]
fn store_with(from: usize, to: usize) -> PointStore {
    let mut store = PointStore::default();

    for i in 0..from {
        store.create(Mode::From, Coordinates::new(29.0, 47.0 + i as f64), format!("from {}", i));
    }
    for i in 0..to {
        store.create(Mode::To, Coordinates::new(29.5, 47.0 + i as f64), format!("to {}", i));
    }

    store
}

#[test]
fn pairs_cover_the_longer_sequence() {
    for (from, to) in [(0, 0), (1, 0), (0, 2), (3, 1), (2, 2), (1, 4)] {
        let store = store_with(from, to);
        let pairs: Vec<RoutePair> = store.pairs().collect();

        assert_eq!(pairs.len(), from.max(to));
        assert_eq!(store.pairs().len(), from.max(to));

        for pair in pairs {
            assert_eq!(pair.is_complete(), pair.index < from && pair.index < to);
        }
    }
}

#[test]
fn pairs_are_restartable() {
    let store = store_with(2, 1);

    let first: Vec<RoutePair> = store.pairs().collect();
    let second: Vec<RoutePair> = store.pairs().collect();

    assert_eq!(first, second);
}

#[test]
fn ids_are_unique_across_removal_and_clear() {
    let mut store = PointStore::default();

    let a = store.create(Mode::From, Coordinates::new(29.0, 47.0), "a".into());
    store.remove(a.id);
    let b = store.create(Mode::From, Coordinates::new(29.0, 47.0), "a".into());
    store.clear();
    let c = store.create(Mode::To, Coordinates::new(29.0, 47.0), "a".into());

    assert_ne!(a.id, b.id);
    assert_ne!(b.id, c.id);
    assert_ne!(a.id, c.id);
}

#[test]
fn remove_only_touches_the_owning_sequence() {
    let mut store = store_with(2, 2);
    let id = store.to_points()[1].id;

    let removed = store.remove(id);

    assert_eq!(removed.map(|(mode, point)| (mode, point.id)), Some((Mode::To, id)));
    assert_eq!(store.from_points().len(), 2);
    assert_eq!(store.to_points().len(), 1);

    assert_eq!(store.remove(id), None);
    assert_eq!(store.remove(PointId(999)), None);
    assert_eq!(store.len(), 3);
}

#[test]
fn duplicate_coordinates_are_allowed() {
    let mut store = PointStore::default();

    store.create(Mode::From, Coordinates::new(29.0, 47.0), "same".into());
    store.create(Mode::From, Coordinates::new(29.0, 47.0), "same".into());

    assert_eq!(store.from_points().len(), 2);
}

#[test]
fn clear_empties_both_sequences() {
    let mut store = store_with(3, 2);

    store.clear();

    assert!(store.is_empty());
    assert_eq!(store.pairs().count(), 0);
    assert!(store.route_data().is_empty());
}
