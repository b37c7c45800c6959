use super::{ConsoleState, Engine, Notice};

use async_trait::async_trait;

use crate::{
    api::PointAPI,
    entities::{Coordinates, Mode, PointId, RouteData, RoutePoint},
    error::{invalid_input_error, Error},
    map::MarkerHandle,
};

impl Engine {
    async fn detach_point(&self, state: &mut ConsoleState, id: PointId) -> bool {
        if state.points.remove(id).is_none() {
            return false;
        }

        if let Some(entry) = state.markers.detach(id) {
            self.map.destroy_marker(entry.handle).await;
        }

        true
    }

    async fn remove_points(&self, ids: &[PointId]) -> bool {
        let plan = {
            let mut state = self.state.lock().await;

            let mut removed = false;
            for id in ids {
                removed |= self.detach_point(&mut state, *id).await;
            }

            if !removed {
                return false;
            }

            let plan = self.begin_redraw(&mut state).await;
            self.publish(&state);
            plan
        };

        self.finish_redraw(plan).await;

        true
    }
}

#[async_trait]
impl PointAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn capture_point(&self, coordinates: Coordinates) -> Result<Option<RoutePoint>, Error> {
        if !coordinates.is_valid() {
            return Err(invalid_input_error());
        }

        let session = {
            let mut state = self.state.lock().await;
            state.pending_captures += 1;
            self.publish(&state);
            state.session
        };

        let address = match self.geocoder.reverse_geocode(coordinates).await {
            Ok(address) => address,
            Err(err) => {
                tracing::debug!(?err, "reverse geocode failed, using coordinates");
                coordinates.fallback_address()
            }
        };

        let mut state = self.state.lock().await;
        state.pending_captures = state.pending_captures.saturating_sub(1);

        if state.session != session {
            tracing::warn!("dropping capture started before the points were cleared");
            self.publish(&state);
            return Ok(None);
        }

        let mode = state.mode.mode();
        let point = state.points.create(mode, coordinates, address);

        let handle = self
            .map
            .create_marker(coordinates, &point.address, mode.into())
            .await;
        if let Some(replaced) = state.markers.register(point.id, handle, mode) {
            self.map.destroy_marker(replaced.handle).await;
        }

        let plan = self.begin_redraw(&mut state).await;
        state.mode.switch();
        self.publish(&state);
        drop(state);

        self.notify(Notice::PointAdded {
            role: mode,
            address: point.address.clone(),
        });
        self.finish_redraw(plan).await;

        Ok(Some(point))
    }

    #[tracing::instrument(skip(self))]
    async fn remove_point(&self, id: PointId) -> Result<(), Error> {
        if self.remove_points(&[id]).await {
            self.notify(Notice::PointRemoved);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn click_marker(&self, handle: MarkerHandle) -> Result<(), Error> {
        let id = self.state.lock().await.markers.point_for(handle);

        if let Some(id) = id {
            self.remove_point(id).await?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_route(&self, index: usize) -> Result<(), Error> {
        let pair = self.state.lock().await.points.pair(index);

        let ids: Vec<PointId> = match pair {
            Some(pair) => [pair.from, pair.to]
                .into_iter()
                .flatten()
                .map(|point| point.id)
                .collect(),
            None => return Ok(()),
        };

        if self.remove_points(&ids).await {
            self.notify(Notice::RouteDeleted { number: index + 1 });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn clear_points(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        state.points.clear();
        for entry in state.markers.drain() {
            self.map.destroy_marker(entry.handle).await;
        }
        state.session += 1;

        // nothing left to draw, the plan is empty
        self.begin_redraw(&mut state).await;
        self.publish(&state);
        drop(state);

        self.notify(Notice::AllPointsCleared);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn switch_mode(&self) -> Result<Mode, Error> {
        let mut state = self.state.lock().await;
        let mode = state.mode.switch();
        self.publish(&state);

        Ok(mode)
    }

    #[tracing::instrument(skip(self))]
    async fn set_mode(&self, mode: Mode) -> Result<Mode, Error> {
        let mut state = self.state.lock().await;
        state.mode.set_mode(mode);
        self.publish(&state);

        Ok(mode)
    }

    #[tracing::instrument(skip(self))]
    async fn route_data(&self) -> Result<RouteData, Error> {
        Ok(self.state.lock().await.points.route_data())
    }
}

#[cfg(test)]
use crate::{
    api::ConsoleAPI,
    testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Gate, Harness},
};
#[cfg(test)]
use tokio_test::block_on;

#[test]
fn capture_alternates_mode_and_pairs_up() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        let first = engine.capture_point(at(29.10, 47.90)).await.unwrap().unwrap();
        let data = engine.route_data().await.unwrap();
        assert_eq!((data.from_points.len(), data.to_points.len()), (1, 0));
        assert_eq!(engine.state.lock().await.mode.mode(), Mode::To);
        assert_eq!(first.address, FakeGeocoder::address_for(at(29.10, 47.90)));

        engine.capture_point(at(29.20, 48.00)).await.unwrap();
        let data = engine.route_data().await.unwrap();
        assert_eq!((data.from_points.len(), data.to_points.len()), (1, 1));
        assert_eq!(engine.state.lock().await.mode.mode(), Mode::From);

        let state = engine.state.lock().await;
        assert_eq!(state.points.pairs().filter(|pair| pair.is_complete()).count(), 1);
        assert_eq!(state.markers.len(), 2);
    });
}

#[test]
fn every_capture_flips_the_mode() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        engine.set_mode(Mode::To).await.unwrap();

        for i in 0..7 {
            let before = engine.state.lock().await.mode.mode();
            engine
                .capture_point(at(29.0 + i as f64 / 10.0, 47.5))
                .await
                .unwrap();
            let after = engine.state.lock().await.mode.mode();

            assert_ne!(before, after);
        }
    });
}

#[test]
fn failed_reverse_geocode_falls_back_to_coordinates() {
    let geocoder = FakeGeocoder {
        fail_reverse: true,
        ..Default::default()
    };
    let harness = Harness::with(
        geocoder,
        FakeDirections::default(),
        FakePricing::default(),
        FakeOrders::default(),
    );

    block_on(async {
        let point = harness
            .engine
            .capture_point(at(29.3759, 47.9774))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(point.address, "29.375900, 47.977400");
        assert_eq!(harness.scene.view().await.markers[0].title, "29.375900, 47.977400");
    });
}

#[test]
fn invalid_coordinates_are_rejected() {
    let harness = Harness::new();

    block_on(async {
        let result = harness.engine.capture_point(at(120.0, 47.0)).await;

        assert_eq!(result, Err(invalid_input_error()));
        assert_eq!(harness.scene.marker_count().await, 0);
    });
}

#[test]
fn remove_point_drops_exactly_one_marker() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80)] {
            engine.capture_point(coordinates).await.unwrap();
        }
        let to_id = engine.route_data().await.unwrap().to_points[0].id;

        engine.remove_point(to_id).await.unwrap();

        let data = engine.route_data().await.unwrap();
        assert_eq!(data.from_points.len(), 2);
        assert_eq!(data.to_points.len(), 0);
        assert_eq!(engine.state.lock().await.markers.len(), 2);
        assert_eq!(harness.scene.marker_count().await, 2);
        assert_eq!(harness.scene.route_count().await, 0);

        // removal is total
        engine.remove_point(to_id).await.unwrap();
        engine.remove_point(PointId(4242)).await.unwrap();
        assert_eq!(harness.scene.marker_count().await, 2);
    });
}

#[test]
fn marker_click_removes_its_point() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        let point = engine.capture_point(at(29.10, 47.90)).await.unwrap().unwrap();
        let handle = engine.state.lock().await.markers.get(point.id).unwrap().handle;

        engine.click_marker(handle).await.unwrap();
        engine.click_marker(handle).await.unwrap();

        assert!(engine.route_data().await.unwrap().is_empty());
        assert_eq!(harness.scene.marker_count().await, 0);
    });
}

#[test]
fn delete_route_reflows_later_pairs() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        // from = [A, B], to = [C, D]
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80), at(29.40, 47.70)] {
            engine.capture_point(coordinates).await.unwrap();
        }
        let before = engine.route_data().await.unwrap();

        engine.delete_route(0).await.unwrap();

        let after = engine.route_data().await.unwrap();
        assert_eq!(after.from_points, vec![before.from_points[1].clone()]);
        assert_eq!(after.to_points, vec![before.to_points[1].clone()]);

        let state = engine.state.lock().await;
        let pairs: Vec<_> = state.points.pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].index, 0);
        assert_eq!(state.markers.len(), 2);
        assert_eq!(state.drawn_routes.len(), 1);
    });
}

#[test]
fn delete_route_with_one_side_removes_only_that_side() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        // from = [A, B], to = [C]
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80)] {
            engine.capture_point(coordinates).await.unwrap();
        }

        engine.delete_route(1).await.unwrap();
        engine.delete_route(7).await.unwrap();

        let data = engine.route_data().await.unwrap();
        assert_eq!(data.from_points.len(), 1);
        assert_eq!(data.to_points.len(), 1);
        assert_eq!(harness.scene.marker_count().await, 2);
    });
}

#[test]
fn clear_leaves_nothing_behind() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80), at(29.40, 47.70)] {
            engine.capture_point(coordinates).await.unwrap();
        }
        assert_eq!(harness.scene.route_count().await, 2);

        engine.clear_points().await.unwrap();

        let data = engine.route_data().await.unwrap();
        assert!(data.from_points.is_empty());
        assert!(data.to_points.is_empty());
        assert!(engine.state.lock().await.markers.is_empty());
        assert!(engine.state.lock().await.drawn_routes.is_empty());
        assert_eq!(harness.scene.marker_count().await, 0);
        assert_eq!(harness.scene.route_count().await, 0);
    });
}

#[test]
fn capture_in_flight_across_clear_is_dropped() {
    let gate = Gate::closed();
    let geocoder = FakeGeocoder {
        reverse_gate: Some(gate.clone()),
        ..Default::default()
    };
    let harness = Harness::with(
        geocoder,
        FakeDirections::default(),
        FakePricing::default(),
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        let (captured, _) = futures::join!(engine.capture_point(at(29.10, 47.90)), async {
            assert!(engine.state.lock().await.snapshot().loading);
            engine.clear_points().await.unwrap();
            gate.release(1);
        });

        assert_eq!(captured, Ok(None));
        assert!(engine.route_data().await.unwrap().is_empty());
        assert_eq!(harness.scene.marker_count().await, 0);
        assert!(!engine.state.lock().await.snapshot().loading);
        assert_eq!(engine.state.lock().await.mode.mode(), Mode::From);
    });
}

#[test]
fn concurrent_captures_get_distinct_ids_and_resolve_out_of_order() {
    let gate = Gate::closed();
    let geocoder = FakeGeocoder {
        reverse_gate: Some(gate.clone()),
        ..Default::default()
    };
    let harness = Harness::with(
        geocoder,
        FakeDirections::default(),
        FakePricing::default(),
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        let (first, second, _) = futures::join!(
            engine.capture_point(at(29.10, 47.90)),
            engine.capture_point(at(29.20, 48.00)),
            async {
                assert_eq!(engine.state.lock().await.pending_captures, 2);
                gate.release(2);
            }
        );

        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();
        assert_ne!(first.id, second.id);

        let data = engine.route_data().await.unwrap();
        assert_eq!((data.from_points.len(), data.to_points.len()), (1, 1));
        assert_eq!(engine.state.lock().await.markers.len(), 2);
        assert_eq!(engine.state.lock().await.pending_captures, 0);
    });
}

#[test]
fn removals_notify_only_when_something_went() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        // from = [A, B], to = [C, D]
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80), at(29.40, 47.70)] {
            engine.capture_point(coordinates).await.unwrap();
        }
        let removed = engine.route_data().await.unwrap().from_points[0].id;
        engine.take_notices().await.unwrap();

        engine.remove_point(removed).await.unwrap();
        engine.remove_point(removed).await.unwrap();
        engine.delete_route(0).await.unwrap();
        engine.delete_route(5).await.unwrap();

        // pair 0 is now (B, C)
        assert_eq!(
            engine.take_notices().await.unwrap(),
            vec![Notice::PointRemoved, Notice::RouteDeleted { number: 1 }]
        );
    });
}

#[test]
fn deleted_route_number_is_one_based() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80), at(29.40, 47.70)] {
            engine.capture_point(coordinates).await.unwrap();
        }
        engine.take_notices().await.unwrap();

        engine.delete_route(1).await.unwrap();

        assert_eq!(
            engine.take_notices().await.unwrap(),
            vec![Notice::RouteDeleted { number: 2 }]
        );
    });
}
