use futures::future::join_all;

use super::{ConsoleState, Engine};
use crate::entities::RoutePair;
use crate::map::RouteStyle;

pub(super) struct RenderPlan {
    generation: u64,
    pairs: Vec<RoutePair>,
}

impl Engine {
    pub(super) async fn begin_redraw(&self, state: &mut ConsoleState) -> RenderPlan {
        for handle in state.drawn_routes.drain(..) {
            self.map.clear_route(handle).await;
        }

        state.render_generation += 1;

        RenderPlan {
            generation: state.render_generation,
            pairs: state.points.pairs().filter(RoutePair::is_complete).collect(),
        }
    }

    /// Requests directions for every planned pair and draws each result as it
    /// arrives, unless a newer redraw or a mutation of the pair made it stale.
    #[tracing::instrument(skip_all, fields(generation = plan.generation, pairs = plan.pairs.len()))]
    pub(super) async fn finish_redraw(&self, plan: RenderPlan) {
        let generation = plan.generation;

        join_all(plan.pairs.into_iter().map(|pair| self.draw_pair(generation, pair))).await;
    }

    async fn draw_pair(&self, generation: u64, pair: RoutePair) {
        let (from, to) = match pair.endpoints() {
            Some(endpoints) => endpoints,
            None => return,
        };

        let geometry = match self.map.directions(from, to).await {
            Ok(geometry) => geometry,
            Err(err) => {
                tracing::debug!(index = pair.index, ?err, "no directions for pair");
                return;
            }
        };

        let mut state = self.state.lock().await;

        let current = state.points.pair(pair.index).map(|current| current.key());
        if state.render_generation != generation || current != Some(pair.key()) {
            tracing::debug!(index = pair.index, "dropping stale directions");
            return;
        }

        let handle = self
            .map
            .draw_route(geometry, RouteStyle::for_pair(pair.index))
            .await;
        state.drawn_routes.push(handle);

        self.publish(&state);
    }

    #[cfg(test)]
    async fn redraw(&self) {
        let plan = {
            let mut state = self.state.lock().await;
            let plan = self.begin_redraw(&mut state).await;
            self.publish(&state);
            plan
        };

        self.finish_redraw(plan).await;
    }
}

#[test]
fn redraw_only_draws_complete_pairs() {
    use crate::api::PointAPI;
    use crate::testing::{at, Harness};
    use tokio_test::block_on;

    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        engine.capture_point(at(29.10, 47.90)).await.unwrap();
        assert_eq!(harness.scene.route_count().await, 0);

        engine.capture_point(at(29.20, 48.00)).await.unwrap();
        engine.capture_point(at(29.30, 47.95)).await.unwrap();
        assert_eq!(harness.scene.route_count().await, 1);

        engine.redraw().await;
        engine.redraw().await;

        let routes = harness.scene.routes().await;
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, vec![[47.90, 29.10], [48.00, 29.20]]);
        assert_eq!(routes[0].style.stroke, "#3B82F6");
        assert_eq!(engine.state.lock().await.drawn_routes.len(), 1);
    });
}

#[test]
fn failed_directions_leave_the_pair_undrawn() {
    use crate::api::PointAPI;
    use crate::testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Harness};
    use tokio_test::block_on;

    let directions = FakeDirections {
        failing_origins: vec![at(29.10, 47.90)],
        ..Default::default()
    };
    let harness = Harness::with(
        FakeGeocoder::default(),
        directions,
        FakePricing::default(),
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        for coordinates in [at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80), at(29.40, 47.70)] {
            engine.capture_point(coordinates).await.unwrap();
        }

        let snapshot = crate::api::ConsoleAPI::snapshot(engine).await.unwrap();
        assert_eq!(snapshot.pairs.len(), 2);
        assert!(snapshot.pairs.iter().all(|pair| pair.complete));

        let routes = harness.scene.routes().await;
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].style.stroke, "#8B5CF6");
    });
}

#[test]
fn stale_directions_are_discarded() {
    use crate::api::PointAPI;
    use crate::testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Gate, Harness};
    use tokio_test::block_on;

    let gate = Gate::closed();
    let directions = FakeDirections {
        gate: Some(gate.clone()),
        ..Default::default()
    };
    let harness = Harness::with(
        FakeGeocoder::default(),
        directions,
        FakePricing::default(),
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        engine.capture_point(at(29.10, 47.90)).await.unwrap();

        let (_, _) = futures::join!(engine.capture_point(at(29.20, 48.00)), async {
            // the second capture is now waiting on directions for pair 0
            let id = engine.state.lock().await.points.from_points()[0].id;
            engine.remove_point(id).await.unwrap();
            gate.release(1);
        });

        assert_eq!(harness.scene.route_count().await, 0);
        assert!(engine.state.lock().await.drawn_routes.is_empty());
    });
}
