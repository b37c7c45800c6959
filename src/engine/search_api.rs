use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{PointAPI, SearchAPI},
    entities::RoutePoint,
    error::Error,
};

const MIN_QUERY_CHARS: usize = 3;
const MAX_SUGGESTIONS: usize = 5;

#[async_trait]
impl SearchAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: String) -> Result<Vec<String>, Error> {
        let generation = {
            let mut state = self.state.lock().await;
            state.search_generation += 1;

            if query.chars().count() < MIN_QUERY_CHARS {
                state.suggestions.clear();
                self.publish(&state);
                return Ok(vec![]);
            }

            state.search_generation
        };

        let suggestions = match self.geocoder.place_search(&query).await {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                suggestions
            }
            Err(err) => {
                tracing::debug!(?err, "place search failed");
                vec![]
            }
        };

        let mut state = self.state.lock().await;

        if state.search_generation != generation {
            tracing::debug!("dropping suggestions for superseded query");
            return Ok(state.suggestions.clone());
        }

        state.suggestions = suggestions.clone();
        self.publish(&state);

        Ok(suggestions)
    }

    /// Resolves the address and captures it as if the map had been clicked
    /// there. The capture performs the only mode switch.
    #[tracing::instrument(skip(self))]
    async fn select_suggestion(&self, address: String) -> Result<Option<RoutePoint>, Error> {
        let coordinates = match self.geocoder.geocode(&address).await {
            Ok(coordinates) => coordinates,
            Err(err) => {
                tracing::debug!(?err, "could not resolve selected address");
                return Ok(None);
            }
        };

        self.map.recenter(coordinates, self.focus_zoom).await;

        {
            let mut state = self.state.lock().await;
            state.search_generation += 1;
            state.suggestions.clear();
            self.publish(&state);
        }

        self.capture_point(coordinates).await
    }
}

#[cfg(test)]
use crate::{
    entities::Mode,
    testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Gate, Harness},
};
#[cfg(test)]
use tokio_test::block_on;

#[cfg(test)]
fn harness_with_places(geocoder: FakeGeocoder) -> Harness {
    Harness::with(
        geocoder,
        FakeDirections::default(),
        FakePricing::default(),
        FakeOrders::default(),
    )
}

#[cfg(test)]
fn places(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("place {}", i)).collect()
}

#[test]
fn short_queries_clear_suggestions() {
    let harness = harness_with_places(FakeGeocoder {
        places: places(3),
        ..Default::default()
    });
    let engine = &harness.engine;

    block_on(async {
        assert_eq!(engine.search("salmiya".into()).await.unwrap().len(), 3);

        assert!(engine.search("sa".into()).await.unwrap().is_empty());
        assert!(engine.state.lock().await.suggestions.is_empty());

        // counted in characters, not bytes
        assert_eq!(engine.search("حول".into()).await.unwrap().len(), 3);
    });
}

#[test]
fn suggestions_are_capped_at_five() {
    let harness = harness_with_places(FakeGeocoder {
        places: places(9),
        ..Default::default()
    });

    block_on(async {
        let suggestions = harness.engine.search("hawally".into()).await.unwrap();

        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0], "hawally place 1");
    });
}

#[test]
fn failed_search_clears_suggestions_silently() {
    let harness = harness_with_places(FakeGeocoder {
        fail_search: true,
        ..Default::default()
    });

    block_on(async {
        harness.engine.state.lock().await.suggestions = vec!["old".into()];

        let suggestions = harness.engine.search("jabriya".into()).await.unwrap();

        assert!(suggestions.is_empty());
        assert!(harness.engine.state.lock().await.suggestions.is_empty());
    });
}

#[test]
fn superseded_search_does_not_overwrite_newer_one() {
    let gate = Gate::closed();
    let harness = harness_with_places(FakeGeocoder {
        places: places(2),
        search_gate: Some(gate.clone()),
        ..Default::default()
    });
    let engine = &harness.engine;

    block_on(async {
        let (old, _) = futures::join!(engine.search("salmiya".into()), async {
            // the newer, short query wins
            engine.search("s".into()).await.unwrap();
            gate.release(1);
        });

        assert!(old.unwrap().is_empty());
        assert!(engine.state.lock().await.suggestions.is_empty());
    });
}

#[test]
fn selecting_a_suggestion_captures_with_a_single_switch() {
    let mut geocoder = FakeGeocoder::default();
    geocoder.known.insert("Marina Mall".into(), at(29.34, 48.08));
    let harness = harness_with_places(geocoder);
    let engine = &harness.engine;

    block_on(async {
        engine.state.lock().await.suggestions = vec!["Marina Mall".into()];

        let point = engine
            .select_suggestion("Marina Mall".into())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(point.coordinates(), at(29.34, 48.08));

        let state = engine.state.lock().await;
        assert_eq!(state.points.from_points().len(), 1);
        // one flip only: a search-originated from point leaves the console in to mode
        assert_eq!(state.mode.mode(), Mode::To);
        assert!(state.suggestions.is_empty());
        drop(state);

        let view = harness.scene.view().await;
        assert_eq!(view.center, at(29.34, 48.08));
        assert_eq!(view.zoom, 15);
        assert_eq!(view.markers.len(), 1);
    });
}

#[test]
fn unresolvable_selection_does_nothing() {
    let harness = harness_with_places(FakeGeocoder::default());
    let engine = &harness.engine;

    block_on(async {
        let result = engine.select_suggestion("nowhere".into()).await;

        assert_eq!(result, Ok(None));
        assert!(engine.route_data().await.unwrap().is_empty());
        assert_eq!(engine.state.lock().await.mode.mode(), Mode::From);
        assert_eq!(harness.scene.view().await.zoom, 12);
    });
}
