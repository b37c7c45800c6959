use super::{Engine, Notice};

use async_trait::async_trait;

use crate::{
    api::EstimationAPI,
    entities::{CreateOrderRequest, DeliveryRequest, EstimationDialogState, LocationsData, OrderDraft, ServiceType},
    error::{invalid_state_error, Error},
};

#[async_trait]
impl EstimationAPI for Engine {
    /// Only pairs present on both sides are sent; a dangling from or to point
    /// is left out.
    #[tracing::instrument(skip(self))]
    async fn estimate(&self, service_type: ServiceType) -> Result<LocationsData, Error> {
        let (token, route_data, request) = {
            let mut state = self.state.lock().await;

            let route_data = state.points.route_data();
            let request = DeliveryRequest::new(&route_data, service_type);

            let token = state.dialog.request()?;
            self.publish(&state);

            (token, route_data, request)
        };

        let result = self.pricing.calculate(&request).await;

        let mut state = self.state.lock().await;

        match result {
            Ok(data) => {
                if let Err(err) = state.dialog.succeed(token, data.clone()) {
                    tracing::debug!("estimation dialog closed before pricing returned");
                    return Err(err);
                }

                state.priced_route_data = Some(route_data);
                self.publish(&state);

                Ok(data)
            }
            Err(err) => {
                if state.dialog.fail(token).is_ok() {
                    self.publish(&state);
                }
                drop(state);

                tracing::warn!(?err, "delivery estimation failed");
                self.notify(Notice::EstimationFailed {
                    message: err.message.clone(),
                });

                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn hide_estimation(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        state.dialog.hide();
        state.priced_route_data = None;
        self.publish(&state);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn estimation(&self) -> Result<EstimationDialogState, Error> {
        Ok(self.state.lock().await.dialog.state())
    }

    /// Builds the order from the priced snapshot, not from whatever is on the
    /// map now, and closes the dialog once the backend accepts it.
    #[tracing::instrument(skip(self, draft))]
    async fn create_order(&self, draft: OrderDraft) -> Result<CreateOrderRequest, Error> {
        let request = {
            let state = self.state.lock().await;

            match (state.dialog.data(), &state.priced_route_data) {
                (Some(data), Some(route_data)) => CreateOrderRequest::new(draft, route_data, data),
                _ => return Err(invalid_state_error()),
            }
        };

        if let Err(err) = self.orders.create_order(&request).await {
            tracing::warn!(?err, "order creation failed");
            self.notify(Notice::OrderFailed {
                message: err.message.clone(),
            });
            return Err(err);
        }

        self.hide_estimation().await?;
        self.notify(Notice::OrderCreated);

        Ok(request)
    }
}

#[cfg(test)]
use crate::{
    api::{ConsoleAPI, PointAPI},
    entities::{sample_draft, Coordinates},
    testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Gate, Harness},
};
#[cfg(test)]
use tokio_test::block_on;

#[cfg(test)]
fn harness_with(pricing: FakePricing, orders: FakeOrders) -> Harness {
    Harness::with(FakeGeocoder::default(), FakeDirections::default(), pricing, orders)
}

#[cfg(test)]
async fn capture_all(harness: &Harness, points: &[Coordinates]) {
    for coordinates in points {
        harness.engine.capture_point(*coordinates).await.unwrap();
    }
}

#[test]
fn estimate_prices_only_complete_pairs() {
    let harness = Harness::new();

    block_on(async {
        // from = [A, B], to = [C]
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00), at(29.30, 47.80)]).await;

        let data = harness.engine.estimate(ServiceType::Transportation).await.unwrap();

        let requests = harness.pricing.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].destinations.len(), 1);
        assert_eq!(requests[0].destinations[0].from_point_lat, 29.10);
        assert_eq!(requests[0].destinations[0].to_point_lat, 29.20);
        assert_eq!(data.locations_data.len(), 1);

        let state = harness.engine.estimation().await.unwrap();
        assert!(state.visible);
        assert!(!state.loading);
        assert_eq!(state.data, Some(data));
    });
}

#[test]
fn estimate_is_repeatable() {
    let harness = Harness::new();

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;

        let first = harness.engine.estimate(ServiceType::Shipping).await.unwrap();
        let second = harness.engine.estimate(ServiceType::Shipping).await.unwrap();

        assert_eq!(first, second);
    });
}

#[test]
fn pricing_failure_closes_dialog_and_tells_the_operator() {
    let harness = harness_with(
        FakePricing {
            fail: true,
            ..Default::default()
        },
        FakeOrders::default(),
    );
    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;

        let result = harness.engine.estimate(ServiceType::Transportation).await;
        assert!(result.is_err());

        let state = harness.engine.estimation().await.unwrap();
        assert!(!state.loading);
        assert!(!state.visible);
        assert_eq!(state.data, None);

        let notices = harness.engine.take_notices().await.unwrap();
        assert!(matches!(notices.last(), Some(Notice::EstimationFailed { .. })));
    });
}

#[test]
fn estimate_without_complete_pairs_submits_an_empty_request() {
    let harness = Harness::new();

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90)]).await;

        let data = harness.engine.estimate(ServiceType::Transportation).await.unwrap();

        let requests = harness.pricing.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].destinations.is_empty());
        assert!(data.locations_data.is_empty());
        assert!(harness.engine.estimation().await.unwrap().visible);
    });
}

#[test]
fn second_estimate_while_loading_is_rejected() {
    let gate = Gate::closed();
    let harness = harness_with(
        FakePricing {
            gate: Some(gate.clone()),
            ..Default::default()
        },
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;

        let (first, _) = futures::join!(engine.estimate(ServiceType::Transportation), async {
            assert!(engine.estimation().await.unwrap().loading);
            let second = engine.estimate(ServiceType::Transportation).await;
            assert_eq!(second, Err(invalid_state_error()));
            gate.release(1);
        });

        assert!(first.is_ok());
        assert!(engine.estimation().await.unwrap().visible);
    });
}

#[test]
fn hiding_while_loading_discards_the_late_result() {
    let gate = Gate::closed();
    let harness = harness_with(
        FakePricing {
            gate: Some(gate.clone()),
            ..Default::default()
        },
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;

        let (late, _) = futures::join!(engine.estimate(ServiceType::Transportation), async {
            engine.hide_estimation().await.unwrap();
            gate.release(1);
        });

        assert_eq!(late, Err(invalid_state_error()));
        assert_eq!(engine.estimation().await.unwrap(), EstimationDialogState::default());
    });
}

#[test]
fn order_uses_the_priced_snapshot_and_closes_the_dialog() {
    let harness = Harness::new();
    let engine = &harness.engine;

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;
        let data = engine.estimate(ServiceType::Shipping).await.unwrap();

        // points added after pricing are not part of the order
        capture_all(&harness, &[at(29.30, 47.80)]).await;

        let request = engine.create_order(sample_draft()).await.unwrap();

        assert_eq!(request.destination.len(), 1);
        assert_eq!(request.order_price, data.price);
        assert_eq!(harness.orders.requests.lock().unwrap().len(), 1);
        assert_eq!(engine.estimation().await.unwrap(), EstimationDialogState::default());
    });
}

#[test]
fn order_requires_an_open_dialog() {
    let harness = Harness::new();

    block_on(async {
        let result = harness.engine.create_order(sample_draft()).await;

        assert_eq!(result, Err(invalid_state_error()));
        assert!(harness.orders.requests.lock().unwrap().is_empty());
    });
}

#[test]
fn failed_order_keeps_the_dialog_open() {
    let harness = harness_with(
        FakePricing::default(),
        FakeOrders {
            fail: true,
            ..Default::default()
        },
    );

    block_on(async {
        capture_all(&harness, &[at(29.10, 47.90), at(29.20, 48.00)]).await;
        harness.engine.estimate(ServiceType::Shipping).await.unwrap();

        assert!(harness.engine.create_order(sample_draft()).await.is_err());
        assert!(harness.engine.estimation().await.unwrap().visible);
    });
}
