use async_trait::async_trait;
use geo_types::LineString;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::engine::Engine;
use crate::entities::{Coordinates, CreateOrderRequest, DeliveryRequest, DeliveryRoute, Geometry, LocationsData};
use crate::error::{upstream_error, zero_results_error, Error};
use crate::external::{GeocodingGateway, OrderService, PricingService};
use crate::map::{Directions, Scene};

#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn closed() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn release(&self, count: usize) {
        self.0.add_permits(count);
    }

    async fn pass(&self) {
        self.0.acquire().await.unwrap().forget();
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    pub fail_reverse: bool,
    pub fail_search: bool,
    pub places: Vec<String>,
    pub known: HashMap<String, Coordinates>,
    pub reverse_gate: Option<Gate>,
    pub search_gate: Option<Gate>,
    pub reverse_calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn address_for(coordinates: Coordinates) -> String {
        format!("Block {:.4} / {:.4}", coordinates.lat, coordinates.lng)
    }
}

#[async_trait]
impl GeocodingGateway for FakeGeocoder {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.reverse_gate {
            gate.pass().await;
        }

        if self.fail_reverse {
            return Err(upstream_error());
        }

        Ok(Self::address_for(coordinates))
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, Error> {
        self.known.get(address).copied().ok_or_else(zero_results_error)
    }

    async fn place_search(&self, query: &str) -> Result<Vec<String>, Error> {
        if let Some(gate) = &self.search_gate {
            gate.pass().await;
        }

        if self.fail_search {
            return Err(upstream_error());
        }

        Ok(self
            .places
            .iter()
            .map(|place| format!("{} {}", query, place))
            .collect())
    }
}

#[derive(Default)]
pub struct FakeDirections {
    pub failing_origins: Vec<Coordinates>,
    pub gate: Option<Gate>,
}

#[async_trait]
impl Directions for FakeDirections {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<LineString<f64>, Error> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        if self.failing_origins.contains(&from) {
            return Err(upstream_error());
        }

        Ok(vec![(from.lng, from.lat), (to.lng, to.lat)].into())
    }
}

#[derive(Default)]
pub struct FakePricing {
    pub fail: bool,
    pub gate: Option<Gate>,
    pub requests: Mutex<Vec<DeliveryRequest>>,
}

#[async_trait]
impl PricingService for FakePricing {
    async fn calculate(&self, request: &DeliveryRequest) -> Result<LocationsData, Error> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        if self.fail {
            return Err(upstream_error());
        }

        let locations_data: Vec<DeliveryRoute> = request
            .destinations
            .iter()
            .map(|destination| {
                let distance = ((destination.to_point_lat - destination.from_point_lat).abs()
                    + (destination.to_point_lng - destination.from_point_lng).abs())
                    * 100.0;

                DeliveryRoute {
                    geometry: Geometry {
                        kind: "LineString".into(),
                        coordinates: vec![
                            [destination.from_point_lng, destination.from_point_lat],
                            [destination.to_point_lng, destination.to_point_lat],
                        ],
                    },
                    distance,
                    estimated_time: distance * 2.0,
                    price: distance * 0.25,
                }
            })
            .collect();
        let price = locations_data.iter().map(|route| route.price).sum();

        Ok(LocationsData {
            locations_data,
            price,
        })
    }
}

#[derive(Default)]
pub struct FakeOrders {
    pub fail: bool,
    pub requests: Mutex<Vec<CreateOrderRequest>>,
}

#[async_trait]
impl OrderService for FakeOrders {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), Error> {
        if self.fail {
            return Err(upstream_error());
        }

        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

pub struct Harness {
    pub engine: Engine,
    pub scene: Arc<Scene>,
    pub geocoder: Arc<FakeGeocoder>,
    pub pricing: Arc<FakePricing>,
    pub orders: Arc<FakeOrders>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            FakeGeocoder::default(),
            FakeDirections::default(),
            FakePricing::default(),
            FakeOrders::default(),
        )
    }

    pub fn with(
        geocoder: FakeGeocoder,
        directions: FakeDirections,
        pricing: FakePricing,
        orders: FakeOrders,
    ) -> Self {
        let scene = Arc::new(Scene::new(
            Coordinates::new(29.3759, 47.9774),
            12,
            Arc::new(directions),
        ));
        let geocoder = Arc::new(geocoder);
        let pricing = Arc::new(pricing);
        let orders = Arc::new(orders);

        let engine = Engine::new(
            scene.clone(),
            geocoder.clone(),
            pricing.clone(),
            orders.clone(),
            15,
        );

        Self {
            engine,
            scene,
            geocoder,
            pricing,
            orders,
        }
    }
}

pub fn at(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng)
}
