pub mod dispatch_api;
pub mod google_maps;

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Coordinates, CreateOrderRequest, DeliveryRequest, LocationsData};
use crate::error::Error;

#[async_trait]
pub trait GeocodingGateway {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error>;

    async fn geocode(&self, address: &str) -> Result<Coordinates, Error>;

    async fn place_search(&self, query: &str) -> Result<Vec<String>, Error>;
}

pub type DynGeocoder = Arc<dyn GeocodingGateway + Send + Sync>;

#[async_trait]
pub trait PricingService {
    async fn calculate(&self, request: &DeliveryRequest) -> Result<LocationsData, Error>;
}

pub type DynPricing = Arc<dyn PricingService + Send + Sync>;

#[async_trait]
pub trait OrderService {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), Error>;
}

pub type DynOrders = Arc<dyn OrderService + Send + Sync>;
