use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{Notice, Snapshot};
use crate::entities::{
    Coordinates, CreateOrderRequest, EstimationDialogState, LocationsData, Mode, OrderDraft, PointId, RouteData,
    RoutePoint, ServiceType,
};
use crate::error::Error;
use crate::map::MarkerHandle;

#[async_trait]
pub trait PointAPI {
    /// `None` when the capture was overtaken by a clear.
    async fn capture_point(&self, coordinates: Coordinates) -> Result<Option<RoutePoint>, Error>;
    async fn remove_point(&self, id: PointId) -> Result<(), Error>;
    async fn click_marker(&self, handle: MarkerHandle) -> Result<(), Error>;
    async fn delete_route(&self, index: usize) -> Result<(), Error>;
    async fn clear_points(&self) -> Result<(), Error>;
    async fn switch_mode(&self) -> Result<Mode, Error>;
    async fn set_mode(&self, mode: Mode) -> Result<Mode, Error>;
    async fn route_data(&self) -> Result<RouteData, Error>;
}

#[async_trait]
pub trait SearchAPI {
    async fn search(&self, query: String) -> Result<Vec<String>, Error>;
    async fn select_suggestion(&self, address: String) -> Result<Option<RoutePoint>, Error>;
}

#[async_trait]
pub trait EstimationAPI {
    async fn estimate(&self, service_type: ServiceType) -> Result<LocationsData, Error>;
    async fn hide_estimation(&self) -> Result<(), Error>;
    async fn estimation(&self) -> Result<EstimationDialogState, Error>;
    async fn create_order(&self, draft: OrderDraft) -> Result<CreateOrderRequest, Error>;
}

#[async_trait]
pub trait ConsoleAPI {
    async fn snapshot(&self) -> Result<Snapshot, Error>;

    async fn take_notices(&self) -> Result<Vec<Notice>, Error>;
}

pub trait API: PointAPI + SearchAPI + EstimationAPI + ConsoleAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
