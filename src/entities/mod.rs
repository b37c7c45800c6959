mod delivery;
mod dialog;
mod location;
mod order;
mod point;
mod route;

pub use delivery::{DeliveryRequest, DeliveryRoute, Destination, Geometry, LocationsData, ServiceType};
pub use dialog::{EstimationDialog, EstimationDialogState};
pub use location::Coordinates;
pub use order::{CreateOrderRequest, DestinationPoint, OrderDraft, PaymentMethod, PaymentType};
pub use point::{Mode, PointId, RoutePoint};
pub use route::{RouteData, RouteDataPoint, RoutePair};

#[cfg(test)]
pub(crate) use order::sample_draft;
