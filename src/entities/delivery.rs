use geo_types::LineString;
use serde::{Deserialize, Serialize};

use crate::entities::{RouteData, RouteDataPoint};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[default]
    Transportation,
    Shipping,
}

impl ServiceType {
    pub fn name(&self) -> String {
        match self {
            Self::Transportation => "transportation".into(),
            Self::Shipping => "shipping".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub from_point_lat: f64,
    pub from_point_lng: f64,
    pub from_address: String,
    pub to_point_lat: f64,
    pub to_point_lng: f64,
    pub to_address: String,
}

impl Destination {
    pub fn new(from: &RouteDataPoint, to: &RouteDataPoint) -> Self {
        Self {
            from_point_lat: from.coordinates.lat,
            from_point_lng: from.coordinates.lng,
            from_address: from.address.clone(),
            to_point_lat: to.coordinates.lat,
            to_point_lng: to.coordinates.lng,
            to_address: to.address.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub destinations: Vec<Destination>,
    pub service_type: ServiceType,
}

impl DeliveryRequest {
    pub fn new(route_data: &RouteData, service_type: ServiceType) -> Self {
        let destinations = route_data
            .complete_pairs()
            .map(|(from, to)| Destination::new(from, to))
            .collect();

        Self {
            destinations,
            service_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl From<&Geometry> for LineString<f64> {
    fn from(geometry: &Geometry) -> Self {
        geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| (*lng, *lat))
            .collect::<Vec<_>>()
            .into()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRoute {
    #[serde(rename = "deliveryRoute")]
    pub geometry: Geometry,
    pub distance: f64,
    pub estimated_time: f64,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsData {
    pub locations_data: Vec<DeliveryRoute>,
    pub price: f64,
}

impl LocationsData {
    pub fn total_distance(&self) -> f64 {
        self.locations_data.iter().map(|route| route.distance).sum()
    }
}

#[test]
fn locations_data_parses_pricing_response() {
    let body = serde_json::json!({
        "locationsData": [{
            "deliveryRoute": {
                "type": "LineString",
                "coordinates": [[47.97, 29.37], [48.01, 29.33]]
            },
            "distance": 7.5,
            "estimatedTime": 14.0,
            "price": 2.25
        }],
        "price": 2.25
    });

    let data: LocationsData = serde_json::from_value(body).unwrap();

    assert_eq!(data.locations_data.len(), 1);
    assert_eq!(data.total_distance(), 7.5);

    let line: LineString<f64> = (&data.locations_data[0].geometry).into();
    assert_eq!(line.0[0].x, 47.97);
    assert_eq!(line.0[0].y, 29.37);
}

#[test]
fn destinations_use_pricing_field_names() {
    use crate::entities::{Coordinates, PointId};

    let point = |id, address: &str| RouteDataPoint {
        id: PointId(id),
        coordinates: Coordinates::new(29.0, 47.0),
        address: address.into(),
    };

    let data = RouteData {
        from_points: vec![point(1, "A"), point(2, "B")],
        to_points: vec![point(3, "C")],
    };
    let request = DeliveryRequest::new(&data, ServiceType::Transportation);

    assert_eq!(request.destinations.len(), 1);

    let value = serde_json::to_value(&request.destinations[0]).unwrap();
    assert_eq!(value["fromAddress"], "A");
    assert_eq!(value["toAddress"], "C");
    assert_eq!(value["fromPointLat"], 29.0);
}
