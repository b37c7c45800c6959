use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, LocationsData, RouteData, ServiceType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Subscription,
    Cash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Knet,
    Link,
    Subscription,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub client_name: String,
    pub client_phone: String,
    pub order_date: NaiveDate,
    pub order_time: NaiveTime,
    pub service_type: ServiceType,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPoint {
    pub from_point: Coordinates,
    pub to_point: Option<Coordinates>,
    pub from_address: String,
    pub to_address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub client_name: String,
    pub client_phone: String,
    pub order_date: NaiveDate,
    pub order_time: String,
    pub destination: Vec<DestinationPoint>,
    pub service_type: ServiceType,
    pub order_price: f64,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub distance_per_km: f64,
}

impl CreateOrderRequest {
    /// One destination per from point; a missing to point is sent as
    /// `null` with an `"Unknown"` address.
    pub fn new(draft: OrderDraft, route_data: &RouteData, data: &LocationsData) -> Self {
        let destination = route_data
            .from_points
            .iter()
            .enumerate()
            .map(|(index, from)| {
                let to = route_data.to_points.get(index);

                DestinationPoint {
                    from_point: from.coordinates,
                    to_point: to.map(|to| to.coordinates),
                    from_address: from.address.clone(),
                    to_address: to
                        .map(|to| to.address.clone())
                        .unwrap_or_else(|| "Unknown".into()),
                }
            })
            .collect();

        Self {
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            order_date: draft.order_date,
            order_time: format!("{}:{}", draft.order_time.hour(), draft.order_time.minute()),
            destination,
            service_type: draft.service_type,
            order_price: data.price,
            payment_type: draft.payment_type,
            payment_method: draft.payment_method,
            distance_per_km: data.total_distance(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_draft() -> OrderDraft {
    OrderDraft {
        client_name: "Fahad".into(),
        client_phone: "96550001234".into(),
        order_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        order_time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
        service_type: ServiceType::Shipping,
        payment_type: PaymentType::Cash,
        payment_method: PaymentMethod::Knet,
    }
}

#[test]
fn order_flattens_destinations_per_from_point() {
    use crate::entities::{DeliveryRoute, Geometry, PointId, RouteDataPoint};

    let point = |id, address: &str| RouteDataPoint {
        id: PointId(id),
        coordinates: Coordinates::new(29.0 + id as f64 / 100.0, 47.9),
        address: address.into(),
    };
    let leg = |distance| DeliveryRoute {
        geometry: Geometry {
            kind: "LineString".into(),
            coordinates: vec![],
        },
        distance,
        estimated_time: 10.0,
        price: 1.0,
    };

    let route_data = RouteData {
        from_points: vec![point(1, "A"), point(2, "B")],
        to_points: vec![point(3, "C")],
    };
    let data = LocationsData {
        locations_data: vec![leg(4.0), leg(2.5)],
        price: 7.75,
    };

    let request = CreateOrderRequest::new(sample_draft(), &route_data, &data);

    assert_eq!(request.destination.len(), 2);
    assert_eq!(request.destination[0].to_address, "C");
    assert_eq!(request.destination[1].to_address, "Unknown");
    assert_eq!(request.destination[1].to_point, None);
    assert_eq!(request.order_time, "9:5");
    assert_eq!(request.order_price, 7.75);
    assert_eq!(request.distance_per_km, 6.5);

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["paymentMethod"], "knet");
    assert_eq!(value["serviceType"], "shipping");
    assert_eq!(value["orderDate"], "2026-10-19");
}
