use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, PointId, RoutePoint};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePair {
    pub index: usize,
    pub from: Option<RoutePoint>,
    pub to: Option<RoutePoint>,
}

impl RoutePair {
    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn endpoints(&self) -> Option<(Coordinates, Coordinates)> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some((from.coordinates(), to.coordinates())),
            _ => None,
        }
    }

    /// Ids of both sides, used to check that a pair has not changed while
    /// its directions were in flight.
    pub fn key(&self) -> (Option<PointId>, Option<PointId>) {
        (
            self.from.as_ref().map(|point| point.id),
            self.to.as_ref().map(|point| point.id),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDataPoint {
    pub id: PointId,
    pub coordinates: Coordinates,
    pub address: String,
}

impl From<&RoutePoint> for RouteDataPoint {
    fn from(point: &RoutePoint) -> Self {
        Self {
            id: point.id,
            coordinates: point.coordinates(),
            address: point.address.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
    pub from_points: Vec<RouteDataPoint>,
    pub to_points: Vec<RouteDataPoint>,
}

impl RouteData {
    pub fn is_empty(&self) -> bool {
        self.from_points.is_empty() && self.to_points.is_empty()
    }

    pub fn complete_pairs(&self) -> impl Iterator<Item = (&RouteDataPoint, &RouteDataPoint)> {
        self.from_points.iter().zip(self.to_points.iter())
    }
}

#[test]
fn route_data_serializes_in_camel_case() {
    let data = RouteData {
        from_points: vec![RouteDataPoint {
            id: PointId(1),
            coordinates: Coordinates::new(29.1, 47.9),
            address: "A".into(),
        }],
        to_points: vec![],
    };

    let value = serde_json::to_value(&data).unwrap();

    assert_eq!(value["fromPoints"][0]["id"], 1);
    assert_eq!(value["fromPoints"][0]["coordinates"]["lat"], 29.1);
    assert!(value["toPoints"].as_array().unwrap().is_empty());
}
