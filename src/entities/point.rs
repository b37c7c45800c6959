use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    From,
    To,
}

impl Mode {
    pub fn opposite(&self) -> Self {
        match self {
            Self::From => Self::To,
            Self::To => Self::From,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::From => "from".into(),
            Self::To => "to".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub id: PointId,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl RoutePoint {
    pub fn new(id: PointId, coordinates: Coordinates, address: String) -> Self {
        Self {
            id,
            lat: coordinates.lat,
            lng: coordinates.lng,
            address,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn short_address(&self) -> String {
        if self.address.chars().count() > 40 {
            let head: String = self.address.chars().take(40).collect();
            format!("{}...", head)
        } else {
            self.address.clone()
        }
    }
}

#[test]
fn mode_flips() {
    assert_eq!(Mode::default(), Mode::From);
    assert_eq!(Mode::From.opposite(), Mode::To);
    assert_eq!(Mode::To.opposite().opposite(), Mode::To);
}

#[test]
fn long_addresses_are_shortened() {
    let point = RoutePoint::new(
        PointId(1),
        Coordinates::new(29.0, 47.0),
        "شارع الخليج العربي، مدينة الكويت، محافظة العاصمة، الكويت".into(),
    );

    assert!(point.short_address().ends_with("..."));
    assert_eq!(point.short_address().chars().count(), 43);

    let point = RoutePoint::new(PointId(2), Coordinates::new(29.0, 47.0), "Salmiya".into());
    assert_eq!(point.short_address(), "Salmiya");
}
