use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn fallback_address(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

#[test]
fn fallback_address_uses_six_decimals() {
    let coordinates = Coordinates::new(29.3759, 47.9774);

    assert_eq!(coordinates.fallback_address(), "29.375900, 47.977400");
}

#[test]
fn query_string_is_lat_then_lng() {
    let location: String = Coordinates::new(29.5, 48.25).into();

    assert_eq!(location, "29.5,48.25");
}

#[test]
fn out_of_range_coordinates_are_invalid() {
    assert!(Coordinates::new(29.0, 47.0).is_valid());
    assert!(!Coordinates::new(91.0, 47.0).is_valid());
    assert!(!Coordinates::new(29.0, f64::NAN).is_valid());
}
