use async_trait::async_trait;
use geo_types::LineString;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::Config,
    entities::Coordinates,
    error::{invalid_input_error, upstream_error, zero_results_error, Error},
    external::GeocodingGateway,
    map::{decode_polyline, Directions},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectionsRoute {
    pub overview_polyline: OverviewPolyline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<Vec<T>>,
    routes: Option<Vec<T>>,
}

impl<T> Response<T> {
    fn into_items(self) -> Result<Vec<T>, Error> {
        match self.status.as_str() {
            "OK" => self
                .results
                .or(self.routes)
                .ok_or_else(upstream_error),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(vec![]),
            "INVALID_REQUEST" => Err(invalid_input_error()),
            _ => Err(upstream_error()),
        }
    }

    fn into_first(self) -> Result<T, Error> {
        self.into_items()?
            .into_iter()
            .next()
            .ok_or_else(zero_results_error)
    }
}

#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
    language: String,
    region: String,
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.google_maps_api_base.clone(),
            key: config.google_maps_api_key.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Response<T>, Error> {
        let url = format!("https://{}/maps/api/{}", self.api_base, path);

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.key)])
            .query(&[("language", &self.language)])
            .query(&[("region", &self.region)])
            .query(params)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<T> = res.json().await?;

        if data.status != "OK" {
            tracing::debug!(status = %data.status, "google maps returned no usable result");
        }

        Ok(data)
    }
}

#[async_trait]
impl GeocodingGateway for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        let latlng: String = coordinates.into();

        let place: Place = self
            .get("geocode/json", &[("latlng", latlng)])
            .await?
            .into_first()?;

        Ok(place.formatted_address)
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinates, Error> {
        let place: Place = self
            .get("geocode/json", &[("address", address.into())])
            .await?
            .into_first()?;

        Ok(place.geometry.location)
    }

    #[tracing::instrument(skip(self))]
    async fn place_search(&self, query: &str) -> Result<Vec<String>, Error> {
        let places: Vec<Place> = self
            .get("place/textsearch/json", &[("query", query.into())])
            .await?
            .into_items()?;

        Ok(places.into_iter().map(|place| place.formatted_address).collect())
    }
}

#[async_trait]
impl Directions for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<LineString<f64>, Error> {
        let route: DirectionsRoute = self
            .get(
                "directions/json",
                &[
                    ("origin", from.into()),
                    ("destination", to.into()),
                    ("mode", "driving".into()),
                ],
            )
            .await?
            .into_first()?;

        decode_polyline(&route.overview_polyline.points)
    }
}

#[test]
fn geocode_response_yields_first_address() {
    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "Sharq, Kuwait City",
                "geometry": { "location": { "lat": 29.38, "lng": 47.99 } }
            },
            {
                "formatted_address": "Kuwait",
                "geometry": { "location": { "lat": 29.3, "lng": 47.5 } }
            }
        ]
    });

    let data: Response<Place> = serde_json::from_value(body).unwrap();
    let place = data.into_first().unwrap();

    assert_eq!(place.formatted_address, "Sharq, Kuwait City");
    assert_eq!(place.geometry.location, Coordinates::new(29.38, 47.99));
}

#[test]
fn zero_results_is_empty_for_search_and_an_error_for_lookups() {
    let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });

    let data: Response<Place> = serde_json::from_value(body.clone()).unwrap();
    assert!(data.into_items().unwrap().is_empty());

    let data: Response<Place> = serde_json::from_value(body).unwrap();
    assert_eq!(data.into_first().err().map(|err| err.code), Some(102));
}

#[test]
fn denied_requests_are_upstream_errors() {
    let body = serde_json::json!({ "status": "REQUEST_DENIED" });

    let data: Response<DirectionsRoute> = serde_json::from_value(body).unwrap();

    assert_eq!(data.into_first().err().map(|err| err.code), Some(4));
}

#[test]
fn directions_response_reads_overview_polyline() {
    let body = serde_json::json!({
        "status": "OK",
        "routes": [{ "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" } }]
    });

    let data: Response<DirectionsRoute> = serde_json::from_value(body).unwrap();
    let route = data.into_first().unwrap();

    assert_eq!(decode_polyline(&route.overview_polyline.points).unwrap().0.len(), 2);
}
