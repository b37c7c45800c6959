mod polyline;
mod scene;

pub use polyline::decode_polyline;
pub use scene::{Scene, SceneMarker, SceneRoute, SceneView};

use async_trait::async_trait;
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Coordinates, Mode};
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerHandle(pub Uuid);

impl MarkerHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteHandle(pub Uuid);

impl RouteHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RouteHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub role: Mode,
    pub fill: String,
    pub label: String,
}

impl From<Mode> for MarkerStyle {
    fn from(role: Mode) -> Self {
        match role {
            Mode::From => Self {
                role,
                fill: "#22C55E".into(),
                label: "ب".into(),
            },
            Mode::To => Self {
                role,
                fill: "#EF4444".into(),
                label: "ن".into(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub stroke: String,
    pub weight: u32,
    pub opacity: f64,
}

impl RouteStyle {
    pub fn for_pair(index: usize) -> Self {
        let stroke = if index % 2 == 0 { "#3B82F6" } else { "#8B5CF6" };

        Self {
            stroke: stroke.into(),
            weight: 4,
            opacity: 0.8,
        }
    }
}

#[async_trait]
pub trait Directions {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<LineString<f64>, Error>;
}

pub type DynDirections = Arc<dyn Directions + Send + Sync>;

#[async_trait]
pub trait MapAdapter {
    async fn recenter(&self, center: Coordinates, zoom: u8);

    async fn create_marker(&self, position: Coordinates, title: &str, style: MarkerStyle) -> MarkerHandle;

    async fn destroy_marker(&self, handle: MarkerHandle);

    async fn directions(&self, from: Coordinates, to: Coordinates) -> Result<LineString<f64>, Error>;

    async fn draw_route(&self, geometry: LineString<f64>, style: RouteStyle) -> RouteHandle;

    async fn clear_route(&self, handle: RouteHandle);
}

pub type DynMap = Arc<dyn MapAdapter + Send + Sync>;

#[test]
fn route_style_alternates_by_parity() {
    assert_eq!(RouteStyle::for_pair(0).stroke, "#3B82F6");
    assert_eq!(RouteStyle::for_pair(1).stroke, "#8B5CF6");
    assert_eq!(RouteStyle::for_pair(4), RouteStyle::for_pair(0));
}
