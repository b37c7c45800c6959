use async_trait::async_trait;
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{DynDirections, MapAdapter, MarkerHandle, MarkerStyle, RouteHandle, RouteStyle};
use crate::entities::Coordinates;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneMarker {
    pub handle: MarkerHandle,
    pub position: Coordinates,
    pub title: String,
    pub style: MarkerStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneRoute {
    pub handle: RouteHandle,
    pub path: Vec<[f64; 2]>,
    pub style: RouteStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<SceneMarker>,
    pub routes: Vec<SceneRoute>,
}

#[derive(Debug)]
struct State {
    center: Coordinates,
    zoom: u8,
    markers: HashMap<MarkerHandle, SceneMarker>,
    routes: HashMap<RouteHandle, SceneRoute>,
}

pub struct Scene {
    state: Mutex<State>,
    directions: DynDirections,
}

impl Scene {
    pub fn new(center: Coordinates, zoom: u8, directions: DynDirections) -> Self {
        Self {
            state: Mutex::new(State {
                center,
                zoom,
                markers: HashMap::new(),
                routes: HashMap::new(),
            }),
            directions,
        }
    }

    pub async fn view(&self) -> SceneView {
        let state = self.state.lock().await;

        let mut markers: Vec<SceneMarker> = state.markers.values().cloned().collect();
        markers.sort_by_key(|marker| marker.handle);
        let mut routes: Vec<SceneRoute> = state.routes.values().cloned().collect();
        routes.sort_by_key(|route| route.handle);

        SceneView {
            center: state.center,
            zoom: state.zoom,
            markers,
            routes,
        }
    }

    pub async fn marker_count(&self) -> usize {
        self.state.lock().await.markers.len()
    }

    pub async fn route_count(&self) -> usize {
        self.state.lock().await.routes.len()
    }

    pub async fn routes(&self) -> Vec<SceneRoute> {
        self.view().await.routes
    }
}

#[async_trait]
impl MapAdapter for Scene {
    #[tracing::instrument(skip(self))]
    async fn recenter(&self, center: Coordinates, zoom: u8) {
        let mut state = self.state.lock().await;
        state.center = center;
        state.zoom = zoom;
    }

    #[tracing::instrument(skip(self, style))]
    async fn create_marker(&self, position: Coordinates, title: &str, style: MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle::new();
        let marker = SceneMarker {
            handle,
            position,
            title: title.into(),
            style,
        };

        self.state.lock().await.markers.insert(handle, marker);

        handle
    }

    #[tracing::instrument(skip(self))]
    async fn destroy_marker(&self, handle: MarkerHandle) {
        self.state.lock().await.markers.remove(&handle);
    }

    #[tracing::instrument(skip(self))]
    async fn directions(&self, from: Coordinates, to: Coordinates) -> Result<LineString<f64>, Error> {
        self.directions.route(from, to).await
    }

    #[tracing::instrument(skip_all)]
    async fn draw_route(&self, geometry: LineString<f64>, style: RouteStyle) -> RouteHandle {
        let handle = RouteHandle::new();
        let route = SceneRoute {
            handle,
            path: geometry.0.iter().map(|coord| [coord.x, coord.y]).collect(),
            style,
        };

        self.state.lock().await.routes.insert(handle, route);

        handle
    }

    #[tracing::instrument(skip(self))]
    async fn clear_route(&self, handle: RouteHandle) {
        self.state.lock().await.routes.remove(&handle);
    }
}

#[test]
fn markers_and_routes_come_and_go() {
    use crate::entities::Mode;
    use crate::testing::FakeDirections;
    use std::sync::Arc;
    use tokio_test::block_on;

    let scene = Scene::new(Coordinates::new(29.3759, 47.9774), 12, Arc::new(FakeDirections::default()));

    block_on(async {
        let marker = scene
            .create_marker(Coordinates::new(29.1, 47.9), "Sharq", Mode::From.into())
            .await;
        assert_eq!(scene.marker_count().await, 1);
        assert_eq!(scene.view().await.markers[0].style.fill, "#22C55E");

        let line = scene
            .directions(Coordinates::new(29.1, 47.9), Coordinates::new(29.2, 48.0))
            .await
            .unwrap();
        let route = scene.draw_route(line, RouteStyle::for_pair(1)).await;
        assert_eq!(scene.routes().await[0].path, vec![[47.9, 29.1], [48.0, 29.2]]);

        scene.destroy_marker(marker).await;
        scene.destroy_marker(marker).await;
        scene.clear_route(route).await;

        assert_eq!(scene.marker_count().await, 0);
        assert_eq!(scene.route_count().await, 0);

        scene.recenter(Coordinates::new(29.0, 48.0), 15).await;
        let view = scene.view().await;
        assert_eq!(view.center, Coordinates::new(29.0, 48.0));
        assert_eq!(view.zoom, 15);
    });
}
