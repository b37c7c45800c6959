use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::{
    api::{DynAPI, PointAPI},
    entities::{Coordinates, PointId, RoutePoint},
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    lat: f64,
    lng: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Option<RoutePoint>>, Error> {
    let point = api
        .capture_point(Coordinates::new(params.lat, params.lng))
        .await?;

    Ok(point.into())
}

pub async fn remove(Extension(api): Extension<DynAPI>, Path(id): Path<u64>) -> Result<(), Error> {
    api.remove_point(PointId(id)).await
}

pub async fn clear(Extension(api): Extension<DynAPI>) -> Result<(), Error> {
    api.clear_points().await
}

#[test]
fn click_then_remove() {
    use tokio_test::block_on;

    let (api, scene) = super::test_api();

    block_on(async {
        let Json(point) = create(
            Extension(api.clone()),
            Json(CreateParams {
                lat: 29.37,
                lng: 47.97,
            }),
        )
        .await
        .unwrap();
        let point = point.unwrap();
        assert_eq!(scene.marker_count().await, 1);

        remove(Extension(api.clone()), Path(point.id.0)).await.unwrap();
        assert_eq!(scene.marker_count().await, 0);

        let result = create(
            Extension(api),
            Json(CreateParams {
                lat: f64::INFINITY,
                lng: 47.97,
            }),
        )
        .await;
        assert_eq!(result.err().map(|err| err.code), Some(101));
    });
}
