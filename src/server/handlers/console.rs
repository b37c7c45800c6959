use std::sync::Arc;

use axum::extract::{Extension, Json};

use crate::{
    api::{ConsoleAPI, DynAPI, PointAPI},
    engine::{Notice, Snapshot},
    entities::RouteData,
    error::Error,
    map::{Scene, SceneView},
};

pub async fn snapshot(Extension(api): Extension<DynAPI>) -> Result<Json<Snapshot>, Error> {
    let snapshot = api.snapshot().await?;

    Ok(snapshot.into())
}

pub async fn map(Extension(scene): Extension<Arc<Scene>>) -> Json<SceneView> {
    scene.view().await.into()
}

pub async fn route_data(Extension(api): Extension<DynAPI>) -> Result<Json<RouteData>, Error> {
    let route_data = api.route_data().await?;

    Ok(route_data.into())
}

pub async fn notices(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Notice>>, Error> {
    let notices = api.take_notices().await?;

    Ok(notices.into())
}

#[test]
fn notices_are_drained_by_the_console() {
    use crate::server::handlers::test_api;
    use crate::testing::at;
    use tokio_test::block_on;

    let (api, _) = test_api();

    block_on(async {
        api.capture_point(at(29.37, 47.97)).await.unwrap();

        let Json(pending) = notices(Extension(api.clone())).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert!(matches!(pending[0], Notice::PointAdded { .. }));

        let Json(pending) = notices(Extension(api)).await.unwrap();
        assert!(pending.is_empty());
    });
}
