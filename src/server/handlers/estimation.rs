use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{DynAPI, EstimationAPI},
    entities::{EstimationDialogState, LocationsData, ServiceType},
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    #[serde(default)]
    service_type: ServiceType,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<LocationsData>, Error> {
    let data = api.estimate(params.service_type).await?;

    Ok(data.into())
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<EstimationDialogState>, Error> {
    let state = api.estimation().await?;

    Ok(state.into())
}

pub async fn hide(Extension(api): Extension<DynAPI>) -> Result<(), Error> {
    api.hide_estimation().await
}

#[test]
fn estimation_round_trip_over_handlers() {
    use super::points;
    use crate::api::PointAPI;
    use tokio_test::block_on;

    let (api, _) = super::test_api();

    block_on(async {
        for (lat, lng) in [(29.10, 47.90), (29.20, 48.00)] {
            api.capture_point(crate::entities::Coordinates::new(lat, lng))
                .await
                .unwrap();
        }

        let Json(data) = create(
            Extension(api.clone()),
            Json(CreateParams {
                service_type: ServiceType::Transportation,
            }),
        )
        .await
        .unwrap();
        assert_eq!(data.locations_data.len(), 1);

        let Json(state) = find(Extension(api.clone())).await.unwrap();
        assert!(state.visible);

        hide(Extension(api.clone())).await.unwrap();
        points::clear(Extension(api.clone())).await.unwrap();

        let Json(state) = find(Extension(api)).await.unwrap();
        assert!(!state.visible);
    });
}
