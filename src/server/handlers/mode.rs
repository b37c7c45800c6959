use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{DynAPI, PointAPI},
    entities::Mode,
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct SetParams {
    mode: Mode,
}

pub async fn set(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SetParams>,
) -> Result<Json<Mode>, Error> {
    let mode = api.set_mode(params.mode).await?;

    Ok(mode.into())
}

pub async fn switch(Extension(api): Extension<DynAPI>) -> Result<Json<Mode>, Error> {
    let mode = api.switch_mode().await?;

    Ok(mode.into())
}
