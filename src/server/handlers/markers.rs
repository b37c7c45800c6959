use axum::extract::{Extension, Path};
use uuid::Uuid;

use crate::{
    api::{DynAPI, PointAPI},
    error::Error,
    map::MarkerHandle,
};

pub async fn click(Extension(api): Extension<DynAPI>, Path(handle): Path<Uuid>) -> Result<(), Error> {
    api.click_marker(MarkerHandle(handle)).await
}
