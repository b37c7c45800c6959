use axum::extract::{Extension, Path};

use crate::{
    api::{DynAPI, PointAPI},
    error::Error,
};

pub async fn remove(Extension(api): Extension<DynAPI>, Path(index): Path<usize>) -> Result<(), Error> {
    api.delete_route(index).await
}
