use axum::extract::{Extension, Json};

use crate::{
    api::{DynAPI, EstimationAPI},
    entities::{CreateOrderRequest, OrderDraft},
    error::Error,
};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<CreateOrderRequest>, Error> {
    let request = api.create_order(draft).await?;

    Ok(request.into())
}
