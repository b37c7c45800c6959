use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::{
    api::{DynAPI, SearchAPI},
    entities::RoutePoint,
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct SuggestionsParams {
    query: String,
}

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    address: String,
}

pub async fn suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionsParams>,
) -> Result<Json<Vec<String>>, Error> {
    let suggestions = api.search(params.query).await?;

    Ok(suggestions.into())
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SelectParams>,
) -> Result<Json<Option<RoutePoint>>, Error> {
    let point = api.select_suggestion(params.address).await?;

    Ok(point.into())
}
