mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::map::Scene;
use crate::server::handlers::{console, estimation, markers, mode, orders, points, routes, search};

pub fn router(api: DynAPI, scene: Arc<Scene>) -> Router {
    Router::new()
        .route("/console", get(console::snapshot))
        .route("/console/map", get(console::map))
        .route("/console/route_data", get(console::route_data))
        .route("/console/notices", get(console::notices))
        .route("/points", post(points::create).delete(points::clear))
        .route("/points/:id", delete(points::remove))
        .route("/markers/:handle/click", post(markers::click))
        .route("/routes/:index", delete(routes::remove))
        .route("/mode", put(mode::set))
        .route("/mode/switch", post(mode::switch))
        .route("/search", get(search::suggestions))
        .route("/search/select", post(search::select))
        .route("/estimation", get(estimation::find).post(estimation::create).delete(estimation::hide))
        .route("/orders", post(orders::create))
        .layer(Extension(api))
        .layer(Extension(scene))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, scene: Arc<Scene>, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, scene);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(?err, "server stopped");
            unexpected_error()
        })
}
