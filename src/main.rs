use std::sync::Arc;

use dispatch_console::config::Config;
use dispatch_console::engine::Engine;
use dispatch_console::error::Error;
use dispatch_console::external::{dispatch_api::DispatchApi, google_maps::GoogleMaps};
use dispatch_console::map::Scene;
use dispatch_console::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let google_maps = Arc::new(GoogleMaps::new(&config));
    let dispatch_api = Arc::new(DispatchApi::new(&config));
    let scene = Arc::new(Scene::new(config.map_center, config.map_zoom, google_maps.clone()));

    let engine = Engine::new(
        scene.clone(),
        google_maps,
        dispatch_api.clone(),
        dispatch_api,
        config.focus_zoom,
    );

    serve(engine, scene, config.listen_addr).await
}
