pub mod console;
pub mod estimation;
pub mod markers;
pub mod mode;
pub mod orders;
pub mod points;
pub mod routes;
pub mod search;

#[cfg(test)]
pub(crate) fn test_api() -> (crate::api::DynAPI, std::sync::Arc<crate::map::Scene>) {
    let harness = crate::testing::Harness::new();

    (std::sync::Arc::new(harness.engine), harness.scene)
}
