mod estimation_api;
mod point_api;
mod renderer;
mod search_api;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::{
    api::{ConsoleAPI, API},
    entities::{EstimationDialog, EstimationDialogState, Mode, RouteData, RoutePair},
    error::Error,
    external::{DynGeocoder, DynOrders, DynPricing},
    map::{DynMap, RouteHandle},
    store::{MarkerEntry, MarkerRegistry, ModeController, PointStore},
};

const NOTICE_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    PointAdded { role: Mode, address: String },
    PointRemoved,
    RouteDeleted { number: usize },
    AllPointsCleared,
    EstimationFailed { message: String },
    OrderCreated,
    OrderFailed { message: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PairView {
    pub index: usize,
    pub complete: bool,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

impl From<&RoutePair> for PairView {
    fn from(pair: &RoutePair) -> Self {
        Self {
            index: pair.index,
            complete: pair.is_complete(),
            from_address: pair.from.as_ref().map(|point| point.short_address()),
            to_address: pair.to.as_ref().map(|point| point.short_address()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub loading: bool,
    pub route_data: RouteData,
    pub pairs: Vec<PairView>,
    pub markers: Vec<MarkerEntry>,
    pub drawn_routes: usize,
    pub suggestions: Vec<String>,
    pub estimation: EstimationDialogState,
}

#[derive(Debug, Default)]
struct ConsoleState {
    points: PointStore,
    markers: MarkerRegistry,
    mode: ModeController,
    drawn_routes: Vec<RouteHandle>,
    render_generation: u64,
    /// Bumped by clear; captures started in an older session are dropped.
    session: u64,
    pending_captures: usize,
    search_generation: u64,
    suggestions: Vec<String>,
    dialog: EstimationDialog,
    priced_route_data: Option<RouteData>,
}

impl ConsoleState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode.mode(),
            loading: self.pending_captures > 0,
            route_data: self.points.route_data(),
            pairs: self.points.pairs().map(|pair| PairView::from(&pair)).collect(),
            markers: self.markers.entries().cloned().collect(),
            drawn_routes: self.drawn_routes.len(),
            suggestions: self.suggestions.clone(),
            estimation: self.dialog.state(),
        }
    }
}

pub struct Engine {
    state: Mutex<ConsoleState>,
    map: DynMap,
    geocoder: DynGeocoder,
    pricing: DynPricing,
    orders: DynOrders,
    focus_zoom: u8,
    snapshots: watch::Sender<Snapshot>,
    notices: async_channel::Sender<Notice>,
    notice_feed: async_channel::Receiver<Notice>,
}

impl Engine {
    pub fn new(
        map: DynMap,
        geocoder: DynGeocoder,
        pricing: DynPricing,
        orders: DynOrders,
        focus_zoom: u8,
    ) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::default());
        let (notices, notice_feed) = async_channel::bounded(NOTICE_CAPACITY);

        Self {
            state: Mutex::new(ConsoleState::default()),
            map,
            geocoder,
            pricing,
            orders,
            focus_zoom,
            snapshots,
            notices,
            notice_feed,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self, state: &ConsoleState) {
        self.snapshots.send_replace(state.snapshot());
    }

    fn notify(&self, notice: Notice) {
        let mut notice = notice;

        loop {
            match self.notices.try_send(notice) {
                Ok(()) => return,
                Err(async_channel::TrySendError::Full(rejected)) => {
                    if let Ok(oldest) = self.notice_feed.try_recv() {
                        tracing::warn!(notice = ?oldest, "notice feed full, dropping oldest notice");
                    }
                    notice = rejected;
                }
                Err(async_channel::TrySendError::Closed(rejected)) => {
                    tracing::warn!(notice = ?rejected, "notice feed closed");
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl ConsoleAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<Snapshot, Error> {
        Ok(self.state.lock().await.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn take_notices(&self) -> Result<Vec<Notice>, Error> {
        let mut notices = vec![];
        while let Ok(notice) = self.notice_feed.try_recv() {
            notices.push(notice);
        }

        Ok(notices)
    }
}

impl API for Engine {}

#[test]
fn subscribers_see_every_change() {
    use crate::api::PointAPI;
    use crate::testing::{at, Harness};
    use tokio_test::block_on;

    let harness = Harness::new();
    let mut snapshots = harness.engine.subscribe();

    block_on(async {
        harness.engine.capture_point(at(29.37, 47.97)).await.unwrap();

        assert!(snapshots.has_changed().unwrap());
        let snapshot = snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.route_data.from_points.len(), 1);
        assert_eq!(snapshot.mode, Mode::To);
        assert!(!snapshot.loading);

        harness.engine.switch_mode().await.unwrap();
        assert_eq!(snapshots.borrow_and_update().mode, Mode::From);
    });
}

#[test]
fn notices_report_added_points() {
    use crate::api::PointAPI;
    use crate::testing::{at, Harness};
    use tokio_test::block_on;

    let harness = Harness::new();

    block_on(async {
        harness.engine.capture_point(at(29.37, 47.97)).await.unwrap();
        harness.engine.clear_points().await.unwrap();

        let notices = harness.engine.take_notices().await.unwrap();
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices[0], Notice::PointAdded { role: Mode::From, .. }));
        assert_eq!(notices[1], Notice::AllPointsCleared);
    });
}

#[test]
fn failure_notice_survives_a_full_feed() {
    use crate::api::{EstimationAPI, PointAPI};
    use crate::entities::ServiceType;
    use crate::testing::{at, FakeDirections, FakeGeocoder, FakeOrders, FakePricing, Harness};
    use tokio_test::block_on;

    let harness = Harness::with(
        FakeGeocoder::default(),
        FakeDirections::default(),
        FakePricing {
            fail: true,
            ..Default::default()
        },
        FakeOrders::default(),
    );
    let engine = &harness.engine;

    block_on(async {
        for i in 0..NOTICE_CAPACITY + 2 {
            engine
                .capture_point(at(29.0 + i as f64 / 1000.0, 47.9))
                .await
                .unwrap();
        }

        assert!(engine.estimate(ServiceType::Transportation).await.is_err());

        let notices = engine.take_notices().await.unwrap();
        assert_eq!(notices.len(), NOTICE_CAPACITY);
        assert!(matches!(
            notices.last(),
            Some(Notice::EstimationFailed { .. })
        ));

        // drained on read
        assert!(engine.take_notices().await.unwrap().is_empty());
    });
}
