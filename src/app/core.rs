use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::carousel::{CarouselSet, GestureThresholds};
use crate::catalog::StorySource;
use crate::config::Config;
use crate::deeplink::{DeepLinkSync, MemoryHistory};
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::nav::{GenerationGuard, NavigationState};
use crate::playback::{
    MediaHost, MediaSignal, PendingPlay, PlaybackCoordinator, PlaybackPolicy, SimulatedHost,
};
use crate::session::ViewerSession;
use crate::ui::WrapCache;

use super::actors::PointerActor;
use super::state::{AppState, Mode};

/// The dual-axis navigation engine: one navigation state and everything that
/// mirrors it.
pub struct EngineSubsystem {
    pub nav: NavigationState,
    pub carousels: CarouselSet,
    pub playback: PlaybackCoordinator,
    pub deeplink: DeepLinkSync<MemoryHistory>,
    pub edge_forwarding: bool,
}

/// Async work requested while handling an event, started by the event loop.
#[derive(Default)]
pub struct PendingWork {
    pub plays: Vec<PendingPlay>,
    /// `force_refresh` flag per requested catalog fetch.
    pub catalog_fetches: VecDeque<bool>,
    pub events: Vec<AppEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Location the deep link is read from, e.g. `/player?story=a&segment=b`.
    pub initial_location: String,
    pub category: Option<String>,
    pub force_refresh: bool,
    /// Home of the persisted catalog cache and onboarding flag.
    pub data_dir: Option<PathBuf>,
}

pub struct App {
    pub state: AppState,
    pub engine: EngineSubsystem,
    pub session: ViewerSession,
    pub pending: PendingWork,
    pub config: Config,
    pub(crate) pointer: PointerActor,
    pub(crate) wrap_cache: WrapCache,
    pub(crate) catalog_guard: GenerationGuard<()>,
    pub(crate) media_signals: Option<flume::Receiver<MediaSignal>>,
}

impl App {
    pub fn new(source: Arc<dyn StorySource>, options: AppOptions) -> AppResult<Self> {
        let config = Config::load()?;
        Ok(Self::new_with_config(source, config, options))
    }

    /// Uses the simulated media host, whose load/buffer reports arrive on the
    /// event loop.
    pub fn new_with_config(
        source: Arc<dyn StorySource>,
        config: Config,
        options: AppOptions,
    ) -> Self {
        let (signal_tx, signal_rx) = flume::unbounded();
        let host = SimulatedHost::new(&config.playback, signal_tx);
        let session = ViewerSession::new(source, &config, options.data_dir.as_deref());
        let mut app = Self::with_media_host(session, config, options, Box::new(host));
        app.media_signals = Some(signal_rx);
        app
    }

    pub fn with_media_host(
        session: ViewerSession,
        config: Config,
        options: AppOptions,
        host: Box<dyn MediaHost>,
    ) -> Self {
        let mut state = AppState::default();
        if !session.onboarding().is_completed() {
            state.mode = Mode::Onboarding;
        }
        state.catalog.preferred_category = options.category;
        state.catalog.loading = true;

        let mut pending = PendingWork::default();
        pending.catalog_fetches.push_back(options.force_refresh);

        let engine = EngineSubsystem {
            nav: NavigationState::default(),
            carousels: CarouselSet::new(GestureThresholds::from_config(&config.navigation)),
            playback: PlaybackCoordinator::new(host, PlaybackPolicy::from_config(&config.playback)),
            deeplink: DeepLinkSync::new(MemoryHistory::new(options.initial_location)),
            edge_forwarding: config.navigation.edge_forwarding,
        };

        Self {
            state,
            engine,
            session,
            pending,
            config,
            pointer: PointerActor::default(),
            wrap_cache: WrapCache::default(),
            catalog_guard: GenerationGuard::default(),
            media_signals: None,
        }
    }

    /// The current deep link, shareable after the viewer closes.
    pub fn location(&self) -> &str {
        self.engine.deeplink.location()
    }
}
