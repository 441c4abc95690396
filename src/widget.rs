use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::config::{Design, WidgetConfig};
use crate::error::{FetchError, NormalizedError};
use crate::fetch::{self, CycleRegistry, CycleToken, FetchOutcome};
use crate::host::HostSignals;
use crate::models::{AggregateStats, Review, ReviewBatch};
use crate::pagination::Pagination;
use crate::process;
use crate::source::{self, SourceDecision};
use crate::theme::{ColorScheme, ThemeResolver};

/// Lifecycle of one widget instance.
///
/// `Idle -> Loading -> Ready | Failed`, except placeholder resolutions,
/// which jump straight to `Ready` without visiting `Loading`.
#[derive(Debug, Clone)]
pub enum WidgetState {
    Idle,
    Loading,
    Ready {
        batch: ReviewBatch,
        stats: Option<AggregateStats>,
        fetched_at: DateTime<Utc>,
        placeholder: bool,
    },
    Failed(NormalizedError),
}

/// The network work one resolution cycle still owes. Run it through
/// [`fetch::run`] and hand the result back to [`Widget::apply`].
#[derive(Debug)]
pub struct FetchJob {
    pub decision: SourceDecision,
    pub token: CycleToken,
}

/// One self-contained widget instance per mount point, constructed from the
/// embedding attributes, with explicit teardown. No state is shared between
/// instances.
pub struct Widget {
    id: Uuid,
    config: WidgetConfig,
    state: WidgetState,
    pagination: Pagination,
    theme: ThemeResolver,
    cycles: CycleRegistry,
}

impl Widget {
    /// Mount into a host environment: subscribe to its signals and snapshot
    /// the initial viewport and color scheme.
    pub fn mount(config: WidgetConfig, host: &dyn HostSignals) -> Self {
        let id = Uuid::new_v4();
        host.subscribe(id);

        let widget = Self {
            id,
            theme: ThemeResolver::new(config.theme, host.color_scheme()),
            pagination: Pagination::new(host.viewport_width(), 0),
            state: WidgetState::Idle,
            cycles: CycleRegistry::new(),
            config,
        };

        info!(widget = %widget.id, target = %widget.config.target, "Widget mounted");
        widget
    }

    /// Resolve the data source and start a fetch cycle.
    ///
    /// Placeholder resolutions complete synchronously (state becomes
    /// `Ready`, no job returned). Otherwise the state moves to `Loading`
    /// and the caller owns running the returned job; any cycle already in
    /// flight is superseded either way.
    pub fn begin_refresh(&mut self) -> Option<FetchJob> {
        let decision = source::resolve(&self.config);

        if decision == SourceDecision::Placeholder {
            self.cycles.cancel();
            let batch = process::dedupe(source::placeholder_batch());
            self.pagination.reset_for_batch(batch.reviews.len());
            self.state = WidgetState::Ready {
                batch,
                stats: None,
                fetched_at: Utc::now(),
                placeholder: true,
            };
            debug!(widget = %self.id, "Placeholder mode, no fetch needed");
            return None;
        }

        let token = self.cycles.begin();
        self.state = WidgetState::Loading;
        Some(FetchJob { decision, token })
    }

    /// Apply a completed fetch cycle. Results from superseded cycles are
    /// discarded unconditionally; last request wins.
    pub fn apply(&mut self, token: &CycleToken, result: Result<FetchOutcome, FetchError>) {
        if !token.is_current() {
            debug!(widget = %self.id, "Discarding result from superseded fetch cycle");
            return;
        }

        match result {
            Ok(outcome) => {
                let batch = process::dedupe(outcome.batch);
                self.pagination.reset_for_batch(batch.reviews.len());
                info!(
                    widget = %self.id,
                    reviews = batch.reviews.len(),
                    has_stats = outcome.stats.is_some(),
                    "Batch applied"
                );
                self.state = WidgetState::Ready {
                    batch,
                    stats: outcome.stats,
                    fetched_at: Utc::now(),
                    placeholder: false,
                };
            }
            Err(e) if e.is_cancelled() => {
                debug!(widget = %self.id, "Fetch cycle cancelled");
            }
            Err(e) => {
                let error = e
                    .normalized()
                    .unwrap_or_else(|| NormalizedError::from_message("Failed to load"));
                warn!(widget = %self.id, error = %error, "Fetch failed");
                self.state = WidgetState::Failed(error);
            }
        }
    }

    /// Replace the configuration and re-resolve, superseding any in-flight
    /// fetch.
    pub fn configure(&mut self, config: WidgetConfig) -> Option<FetchJob> {
        self.theme.set_setting(config.theme);
        self.config = config;
        self.begin_refresh()
    }

    /// Convenience driver: one full resolve/fetch/apply cycle.
    pub async fn refresh(&mut self, client: &ApiClient) {
        if let Some(job) = self.begin_refresh() {
            let result = fetch::run(client, &job.decision, &job.token).await;
            self.apply(&job.token, result);
        }
    }

    /// Host viewport changed. Returns true when the layout needs re-render.
    pub fn handle_resize(&mut self, width: u32) -> bool {
        self.pagination.handle_resize(width)
    }

    /// Host color-scheme preference changed. Returns true when the
    /// effective theme changed.
    pub fn handle_scheme_change(&mut self, scheme: ColorScheme) -> bool {
        self.theme.observe(scheme)
    }

    pub fn load_more(&mut self) {
        self.pagination.load_more();
    }

    /// Teardown: cancel any in-flight cycle and stop observing the host.
    pub fn unmount(&mut self, host: &dyn HostSignals) {
        self.cycles.cancel();
        host.unsubscribe(self.id);
        info!(widget = %self.id, "Widget unmounted");
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn design(&self) -> Design {
        self.config.design
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.theme.effective()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// The currently revealed slice of the deduplicated batch.
    pub fn visible_reviews(&self) -> &[Review] {
        match &self.state {
            WidgetState::Ready { batch, .. } => self.pagination.window(&batch.reviews),
            _ => &[],
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self.state, WidgetState::Ready { .. }) && self.pagination.has_more()
    }

    /// Header numbers with the stats overlay applied when present.
    pub fn display_summary(&self) -> Option<(f64, u64)> {
        match &self.state {
            WidgetState::Ready { batch, stats, .. } => {
                Some(process::display_summary(batch, stats.as_ref()))
            }
            _ => None,
        }
    }
}
