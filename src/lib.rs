pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod host;
pub mod models;
pub mod pagination;
pub mod process;
pub mod render;
pub mod source;
pub mod theme;
pub mod widget;

pub use client::ApiClient;
pub use config::{Design, Sort, ThemeSetting, WidgetConfig};
pub use error::{normalize, FetchError, NormalizedError};
pub use fetch::{CycleRegistry, CycleToken, FetchOutcome};
pub use host::{HostSignals, StaticHost};
pub use models::{AggregateStats, Review, ReviewBatch};
pub use pagination::{Pagination, ViewportClass};
pub use render::render_widget;
pub use source::{placeholder_batch, resolve, SourceDecision};
pub use theme::{ColorScheme, ThemeResolver};
pub use widget::{FetchJob, Widget, WidgetState};
