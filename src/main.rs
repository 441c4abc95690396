use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use review_widget::{
    render_widget, ApiClient, ColorScheme, Design, Sort, StaticHost, ThemeSetting, Widget,
    WidgetConfig, WidgetState,
};

#[derive(Parser)]
#[command(name = "review-widget")]
#[command(about = "Embeddable review widget core: fetch, resolve and render third-party reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Data-source selection, mirroring the embed script-tag attributes.
#[derive(Args)]
struct SourceArgs {
    /// API origin (e.g. https://api.example.com)
    #[arg(long, default_value = "")]
    api_base: String,

    /// Public key for unauthenticated instance lookup
    #[arg(long)]
    public_key: Option<String>,

    /// Authenticated instance identifier
    #[arg(long)]
    instance: Option<String>,

    /// Bearer token for instance-scoped endpoints
    #[arg(long, env = "WIDGET_API_TOKEN")]
    token: Option<String>,

    /// Minimum star rating forwarded upstream
    #[arg(long)]
    min_rating: Option<f64>,

    /// Upstream review cap
    #[arg(long)]
    max_reviews: Option<u32>,

    /// Sort order (newest|oldest|best|worst)
    #[arg(long)]
    sort: Option<String>,

    /// Locale hint forwarded upstream
    #[arg(long)]
    locale: Option<String>,

    /// YAML widget profile; flags override its values
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[derive(Args)]
struct PresentationArgs {
    /// Theme (light|dark|system)
    #[arg(long)]
    theme: Option<String>,

    /// Layout variant (grid|list|carousel|badge)
    #[arg(long)]
    design: Option<String>,

    /// Simulated host viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Write the output to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch reviews for the configured source and print the rendered HTML
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        presentation: PresentationArgs,
    },

    /// Render the placeholder sample batch offline
    Preview {
        #[command(flatten)]
        presentation: PresentationArgs,
    },

    /// Fetch reviews and print the processed batch as JSON
    Fetch {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("review_widget=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            presentation,
        } => {
            run_render(source, presentation).await?;
        }
        Commands::Preview { presentation } => {
            run_preview(presentation)?;
        }
        Commands::Fetch { source } => {
            run_fetch(source).await?;
        }
    }

    Ok(())
}

fn build_config(source: &SourceArgs, presentation: Option<&PresentationArgs>) -> Result<WidgetConfig> {
    let mut config = match &source.profile {
        Some(path) => WidgetConfig::load(path)?,
        None => WidgetConfig::default(),
    };

    if !source.api_base.is_empty() {
        config.api_base = source.api_base.clone();
    }
    if source.public_key.is_some() {
        config.public_key = source.public_key.clone();
    }
    if source.instance.is_some() {
        config.instance_id = source.instance.clone();
    }
    if let Some(min_rating) = source.min_rating {
        config.min_rating = min_rating;
    }
    if let Some(max_reviews) = source.max_reviews {
        config.max_reviews = max_reviews;
    }
    if let Some(sort) = &source.sort {
        config.sort = Sort::parse_or_default(sort);
    }
    if source.locale.is_some() {
        config.locale = source.locale.clone();
    }

    if let Some(presentation) = presentation {
        if let Some(theme) = &presentation.theme {
            config.theme = ThemeSetting::parse_or_default(theme);
        }
        if let Some(design) = &presentation.design {
            config.design = Design::parse_or_default(design);
        }
    }

    Ok(config)
}

fn make_client(config: &WidgetConfig, token: Option<&str>) -> ApiClient {
    let client = ApiClient::new(config.api_base.clone());
    match token {
        Some(token) => client.with_token(token),
        None => client,
    }
}

fn make_host(config: &WidgetConfig, width: u32) -> StaticHost {
    // Without a live environment, "system" resolves against a dark host.
    let scheme = match config.theme {
        ThemeSetting::Light => ColorScheme::Light,
        _ => ColorScheme::Dark,
    };
    StaticHost { width, scheme }
}

fn emit(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(output = %path.display(), "Output written");
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn run_render(source: SourceArgs, presentation: PresentationArgs) -> Result<()> {
    let config = build_config(&source, Some(&presentation))?;
    let client = make_client(&config, source.token.as_deref());
    let host = make_host(&config, presentation.width);

    let mut widget = Widget::mount(config, &host);
    widget.refresh(&client).await;

    let html = render_widget(&widget);
    emit(presentation.output.as_ref(), &html)
}

fn run_preview(presentation: PresentationArgs) -> Result<()> {
    // No source flags: resolution lands in placeholder mode, offline.
    let config = build_config(
        &SourceArgs {
            api_base: String::new(),
            public_key: None,
            instance: None,
            token: None,
            min_rating: None,
            max_reviews: None,
            sort: None,
            locale: None,
            profile: None,
        },
        Some(&presentation),
    )?;
    let host = make_host(&config, presentation.width);

    let mut widget = Widget::mount(config, &host);
    let _ = widget.begin_refresh();

    let html = render_widget(&widget);
    emit(presentation.output.as_ref(), &html)
}

async fn run_fetch(source: SourceArgs) -> Result<()> {
    let config = build_config(&source, None)?;
    let client = make_client(&config, source.token.as_deref());
    let host = make_host(&config, 1280);

    let mut widget = Widget::mount(config, &host);
    widget.refresh(&client).await;

    match widget.state() {
        WidgetState::Ready { batch, stats, .. } => {
            let json = serde_json::json!({
                "batch": batch,
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
        WidgetState::Failed(error) => {
            anyhow::bail!("Fetch failed: {}", error);
        }
        other => anyhow::bail!("Unexpected widget state: {:?}", other),
    }
}
