use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use viewkit::infrastructure::{AppConfig, CliArgs, StorageManager};
use viewkit::util::build;
use viewkit::{ImageLoader, ImageView, MainContext, ViewState};

const SETTLE_GRACE_SECS: u64 = 5;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = match &args.config {
        Some(path) => StorageManager::at(path),
        None => StorageManager::new()?,
    };
    let mut config = storage.load_config()?;
    config.merge_with_args(args);
    Ok(config)
}

fn describe(state: &ViewState) -> String {
    let image = state
        .image
        .as_ref()
        .map_or_else(|| "none".to_string(), |img| format!("{}x{}", img.width(), img.height()));
    let source = state
        .source
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let tint = state.tint.map_or_else(|| "-".to_string(), |t| t.to_string());
    format!(
        "{:?} image={image} source={source} tint={tint}",
        state.phase
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = viewkit::VERSION, "Starting viewkit");

    let fallback = config.fallback_image()?;
    let timeout = Duration::from_secs(config.loader.timeout_secs + SETTLE_GRACE_SECS);

    let (main, _presenter) = MainContext::spawn();
    let loader = ImageLoader::new(config.loader_config(), main.clone())
        .wrap_err("failed to create image loader")?;

    let view_count = if args.same_view { 1 } else { args.locators.len() };
    let views: Vec<ImageView> = (0..view_count)
        .map(|_| {
            build(ImageView::new(), |view| {
                let id = view.id();
                view.on_state_change(move |state| debug!(id = %id, state = ?state, "View updated"));
            })
        })
        .collect();

    for (index, locator) in args.locators.iter().enumerate() {
        let view = &views[index % view_count];
        let ticket = loader.load(view, locator, &fallback);
        debug!(id = %view.id(), ticket = %ticket, locator = %locator, "Issued load");
    }

    for (index, view) in views.iter().enumerate() {
        let label = if args.same_view {
            args.locators.last().map_or("", String::as_str)
        } else {
            args.locators[index].as_str()
        };

        match tokio::time::timeout(timeout, view.settled()).await {
            Ok(state) => println!("{label}: {}", describe(&state)),
            Err(_) => {
                warn!(id = %view.id(), "View did not settle in time");
                println!("{label}: timed out");
            }
        }
    }

    main.flush().await;
    info!(
        in_flight = loader.pending_count(),
        "Finished loading images"
    );

    Ok(())
}
