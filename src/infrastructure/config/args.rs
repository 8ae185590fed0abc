use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "viewkit",
    version,
    about = "Load images into views through the shared image cache",
    long_about = None
)]
pub struct CliArgs {
    /// Image locators to load.
    #[arg(required = true, value_name = "LOCATOR")]
    pub locators: Vec<String>,

    /// Load every locator into a single view, one after the other.
    #[arg(long)]
    pub same_view: bool,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Maximum images kept in the memory cache.
    #[arg(long)]
    pub memory_cache_size: Option<usize>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Cross-fade duration in milliseconds.
    #[arg(long)]
    pub fade_ms: Option<u64>,

    /// Fallback tint (hex color).
    #[arg(long)]
    pub tint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locators_are_required() {
        assert!(CliArgs::try_parse_from(["viewkit"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "viewkit",
            "--same-view",
            "-c",
            "/tmp/viewkit.toml",
            "https://a.example/1.png",
            "https://a.example/2.png",
        ])
        .unwrap();

        assert!(args.same_view);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/viewkit.toml")));
        assert_eq!(args.locators.len(), 2);
        assert!(args.log_level.is_none());
    }
}
