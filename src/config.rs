use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::categories::{self, CategorySource};
use crate::constants::feeds;
use crate::filter::MatchMode;
use crate::grid::RenderMode;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Static,
    Discovered,
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "static" | "fixed" => Ok(SourceKind::Static),
            "discovered" | "discover" | "listing" => Ok(SourceKind::Discovered),
            _ => Err(anyhow!(
                "Invalid category source '{s}'. Valid options: static, discovered"
            )),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Static => write!(f, "static"),
            SourceKind::Discovered => write!(f, "discovered"),
        }
    }
}

/// tokensnap - browse token lists by network
///
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "tokensnap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Token list browser", long_about = None)]
pub struct CliArgs {
    /// Route to open, e.g. /Arbitrum/usdc
    pub route: Option<String>,

    /// Category source: static (built-in table) or discovered (directory listing)
    #[arg(long, env = "CATEGORY_SOURCE", value_parser = clap::value_parser!(SourceKind))]
    pub category_source: Option<SourceKind>,

    /// TOML file with a [categories] table of name = "feed url"
    #[arg(long, env = "CATEGORIES_FILE")]
    pub categories_file: Option<PathBuf>,

    /// Directory-listing endpoint used by the discovered source
    #[arg(long, env = "LISTING_URL")]
    pub listing_url: Option<String>,

    /// Base URL prepended to discovered file names
    #[arg(long, env = "RAW_BASE_URL")]
    pub raw_base_url: Option<String>,

    /// Search matching: substring or prefix
    #[arg(long, env = "MATCH_MODE", value_parser = clap::value_parser!(MatchMode))]
    pub match_mode: Option<MatchMode>,

    /// Tile rendering: grid or virtual
    #[arg(long, env = "RENDER_MODE", value_parser = clap::value_parser!(RenderMode))]
    pub render_mode: Option<RenderMode>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord, amber, green
    #[arg(long, env = "THEME", value_parser = clap::value_parser!(Theme))]
    pub theme: Option<Theme>,

    /// Check logo URLs of hovered tokens and fall back to the placeholder when unreachable
    #[arg(long, env = "PROBE_LOGOS")]
    pub probe_logos: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub category_source: CategorySource,
    pub match_mode: MatchMode,
    pub render_mode: RenderMode,
    pub http_timeout_ms: u64,
    pub render_fps: u32,
    pub theme: Theme,
    pub probe_logos: bool,
    pub initial_route: Option<String>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Build a validated config from parsed arguments.
pub fn from_args(args: CliArgs) -> Result<Config> {
    let kind = args.category_source.unwrap_or(SourceKind::Static);

    let category_source = match kind {
        SourceKind::Static => {
            let table = match &args.categories_file {
                Some(path) => categories::load_table(path)?,
                None => categories::builtin_table(),
            };
            for c in &table {
                validate_url(&c.url, &format!("feed URL for {}", c.name))?;
            }
            CategorySource::Static(table)
        }
        SourceKind::Discovered => {
            if args.categories_file.is_some() {
                log::warn!("[config] CATEGORIES_FILE is ignored with the discovered source");
            }
            let listing_url = args
                .listing_url
                .unwrap_or_else(|| feeds::LISTING_URL.to_string());
            validate_url(&listing_url, "LISTING_URL")?;
            let raw_base_url = args
                .raw_base_url
                .unwrap_or_else(|| feeds::RAW_BASE_URL.to_string());
            validate_url(&raw_base_url, "RAW_BASE_URL")?;
            CategorySource::Discovered {
                listing_url,
                raw_base_url,
            }
        }
    };

    let http_timeout_ms = validate_in_range(
        args.http_timeout_ms.unwrap_or(15_000),
        1000,
        60_000,
        "HTTP_TIMEOUT_MS",
    )?;
    let render_fps = validate_in_range(args.render_fps.unwrap_or(30), 1, 120, "RENDER_FPS")?;

    Ok(Config {
        category_source,
        match_mode: args.match_mode.unwrap_or_default(),
        render_mode: args.render_mode.unwrap_or_default(),
        http_timeout_ms,
        render_fps,
        theme: args.theme.unwrap_or_default(),
        probe_logos: args.probe_logos.unwrap_or(true),
        initial_route: args.route,
    })
}

impl Config {
    /// Defaults for the browser build, which has no CLI or environment.
    pub fn web_default() -> Self {
        Config {
            category_source: CategorySource::Static(categories::builtin_table()),
            match_mode: MatchMode::Substring,
            render_mode: RenderMode::Virtual,
            http_timeout_ms: 15_000,
            render_fps: 60,
            theme: Theme::Nord,
            probe_logos: false,
            initial_route: None,
        }
    }

    pub fn print_summary(&self) {
        eprintln!("tokensnap configuration:");
        match &self.category_source {
            CategorySource::Static(table) => {
                eprintln!("  Categories: static ({} entries)", table.len());
            }
            CategorySource::Discovered {
                listing_url,
                raw_base_url,
            } => {
                eprintln!("  Categories: discovered from {listing_url}");
                eprintln!("  Feed base: {raw_base_url}");
            }
        }
        eprintln!("  Match mode: {}", self.match_mode);
        eprintln!("  Render mode: {}", self.render_mode);
        eprintln!("  HTTP timeout: {}ms", self.http_timeout_ms);
        eprintln!("  Render FPS: {}", self.render_fps);
        eprintln!("  Theme: {}", self.theme);
    }
}

/// Parse CLI args from an explicit list (used by tests and embedders).
pub fn from_iter<I, T>(iter: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = CliArgs::try_parse_from(iter).context("Invalid arguments")?;
    from_args(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_static_substring_virtual() {
        let cfg = from_args(CliArgs::default()).unwrap();
        assert!(cfg.category_source.is_static());
        assert_eq!(cfg.match_mode, MatchMode::Substring);
        assert_eq!(cfg.render_mode, RenderMode::Virtual);
        assert_eq!(cfg.http_timeout_ms, 15_000);
        assert!(cfg.initial_route.is_none());
    }

    #[test]
    fn discovered_source_uses_default_urls() {
        let args = CliArgs {
            category_source: Some(SourceKind::Discovered),
            ..Default::default()
        };
        match from_args(args).unwrap().category_source {
            CategorySource::Discovered { listing_url, raw_base_url } => {
                assert_eq!(listing_url, feeds::LISTING_URL);
                assert_eq!(raw_base_url, feeds::RAW_BASE_URL);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_and_bad_urls() {
        let args = CliArgs {
            http_timeout_ms: Some(10),
            ..Default::default()
        };
        assert!(from_args(args).is_err());

        let args = CliArgs {
            category_source: Some(SourceKind::Discovered),
            listing_url: Some("ftp://lists".into()),
            ..Default::default()
        };
        assert!(from_args(args).is_err());
    }

    #[test]
    fn parses_route_and_modes_from_argv() {
        let cfg = from_iter([
            "tokensnap",
            "--match-mode",
            "prefix",
            "--render-mode",
            "grid",
            "/Arbitrum/usdc",
        ])
        .unwrap();
        assert_eq!(cfg.match_mode, MatchMode::Prefix);
        assert_eq!(cfg.render_mode, RenderMode::Grid);
        assert_eq!(cfg.initial_route.as_deref(), Some("/Arbitrum/usdc"));
    }
}
