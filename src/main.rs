//! anifetch - System info with a random anime girl holding a programming book
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use anifetch::api::{RemoteCatalog, UreqClient};
use anifetch::display::{self, Renderer};
use anifetch::{
    CacheStore, Config, Environment, ImageResolver, ImageSize, ImageStore, ResolveError,
    SystemInfo,
};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let env = Environment::from_env();

    if !cli.command.needs_config() {
        run_standalone(&cli.command, &env);
        return Ok(());
    }

    let config = Config::load()?;
    let renderer = build_renderer(&cli, &config, &env);

    match cli.command {
        Command::ClearCache => clear_cache(&config, &renderer),
        Command::ShowCache => show_cache(&config, &renderer),
        _ => run(&config, &env, &renderer),
    }
}

/// Commands that never read the config file
fn run_standalone(command: &Command, env: &Environment) {
    match command {
        Command::Help => print_help(),
        Command::Version => print_version(),
        Command::CheckToken => check_token(env),
        Command::Viewers => list_viewers(env),
        Command::Run | Command::ClearCache | Command::ShowCache => {}
    }
}

fn build_renderer(cli: &Cli, config: &Config, env: &Environment) -> Renderer {
    let size = cli
        .size
        .as_deref()
        .map_or_else(|| config.image_size(), ImageSize::parse_or_default);
    let show_image = config.show_image && !cli.no_image;
    Renderer::new(show_image, display::default_chain(size, env))
}

/// CLI commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run,
    ClearCache,
    ShowCache,
    CheckToken,
    Viewers,
    Help,
    Version,
}

impl Command {
    /// Whether the command depends on `config.toml`
    const fn needs_config(&self) -> bool {
        matches!(self, Self::Run | Self::ClearCache | Self::ShowCache)
    }
}

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
struct Cli {
    command: Command,
    no_image: bool,
    size: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut cli = Cli {
        command: Command::Run,
        no_image: false,
        size: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => cli.command = Command::Help,
            "-v" | "--version" | "version" => cli.command = Command::Version,
            "--no-image" => cli.no_image = true,
            "--clear-cache" => cli.command = Command::ClearCache,
            "--show-cache" => cli.command = Command::ShowCache,
            "--check-token" => cli.command = Command::CheckToken,
            "--viewers" => cli.command = Command::Viewers,
            "--size" | "-s" => {
                let size = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing value for --size (e.g. 40x20)"))?;
                cli.size = Some(size.clone());
            }
            other => {
                if let Some(size) = other.strip_prefix("--size=") {
                    cli.size = Some(size.to_string());
                } else {
                    return Err(anyhow::anyhow!(
                        "Unknown argument: {other}\nRun 'anifetch --help' for usage"
                    ));
                }
            }
        }
    }

    Ok(cli)
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
anifetch - system info with a random anime girl holding a programming book

USAGE:
    anifetch [OPTIONS]

OPTIONS:
    --no-image                 Disable image display
    -s, --size <WxH>           Image size when the terminal size is unknown (default: 40x20)
    --clear-cache              Delete all cached images
    --show-cache               List cached images
    --check-token              Check GitHub token status
    --viewers                  List the image viewers found on PATH
    -h, --help                 Show this help message
    -v, --version              Show version information

ENVIRONMENT:
    GITHUB_TOKEN               Raises the GitHub API limit from 60 to 5000 requests/hour
    RUST_LOG                   Log level (e.g. debug)

CONFIG:
    {}

IMAGES:
    {}
"#,
        anifetch::LOGO,
        config_path,
        anifetch::IMAGE_REPO_URL
    );
}

fn print_version() {
    println!("anifetch {}", anifetch::VERSION);
}

fn cache_store(config: &Config) -> Result<CacheStore> {
    Ok(CacheStore::new(config.cache_dir()?))
}

fn run(config: &Config, env: &Environment, renderer: &Renderer) -> Result<()> {
    let store = cache_store(config)?;
    store
        .ensure_ready()
        .context("Failed to create cache directory")?;

    let info = SystemInfo::gather(env);

    let image = if renderer.shows_image() {
        resolve_image(config, env, store, renderer)
    } else {
        None
    };

    renderer.display_info(&info, image.as_deref());
    Ok(())
}

/// Resolve an image; failures are reported and never abort the run
fn resolve_image(
    config: &Config,
    env: &Environment,
    store: CacheStore,
    renderer: &Renderer,
) -> Option<PathBuf> {
    let catalog = RemoteCatalog::new(
        UreqClient::new(config.request_timeout()),
        &config.catalog_url,
        env.github_token.as_deref(),
    );

    match ImageResolver::new(catalog, store).resolve() {
        Ok(image) => {
            tracing::info!("Using {} ({:?})", image.path.display(), image.source);
            Some(image.path)
        }
        Err(e) => {
            renderer.display_error(&resolve_failure_message(&e));
            None
        }
    }
}

fn resolve_failure_message(error: &ResolveError) -> String {
    if error.is_unavailable() {
        format!("No anime girl image available right now: {error}")
    } else {
        format!("Failed to get anime girl image: {error}")
    }
}

fn clear_cache(config: &Config, renderer: &Renderer) -> Result<()> {
    let store = cache_store(config)?;
    store.clear().context("Failed to clear cache")?;
    renderer.display_success("Cache cleared successfully!");
    Ok(())
}

fn show_cache(config: &Config, renderer: &Renderer) -> Result<()> {
    let store = cache_store(config)?;
    store
        .ensure_ready()
        .context("Failed to create cache directory")?;
    let images = store
        .list_cached()
        .context("Failed to get cached images")?;

    if images.is_empty() {
        renderer.display_success("No cached images found.");
        return Ok(());
    }

    println!("Cached images ({}):", images.len());
    for image in images {
        println!("  - {}", image.display());
    }

    Ok(())
}

fn check_token(env: &Environment) {
    if env.github_token.is_some() {
        println!("✅ GitHub token found");
        println!(
            "Rate limit: {} requests/hour (authenticated)",
            env.rate_limit_per_hour()
        );
    } else {
        println!("❌ No GitHub token found");
        println!("Set GITHUB_TOKEN environment variable for higher rate limits");
        println!(
            "Rate limit: {} requests/hour (unauthenticated)",
            env.rate_limit_per_hour()
        );
    }
}

fn list_viewers(env: &Environment) {
    let chain = display::default_chain(ImageSize::default(), env);
    let viewers = display::available_viewers(&chain, env);

    if viewers.is_empty() {
        println!("No image viewers found; install chafa for the best results.");
        return;
    }

    println!("Image viewers found:");
    for viewer in viewers {
        println!("  - {}", viewer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_no_args_runs() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.command, Command::Run);
        assert!(!cli.no_image);
        assert_eq!(cli.size, None);
    }

    #[test]
    fn test_flags_combine() {
        let cli = parse_args(&args(&["--no-image", "--size", "30x15"])).unwrap();
        assert_eq!(
            cli,
            Cli {
                command: Command::Run,
                no_image: true,
                size: Some("30x15".to_string()),
            }
        );

        let cli = parse_args(&args(&["--size=12x6", "--show-cache"])).unwrap();
        assert_eq!(cli.command, Command::ShowCache);
        assert_eq!(cli.size.as_deref(), Some("12x6"));
    }

    #[test]
    fn test_commands() {
        for (flag, command) in [
            ("--clear-cache", Command::ClearCache),
            ("--check-token", Command::CheckToken),
            ("--viewers", Command::Viewers),
            ("-h", Command::Help),
            ("--version", Command::Version),
        ] {
            assert_eq!(parse_args(&args(&[flag])).unwrap().command, command);
        }
    }

    #[test]
    fn test_bad_args() {
        assert!(parse_args(&args(&["--size"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_resolve_failure_messages() {
        let offline = resolve_failure_message(&ResolveError::Unavailable);
        assert!(offline.starts_with("No anime girl image available"));

        let empty = resolve_failure_message(&ResolveError::NoImages {
            category: "Rust".to_string(),
        });
        assert!(empty.starts_with("No anime girl image available"));

        let hard = resolve_failure_message(&ResolveError::NoCategories);
        assert!(hard.starts_with("Failed to get anime girl image"));
    }

    #[test]
    fn test_info_commands_skip_config() {
        for command in [
            Command::Help,
            Command::Version,
            Command::CheckToken,
            Command::Viewers,
        ] {
            assert!(!command.needs_config(), "{command:?}");
        }
        for command in [Command::Run, Command::ClearCache, Command::ShowCache] {
            assert!(command.needs_config(), "{command:?}");
        }
    }
}
