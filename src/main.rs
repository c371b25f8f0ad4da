use clap::{Args, Parser, Subcommand};
use imageserver::cache::RenditionCache;
use imageserver::config::{self, ServerConfig};
use imageserver::{logging, server};
use std::path::PathBuf;

/// Flags that override `config.toml`.
#[derive(Args, Clone)]
struct ConfigArgs {
    /// Path to a config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory of the source images
    #[arg(long, global = true)]
    images_path: Option<PathBuf>,

    /// Root directory of the rendition cache
    #[arg(long, global = true)]
    cache_path: Option<PathBuf>,

    /// Disable the rendition cache — resize inline on every request
    #[arg(long, global = true)]
    no_cache: bool,

    /// Port to listen on
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Address to listen on
    #[arg(long, global = true)]
    host: Option<String>,
}

impl ConfigArgs {
    /// Stock defaults < config file < flags.
    fn resolve(&self) -> Result<ServerConfig, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(images_path) = &self.images_path {
            config.images_path = images_path.clone();
        }
        if let Some(cache_path) = &self.cache_path {
            config.cache_path = cache_path.clone();
        }
        if self.no_cache {
            config.cache = false;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser)]
#[command(name = "imageserver")]
#[command(about = "HTTP image server with on-demand resizing and a disk cache")]
#[command(long_about = "\
HTTP image server with on-demand resizing and a disk cache

Serves JPEG files from the images directory. Add ?width= and/or ?height= to
get a Lanczos-resampled rendition; a single axis keeps the aspect ratio.
Renditions are cached at

  {cache_path}/{request path}/{sha256 of source identity}/{width}x{height}

Editing a source file invalidates its renditions automatically.

Run 'imageserver gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Summarize what the rendition cache holds
    CacheStats,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = cli.config.resolve()?;
            server::run(config).await?;
        }
        Command::CacheStats => {
            let config = cli.config.resolve()?;
            let cache = RenditionCache::new(&config.cache_path);
            let stats = cache.stats()?;
            println!("Cache {}: {}", cache.root().display(), stats);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
