use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "myserver")]
#[command(about = "Minimal static file HTTP server")]
#[command(version)]
pub struct Cli {
    /// TCP port to listen on
    pub port: Option<u16>,

    /// Directory files are served from
    pub doc_root: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "MYSERVER_HOST")]
    pub host: Option<String>,

    /// Seconds to wait for more request bytes before giving up
    #[arg(long = "read-timeout")]
    pub read_timeout_secs: Option<u64>,

    /// YAML file with server settings; arguments override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Settings as read from a YAML file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub static_files: StaticFilesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaticFilesSection {
    pub root: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid YAML configuration")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text)
    }
}

/// Effective server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub doc_root: PathBuf,
    pub read_timeout: Duration,
}

impl Config {
    /// Parses the process arguments and builds the configuration.
    pub fn load() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Combines arguments with file settings. Arguments win.
    pub fn merge(cli: Cli, file: FileConfig) -> anyhow::Result<Self> {
        let port = cli
            .port
            .or(file.server.port)
            .context("no port given")?;

        let root = cli
            .doc_root
            .or(file.static_files.root)
            .context("no document root given")?;

        let host = cli
            .host
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let read_timeout_secs = cli
            .read_timeout_secs
            .or(file.server.read_timeout_secs)
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS);

        let cwd = std::env::current_dir().context("reading current directory")?;

        Ok(Self {
            listen_addr: format!("{}:{}", host, port),
            doc_root: normalize_doc_root(&root, &cwd),
            read_timeout: Duration::from_secs(read_timeout_secs),
        })
    }
}

/// Strips trailing slashes and anchors a relative root at `cwd`.
///
/// The result never ends in `/`, so request targets (which always start
/// with `/`) can be appended to it directly.
pub fn normalize_doc_root(root: &Path, cwd: &Path) -> PathBuf {
    let text = root.to_string_lossy();
    let trimmed = text.trim_end_matches('/');

    if trimmed.is_empty() {
        // The filesystem root itself; requests append "/..." to ""
        return PathBuf::new();
    }

    let root = Path::new(trimmed);
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        let joined = cwd.join(root);
        let joined = joined.to_string_lossy();
        PathBuf::from(joined.trim_end_matches('/'))
    }
}
