use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

pub const DATA_ENV: &str = "DASHBOARD_DATA";
pub const HOST_ENV: &str = "DASHBOARD_HOST";
pub const PORT_ENV: &str = "DASHBOARD_PORT";
pub const DEBUG_ENV: &str = "DASHBOARD_DEBUG";

pub const DEFAULT_RAW_PATH: &str = "shopping_trends_updated.csv";
pub const DEFAULT_DATA_PATH: &str = "shopping_trends_updated_copy.csv";
pub const DEFAULT_PORT: u16 = 8050;

#[derive(Parser, Debug)]
#[command(author, version, about = "Clothing store customer info dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve chart data over HTTP
    Serve(ServeArgs),
    /// Browse the charts in the terminal
    Tui(TuiArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Survey CSV with the Age Range column already added
    #[arg(
        long,
        env = DATA_ENV,
        default_value = DEFAULT_DATA_PATH,
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,

    #[arg(long, env = HOST_ENV, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(short, long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Verbose logging
    #[arg(long, env = DEBUG_ENV, action = ArgAction::SetTrue)]
    pub debug: bool,
}

#[derive(Parser, Debug)]
pub struct TuiArgs {
    #[arg(
        long,
        env = DATA_ENV,
        default_value = DEFAULT_DATA_PATH,
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,
}

/// Arguments of the `preprocess` binary.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Adds the Age Range column to the raw survey export",
    long_about = None
)]
pub struct PreprocessArgs {
    #[arg(short, long, default_value = DEFAULT_RAW_PATH, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    #[arg(short, long, default_value = DEFAULT_DATA_PATH, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            data_path: args.data,
            host: args.host,
            port: args.port,
            debug: args.debug,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
pub fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger installed earlier (tests, embedding binaries) stays in charge.
    let _ = env_logger::Builder::from_env(env).try_init();
}
