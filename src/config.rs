use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";
pub const DEFAULT_PORT: u16 = 8051;

/// Command-line configuration for the dashboard server.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "SpaceX launch records dashboard")]
pub struct ServerConfig {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Interface to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
