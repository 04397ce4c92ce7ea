use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use sacloud_dns_sync::{
    endpoint::DomainFilter,
    provider::{SakuraCloudProviderConfig, SAKURACLOUD_API_ROOT_URL},
};

macro_rules! env_prefix {
    () => {
        "SACLOUD_DNS_SYNC_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Set the loglevel of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    /// Do not make any changes to the DNS zones, only show what would happen
    #[arg(long, short = 'd', action, default_value_t = false)]
    pub dry_run: bool,

    /// Limit the zones to operate on to these domains, as a comma-separated list. Default: all zones
    #[arg(
        long,
        value_name = "DOMAIN",
        value_delimiter = ',',
        env = concat!(env_prefix!(), "DOMAIN_FILTER")
    )]
    pub domain_filter: Vec<String>,

    /// Exclude these domains from the zones to operate on, as a comma-separated list
    #[arg(
        long,
        value_name = "DOMAIN",
        value_delimiter = ',',
        env = concat!(env_prefix!(), "EXCLUDE_DOMAINS")
    )]
    pub exclude_domains: Vec<String>,

    /// Sakura Cloud API access token
    #[arg(long, value_name = "TOKEN", env = "SAKURACLOUD_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Secret for the Sakura Cloud API access token
    #[arg(long, value_name = "SECRET", env = "SAKURACLOUD_ACCESS_TOKEN_SECRET")]
    pub access_token_secret: Option<String>,

    /// Base URL of the Sakura Cloud API
    #[arg(
        long,
        value_name = "URL",
        default_value = SAKURACLOUD_API_ROOT_URL,
        env = concat!(env_prefix!(), "API_ROOT_URL")
    )]
    pub api_root_url: String,

    /// Timeout for each API request in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        env = concat!(env_prefix!(), "TIMEOUT")
    )]
    pub timeout: u64,
}

impl Cli {
    pub fn provider_config(&self) -> SakuraCloudProviderConfig {
        SakuraCloudProviderConfig {
            access_token: self.access_token.to_owned().unwrap_or_default(),
            access_token_secret: self.access_token_secret.to_owned().unwrap_or_default(),
            api_root_url: self.api_root_url.to_owned(),
            timeout_secs: self.timeout,
        }
    }

    pub fn domain_filter(&self) -> DomainFilter {
        DomainFilter::with_exclusions(&self.domain_filter, &self.exclude_domains)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Subcommand)]
pub enum Command {
    /// Print all records of the managed zones as endpoints, in JSON format
    Records,
    /// Apply a set of planned changes to the managed zones
    Apply {
        /// JSON document with Create, UpdateOld, UpdateNew and Delete endpoint lists. Use '-' to read from stdin
        #[arg(long, short = 'c', value_name = "FILE")]
        changes: PathBuf,
    },
}

/// Used to set the applications loglevel
// This is essentially a re-creation of log:Level. However, that enum doesn't derive ValueEnum, so we have to do it manually here
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}
