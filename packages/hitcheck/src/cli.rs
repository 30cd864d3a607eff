//! Command line surface.
//!
//! Flags follow the single-dash style monitoring configs already use
//! (`-q`, `-w`, `-c`, `-ca`, `-cf`, ...). clap only knows single-character
//! short flags, so `-ca` and `-cf` are rewritten to their long forms first.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use elastic_client::ElasticConfig;

use crate::accumulator::WriteFailurePolicy;
use crate::counter::CounterStore;
use crate::error::{ProbeError, Result};
use crate::probe::{ProbeSettings, DEFAULT_INDEX, DEFAULT_LABEL};
use crate::verdict::Thresholds;

#[derive(Debug, Parser)]
#[command(name = "check_elastic_hits")]
#[command(version, about = "Alert on the number of Elasticsearch hits for a query")]
#[command(after_help = "Host format: http://host1:9200")]
pub struct Cli {
    /// JSON file holding the query
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,

    /// Elasticsearch index
    #[arg(short = 'i', long = "index", default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Custom phrasing for output
    #[arg(short = 'o', long = "output", default_value = DEFAULT_LABEL)]
    pub output: String,

    /// Username
    #[arg(short = 'u', long = "username", default_value = "")]
    pub username: String,

    /// Password
    #[arg(short = 'p', long = "password", env = "ELASTICSEARCH_PASSWORD", hide_env_values = true, default_value = "")]
    pub password: String,

    /// API key
    #[arg(short = 'a', long = "api-key", env = "ELASTICSEARCH_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Elastic Cloud id
    #[arg(short = 'I', long = "cloud-id", default_value = "")]
    pub cloud_id: String,

    /// CA certificate file (also accepted as -ca)
    #[arg(long = "ca-cert", default_value = "")]
    pub ca_cert: String,

    /// Counter file for persistent hits (also accepted as -cf)
    #[arg(long = "counter-file", default_value = "")]
    pub counter_file: String,

    /// Run as event handler to remove the counter file
    #[arg(short = 'e', long = "event")]
    pub event: bool,

    /// Current status according to the supervisor; with -e, 0 removes the counter file
    #[arg(short = 's', long = "status", default_value_t = 0, allow_negative_numbers = true)]
    pub status: i32,

    /// Critical number of hits
    #[arg(short = 'c', long = "critical", default_value_t = 0, allow_negative_numbers = true)]
    pub critical: i64,

    /// Warning number of hits
    #[arg(short = 'w', long = "warning", default_value_t = 0, allow_negative_numbers = true)]
    pub warning: i64,

    /// Report UNKNOWN when the counter file cannot be written
    #[arg(long = "counter-write-fatal")]
    pub counter_write_fatal: bool,

    /// Debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Elasticsearch hosts
    #[arg(value_name = "HOST")]
    pub hosts: Vec<String>,
}

impl Cli {
    /// Parse after rewriting the multi-letter single-dash flags.
    pub fn try_parse_normalized<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn settings(&self) -> ProbeSettings {
        ProbeSettings {
            query_path: PathBuf::from(&self.query),
            index: self.index.clone(),
            label: self.output.clone(),
            counter: CounterStore::configured(&self.counter_file),
            thresholds: Thresholds::new(self.warning, self.critical),
            is_event: self.event,
            current_status: self.status,
            write_policy: if self.counter_write_fatal {
                WriteFailurePolicy::Fatal
            } else {
                WriteFailurePolicy::Warn
            },
        }
    }

    /// Client configuration. Reads the CA certificate file when one is given.
    pub fn elastic_config(&self) -> Result<ElasticConfig> {
        let mut config = ElasticConfig::new(self.hosts.clone());

        if !self.username.is_empty() {
            config.username = Some(self.username.clone());
        }
        if !self.password.is_empty() {
            config.password = Some(self.password.clone().into());
        }
        if !self.api_key.is_empty() {
            config = config.with_api_key(self.api_key.clone());
        }
        if !self.cloud_id.is_empty() {
            config = config.with_cloud_id(self.cloud_id.clone());
        }
        if !self.ca_cert.is_empty() {
            let pem = std::fs::read(&self.ca_cert).map_err(|source| ProbeError::CaCertificate {
                path: PathBuf::from(&self.ca_cert),
                source,
            })?;
            config = config.with_ca_cert(pem);
        }

        Ok(config)
    }
}

const REWRITES: [(&str, &str); 2] = [("-ca", "--ca-cert"), ("-cf", "--counter-file")];

/// Rewrite `-ca`/`-cf` (and `-ca=x`/`-cf=x`) to long flags. Stops at `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            for (short, long) in REWRITES {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{}={}", long, value));
                }
            }
            arg
        })
        .collect()
}
