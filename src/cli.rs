//! Command Line Interface (CLI) arguments.

use clap::Parser;

/// COVID-19 dashboard command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the dashboard should listen
    #[arg(long, default_value = "0.0.0.0", env = "COVID_DASHBOARD_HOST")]
    pub host: String,
    /// The port to which the dashboard should bind
    #[arg(long, default_value_t = 8050, env = "COVID_DASHBOARD_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "COVID_DASHBOARD_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/covid-dashboard/certs/cert.pem",
        env = "COVID_DASHBOARD_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/covid-dashboard/certs/key.pem",
        env = "COVID_DASHBOARD_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for requests to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "COVID_DASHBOARD_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Path to the CSV file of cases, deaths and vaccinations by country and month
    #[arg(long, default_value = "covid-19.csv", env = "COVID_DASHBOARD_CASES_FILE")]
    pub cases_file: String,
    /// Path to the CSV file of the vaccination ranking
    #[arg(
        long,
        default_value = "vaccine_g1.csv",
        env = "COVID_DASHBOARD_VACCINATIONS_FILE"
    )]
    pub vaccinations_file: String,
    /// Enable debug mode: verbose logging and pretty-printed JSON responses.
    #[arg(long, default_value_t = false, env = "COVID_DASHBOARD_DEBUG")]
    pub debug: bool,
    /// Whether to use Rayon for computing the figures of an update in parallel.
    #[arg(long, default_value_t = false, env = "COVID_DASHBOARD_USE_RAYON")]
    pub use_rayon: bool,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
