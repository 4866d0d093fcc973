//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::server::TlsFiles;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "graceful-shutdown")]
#[command(about = "Graceful termination on interrupt, terminate and quit signals")]
#[command(version)]
pub struct Config {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the demo HTTP API, draining it on shutdown signals
    Serve(ServeArgs),
    /// Count down until the timeout elapses or a shutdown signal arrives
    Countdown {
        /// Seconds before the countdown context expires
        #[arg(short, long, default_value = "10")]
        seconds: u64,
    },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// PEM certificate file, enables TLS
    #[arg(long, requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key file, enables TLS
    #[arg(long, requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Seconds allowed for open connections to finish after a shutdown signal
    #[arg(long, default_value = "10")]
    pub shutdown_timeout: u64,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl ServeArgs {
    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Certificate material, present only when both files were given
    pub fn tls_files(&self) -> Option<TlsFiles> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some(TlsFiles::new(cert, key)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_args(config: Config) -> ServeArgs {
        match config.command {
            Command::Serve(args) => args,
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn serve_defaults() {
        let config = Config::try_parse_from(["graceful-shutdown", "serve"]).unwrap();
        assert_eq!(config.log_level(), "info");

        let args = serve_args(config);
        assert_eq!(args.address(), "0.0.0.0:8080");
        assert_eq!(args.shutdown_timeout, 10);
        assert!(args.tls_files().is_none());
    }

    #[test]
    fn serve_with_tls() {
        let config = Config::try_parse_from([
            "graceful-shutdown",
            "serve",
            "--tls-cert",
            "cert.pem",
            "--tls-key",
            "key.pem",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(
            serve_args(config).tls_files(),
            Some(TlsFiles::new("cert.pem", "key.pem"))
        );
    }

    #[test]
    fn tls_cert_requires_key() {
        let result = Config::try_parse_from(["graceful-shutdown", "serve", "--tls-cert", "cert.pem"]);
        assert!(result.is_err());
    }

    #[test]
    fn countdown_seconds() {
        let config = Config::try_parse_from(["graceful-shutdown", "countdown", "-s", "3"]).unwrap();
        assert!(matches!(config.command, Command::Countdown { seconds: 3 }));
    }
}
