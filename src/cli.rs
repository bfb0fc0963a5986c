use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::client::{Client, ExecutorProvider};
use crate::config::{Config, ENV_CONFIG_PATH, ENV_DATABASE_URL};
use crate::handler::serve_request;
use crate::response::{ProxyRequest, ProxyResponse};
use crate::server::{self, AppState};

#[derive(Parser)]
#[command(name = "xdw-proxy")]
#[command(about = "XDW workflow query proxy", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Database URL (overrides config file and env vars)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP query endpoint
    Serve {
        /// Listen address (overrides server.listen_addr)
        #[arg(short = 'l', long = "listen")]
        listen: Option<SocketAddr>,
    },

    /// Run one query and print the response body
    Query {
        /// Query parameters, e.g. nhs=9999999468 op=status
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Print the effective configuration
    CheckConfig,
}

/// Run the CLI by parsing process arguments
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli).await
}

async fn run_cli_with_args(cli: Cli) -> Result<()> {
    // Apply CLI overrides to environment before any configuration is read
    if let Some(config_path) = &cli.config {
        env::set_var(ENV_CONFIG_PATH, config_path);
    }
    if let Some(database_url) = &cli.database_url {
        env::set_var(ENV_DATABASE_URL, database_url);
    }

    // Eagerly load and validate configuration before executing any command
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { listen } => {
            let addr = listen.unwrap_or(config.server.listen_addr);
            server::serve(AppState::new(Client), addr, &config.server.path).await?;
        }

        Commands::Query { params } => {
            let rsp = run_query(&Client, &params).await?;
            println!("{}", rsp.body);
            if !rsp.is_ok() {
                std::process::exit(1);
            }
        }

        Commands::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}

/// Run `KEY=VALUE` pairs through the handler as a GET on `/`
pub async fn run_query(
    provider: &dyn ExecutorProvider,
    pairs: &[String],
) -> Result<ProxyResponse> {
    let request = ProxyRequest {
        http_method: "GET".to_string(),
        path: "/".to_string(),
        query_string_parameters: parse_params(pairs)?,
    };
    Ok(serve_request(provider, &request).await)
}

fn parse_params(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut params = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid query parameter '{}': expected KEY=VALUE", pair);
        };
        params.insert(key.to_string(), value.to_string());
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_helpers::{record, StubExecutor};

    fn args(pairs: &[&str]) -> Vec<String> {
        pairs.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_parse_params() {
        let params = parse_params(&args(&["nhs=111", "op=status", "format=text/html"])).unwrap();
        assert_eq!(params["nhs"], "111");
        assert_eq!(params["op"], "status");
        assert_eq!(params["format"], "text/html");

        // only the first '=' separates
        let params = parse_params(&args(&["pathway=a=b", "version="])).unwrap();
        assert_eq!(params["pathway"], "a=b");
        assert_eq!(params["version"], "");
    }

    #[test]
    fn test_parse_params_rejects_bare_words() {
        let err = parse_params(&args(&["nhs=111", "status"])).unwrap_err();
        assert!(err.to_string().contains("'status'"));
    }

    #[test]
    fn test_run_query() {
        let executor = StubExecutor::new()
            .with_records(vec![record("oncology", "111", 0), record("oncology", "111", 1)]);
        let executor = Arc::new(executor);

        let pairs = args(&["nhs=111", "op=count"]);
        let rsp = tokio_test::block_on(run_query(&executor, &pairs)).unwrap();

        assert!(rsp.is_ok());
        assert_eq!(rsp.body, "2");
    }

    #[test]
    fn test_cli_parses_global_overrides() {
        let cli = Cli::parse_from([
            "xdw-proxy",
            "query",
            "nhs=111",
            "--database-url",
            "postgres://localhost/xdw",
        ]);

        assert_eq!(cli.database_url.as_deref(), Some("postgres://localhost/xdw"));
        match cli.command {
            Commands::Query { params } => assert_eq!(params, vec!["nhs=111"]),
            _ => panic!("expected query"),
        }
    }
}
