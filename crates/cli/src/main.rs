use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use meridian_engine::{BatchLoader, DataChoice, HttpResourceFetcher, ResourceSourceFactory, filter_choices, parse_choice_document, summarize};
use meridian_types::{Data, DataCategory, DataSelection, PROP_REQUESTER, RequestProperties};
use meridian_util::FetchConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();
    let config = load_config();

    match matches.subcommand() {
        Some(("resolve", sub)) => run_resolve(sub, &config),
        Some(("load", sub)) => run_load(sub, config).await,
        _ => {
            println!("Available subcommands: resolve, load");
            Ok(())
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_filter(directives: Option<String>) -> EnvFilter {
    EnvFilter::new(directives.unwrap_or_else(|| "info".into()))
}

fn load_config() -> FetchConfig {
    FetchConfig::load().unwrap_or_else(|error| {
        warn!(error = %error, "Failed to load config; using defaults");
        FetchConfig::default()
    })
}

fn build_cli() -> Command {
    Command::new("meridian")
        .about("Resolve data choices and batch-load data sources")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("resolve")
                .about("Resolve the choices in a choice document")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .required(true)
                        .action(ArgAction::Set)
                        .help("Path to a choice document (YAML/JSON)"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .action(ArgAction::Append)
                        .help("Only resolve choices applicable to this category pattern (e.g. GRID-*)"),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .action(ArgAction::Set)
                        .help("Level passed to every resolution as the selection"),
                ),
        )
        .subcommand(
            Command::new("load")
                .about("Load URLs or literal text as data sources and report failures")
                .arg(Arg::new("inputs").required(true).num_args(1..).action(ArgAction::Append))
                .arg(
                    Arg::new("timeout-secs")
                        .long("timeout-secs")
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(u64))
                        .help("Per-input timeout; overrides batch_timeout_secs from the config file"),
                ),
        )
}

fn run_resolve(matches: &ArgMatches, config: &FetchConfig) -> Result<()> {
    let file = matches.get_one::<String>("file").context("missing --file")?;
    let document = parse_choice_document(file)?;

    let requested = requested_categories(matches)?;
    let selection = matches.get_one::<String>("level").map(DataSelection::with_level);

    let fetcher = Arc::new(HttpResourceFetcher::new(config.clone()));
    let mut output = Vec::new();
    for choice in filter_choices(&document.choices, &requested) {
        let mut choice = with_fetcher(choice, &fetcher);
        let mut properties = RequestProperties::new();
        properties.insert(PROP_REQUESTER.to_string(), serde_json::Value::String("meridian-cli".into()));
        let data = choice
            .get_data_with_properties(selection.as_ref(), &mut properties)
            .with_context(|| format!("Failed to resolve choice '{}'", choice.name()))?;
        output.push(serde_json::json!({
            "id": choice.id(),
            "type": choice.kind(),
            "description": choice.identity().full_description(),
            "data": data.as_deref().map(describe_data),
        }));
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn requested_categories(matches: &ArgMatches) -> Result<Vec<DataCategory>> {
    matches
        .get_many::<String>("category")
        .into_iter()
        .flatten()
        .map(|pattern| DataCategory::parse(pattern, false).with_context(|| format!("Invalid category pattern '{pattern}'")))
        .collect()
}

/// Route resource fetches through a fetcher built from the loaded config.
fn with_fetcher(choice: &DataChoice, fetcher: &Arc<HttpResourceFetcher>) -> DataChoice {
    match choice {
        DataChoice::Resource(resource) => DataChoice::Resource(resource.clone().with_fetcher(fetcher.clone())),
        other => other.clone(),
    }
}

fn describe_data(data: &Data) -> serde_json::Value {
    match data {
        Data::Text(text) => serde_json::Value::String(text.clone()),
        Data::Json(value) => value.clone(),
        Data::Bytes(bytes) => serde_json::json!({ "bytes": bytes.len() }),
    }
}

async fn run_load(matches: &ArgMatches, config: FetchConfig) -> Result<()> {
    let inputs: Vec<String> = matches.get_many::<String>("inputs").into_iter().flatten().cloned().collect();
    let attempt_timeout = matches
        .get_one::<u64>("timeout-secs")
        .map(|secs| Duration::from_secs(*secs))
        .or_else(|| config.batch_timeout());

    let fetcher = Arc::new(HttpResourceFetcher::new(config));
    let loader = BatchLoader::new(ResourceSourceFactory::new(fetcher)).with_timeout(attempt_timeout);
    let results = loader.load_all(inputs).await;

    let loaded: Vec<serde_json::Value> = results
        .data_sources()
        .iter()
        .map(|resource| serde_json::json!({ "url": resource.url, "bytes": resource.content.len() }))
        .collect();
    println!("{}", serde_json::to_string_pretty(&loaded)?);

    for line in summarize(&results) {
        eprintln!("{line}");
    }
    if results.all_failed() {
        anyhow::bail!("no data could be loaded");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn load_accepts_multiple_inputs_and_timeout() {
        let matches = build_cli()
            .try_get_matches_from(["meridian", "load", "https://example.com/a", "note", "--timeout-secs", "5"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "load");
        assert_eq!(sub.get_many::<String>("inputs").unwrap().count(), 2);
        assert_eq!(sub.get_one::<u64>("timeout-secs"), Some(&5));
    }

    #[test]
    fn resolve_collects_repeated_categories() {
        let matches = build_cli()
            .try_get_matches_from(["meridian", "resolve", "-f", "choices.yaml", "-c", "GRID-*", "-c", "param:T"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let categories: Vec<&String> = sub.get_many::<String>("category").unwrap().collect();
        assert_eq!(categories, ["GRID-*", "param:T"]);

        let requested = requested_categories(sub).unwrap();
        assert_eq!(requested.len(), 2);
    }

    #[test]
    fn blank_category_pattern_is_rejected() {
        let matches = build_cli()
            .try_get_matches_from(["meridian", "resolve", "-f", "choices.yaml", "-c", "GRID-*", "-c", " "])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let error = requested_categories(sub).unwrap_err();
        assert!(error.to_string().contains("Invalid category pattern"));
    }

    #[test]
    fn log_filter_follows_rust_log() {
        assert_eq!(log_filter(Some("debug".into())).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }
}
