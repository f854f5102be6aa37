use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sentiment_cli::{process_all, read_units, FlowConfig};
use sentiment_core::{Analysis, SentimentProcessor, SentimentService};
use sentiment_corenlp::CoreNlpServerPipeline;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("sentiment-flow")
        .version(sentiment_core::VERSION)
        .about("Stanford CoreNLP sentiment analysis for work units")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Analyze one text and print the result document")
                .arg(Arg::new("text").required(true).help("Text to analyze")),
        )
        .subcommand(
            Command::new("process")
                .about("Route JSON-lines work units, one report line per unit")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .value_parser(value_parser!(PathBuf))
                        .help("Input file (defaults to stdin)"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .value_parser(value_parser!(usize))
                        .help("Override configured worker count"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_service(config: &FlowConfig) -> anyhow::Result<SentimentService> {
    let pipeline = CoreNlpServerPipeline::new(config.corenlp.clone())
        .context("creating CoreNLP backend")?;
    tracing::info!(
        url = %config.corenlp.url,
        annotators = %config.corenlp.annotators,
        "CoreNLP backend ready"
    );
    Ok(SentimentService::new(Arc::new(pipeline)))
}

fn analyze(config: &FlowConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let text = args
        .get_one::<String>("text")
        .context("missing text argument")?;
    let service = build_service(config)?;

    match service.analyze(text)? {
        Analysis::Json(json) => {
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Analysis::Empty => Ok(ExitCode::SUCCESS),
        Analysis::Unavailable => {
            tracing::error!("CoreNLP produced no annotation");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn process(config: &FlowConfig, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let workers = args
        .get_one::<usize>("workers")
        .copied()
        .unwrap_or(config.workers)
        .max(1);

    let units = match args.get_one::<PathBuf>("input") {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_units(BufReader::new(file))?
        }
        None => read_units(io::stdin().lock())?,
    };

    let processor = SentimentProcessor::new(config.processor.clone(), build_service(config)?)?;
    let reports = process_all(&processor, units, workers)?;

    let mut out = io::stdout().lock();
    for report in &reports {
        serde_json::to_writer(&mut out, report)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn run() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => FlowConfig::load(path)?,
        None => FlowConfig::default(),
    };

    match matches.subcommand() {
        Some(("analyze", args)) => analyze(&config, args),
        Some(("process", args)) => process(&config, args),
        _ => {
            cli().print_help()?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn process_accepts_global_config() {
        let matches = cli()
            .try_get_matches_from([
                "sentiment-flow",
                "process",
                "--input",
                "units.jsonl",
                "--config",
                "flow.toml",
                "--workers",
                "3",
            ])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("flow.toml"))
        );
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "process");
        assert_eq!(args.get_one::<usize>("workers"), Some(&3));
    }

    #[test]
    fn analyze_requires_text() {
        assert!(cli()
            .try_get_matches_from(["sentiment-flow", "analyze"])
            .is_err());
    }
}
