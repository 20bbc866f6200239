use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tbscan::{
    analyze::Analyzer,
    cli::{Cli, OutputFormat},
    csv_output::CsvOutput,
    error::TbscanError,
    hints::HintRuleSet,
    json_output::JsonOutput,
    table_output,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the hint rules: built-ins, optionally extended from a file
fn load_rules(args: &Cli) -> Result<HintRuleSet> {
    match &args.rules {
        Some(path) => Ok(HintRuleSet::from_file(path)?),
        None => Ok(HintRuleSet::builtin()),
    }
}

fn run(args: &Cli) -> Result<()> {
    // Validate boundaries and rules before touching the log
    let config = args.analyze_config()?;
    let rules = load_rules(args)?;

    let analyzer = Analyzer::new(config, rules);
    let analysis = analyzer.analyze_file(&args.path)?;

    let rendered = match args.format {
        OutputFormat::Table => table_output::render_table(&analysis),
        OutputFormat::Json => {
            let source = Some(args.path.display().to_string());
            let mut json = JsonOutput::new(&analysis, source)
                .to_json()
                .context("Failed to serialize results")?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => {
            let mut csv = CsvOutput::new();
            for result in analysis.results {
                csv.add_result(result);
            }
            csv.to_csv()
        }
    };

    print!("{}", rendered);
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    init_tracing(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let usage = err
                .downcast_ref::<TbscanError>()
                .is_some_and(TbscanError::is_usage_error);
            if usage {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
