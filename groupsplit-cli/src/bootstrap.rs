use crate::{config::AppConfig, presenter::SettlementPresenter};
use groupsplit_application::{LedgerProcessor, SettlementReporter};
use groupsplit_domain::ExpenseLedger;
use groupsplit_infrastructure::{DryRunTransferExecutor, ScriptCommandParser};
use std::{borrow::Cow, fs};
use tracing_subscriber::EnvFilter;

pub type CliResult<T> = Result<T, Cow<'static, str>>;

const USAGE: &str = "Usage: groupsplit <ledger-file> [--execute]";

#[derive(Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub path: String,
    pub execute: bool,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> CliResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut path = None;
        let mut execute = false;

        for arg in args {
            if arg == "--execute" {
                execute = true;
            } else if arg.starts_with("--") {
                return Err(format!("Unknown option '{arg}'\n{USAGE}").into());
            } else if path.is_some() {
                return Err(USAGE.into());
            } else {
                path = Some(arg);
            }
        }

        let Some(path) = path else {
            return Err(USAGE.into());
        };
        Ok(Self { path, execute })
    }
}

/// Logs go to stderr so rendered tables stay clean on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run<I>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = String>,
{
    let args = CliArgs::parse(args)?;
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    tracing::debug!(path = %args.path, execute = args.execute, ?config, "Starting");

    let source = fs::read_to_string(&args.path)
        .map_err(|err| format!("Failed to read '{}': {err}", args.path))?;

    let processor = LedgerProcessor::new(&ScriptCommandParser, config.tolerance);
    let presenter = SettlementPresenter::new(config.display_scale);
    let mut ledger = ExpenseLedger::new();

    let outputs = processor
        .process(&mut ledger, &source)
        .map_err(|err| err.to_string())?;

    let balances = processor.calculator().calculate(&ledger);
    let plan = processor
        .planner()
        .plan(balances)
        .map_err(|err| err.to_string())?;

    if outputs.is_empty() {
        println!("{}", presenter.render_summary(&ledger.summary()));
        println!("{}", presenter.render_balances(&plan.balances));
        println!("{}", presenter.render_transfers(&plan.transfers));
    } else {
        for output in &outputs {
            println!("{}", presenter.render_output(output));
        }
    }

    if !args.execute {
        return Ok(());
    }

    let executor = DryRunTransferExecutor::new(config.atomic_scale);
    let reporter = SettlementReporter::new(&executor, config.tolerance);
    let report = reporter.execute(&plan).map_err(|err| err.to_string())?;
    println!("== execution ==\n{}", presenter.render_execution(&report));

    if report.is_complete() {
        tracing::info!(transfers = report.outcomes.len(), "Settlement executed");
        return Ok(());
    }

    let remaining = report.remaining_balances(&plan.balances);
    let replanned = processor
        .planner()
        .plan(remaining)
        .map_err(|err| err.to_string())?;
    println!(
        "== remaining after failures ==\n{}",
        presenter.render_transfers(&replanned.transfers)
    );
    Err(format!(
        "{} of {} transfers failed",
        report.failed().count(),
        report.outcomes.len()
    )
    .into())
}
