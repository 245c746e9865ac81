use anyhow::{Context, Result};
use clap::{arg, command, value_parser};
use setl::{ProcessEvaluator, Session, Transport};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod editor;
mod repl;

/// The clap CLI interface
fn cli() -> clap::Command {
    command!()
        .arg(
            arg!(evaluator: -e --evaluator <PATH> "Evaluator executable, looked up in PATH")
                .env("SETL_EVALUATOR")
                .default_value("setl")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(stdin: --stdin "Send programs on the evaluator's stdin instead of as an argument"))
        .arg(
            arg!(doc_url: --"doc-url" <URL> "Base URL opened by `name!` documentation lookups")
                .env("SETL_DOC_URL")
                .default_value(repl::DOC_URL),
        )
        .arg(arg!(command: -c --command <CODE> "If present, CODE is evaluated and program exits"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = cli().get_matches();

    let program = args
        .get_one::<PathBuf>("evaluator")
        .with_context(|| "No evaluator configured".to_string())?;
    let resolved = setl::evaluator::resolve(program).with_context(|| {
        format!(
            "{} binary not found in PATH.\nYou may be able to find it here: http://www.setl.org",
            program.display()
        )
    })?;

    let transport = if args.get_flag("stdin") {
        Transport::Stdin
    } else {
        Transport::Argument
    };
    let evaluator = ProcessEvaluator::new(resolved).transport(transport);
    debug!("Using evaluator: {:?}", evaluator);

    let doc_url = args
        .get_one::<String>("doc_url")
        .map(String::as_str)
        .unwrap_or(repl::DOC_URL);

    match args.get_one::<String>("command") {
        Some(code) => repl::run_cmd(Session::new(evaluator), code, doc_url).await,
        None => {
            repl::banner(&evaluator).await;
            repl::run(Session::new(evaluator), doc_url).await
        }
    }
}
