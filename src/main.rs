use clap::Parser;
use queryprobe::PgConnectionFactory;
use queryprobe::Probe;
use queryprobe::cli::Args;
use queryprobe::config::Config;
use queryprobe::logging::setup_logging;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = Config::load();
    setup_logging(&config, args.tracing);

    if !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        config_path = %args.config.display(),
        strict = args.strict,
        "starting queryprobe"
    );

    let probe = Probe::new(PgConnectionFactory, args.config);
    let mut stdout = std::io::stdout();
    match probe.run(&mut stdout).await {
        Ok(outcome) => ExitCode::from(outcome.exit_status(args.strict)),
        Err(e) => {
            error!(error = %e, "failed to write probe report");
            ExitCode::FAILURE
        }
    }
}
