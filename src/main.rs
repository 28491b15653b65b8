use clap::Parser;
use slicemock::cli::{Cli, Command};
use slicemock::commands;
use slicemock::config::Settings;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so generated mocks can be piped from stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    info!(
        "Starting slicemock in {} for libraries {:?}",
        settings.project.cwd.display(),
        settings.project.libraries
    );

    match &cli.command {
        Command::Generate(args) => {
            if let Some(json) = commands::run_generate(&settings, args)? {
                println!("{}", json);
            }
        }
        Command::Check { replace } => {
            let reports = commands::run_check(&settings, *replace)?;
            info!("{} slices checked", reports.len());
        }
        Command::Watch => commands::run_watch(&settings)?,
    }

    Ok(())
}
