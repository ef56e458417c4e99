use clap::Parser;
use swag_scenarios::cli::commands::{cmd_catalog, cmd_list, cmd_run};
use swag_scenarios::cli::config::{Cli, Commands, load_config, resolve_settings};
use swag_scenarios::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let settings = resolve_settings(&cli, &config);

    match &cli.command {
        Commands::Run {
            flow,
            scenarios,
            format,
            output,
            ..
        } => {
            let all_passed = cmd_run(&settings, flow, scenarios.as_deref(), format, output.as_deref())?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Catalog { output_dir } => {
            cmd_catalog(&settings, output_dir)?;
        }
        Commands::List => {
            print!("{}", cmd_list(&settings));
        }
    }

    Ok(())
}
