use clap::Parser;
use screen_script::cli::commands::{
    GenerateArgs, cmd_analyze, cmd_compare, cmd_generate, cmd_patterns, cmd_serve,
};
use screen_script::cli::config::{Cli, Commands, load_config, resolve_host, resolve_port};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Serve { host, port } => {
            // Resolve listen address: CLI > config > env > defaults
            let host = resolve_host(host.as_deref(), &config);
            let port = resolve_port(port, &config);
            cmd_serve(&config, &host, port).await?;
        }
        Commands::Generate {
            framework,
            pattern,
            use_case,
            screenshot,
            elements,
            output,
        } => {
            cmd_generate(
                &config,
                GenerateArgs {
                    framework: &framework,
                    pattern: pattern.as_deref(),
                    use_case: &use_case,
                    screenshot: screenshot.as_deref(),
                    elements: elements.as_deref(),
                    output: output.as_deref(),
                },
            )
            .await?;
        }
        Commands::Patterns { framework } => {
            cmd_patterns(&framework)?;
        }
        Commands::Analyze { screenshot } => {
            cmd_analyze(&config, &screenshot).await?;
        }
        Commands::Compare { before, after } => {
            cmd_compare(&config, &before, &after).await?;
        }
    }

    Ok(())
}
