use anyhow::{Context, Result};
use jx_app_jacoco::cli::commands::{ConfigureCommand, CreateCommand};
use jx_app_jacoco::cli::output::{format_configure_outcome, format_error, format_fact, style, INFO};
use jx_app_jacoco::cli::{Cli, Command};
use jx_app_jacoco::fact::FactPublisher;
use jx_app_jacoco::{logging, phase, version, ClusterConfig, KubeClient, RetryPolicy};
use tracing::{error, info_span, Instrument, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::from_args();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    logging::init_tracing(cli.log_format, log_level);

    let result = match &cli.command {
        Command::Configure(cmd) => info_span!("configure", command = "configure").in_scope(|| configure(cmd)),
        Command::Create(cmd) => {
            create(cmd)
                .instrument(info_span!("create", command = "create"))
                .await
        }
        Command::Version => {
            println!("{} {}", INFO, style(version::image()).bold());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }
}

fn configure(cmd: &ConfigureCommand) -> Result<()> {
    let outcome = phase::configure(&cmd.options(&version::image()))
        .context("unable to configure the build for JaCoCo")?;
    println!("{}", format_configure_outcome(&outcome));
    Ok(())
}

async fn create(cmd: &CreateCommand) -> Result<()> {
    let cluster_config =
        ClusterConfig::from_env(cmd.namespace.clone()).context("unable to determine cluster connection")?;
    let client = KubeClient::new(cluster_config).context("unable to create cluster client")?;
    let publisher = FactPublisher::new(client.clone(), RetryPolicy::default());

    let (fact, outcome) = phase::create(&cmd.options(), &client, &publisher)
        .await
        .context("unable to create JaCoCo fact")?;
    println!("{}", format_fact(&fact, outcome));
    Ok(())
}
