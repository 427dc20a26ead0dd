use anyhow::Result;
use clap::Parser;
use log::info;
use sigrl::{build_agent, run, write_stats_csv, SignalRlConfig};
use sigrl_core::record::NullRecorder;
use sigrl_sumo_env::TraciConnector;
use std::path::PathBuf;

type Config = SignalRlConfig<TraciConnector>;

/// Train a traffic-signal controller by Q-learning in SUMO, then run it greedily
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Run the greedy evaluation with the command line version of SUMO.
    /// Without it, sumo-gui is started with --quit-on-end and closes when the evaluation ends
    #[arg(long, default_value_t = false)]
    nogui: bool,

    /// YAML configuration of the run
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the configuration and exit
    #[arg(long, default_value_t = false)]
    show_config: bool,

    /// Write per-episode statistics to this CSV file
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Load config: {:?}", path);
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.show_config {
        println!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    // Fail before any episode if SUMO cannot be found
    let eval_env = config
        .env
        .clone()
        .connector(config.env.connector.clone().gui(!args.nogui));
    config.env.connector.binary_path()?;
    eval_env.connector.binary_path()?;
    config.validate()?;

    config.routes.write(&config.route_file)?;
    let mut agent = build_agent(&config)?;
    let report = run(&config, &eval_env, &mut agent, &mut NullRecorder {})?;

    if let Some(path) = &args.stats {
        write_stats_csv(&report.stats, path)?;
    }
    info!(
        "Evaluation return = {}",
        report.eval.get_scalar("eval_return")?
    );
    Ok(())
}
