use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use hatch_cli::simulator::{run_simulator, SimulatorConfig};
use hatch_cli::{read_snapshot, resolve_for};
use hatch_model::{Role, UserId};
use hatch_runtime::RuntimeConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("hatchctl")
        .version(hatch_cli::VERSION)
        .about("Incubator admission lifecycle tools")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Runtime config file (TOML); defaults apply when omitted"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Drive founders through random commands and check lifecycle invariants")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("founders")
                        .long("founders")
                        .default_value("8")
                        .value_parser(value_parser!(usize))
                        .help("Number of simulated founders"),
                )
                .arg(
                    Arg::new("operations")
                        .long("operations")
                        .default_value("2000")
                        .value_parser(value_parser!(u64))
                        .help("Number of commands to issue"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve the destination for a lifecycle snapshot")
                .arg(
                    Arg::new("snapshot")
                        .long("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Snapshot JSON file, or - for stdin"),
                )
                .arg(
                    Arg::new("role")
                        .long("role")
                        .default_value("FOUNDER")
                        .value_parser(value_parser!(Role))
                        .help("Viewer role: FOUNDER or ADMIN"),
                )
                .arg(
                    Arg::new("user")
                        .long("user")
                        .value_parser(value_parser!(UserId))
                        .help("Viewer id; defaults to the snapshot's founder"),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective runtime config"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hatchctl=info,warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<RuntimeConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            RuntimeConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(RuntimeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("simulate", args)) => {
            let seed = args.get_one::<u64>("seed").copied().context("--seed is required")?;
            let founders = args
                .get_one::<usize>("founders")
                .copied()
                .context("--founders is required")?;
            let operations = args
                .get_one::<u64>("operations")
                .copied()
                .context("--operations is required")?;
            let config = SimulatorConfig::default()
                .with_seed(seed)
                .with_founders(founders)
                .with_operations(operations)
                .with_runtime(load_config(args)?)
                .stop_on_first_violation(args.get_flag("stop-on-violation"));

            let report = run_simulator(config).await;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.generate_text());
            }
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("resolve", args)) => {
            let path = args.get_one::<PathBuf>("snapshot").context("--snapshot is required")?;
            let role = args.get_one::<Role>("role").copied().unwrap_or(Role::Founder);
            let user = args.get_one::<UserId>("user").copied();

            let snapshot = read_snapshot(path)?;
            let (actor, destination) = resolve_for(&snapshot, role, user);
            tracing::debug!(viewer = %actor.user_id, role = %actor.role, "resolved");
            println!("{destination} {}", destination.path());
        }
        Some(("config", args)) => {
            let config = load_config(args)?;
            print!("{}", config.to_toml_string()?);
        }
        _ => anyhow::bail!("unknown subcommand"),
    }
    Ok(())
}
