use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use log::{info, warn};
use repocleaner::{
    config::Config,
    report::{exit_code, Report, RC_ERROR},
    utils::is_root_user,
    AptGet, CleanerResult, DisabledRecord, RetryController, SourceRegistry,
};
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));
    if matches.get_flag("no-color") {
        colored::control::set_override(false);
    }

    std::process::exit(run(&matches).await);
}

fn build_cli() -> Command {
    Command::new("repocleaner")
        .version(repocleaner::REPOCLEANER_VERSION)
        .about("Update APT package lists, disabling every repository that makes the update fail. \
                Prints a JSON report of disabled repositories on stdout.")
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"))
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("CONFIG")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Configuration file"))
        .arg(Arg::new("no-color")
            .long("no-color")
            .action(ArgAction::SetTrue)
            .help("Disable colored error output"))
        .arg(Arg::new("sources-list")
            .long("sources-list")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Main single-line source list"))
        .arg(Arg::new("sources-dir")
            .long("sources-dir")
            .value_name("DIR")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory with *.list and *.sources files"))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(matches: &ArgMatches) -> i32 {
    match clean(matches).await {
        Ok(disabled) => match Report::new(&disabled).render() {
            Ok(report) => {
                println!("{}", report);
                exit_code(!disabled.is_empty(), false)
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                RC_ERROR
            }
        },
        Err(e) if e.is_interruption() => exit_code(false, true),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            exit_code(false, true)
        }
    }
}

async fn clean(matches: &ArgMatches) -> CleanerResult<Vec<DisabledRecord>> {
    let config = load_config(matches)?;
    if !is_root_user() {
        warn!("Not running as root, apt-get update and source edits will likely fail");
    }

    let manager = AptGet::new(&config);
    let registry = SourceRegistry::new(config);
    let mut controller = RetryController::new(manager, registry);
    controller.run(&mut std::io::stderr()).await?;

    info!("Finished after {} update attempt(s)", controller.attempts());
    Ok(controller.into_disabled())
}

fn load_config(matches: &ArgMatches) -> CleanerResult<Config> {
    let config = Config::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    Ok(config
        .with_sources_list(matches.get_one::<PathBuf>("sources-list").cloned())
        .with_sources_dir(matches.get_one::<PathBuf>("sources-dir").cloned()))
}
