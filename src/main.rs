//! scalaris-svc - converge the Scalaris node services on this host.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scalaris_svc::applier::Applier;
use scalaris_svc::config::Settings;
use scalaris_svc::error::SvcError;
use scalaris_svc::executor::SubprocessRunner;
use scalaris_svc::report::ReportWriter;
use scalaris_svc::services::{start_recipe, ServiceRegistry};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");
const DEFAULT_CONFIG_PATH: &str = "/etc/scalaris/svc.toml";

/// Parsed command line.
struct CliArgs {
    config_path: Option<String>,
    platform: Option<String>,
    dry_run: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let cli = parse_args(&args);

    let settings = match load_settings(cli.config_path.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings);

    info!("Starting {} v{}", NAME, VERSION);

    match run(&settings, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Service convergence failed");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings, cli: &CliArgs) -> Result<(), SvcError> {
    let node = settings.node_attributes()?;
    let ctx = settings.platform_context(cli.platform.as_deref());
    let registry = ServiceRegistry::new();
    let specs = start_recipe(&registry, &node, &settings.paths)?;

    let runner = SubprocessRunner::new(Duration::from_secs(
        settings.limits.action_timeout_seconds,
    ));
    let applier = Applier::new(&runner, &settings.paths);

    if cli.dry_run {
        let plan = applier.plan(&specs, &ctx)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let (report, result) = applier.apply_with_report(&specs, &ctx);

    if settings.report.enabled {
        let written =
            ReportWriter::new(&settings.report.path).and_then(|mut writer| writer.write(&report));
        if let Err(e) = written {
            error!(
                error = %e,
                path = %settings.report.path.display(),
                "Failed to write convergence report"
            );
        }
    }

    result.map_err(SvcError::from)
}

/// Load the configuration.
///
/// A missing file at the default location means "use defaults"; an
/// explicitly requested file must exist.
fn load_settings(explicit: Option<&str>) -> Result<Settings, SvcError> {
    match explicit {
        Some(path) => Settings::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Settings::load(DEFAULT_CONFIG_PATH),
        None => Ok(Settings::default()),
    }
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Enable and start the scalaris and scalaris-monitor init services.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -c, --config <PATH>      Path to configuration file
                             [default: {}]
    -p, --platform <ID>      Platform identifier (overrides config and os-release)
        --dry-run            Validate and print the plan without running anything
    -h, --help               Print help information
    -V, --version            Print version information
"#,
        NAME, VERSION, NAME, DEFAULT_CONFIG_PATH
    );
}

/// Parse the options that take values.
fn parse_args(args: &[String]) -> CliArgs {
    CliArgs {
        config_path: option_value(args, "--config", "-c"),
        platform: option_value(args, "--platform", "-p"),
        dry_run: args.iter().any(|a| a == "--dry-run"),
    }
}

fn option_value(args: &[String], long: &str, short: &str) -> Option<String> {
    let inline = format!("{}=", long);
    for (i, arg) in args.iter().enumerate() {
        if (arg == long || arg == short) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(inline.as_str()) {
            return Some(value.to_string());
        }
    }
    None
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}
