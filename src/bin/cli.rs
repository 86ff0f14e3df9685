use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flowshield::config::Config;
use flowshield::error::ShieldError;
use flowshield::output::OutputFormat;
use flowshield::taxonomy::flags::FLAG_REGISTRY;
use flowshield::Policy;

#[derive(Parser)]
#[command(
    name = "flowshield",
    about = "Risk scanner for AI agents and MCP usage in workflow automations",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a workflow export file or directory
    Scan {
        /// Path to a workflow JSON export or a directory of exports
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path (default: .flowshield.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Policy file path, overrides the config's [policy] section
        #[arg(long, short = 'p')]
        policy: Option<PathBuf>,

        /// Output format (console, json, summary)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Fail if any component scores at or above this value (0-100)
        #[arg(long)]
        fail_on_score: Option<u32>,
    },

    /// List all risk flags with weights and OWASP categories
    ListFlags {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .flowshield.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            path,
            config,
            policy,
            format,
            output,
            fail_on_score,
        } => cmd_scan(path, config, policy, format, output, fail_on_score),
        Commands::ListFlags { format } => cmd_list_flags(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_scan(
    path: PathBuf,
    config_path: Option<PathBuf>,
    policy_path: Option<PathBuf>,
    format_str: String,
    output_path: Option<PathBuf>,
    fail_on_score: Option<u32>,
) -> Result<i32, ShieldError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let mut policy = load_policy(config_path, policy_path)?;
    if let Some(threshold) = fail_on_score {
        // A component at exactly the threshold fails, so the policy cap is
        // one below it.
        policy.max_risk_score = Some(threshold.saturating_sub(1));
    }

    let result = flowshield::scan_path(&path)?;
    let verdict = flowshield::evaluate_policy(&result, &policy);
    let rendered = flowshield::render_report(&result, Some(&verdict), format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = policy violations
    Ok(if verdict.passed { 0 } else { 1 })
}

/// Policy precedence: explicit --policy file, else the [policy] section of
/// the config file (default `.flowshield.toml`, absent file means defaults).
fn load_policy(
    config_path: Option<PathBuf>,
    policy_path: Option<PathBuf>,
) -> Result<Policy, ShieldError> {
    if let Some(path) = policy_path {
        if !path.exists() {
            return Err(ShieldError::Policy(format!(
                "policy file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        let policy: Policy = toml::from_str(&content)?;
        return Ok(policy);
    }

    let config_path = config_path.unwrap_or_else(|| PathBuf::from(".flowshield.toml"));
    let config = Config::load(&config_path)?;
    Ok(config.policy)
}

fn cmd_list_flags(format_str: String) -> Result<i32, ShieldError> {
    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&FLAG_REGISTRY)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<28} {:<7} {:<46} DESCRIPTION", "FLAG", "WEIGHT", "OWASP");
            println!("{}", "-".repeat(110));
            for info in FLAG_REGISTRY {
                println!(
                    "{:<28} {:<7} {:<46} {}",
                    info.flag,
                    info.weight,
                    info.owasp_categories.join(", "),
                    info.description,
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, ShieldError> {
    let path = PathBuf::from(".flowshield.toml");

    if path.exists() && !force {
        eprintln!(".flowshield.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .flowshield.toml");

    Ok(0)
}
