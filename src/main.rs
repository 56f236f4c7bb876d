use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use postbuild::config::{
	CONFIG_FILE_NAME, Config, generate_init_template, parse_config_file, to_pretty_json,
};
use postbuild::pipeline;

#[derive(Parser)]
#[command(name = "postbuild")]
#[command(
	author,
	version,
	about = "Post-build step for dual ESM/CJS packages: module markers, asset copying, and import rewriting"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Project root that relative config paths resolve against [default: current directory]
	#[arg(long, value_name = "DIR", global = true)]
	root: Option<PathBuf>,

	/// Config file to use, relative to the project root [default: <root>/postbuild.config.json]
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Print progress messages even if the config does not enable `verbose`
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Create a template postbuild.config.json in the project root
	#[arg(long)]
	init: bool,

	/// Overwrite an existing config when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the resolved configuration
	Show,
	/// Check the config file for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	let root = match cli.root {
		Some(root) => std::path::absolute(&root)
			.with_context(|| format!("Failed to resolve root {}", root.display()))?,
		None => std::env::current_dir().context("Failed to get current directory")?,
	};
	// A relative --config is taken relative to the project root.
	let config_path = match cli.config {
		Some(config) => root.join(config),
		None => root.join(CONFIG_FILE_NAME),
	};

	// Handle --init
	if cli.init {
		return handle_init(&config_path, cli.force);
	}

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&config_path, &root),
				ConfigAction::Validate => handle_config_validate(&config_path, &root),
			},
		};
	}

	handle_run(&config_path, &root, cli.verbose)
}

fn handle_init(config_path: &Path, force: bool) -> Result<ExitCode> {
	if config_path.exists() && !force {
		anyhow::bail!(
			"{} already exists. Use --force to overwrite.",
			config_path.display()
		);
	}

	let template = generate_init_template().context("Failed to render config template")?;
	std::fs::write(config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {}", config_path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config_path: &Path, root: &Path) -> Result<ExitCode> {
	let config =
		parse_config_file(config_path, root).context("Failed to load configuration")?;

	println!("# Source: {}", config_path.display());
	println!(
		"{}",
		to_pretty_json(&config).context("Failed to render configuration")?
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(config_path: &Path, root: &Path) -> Result<ExitCode> {
	match parse_config_file(config_path, root) {
		Ok(config) => {
			println!("Configuration is valid: {}", config_path.display());
			for line in describe_stages(&config) {
				println!("  {line}");
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_run(config_path: &Path, root: &Path, verbose: bool) -> Result<ExitCode> {
	let config =
		parse_config_file(config_path, root).context("Failed to load configuration")?;

	init_logging(verbose || config.verbose);

	pipeline::run(&config).context("Post-build pipeline failed")?;
	Ok(ExitCode::SUCCESS)
}

/// One line per stage the config enables.
fn describe_stages(config: &Config) -> Vec<String> {
	let mut lines: Vec<String> = config
		.output_dirs()
		.map(|(kind, dir)| format!("{} output: {}", kind.label(), dir.display()))
		.collect();

	if let Some(ref copy) = config.copy_files {
		let exclude: Vec<_> = copy.exclude.iter().map(String::as_str).collect();
		lines.push(format!(
			"copy from: {} (excluding {})",
			copy.from.display(),
			exclude.join(", ")
		));
	}
	if config.add_extensions {
		lines.push("add extensions: yes".to_string());
	}
	if let Some(ref aliases) = config.aliases {
		lines.push(format!("aliases: {}", aliases.len()));
	}

	lines
}

/// Progress goes to stdout at `info` when verbose, otherwise only warnings.
/// `RUST_LOG` can add directives on top.
fn init_logging(verbose: bool) {
	let level = if verbose { Level::INFO } else { Level::WARN };
	let filter = EnvFilter::from_default_env().add_directive(level.into());

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.without_time()
		.init();
}
