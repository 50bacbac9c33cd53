use persistent_core::config::DriverConfig;
use persistent_core::entry::{exit_fatal, run_persistent};
use persistent_core::error::FATAL_EXIT_CODE;
use persistent_core::target::SymbolTarget;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    #[clap(long)]
    channel_fd: Option<i32>,
    #[clap(long)]
    buffer_size: Option<usize>,
    #[clap(short, long)]
    verbose: bool,
    /// Arguments handed to LLVMFuzzerInitialize after the program name.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    target_args: Vec<OsString>,
}

fn load_config(cli: &Cli) -> Result<DriverConfig, anyhow::Error> {
    let mut config = match &cli.config_file {
        Some(config_path) => DriverConfig::load_from_file(config_path)?,
        None => {
            let default_config_path = PathBuf::from("config.toml");
            if default_config_path.exists() {
                DriverConfig::load_from_file(&default_config_path)?
            } else {
                DriverConfig::default()
            }
        }
    };

    if let Some(fd) = cli.channel_fd {
        config.channel_fd = fd;
    }
    if let Some(size) = cli.buffer_size {
        config.buffer_size = size;
    }

    config.validate()?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            std::process::exit(FATAL_EXIT_CODE);
        }
    };
    if cli.verbose {
        eprintln!("Effective configuration: {config:#?}");
    }

    let target = match SymbolTarget::resolve() {
        Ok(target) => target,
        Err(e) => exit_fatal(&e),
    };
    if cli.verbose && !target.has_initializer() {
        eprintln!("LLVMFuzzerInitialize not found, skipping initialization");
    }

    let mut args: Vec<OsString> = std::env::args_os().take(1).collect();
    args.extend(cli.target_args);

    let err = run_persistent(&config, target, &mut args);
    exit_fatal(&err)
}
