use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use timelapse::clean::{self, CleanOptions};
use timelapse::compile::{self, CompileOptions, FfmpegEncoder};
use timelapse::rules::Evaluator;
use timelapse::{config, output, specification};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timelapse")]
#[command(about = "Validate timelapse frames and compile them into clips")]
#[command(long_about = "\
Validate timelapse frames and compile them into clips

A capture session is a directory of numbered frames:

  frames/
  ├── 01/                          # One directory per session
  │   ├── 000001.png
  │   └── 000002.png
  ├── 02/
  │   └── 000001.png
  └── rejected/                    # Created by `clean`; skipped by both commands

Specifications are JSON rule sets. Pass a path, or the bare name of a file in
$XDG_CONFIG_HOME/timelapse/framespecs/:

  timelapse clean editor browser frames/ --check-children
  timelapse compile frames/

Run 'timelapse gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Log rule diagnostics and every rejected frame
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove frames that match none of the given specifications
    Clean {
        /// Specification files or framespec names; a frame is kept if any matches
        #[arg(required = true, num_args = 1..)]
        specification: Vec<String>,

        /// Directory of frames to validate
        source: PathBuf,

        /// Where rejected frames are moved [default from config: rejected]
        #[arg(long)]
        destination: Option<PathBuf>,

        /// Delete rejected frames instead of moving them
        #[arg(long = "delete")]
        delete_immediately: bool,

        /// Also validate each subdirectory of the source
        #[arg(long)]
        check_children: bool,

        /// Report rejected frames without touching the filesystem
        #[arg(long)]
        test: bool,
    },
    /// Compile each session directory into a clip
    #[command(alias = "comp")]
    Compile {
        /// Directory of session directories
        source: PathBuf,

        /// Where clips are written [default from config: clips]
        #[arg(long)]
        destination: Option<PathBuf>,

        /// Frames per second [default from config: 20]
        #[arg(short, long)]
        framerate: Option<u32>,

        /// Do not produce the padding clip
        #[arg(short, long)]
        skip_pad_clip: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_root = config::config_root();
    let eval = Evaluator::new(cli.debug);

    match cli.command {
        Command::Clean {
            specification,
            source,
            destination,
            delete_immediately,
            check_children,
            test,
        } => {
            let config = config::load_config(config_root.as_deref())?;
            let specifications = specification::load_all(&specification, config_root.as_deref())?;
            for line in output::format_specifications(&specifications) {
                debug!("{line}");
            }

            let options = CleanOptions {
                source,
                destination: destination.unwrap_or(config.clean.destination),
                check_children,
                delete_immediately,
                dry_run: test,
            };
            let report = clean::run(&options, &specifications, &eval).inspect_err(|e| {
                if !e.is_configuration() && !test {
                    warn!("Clean stopped early; rejects found before the error were already moved or deleted");
                }
            })?;
            output::print_clean_report(&report, test);
        }
        Command::Compile {
            source,
            destination,
            framerate,
            skip_pad_clip,
        } => {
            let config = config::load_config(config_root.as_deref())?;
            let mut options = CompileOptions::from_config(source, &config.compile);
            if let Some(destination) = destination {
                options.destination = destination;
            }
            if let Some(framerate) = framerate {
                if framerate == 0 {
                    return Err("framerate must be non-zero".into());
                }
                options.framerate = framerate;
            }
            options.skip_pad_clip = skip_pad_clip;

            let encoder = FfmpegEncoder::new(config.compile.ffmpeg);
            let report = compile::compile(&options, &encoder)?;
            output::print_compile_report(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the `--debug` default.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
}
