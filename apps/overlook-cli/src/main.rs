mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use overlook_camera::elevation_degrees;
use overlook_host::HeadlessHost;
use overlook_session::{Session, SessionConfig};
use tracing_subscriber::EnvFilter;

use crate::script::{InputScript, ScriptPlayer};

#[derive(Parser)]
#[command(name = "overlook-cli", about = "Drive the overlook sample on a headless host")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Validate a config file and print the effective configuration
    Config {
        /// YAML or JSON config; defaults are printed when omitted
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Run a session frame by frame with scripted input
    Run {
        /// YAML or JSON session config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// YAML or JSON input script; a built-in demo runs when omitted
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Stop after this many frames even if the script continues
        #[arg(short, long)]
        frames: Option<usize>,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(p) => SessionConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("overlook-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", overlook_input::crate_info());
            println!("camera: {}", overlook_camera::crate_info());
            println!("host: {}", overlook_host::crate_info());
            println!("session: {}", overlook_session::crate_info());
        }
        Commands::Config { path } => {
            let config = load_config(path.as_ref())?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            config,
            script,
            frames,
            dt,
        } => {
            let config = load_config(config.as_ref())?;
            let script = match script {
                Some(p) => InputScript::load(&p)?,
                None => InputScript::demo(),
            };

            let mut session = Session::init(HeadlessHost::new(), config)?;
            let mut player = ScriptPlayer::default();
            let limit = frames.unwrap_or(usize::MAX);

            for state in script.expanded().take(limit) {
                player.apply(state, &mut session.host_mut().devices);
                session.update(dt);
                session.render();
                session.host_mut().devices.advance();
                if session.is_closing() {
                    break;
                }
            }

            let pose = session.camera_pose();
            let frames_run = session.frame_count();
            let closed_by_script = session.is_closing();
            let host = session.shutdown();
            println!(
                "Frames: {frames_run} (quit by script: {})",
                if closed_by_script { "yes" } else { "no" }
            );
            println!(
                "Camera: pos=({:.3}, {:.3}, {:.3}) pitch={:.1}deg",
                pose.position.x,
                pose.position.y,
                pose.position.z,
                elevation_degrees(pose.rotation)
            );
            println!(
                "Host calls: {}, exit code: {:?}",
                host.calls().len(),
                host.quit_code()
            );
        }
    }

    Ok(())
}
