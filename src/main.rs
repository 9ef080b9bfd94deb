use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use underwater_enhancer::{
    config::Config,
    error::{EnhanceError, SessionError},
    session::{FfmpegBackend, Session},
    video::{self, Frame},
    viewer,
};

#[derive(Parser)]
#[command(
    name = "underwater-enhancer",
    version,
    about = "Interactively enhance underwater photos and video",
    long_about = "Underwater Enhancer corrects the color cast, haze and low contrast of underwater footage with a chain of classical filters, tuned live with sliders."
)]
struct Cli {
    /// Still image to enhance
    #[arg(short, long, required_unless_present = "print_config")]
    image: Option<PathBuf>,

    /// Video to preview and export
    #[arg(long, required_unless_present = "print_config")]
    video: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(friendly)?
        }
        None => Config::default(),
    };
    config.validate().map_err(friendly)?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let (Some(image_path), Some(video_path)) = (cli.image, cli.video) else {
        anyhow::bail!("--image and --video are required");
    };

    info!("Starting Underwater Enhancer v{}", env!("CARGO_PKG_VERSION"));
    info!("Image: {:?}", image_path);
    info!("Video: {:?}", video_path);

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.processing.threads)
        .build_global()
        .map_err(|e| anyhow::anyhow!("Failed to start worker threads: {}", e))?;
    info!("Using {} worker threads", config.processing.threads);

    let image = Frame::open(&image_path).map_err(|e| {
        warn!("Image decode error: {}", e);
        friendly(
            SessionError::ImageLoadFailed {
                path: image_path.display().to_string(),
            }
            .into(),
        )
    })?;
    info!("Loaded image {}x{}", image.width(), image.height());

    // fail early rather than on the first 'v'
    video::probe(&video_path).map_err(friendly)?;

    let backend = FfmpegBackend::new(
        video_path,
        config.output.video_path.clone(),
        config.output.encoder_settings(),
    );
    let session = Session::new(backend, image, config.params, config.session_settings());

    viewer::run(
        session,
        (config.display.window_width, config.display.window_height),
    )?;

    info!("Session ended");
    Ok(())
}

fn friendly(error: EnhanceError) -> anyhow::Error {
    anyhow::anyhow!(error.user_message())
}
