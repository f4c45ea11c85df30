//! palmdrive - gesture-driven rover teleoperation
//!
//! Reads raised-finger gestures from a webcam through a hand landmark
//! detector, drives a serial rover with them, and streams annotated
//! video plus drive status over HTTP.

mod camera;
mod controller;
mod detect;
mod drive;
mod hand;
mod http;
mod overlay;
mod state;
mod worker;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::camera::FrameSource;
use crate::controller::Controller;
use crate::detect::HandDetector;
use crate::drive::CommandLink;
use crate::worker::WorkerConfig;

#[derive(Parser, Debug)]
#[command(name = "palmdrive", about = "Gesture-driven rover teleoperation")]
struct Cli {
    /// Camera backend: v4l2 or synthetic
    #[arg(long, default_value = "v4l2")]
    camera: String,

    /// V4L2 device index (/dev/video<N>)
    #[arg(long, default_value_t = 0)]
    camera_index: u32,

    /// Capture resolution as WIDTHxHEIGHT
    #[arg(long, default_value = "640x480")]
    resolution: String,

    /// Serial device of the rover (commands are logged when omitted)
    #[arg(long)]
    serial: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Serial write timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    serial_timeout_ms: u64,

    /// Hand detector command, e.g. "python3 scripts/hand_detector.py"
    /// (no hands are detected when omitted)
    #[arg(long)]
    detector: Option<String>,

    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: SocketAddr,

    /// JPEG quality of the video stream (1-100)
    #[arg(long, default_value_t = 80)]
    jpeg_quality: u8,

    /// Exit after N seconds (smoke testing)
    #[arg(long)]
    exit_after: Option<u64>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("palmdrive {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palmdrive=info".into()),
        )
        .init();

    info!("palmdrive v{} starting", env!("CARGO_PKG_VERSION"));

    let (width, height) = match camera::parse_resolution(&cli.resolution) {
        Some(resolution) => resolution,
        None => {
            eprintln!(
                "Invalid resolution: {}. Use WIDTHxHEIGHT, e.g. 640x480",
                cli.resolution
            );
            std::process::exit(1);
        }
    };

    let camera: Box<dyn FrameSource> = match cli.camera.as_str() {
        "v4l2" => {
            #[cfg(feature = "v4l2")]
            {
                Box::new(
                    camera::v4l2::V4l2Camera::open(cli.camera_index, width, height)
                        .context("failed to open camera")?,
                )
            }
            #[cfg(not(feature = "v4l2"))]
            {
                eprintln!("This build has no v4l2 support. Use --camera synthetic");
                std::process::exit(1);
            }
        }
        "synthetic" => Box::new(camera::synthetic::SyntheticCamera::new(width, height)),
        other => {
            eprintln!("Unknown camera: {other}. Use: v4l2 or synthetic");
            std::process::exit(1);
        }
    };
    let (width, height) = camera.resolution();
    info!("camera: {} @ {}x{}", cli.camera, width, height);

    let link: Box<dyn CommandLink> = match &cli.serial {
        Some(path) => {
            #[cfg(feature = "serial")]
            {
                Box::new(
                    drive::SerialLink::open(
                        path,
                        cli.baud,
                        Duration::from_millis(cli.serial_timeout_ms),
                    )
                    .context("failed to open serial port")?,
                )
            }
            #[cfg(not(feature = "serial"))]
            {
                let _ = path;
                eprintln!("This build has no serial support. Omit --serial");
                std::process::exit(1);
            }
        }
        None => {
            info!("no serial device configured, commands will be logged");
            Box::new(drive::LogLink)
        }
    };

    let detector: Box<dyn HandDetector> = match &cli.detector {
        Some(command) => Box::new(
            detect::MediaPipeBridge::spawn(command).context("failed to start hand detector")?,
        ),
        None => {
            info!("no hand detector configured, the rover stays stopped");
            Box::new(detect::NullDetector)
        }
    };

    let config = WorkerConfig {
        jpeg_quality: cli.jpeg_quality,
        ..WorkerConfig::default()
    };
    let mut controller =
        Controller::start(camera, detector, link, config).context("failed to start worker")?;

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .context("failed to bind http listener")?;
    http::serve(
        listener,
        controller.shared(),
        shutdown_signal(cli.exit_after),
    )
    .await?;

    controller.stop();
    if let Some(fault) = controller.fault() {
        anyhow::bail!("gesture worker failed: {fault}");
    }
    let status = controller.status();
    info!(command = %status.command, "palmdrive stopped");
    Ok(())
}

/// Resolve on ctrl-c, or once the optional exit timer elapses.
async fn shutdown_signal(exit_after: Option<u64>) {
    match exit_after {
        Some(secs) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    info!("exit timer elapsed");
                }
            }
        }
        None => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
