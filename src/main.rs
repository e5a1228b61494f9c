//! Bandscope - live 16-band loudness spectrum of a microphone or WAV file
//!
//! Type `g<N>` or `s<N>` on stdin to change gain or squelch while running.

use clap::Parser;
use log::{error, info, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bandscope::audio::{AnalyzerSystem, CaptureDevice, Microphone, Spectrum, WavFile};
use bandscope::cli::Args;
use bandscope::error::StartError;
use bandscope::params::{ControlCommand, Tunables, BAND_CEILING};

/// Bar glyphs from empty to full
const BAR_LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("Bandscope - 16-band audio spectrum analyzer");
    println!("Type g<0-30> to set gain, s<0-30> to set squelch\n");

    if let Err(e) = start(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Start the pipeline on the selected input and display it until killed
fn start(args: &Args) -> Result<(), StartError> {
    let config = args.analyzer_config();
    let tunables = Arc::new(args.tunables());

    match &args.input {
        Some(path) => {
            let system = AnalyzerSystem::start(config, WavFile::new(path), tunables)?;
            run(&system, args.display_interval())
        }
        None => {
            let microphone = Microphone::open(args.device.as_deref())?;
            let system = AnalyzerSystem::start(config, microphone, tunables)?;
            run(&system, args.display_interval())
        }
    }
}

fn run<D: CaptureDevice>(
    system: &AnalyzerSystem<D>,
    interval: Duration,
) -> Result<(), StartError> {
    spawn_control_plane(system.tunables())?;

    let reader = system.reader();
    let mut last_frame = 0;
    loop {
        thread::sleep(interval);
        let spectrum = reader.latest();
        // Skip re-reads of a result already shown
        if spectrum.frame == last_frame {
            continue;
        }
        last_frame = spectrum.frame;
        println!("{}", render_line(&spectrum));
    }
}

/// Apply `g<N>` / `s<N>` lines from stdin and echo the stored value
fn spawn_control_plane(tunables: Arc<Tunables>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("control".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match ControlCommand::parse(&line) {
                    Ok(command) => {
                        let applied = tunables.apply(command);
                        info!("Control: {}", applied);
                        println!("{}", applied);
                    }
                    Err(e) => warn!("Ignoring control message: {}", e),
                }
            }
        })
}

fn render_line(spectrum: &Spectrum) -> String {
    let bars: String = spectrum
        .bands
        .iter()
        .map(|&value| {
            let level = value as usize * (BAR_LEVELS.len() - 1) / BAND_CEILING as usize;
            BAR_LEVELS[level.min(BAR_LEVELS.len() - 1)]
        })
        .collect();
    format!(
        "|{}| {:7.1} Hz  frame {}",
        bars, spectrum.peak.frequency_hz, spectrum.frame
    )
}
