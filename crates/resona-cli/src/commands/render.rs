//! Impulse response rendering command.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use resona_core::linear_to_db;
use resona_reverb::FdnReverb;

use crate::preset::Preset;
use crate::wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Impulse response length in samples
    #[arg(long, default_value = "96000")]
    length: usize,

    /// Sample rate stamped on the output file
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Diffuser reflection coefficient
    #[arg(long, default_value = "0.3")]
    reflection: f32,

    /// Diffuser pole angle in radians
    #[arg(long, default_value = "0.3")]
    angle: f32,

    /// Preset file (TOML); overrides --reflection and --angle
    #[arg(short, long)]
    preset: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let (reflection, angle) = match &args.preset {
        Some(path) => {
            let preset = Preset::load(path)?;
            println!("Loading preset: {}", preset.name);
            (preset.reflection, preset.angle)
        }
        None => (args.reflection, args.angle),
    };

    let mut reverb = FdnReverb::new()?;
    reverb.set_reflection(reflection);
    reverb.set_angle(angle);

    tracing::info!(
        reflection = reverb.reflection(),
        angle = reverb.angle(),
        length = args.length,
        "rendering impulse response"
    );

    let pb = ProgressBar::new(args.length as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut frames = Vec::with_capacity(args.length);
    let mut peak = 0.0f32;
    for n in 0..args.length {
        let x = if n == 0 { 1.0 } else { 0.0 };
        let (left, right) = reverb.process_stereo(x, x);
        peak = peak.max(left.abs()).max(right.abs());
        frames.push((left, right));
        if n % 4096 == 0 {
            pb.set_position(n as u64);
        }
    }
    pb.finish_with_message("done");

    wav::write_stereo(&args.output, &frames, args.sample_rate)?;

    println!(
        "Wrote {} frames to {} (tail peak {:.1} dBFS)",
        frames.len(),
        args.output.display(),
        linear_to_db(peak)
    );
    Ok(())
}
