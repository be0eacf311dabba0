//! File-based reverb processing command.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use resona_core::linear_to_db;
use resona_reverb::FdnReverb;

use crate::preset::Preset;
use crate::wav;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Diffuser reflection coefficient
    #[arg(long, default_value = "0.3")]
    reflection: f32,

    /// Diffuser pole angle in radians
    #[arg(long, default_value = "0.3")]
    angle: f32,

    /// Preset file (TOML); overrides --reflection and --angle
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Extra seconds of silence appended so the tail can ring out
    #[arg(long, default_value = "2.0")]
    tail: f32,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (input_frames, sample_rate) = wav::read_stereo(&args.input)?;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        input_frames.len(),
        sample_rate,
        input_frames.len() as f32 / sample_rate as f32
    );

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

    let tail_frames = (args.tail.max(0.0) * sample_rate as f32) as usize;
    let total = input_frames.len() + tail_frames;

    tracing::info!(
        reflection = reverb.reflection(),
        angle = reverb.angle(),
        frames = total,
        "processing file"
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut output = Vec::with_capacity(total);
    let mut input_peak = 0.0f32;
    let mut output_peak = 0.0f32;

    for n in 0..total {
        let (l, r) = input_frames.get(n).copied().unwrap_or((0.0, 0.0));
        input_peak = input_peak.max(l.abs()).max(r.abs());

        let (ol, or) = reverb.process_stereo(l, r);
        output_peak = output_peak.max(ol.abs()).max(or.abs());
        output.push((ol, or));

        if n % 4096 == 0 {
            pb.set_position(n as u64);
        }
    }
    pb.finish_with_message("done");

    wav::write_stereo(&args.output, &output, sample_rate)?;

    println!(
        "Wrote {} frames to {} (input peak {:.1} dBFS, output peak {:.1} dBFS)",
        output.len(),
        args.output.display(),
        linear_to_db(input_peak),
        linear_to_db(output_peak)
    );
    Ok(())
}
