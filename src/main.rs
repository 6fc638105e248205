use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod expr;
mod generate;
mod preview;
mod render;

use generate::Grammar;

/// Generates abstract images by evaluating a random expression tree over the
/// pixel coordinates.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Image width in pixels.
    #[arg(default_value_t = 800)]
    width: u32,

    /// Image height in pixels.
    #[arg(default_value_t = 800)]
    height: u32,

    /// Depth budget handed to the tree generator. Larger budgets tend toward
    /// busier images; this is a stochastic shape parameter, not a hard bound.
    #[arg(short, long, default_value_t = 20)]
    depth: u32,

    /// RNG seed for a reproducible tree. Omit for a fresh image each run.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Open an interactive window instead of writing a file straight away.
    /// R regenerates, S saves, Escape quits.
    #[arg(long)]
    preview: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "image dimensions must be non-zero"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if args.preview {
        return preview::run(args.width, args.height, args.depth, args.output, rng);
    }

    let grammar = Grammar::default();
    let tree = generate::generate(&grammar, &mut rng, args.depth)?;
    println!("{tree}");

    log::info!("rendering {}x{}", args.width, args.height);
    let frame = render::render(&tree, args.width, args.height);
    save_png(&args.output, args.width, args.height, &frame)?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

/// Encode a row-major RGBA frame as a PNG file.
pub(crate) fn save_png(path: &Path, width: u32, height: u32, frame: &[u8]) -> anyhow::Result<()> {
    let img = image::RgbaImage::from_raw(width, height, frame.to_vec())
        .context("frame buffer does not match the image dimensions")?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
