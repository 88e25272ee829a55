use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rasterlogic_core::{export, ExportConfig, RowRunExtractor};
use rasterlogic_io::{load_png, save_schematic, Catalog};

/// Compile a raster image into a schematic of display processors.
#[derive(Parser, Debug)]
#[command(name = "rasterlogic", version, about)]
struct Args {
    /// Source PNG image.
    input: PathBuf,

    /// Output schematic JSON path (defaults to the input with a .json extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Register into this catalog directory instead of writing --output.
    #[arg(long, conflicts_with = "output")]
    catalog: Option<PathBuf>,

    /// Number of display/processor pairs to generate.
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Pixels per display edge.
    #[arg(long, default_value_t = 80)]
    unit_size: u32,

    /// Instruction budget per processor block.
    #[arg(long, default_value_t = 1000)]
    budget: u32,

    /// Display buffer slots between flushes.
    #[arg(long, default_value_t = 256)]
    buffer_slots: u32,

    /// Color quantization levels, 255 = lossless.
    #[arg(long, default_value_t = 255)]
    quality: u8,

    /// Quantize colors in HSV space.
    #[arg(long)]
    hsv: bool,

    /// Blend transparency toward gray instead of multiplying channels.
    #[arg(long)]
    gray_transparency: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExportConfig {
        unit_display_size: args.unit_size,
        requested_count: args.count,
        instruction_budget: args.budget,
        buffer_slots: args.buffer_slots,
        use_gray_transparency: args.gray_transparency,
        quality: args.quality,
        use_hsv: args.hsv,
    };

    let source = load_png(&args.input)?;
    let schematic = export(&config, &source, &RowRunExtractor::new())?;
    println!(
        "{}: {} processor/display pairs, bounds {} x {}",
        schematic.name,
        schematic.pair_count(),
        schematic.width,
        schematic.height
    );

    if let Some(dir) = &args.catalog {
        let path = Catalog::new(dir).register(&schematic)?;
        println!("registered {}", path.display());
    } else {
        let out = args
            .output
            .clone()
            .unwrap_or_else(|| args.input.with_extension("json"));
        save_schematic(&out, &schematic)?;
        println!("wrote {}", out.display());
    }
    Ok(())
}
