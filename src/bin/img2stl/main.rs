// img2stl - Turn a photo or height image into a printable STL relief
//
// Pipeline:
//   1. Decode image, convert to 8-bit luma, mirror
//   2. Build height field (spatial + height scale)
//   3. Gaussian smoothing
//   4. Tessellate, two triangles per pixel cell
//   5. Write binary STL
//
// Usage: cargo run --bin img2stl -- <image> [-o out.stl] [--scale F] [--height F] [--smooth F] [--no-mirror]

mod args;
mod load;

use std::env;
use std::process::ExitCode;

use log::{error, info};
use relief_engine::{Result, StlReport, pipeline};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("img2stl");

    let args = match args::parse(argv.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{}", args::usage(program));
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(report) => {
            println!("STL file saved as {}", report.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{} [{}]", e, e.kind());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &args::Args) -> Result<StlReport> {
    // Bad parameters fail before the image is touched
    args.config.validate()?;

    info!(
        "Processing {} (scale {}, height {}, smooth {})...",
        args.input.display(),
        args.config.spatial_scale,
        args.config.height_scale,
        args.config.smoothing_sigma
    );

    let grid = load::load_grid(&args.input, args.mirror)?;
    info!("  Image: {}x{}", grid.width(), grid.height());

    pipeline::convert(&grid, &args.config, &args.output)
}
