use clap::Parser;
use geo_layer_tiling::io::tiles_to_geojson;
use geo_layer_tiling::{
    process_stack, FlatLayout, FusionConfig, GeometryTiler, LayerStack, Precedence, UndefinedLayers,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON layout (features with `layer`/`datatype` properties)
    #[arg(short, long)]
    layout: PathBuf,

    /// Layer stack JSON
    #[arg(short, long)]
    stack: PathBuf,

    /// Output GeoJSON file (one feature per layer)
    #[arg(short, long)]
    output: PathBuf,

    /// Decimal digits to round coordinates to
    #[arg(long, default_value_t = 2)]
    precision: u32,

    /// Simplification tolerance
    #[arg(long, default_value_t = 1e-2)]
    simplify: f64,

    /// Let later stack entries win overlaps
    #[arg(long, default_value_t = false)]
    last_wins: bool,

    /// Treat stack layers missing from the layout as empty instead of failing
    #[arg(long, default_value_t = false)]
    allow_missing_layers: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Reading layout from {:?}", args.layout);
    let layout = FlatLayout::from_geojson(&fs::read_to_string(&args.layout)?)?;
    let stack = LayerStack::from_json(&fs::read_to_string(&args.stack)?)?;

    println!(
        "Loaded {} polygons, {} stack levels.",
        layout.polygon_count(),
        stack.levels.len()
    );

    let undefined = if args.allow_missing_layers {
        UndefinedLayers::Empty
    } else {
        UndefinedLayers::Reject
    };
    let config = FusionConfig::meshing()
        .with_precision(args.precision)
        .with_simplify_tolerance(args.simplify)
        .with_undefined_layers(undefined);
    let fused = process_stack(&layout, &stack, &config)?;

    let precedence = if args.last_wins {
        Precedence::LastWins
    } else {
        Precedence::FirstWins
    };
    let tiles = GeometryTiler::new().with_precedence(precedence).tile(&fused)?;

    for (name, region) in &tiles {
        println!("  {:<16} area {:.4}", name, region.area());
    }

    fs::write(&args.output, tiles_to_geojson(&tiles))?;
    println!("Wrote output to {:?}", args.output);

    Ok(())
}
