use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use axledyn_specs::{write_vehicle_spec, VehicleSpec};

#[derive(Parser, Debug)]
#[command(name = "spec_make", version, about = "Write the built-in test hatch spec as JSON")]
struct Opts {
    /// Output path.
    out: PathBuf,

    /// Pretty-print JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let spec = VehicleSpec::test_hatch();
    write_vehicle_spec(&spec, &opts.out, opts.pretty)?;
    println!("Vehicle spec: {}", opts.out.display());
    Ok(())
}
