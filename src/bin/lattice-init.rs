use anyhow::Result;
use clap::Parser;

use grainmc::{init_logging, write_initial, InitArgs};

fn main() -> Result<()> {
    init_logging();
    let args = InitArgs::parse();
    write_initial(&args)
}
