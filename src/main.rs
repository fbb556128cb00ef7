use clap::Parser;
use xkcd_kepub::{config::Config, output, pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let summary = pipeline::run(&config)?;
    output::print_run_summary(&summary);
    Ok(())
}
