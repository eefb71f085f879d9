use std::error::Error;

use clap::Parser;
use log::{info, warn};

use shopping_dashboard::age_range::preprocess_file;
use shopping_dashboard::config::{self, PreprocessArgs};

fn main() -> Result<(), Box<dyn Error>> {
    let args = PreprocessArgs::parse();
    config::init_logging(false);

    let summary = preprocess_file(&args.input, &args.output)?;
    if summary.out_of_range > 0 {
        warn!(
            "{} of {} rows have an age outside the binned ranges; their Age Range is left empty",
            summary.out_of_range, summary.rows
        );
    }
    info!(
        "wrote {} rows from {} to {}",
        summary.rows,
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
