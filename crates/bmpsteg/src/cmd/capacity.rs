use bmpsteg_embed::capacity_report;
use bmpsteg_frame::FrameConfig;

use crate::cmd::{require_bitmap, CapacityArgs};
use crate::exit::{embed_error, CliResult, INSUFFICIENT_CAPACITY, SUCCESS};
use crate::output::{render_capacity, OutputFormat};

/// Exits with `INSUFFICIENT_CAPACITY` when `--secret` is given and does not fit.
pub fn run(args: CapacityArgs, config: &FrameConfig, format: OutputFormat) -> CliResult<i32> {
    require_bitmap("carrier", &args.carrier)?;

    let report = capacity_report(&args.carrier, args.secret.as_deref(), config)
        .map_err(|err| embed_error("capacity check failed", err))?;

    println!("{}", render_capacity(&report, format));

    match &report.secret {
        Some(fit) if !fit.fits => Ok(INSUFFICIENT_CAPACITY),
        _ => Ok(SUCCESS),
    }
}
