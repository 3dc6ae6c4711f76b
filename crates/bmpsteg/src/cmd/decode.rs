use std::path::PathBuf;

use bmpsteg_embed::{extract_file, DEFAULT_OUTPUT_BASE};
use bmpsteg_frame::FrameConfig;

use crate::cmd::{require_bitmap, DecodeArgs};
use crate::exit::{embed_error, CliResult, SUCCESS};
use crate::output::{render_extract, OutputFormat};

pub fn run(args: DecodeArgs, config: &FrameConfig, format: OutputFormat) -> CliResult<i32> {
    require_bitmap("stego image", &args.stego)?;
    let output_base = args
        .output_base
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_BASE));

    let report = extract_file(&args.stego, &output_base, config)
        .map_err(|err| embed_error("decode failed", err))?;

    println!("{}", render_extract(&report, format));
    Ok(SUCCESS)
}
