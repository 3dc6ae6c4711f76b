use std::path::PathBuf;

use bmpsteg_embed::{embed_file, DEFAULT_STEGO_NAME};
use bmpsteg_frame::FrameConfig;

use crate::cmd::{require_bitmap, EncodeArgs};
use crate::exit::{embed_error, CliResult, SUCCESS};
use crate::output::{render_embed, OutputFormat};

pub fn run(args: EncodeArgs, config: &FrameConfig, format: OutputFormat) -> CliResult<i32> {
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STEGO_NAME));
    require_bitmap("carrier", &args.carrier)?;
    require_bitmap("output", &output)?;

    let report = embed_file(&args.carrier, &args.secret, &output, config)
        .map_err(|err| embed_error("encode failed", err))?;

    println!("{}", render_embed(&report, format));
    Ok(SUCCESS)
}
