use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("bmpsteg {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: bmpsteg");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("BMPSTEG_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "frame: signature={:?}, header={} bytes, max_extension={} bytes",
        String::from_utf8_lossy(bmpsteg_frame::DEFAULT_SIGNATURE),
        bmpsteg_carrier::HEADER_SIZE,
        bmpsteg_frame::MAX_EXTENSION_LEN
    );

    Ok(SUCCESS)
}
