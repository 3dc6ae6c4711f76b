use std::path::{Path, PathBuf};

/// Stego output used when none is given.
pub const DEFAULT_STEGO_NAME: &str = "default.bmp";

/// Base name for extracted files when none is given.
pub const DEFAULT_OUTPUT_BASE: &str = "output";

/// Destination for an extracted file.
///
/// The file name of `base` is cut at its first `.` and `extension` is
/// appended: `notes.old` with `.c` becomes `notes.c`. An empty stem falls
/// back to [`DEFAULT_OUTPUT_BASE`].
pub fn output_path_for(base: &Path, extension: &str) -> PathBuf {
    let name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem,
        _ => DEFAULT_OUTPUT_BASE,
    };
    let file_name = format!("{stem}{extension}");
    match base.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Whether `path` names a visible `.bmp` file (case-insensitive).
pub fn is_bitmap_name(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_truncated_at_first_dot() {
        assert_eq!(
            output_path_for(Path::new("output"), ".c"),
            PathBuf::from("output.c")
        );
        assert_eq!(
            output_path_for(Path::new("report.final.txt"), ".sh"),
            PathBuf::from("report.sh")
        );
        assert_eq!(
            output_path_for(Path::new("out/dir.v2/secret.bin"), ".h"),
            PathBuf::from("out/dir.v2/secret.h")
        );
    }

    #[test]
    fn empty_extension_and_empty_stem() {
        assert_eq!(
            output_path_for(Path::new("plain"), ""),
            PathBuf::from("plain")
        );
        assert_eq!(
            output_path_for(Path::new(".hidden"), ".txt"),
            PathBuf::from("output.txt")
        );
        assert_eq!(output_path_for(Path::new(""), ".c"), PathBuf::from("output.c"));
    }

    #[test]
    fn bitmap_names() {
        assert!(is_bitmap_name(Path::new("cover.bmp")));
        assert!(is_bitmap_name(Path::new("dir/COVER.BMP")));
        assert!(!is_bitmap_name(Path::new(".cover.bmp")));
        assert!(!is_bitmap_name(Path::new("cover.png")));
        assert!(!is_bitmap_name(Path::new("bmp")));
        assert!(!is_bitmap_name(Path::new("")));
    }
}
