//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::utils::config::SUPPORTED_EXTENSIONS;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// True if the path has one of the accepted image extensions (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
}

/// Mirror `source` from `input_root` into `output_root` and swap its extension for `extension`.
///
/// Paths outside `input_root` keep only their file name under `output_root`.
pub fn target_path_for(
    source: &Path,
    input_root: &Path,
    output_root: &Path,
    extension: &str,
) -> PathBuf {
    let rel = path_relative_to(source, input_root)
        .unwrap_or_else(|| source.file_name().map(PathBuf::from).unwrap_or_default());
    output_root
        .join(rel)
        .with_extension(extension.trim_start_matches('.'))
}

/// Percentage of `completed` over `total`, rounded half up. An empty run is 100%.
pub fn percent_complete(completed: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (completed * 200 + total) / (total * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_ignore_case() {
        for name in ["a.png", "a.PNG", "a.Jpg", "a.jpeg", "a.TIF", "a.tiff"] {
            assert!(is_supported_image(Path::new(name)), "{name}");
        }
        for name in ["a.txt", "a.webp", "png", "a.png.bak", "a."] {
            assert!(!is_supported_image(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn target_path_mirrors_tree() {
        let t = target_path_for(
            Path::new("Input/b/c.jpg"),
            Path::new("Input"),
            Path::new("Output"),
            "webp",
        );
        assert_eq!(t, PathBuf::from("Output/b/c.webp"));
    }

    #[test]
    fn target_path_keeps_inner_dots() {
        let t = target_path_for(
            Path::new("in/shot.2021.01.PNG"),
            Path::new("in"),
            Path::new("out"),
            ".webp",
        );
        assert_eq!(t, PathBuf::from("out/shot.2021.01.webp"));
    }

    #[test]
    fn target_path_is_idempotent() {
        let src = Path::new("/data/in/x/y/z.tiff");
        let first = target_path_for(src, Path::new("/data/in"), Path::new("/data/out"), "webp");
        let second = target_path_for(src, Path::new("/data/in"), Path::new("/data/out"), "webp");
        assert_eq!(first, second);
    }

    #[test]
    fn target_path_outside_root_uses_file_name() {
        let t = target_path_for(
            Path::new("/elsewhere/pic.png"),
            Path::new("/data/in"),
            Path::new("/data/out"),
            "webp",
        );
        assert_eq!(t, PathBuf::from("/data/out/pic.webp"));
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_complete(0, 3), 0);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(1, 8), 13); // 12.5
        assert_eq!(percent_complete(3, 3), 100);
        assert_eq!(percent_complete(0, 0), 100);
    }
}
