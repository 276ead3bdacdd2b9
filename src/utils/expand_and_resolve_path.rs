use anyhow::{Context, Result};
use path_clean::PathClean;
use std::env;
use std::path::{Path, PathBuf};

/// Expands ~ and env vars if possible (only for UTF-8 paths), and always returns an absolute, cleaned PathBuf.
/// Logs a warning if the path is not valid UTF-8 or expansion fails, but still makes the path absolute.
/// Does NOT fail if the file does not exist.
pub fn expand_and_resolve_path<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();
    let expanded: PathBuf = match input.to_str() {
        Some(s) => match shellexpand::full(s) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                log::warn!("Failed to expand path {:?} ({}). Using original path.", input, e);
                input.to_path_buf()
            }
        },
        None => {
            log::warn!("Path {:?} is not valid UTF-8. Skipping path expansion.", input);
            input.to_path_buf()
        }
    };

    let abs = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .context("Failed to get current directory")?
            .join(expanded)
    };
    Ok(abs.clean())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_cleaned() {
        let p = expand_and_resolve_path("/data/./genes/../genes_hg19.txt").unwrap();
        assert_eq!(p, PathBuf::from("/data/genes_hg19.txt"));
    }

    #[test]
    fn test_relative_path_is_made_absolute() {
        let p = expand_and_resolve_path("genes_hg19.txt").unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("genes_hg19.txt"));
    }
}
