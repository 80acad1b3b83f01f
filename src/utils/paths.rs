use std::path::PathBuf;

use crate::error::AppError;

fn is_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand each argument into files, keeping argument order. Plain paths pass
/// through untouched so a missing file surfaces as a read error later; a glob
/// that matches nothing is an error here.
pub(crate) fn expand_patterns(args: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for arg in args {
        if !is_pattern(arg) {
            paths.push(PathBuf::from(arg));
            continue;
        }
        let entries = glob::glob(arg).map_err(|e| AppError::Pattern {
            pattern: arg.clone(),
            message: e.to_string(),
        })?;
        let mut matched: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    None
                }
            })
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            return Err(AppError::NoMatches {
                pattern: arg.clone(),
            });
        }
        matched.sort();
        paths.extend(matched);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plain_paths_pass_through() {
        let args = vec!["b.json".to_string(), "a.json".to_string()];
        let paths = expand_patterns(&args).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.json"), PathBuf::from("a.json")]);
    }

    #[test]
    fn glob_matches_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2.json", "1.json", "skip.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let pattern = format!("{}/*.json", dir.path().display());
        let paths = expand_patterns(&[pattern]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.json", "2.json"]);
    }

    #[test]
    fn empty_glob_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        assert!(matches!(
            expand_patterns(&[pattern]).unwrap_err(),
            AppError::NoMatches { .. }
        ));
    }

    #[test]
    fn invalid_glob_is_error() {
        assert!(matches!(
            expand_patterns(&["[".to_string()]).unwrap_err(),
            AppError::Pattern { .. }
        ));
    }
}
