//! JSON run report: the final [`Summary`] plus every recorded failure.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::Summary;

pub fn write_report(path: &Path, summary: &Summary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report folder {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary).context("serialize summary")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;
    use std::path::PathBuf;

    #[test]
    fn report_lists_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let summary = Summary {
            total: 3,
            completed: 3,
            errors: 1,
            failures: vec![Failure {
                path: PathBuf::from("Input/a.png"),
                message: "boom".to_string(),
            }],
        };
        write_report(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["completed"], 3);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["failures"][0]["message"], "boom");
        assert_eq!(value["failures"][0]["path"], "Input/a.png");
    }
}
