//! Job scaffolding

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{JobConfig, JOB_FILE};

/// Write a starter nineslice.toml for `image` into `dir`
pub fn create_job(dir: &Path, image: &Path, force: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(JOB_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
    }

    let mut job = JobConfig::new(image.to_path_buf());
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".to_string());
    job.output.mesh = Some(PathBuf::from(format!("{stem}.mesh.json")));
    job.output.preview = Some(PathBuf::from(format!("{stem}.preview.png")));

    fs::write(&path, job.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_job_writes_loadable_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("job");

        let path = create_job(&dir, Path::new("button.png"), false).unwrap();
        let job = JobConfig::load_from_dir(&dir).unwrap();
        assert_eq!(job.image_path(), dir.join("button.png"));
        assert_eq!(job.output.mesh, Some(PathBuf::from("button.mesh.json")));

        assert!(create_job(&dir, Path::new("button.png"), false).is_err());
        assert_eq!(create_job(&dir, Path::new("button.png"), true).unwrap(), path);
    }

    #[test]
    fn test_create_job_without_extension() {
        let temp = tempfile::tempdir().unwrap();
        create_job(temp.path(), Path::new("panel"), false).unwrap();
        let job = JobConfig::load_from_dir(temp.path()).unwrap();
        assert_eq!(job.output.preview, Some(PathBuf::from("panel.preview.png")));
    }
}
