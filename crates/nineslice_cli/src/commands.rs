//! Subcommand implementations

use anyhow::{Context, Result};
use nineslice_image::{codec, detect_border, Border, PixelBuffer, SlicedSprite};
use nineslice_mesh::{generate_mesh, render_preview, Mesh, MeshRequest, SpriteMetrics, Viewport};
use std::fs;
use std::path::Path;

use crate::config::JobConfig;

fn load(path: &Path) -> Result<PixelBuffer> {
    codec::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    codec::save(buffer, path).with_context(|| format!("Failed to write {}", path.display()))
}

fn sprite(input: &Path, border: Border) -> Result<SlicedSprite> {
    SlicedSprite::new(load(input)?, border)
        .with_context(|| format!("Border {} does not fit {}", border, input.display()))
}

pub fn detect(input: &Path, tolerance: f32) -> Result<Border> {
    let buffer = load(input)?;
    detect_border(&buffer, tolerance)
        .with_context(|| format!("Failed to detect border of {}", input.display()))
}

/// Crop transparent margins; returns the adjusted border
pub fn trim_alpha(input: &Path, output: &Path, border: Border) -> Result<Border> {
    let trimmed = sprite(input, border)?.trim_alpha()?;
    save(trimmed.buffer(), output)?;
    Ok(trimmed.border())
}

/// Remove the first stretchable row and column; returns the new size
pub fn trim_center(input: &Path, output: &Path, border: Border) -> Result<(u32, u32)> {
    let trimmed = sprite(input, border)?.trim_center()?;
    save(trimmed.buffer(), output)?;
    Ok(trimmed.buffer().dimensions())
}

/// Reduce the stretchable region to a single row and column; returns the new size
pub fn collapse_center(input: &Path, output: &Path, border: Border) -> Result<(u32, u32)> {
    let collapsed = sprite(input, border)?.collapse_center()?;
    save(collapsed.buffer(), output)?;
    Ok(collapsed.buffer().dimensions())
}

/// Detect, trim alpha and collapse the center in one pass
pub fn process(input: &Path, output: &Path, tolerance: f32) -> Result<(Border, u32, u32)> {
    let detected = SlicedSprite::auto_detect(load(input)?, tolerance)
        .with_context(|| format!("Failed to detect border of {}", input.display()))?;
    let processed = detected.trim_alpha()?.collapse_center()?;
    save(processed.buffer(), output)?;
    let (width, height) = processed.buffer().dimensions();
    Ok((processed.border(), width, height))
}

pub fn extend(input: &Path, output: &Path, border: Border, width: u32, height: u32) -> Result<()> {
    let extended = sprite(input, border)?
        .extended(width, height)
        .with_context(|| format!("Failed to extend {} to {}x{}", input.display(), width, height))?;
    save(&extended, output)
}

/// A job's generated mesh along with the inputs that produced it
pub struct JobMesh {
    pub mesh: Mesh,
    pub texture: PixelBuffer,
    pub sprite: SpriteMetrics,
}

pub fn build_job_mesh(job: &JobConfig) -> Result<JobMesh> {
    let texture = load(&job.image_path())?;
    let (width, height) = texture.dimensions();
    let border = if job.sprite.detect {
        detect_border(&texture, job.sprite.tolerance)
            .with_context(|| format!("Failed to detect border of {}", job.image_path().display()))?
    } else {
        job.sprite.border
    };
    let sprite = job.sprite_metrics(width, height, border);

    let mut request = MeshRequest::new(&sprite, job.target.rect)
        .with_slice(job.slice)
        .with_tile(job.tile)
        .with_fill(job.fill)
        .with_pixels_per_unit(job.pixels_per_unit())
        .with_color(job.target.color);
    if job.target.preserve_aspect {
        request = request.with_preserve_aspect(job.target.pivot);
    }
    if job.target.use_sprite_mesh {
        request = request.with_sprite_mesh();
    }
    let mesh = generate_mesh(&request).context("Failed to generate mesh")?;

    Ok(JobMesh {
        mesh,
        texture,
        sprite,
    })
}

pub fn write_mesh_json(mesh: &Mesh, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(mesh).context("Failed to serialize mesh")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Rasterize a job's mesh over its target rect at `scale` pixels per unit
pub fn render(job: &JobConfig, output: &Path, scale: f32) -> Result<(u32, u32)> {
    let built = build_job_mesh(job)?;
    let rect = job.target.rect;
    let viewport = Viewport::new(
        rect,
        (rect.width * scale).ceil().max(1.0) as u32,
        (rect.height * scale).ceil().max(1.0) as u32,
    );
    let preview = render_preview(&built.mesh, &built.texture, built.sprite.wrap_mode, viewport)
        .context("Failed to render preview")?;
    save(&preview, output)?;
    Ok((viewport.width, viewport.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nineslice_image::Color;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn scratch_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    /// 16x16 opaque frame of width 3 around a flat center, inside a 1px transparent margin
    fn framed_png(dir: &Path) -> PathBuf {
        let buffer = PixelBuffer::from_fn(18, 18, |x, y| {
            if x == 0 || y == 0 || x == 17 || y == 17 {
                Color::TRANSPARENT
            } else if x < 4 || y < 4 || x >= 14 || y >= 14 {
                Color::from_rgba8(200, 40, 40, 255)
            } else {
                Color::from_rgba8(40, 200, 40, 255)
            }
        })
        .unwrap();
        let path = dir.join("framed.png");
        codec::save(&buffer, &path).unwrap();
        path
    }

    #[test]
    fn test_process_pipeline() {
        let temp = scratch_dir();
        let dir = temp.path();
        let input = framed_png(dir);
        let output = dir.join("processed.png");

        let (border, width, height) = process(&input, &output, 0.0).unwrap();
        assert_eq!(border, Border::uniform(3));
        assert_eq!((width, height), (7, 7));
        assert_eq!(load(&output).unwrap().dimensions(), (7, 7));
    }

    #[test]
    fn test_trim_alpha_then_extend() {
        let temp = scratch_dir();
        let dir = temp.path();
        let input = framed_png(dir);
        let trimmed = dir.join("trimmed.png");

        let border = trim_alpha(&input, &trimmed, Border::uniform(4)).unwrap();
        assert_eq!(border, Border::uniform(3));

        let extended = dir.join("extended.png");
        extend(&trimmed, &extended, border, 40, 20).unwrap();
        assert_eq!(load(&extended).unwrap().dimensions(), (40, 20));
    }

    #[test]
    fn test_job_mesh_and_render() {
        let temp = scratch_dir();
        let dir = temp.path();
        framed_png(dir);
        let job = JobConfig::parse(
            r#"
[sprite]
image = "framed.png"
detect = true
tolerance = 0.0

[target]
rect = { x = 0.0, y = 0.0, width = 64.0, height = 32.0 }

[slice]
sliced = true
"#,
            dir.to_path_buf(),
        )
        .unwrap();

        let built = build_job_mesh(&job).unwrap();
        assert_eq!(built.sprite.border, Border::uniform(4));
        assert_eq!(built.mesh.vertex_count(), 16);
        assert_eq!(built.mesh.triangle_count(), 18);

        let json = dir.join("mesh.json");
        write_mesh_json(&built.mesh, &json).unwrap();
        let parsed: Mesh = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed, built.mesh);

        let preview = dir.join("preview.png");
        assert_eq!(render(&job, &preview, 1.0).unwrap(), (64, 32));
        assert_eq!(load(&preview).unwrap().dimensions(), (64, 32));
    }

    #[test]
    fn test_bad_border_is_reported() {
        let temp = scratch_dir();
        let dir = temp.path();
        let input = framed_png(dir);
        let err = trim_center(&input, &dir.join("out.png"), Border::new(9, 0, 9, 0)).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }
}
