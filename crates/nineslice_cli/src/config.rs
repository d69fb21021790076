//! Job file handling (nineslice.toml)

use anyhow::{Context, Result};
use nineslice_image::Border;
use nineslice_mesh::{
    multiplied_pixels_per_unit, FillSpec, Rect, SliceSpec, SpriteMetrics, TileSpec, UvRect, Vec2,
    WrapMode,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const JOB_FILE: &str = "nineslice.toml";

/// Top-level job configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct JobConfig {
    pub sprite: SpriteConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub slice: SliceSpec,
    #[serde(default)]
    pub tile: TileSpec,
    #[serde(default)]
    pub fill: FillSpec,
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory relative paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Source bitmap and its slicing metadata
#[derive(Debug, Deserialize, Serialize)]
pub struct SpriteConfig {
    /// Image file (relative to the job file)
    pub image: PathBuf,
    /// Explicit border; ignored when `detect` is set
    #[serde(default)]
    pub border: Border,
    /// Infer the border from the pixels
    #[serde(default)]
    pub detect: bool,
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    #[serde(default)]
    pub wrap_mode: WrapMode,
    #[serde(default)]
    pub outer_uv: UvRect,
    /// `[left, bottom, right, top]` in pixels
    #[serde(default)]
    pub padding: [f32; 4],
}

fn default_tolerance() -> f32 {
    1.0
}

fn default_pixels_per_unit() -> f32 {
    100.0
}

/// Where and how the sprite is drawn
#[derive(Debug, Deserialize, Serialize)]
pub struct TargetConfig {
    #[serde(default = "default_rect")]
    pub rect: Rect,
    #[serde(default = "default_pixels_per_unit")]
    pub reference_pixels_per_unit: f32,
    #[serde(default = "default_multiplier")]
    pub pixels_per_unit_multiplier: f32,
    #[serde(default)]
    pub preserve_aspect: bool,
    #[serde(default = "default_pivot")]
    pub pivot: Vec2,
    #[serde(default = "default_color")]
    pub color: [u8; 4],
    #[serde(default)]
    pub use_sprite_mesh: bool,
}

fn default_rect() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 100.0)
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_pivot() -> Vec2 {
    Vec2::new(0.5, 0.5)
}

fn default_color() -> [u8; 4] {
    [255; 4]
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            rect: default_rect(),
            reference_pixels_per_unit: default_pixels_per_unit(),
            pixels_per_unit_multiplier: default_multiplier(),
            preserve_aspect: false,
            pivot: default_pivot(),
            color: default_color(),
            use_sprite_mesh: false,
        }
    }
}

/// Output files
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Mesh JSON path
    #[serde(default)]
    pub mesh: Option<PathBuf>,
    /// Preview image path
    #[serde(default)]
    pub preview: Option<PathBuf>,
}

impl JobConfig {
    /// Load a job from a directory (looks for nineslice.toml) or a file path
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(JOB_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!("No {} found in {}", JOB_FILE, path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::parse(&content, base_dir)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// A job for `image` with every other setting at its default
    pub fn new(image: PathBuf) -> Self {
        Self {
            sprite: SpriteConfig {
                image,
                border: Border::ZERO,
                detect: true,
                tolerance: default_tolerance(),
                pixels_per_unit: default_pixels_per_unit(),
                wrap_mode: WrapMode::Clamp,
                outer_uv: UvRect::FULL,
                padding: [0.0; 4],
            },
            target: TargetConfig::default(),
            slice: SliceSpec {
                sliced: true,
                ..Default::default()
            },
            tile: TileSpec::default(),
            fill: FillSpec::default(),
            output: OutputConfig::default(),
            base_dir: PathBuf::new(),
        }
    }

    /// Parse job TOML, resolving relative paths against `base_dir`
    pub fn parse(content: &str, base_dir: PathBuf) -> Result<Self> {
        let mut config: JobConfig = toml::from_str(content)?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize job")
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.resolve(&self.sprite.image)
    }

    /// Sprite pixels per target unit after the reference and multiplier
    pub fn pixels_per_unit(&self) -> f32 {
        multiplied_pixels_per_unit(
            self.sprite.pixels_per_unit,
            self.target.reference_pixels_per_unit,
            self.target.pixels_per_unit_multiplier,
        )
    }

    /// Metrics for a bitmap of the given size with the resolved border
    pub fn sprite_metrics(&self, width: u32, height: u32, border: Border) -> SpriteMetrics {
        SpriteMetrics {
            width,
            height,
            border,
            pixels_per_unit: self.sprite.pixels_per_unit,
            outer_uv: self.sprite.outer_uv,
            padding: self.sprite.padding,
            wrap_mode: self.sprite.wrap_mode,
            geometry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nineslice_mesh::FillMethod;

    #[test]
    fn test_minimal_job_uses_defaults() {
        let job =
            JobConfig::parse("[sprite]\nimage = \"panel.png\"\n", PathBuf::from("assets")).unwrap();
        assert_eq!(job.image_path(), PathBuf::from("assets/panel.png"));
        assert_eq!(job.sprite.border, Border::ZERO);
        assert_eq!(job.sprite.tolerance, 1.0);
        assert_eq!(job.pixels_per_unit(), 1.0);
        assert!(job.slice.fill_center);
        assert!(!job.tile.tiled);
        assert_eq!(job.fill.amount, 1.0);
        assert_eq!(job.target.color, [255; 4]);
    }

    #[test]
    fn test_full_job() {
        let toml = r#"
[sprite]
image = "button.png"
border = { left = 4, bottom = 3, right = 4, top = 5 }
pixels_per_unit = 200.0
wrap_mode = "repeat"

[target]
rect = { x = 0.0, y = 0.0, width = 300.0, height = 80.0 }
pixels_per_unit_multiplier = 0.5

[slice]
sliced = true
fill_center = false

[fill]
method = "radial360"
origin = 2
clockwise = false
amount = 0.25

[output]
mesh = "out/button.json"
"#;
        let job = JobConfig::parse(toml, PathBuf::new()).unwrap();
        assert_eq!(job.sprite.border, Border::new(4, 3, 4, 5));
        assert_eq!(job.sprite.wrap_mode, WrapMode::Repeat);
        assert_eq!(job.pixels_per_unit(), 1.0);
        assert!(job.slice.sliced && !job.slice.fill_center);
        assert_eq!(job.fill.method, FillMethod::Radial360);
        assert_eq!(job.output.mesh, Some(PathBuf::from("out/button.json")));

        let metrics = job.sprite_metrics(32, 16, job.sprite.border);
        assert_eq!(metrics.wrap_mode, WrapMode::Repeat);
        assert_eq!(metrics.pixels_per_unit, 200.0);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let job = JobConfig::new(PathBuf::from("a.png"));
        let text = job.to_toml().unwrap();
        let again = JobConfig::parse(&text, PathBuf::new()).unwrap();
        assert!(again.sprite.detect);
        assert!(again.slice.sliced);
        assert_eq!(again.sprite.image, PathBuf::from("a.png"));
        assert_eq!(again.target.rect, job.target.rect);
    }

    #[test]
    fn test_missing_job_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JobConfig::load_from_dir(dir.path()).is_err());
    }
}
