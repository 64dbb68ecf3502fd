//! JSON job files: call-level defaults plus per-image override records.
//!
//! ```json
//! {
//!   "defaults": { "width": 5, "vertical_offset": 5, "unit": "cm" },
//!   "images": [
//!     { "image": "a.jpg", "horizontal_offset": 2, "width": 10 },
//!     { "image": "a.jpg", "vertical_offset": 10 },
//!     "b.png"
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use placement::{ImageSpec, PrintDefaults};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    #[serde(default)]
    pub defaults: JobDefaults,
    pub images: Vec<JobImage>,
}

/// Call-level defaults; any field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDefaults {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub horizontal_offset: Option<f64>,
    pub vertical_offset: Option<f64>,
    pub unit: Option<String>,
    pub printer: Option<String>,
}

/// A bare image path, or an image with overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobImage {
    Path(PathBuf),
    Spec(JobImageSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobImageSpec {
    pub image: PathBuf,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub horizontal_offset: Option<f64>,
    pub vertical_offset: Option<f64>,
    pub unit: Option<String>,
}

impl JobFile {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a job file; relative image paths resolve against its directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        let mut job = Self::parse(&text)
            .with_context(|| format!("invalid job file {}", path.display()))?;
        if let Some(base) = path.parent() {
            job.rebase(base);
        }
        Ok(job)
    }

    fn rebase(&mut self, base: &Path) {
        for image in &mut self.images {
            let path = match image {
                JobImage::Path(p) => p,
                JobImage::Spec(s) => &mut s.image,
            };
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn into_specs(self) -> Vec<ImageSpec> {
        self.images.into_iter().map(ImageSpec::from).collect()
    }
}

impl JobDefaults {
    /// Overlay the fields present in the job file onto `defaults`.
    pub fn apply(&self, mut defaults: PrintDefaults) -> PrintDefaults {
        defaults.override_size(self.width, self.height);
        if let Some(v) = self.horizontal_offset {
            defaults.horizontal_offset = v;
        }
        if let Some(v) = self.vertical_offset {
            defaults.vertical_offset = v;
        }
        if let Some(unit) = &self.unit {
            defaults.unit = unit.clone();
        }
        if let Some(printer) = &self.printer {
            defaults.printer = Some(printer.clone());
        }
        defaults
    }
}

impl From<JobImage> for ImageSpec {
    fn from(image: JobImage) -> Self {
        match image {
            JobImage::Path(path) => ImageSpec::new(path),
            JobImage::Spec(s) => ImageSpec {
                image: s.image.into(),
                width: s.width,
                height: s.height,
                horizontal_offset: s.horizontal_offset,
                vertical_offset: s.vertical_offset,
                unit: s.unit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement::ImageSource;

    const SAMPLE: &str = r#"{
        "defaults": { "width": 5, "horizontal_offset": 0, "vertical_offset": 5, "unit": "cm" },
        "images": [
            { "image": "a.jpg", "horizontal_offset": 2, "width": 10 },
            { "image": "a.jpg", "vertical_offset": 10 },
            "b.png"
        ]
    }"#;

    fn path_of(spec: &ImageSpec) -> &Path {
        match &spec.image {
            ImageSource::Path(p) => p,
            ImageSource::Bitmap(_) => panic!("expected a path"),
        }
    }

    #[test]
    fn parses_mixed_entries() {
        let job = JobFile::parse(SAMPLE).unwrap();
        assert_eq!(job.images.len(), 3);
        assert!(matches!(job.images[2], JobImage::Path(_)));

        let specs = job.into_specs();
        assert_eq!(specs[0].width, Some(10.0));
        assert_eq!(specs[0].horizontal_offset, Some(2.0));
        assert_eq!(specs[0].vertical_offset, None);
        assert_eq!(specs[1].vertical_offset, Some(10.0));
        assert_eq!(specs[1].width, None);
        assert_eq!(path_of(&specs[2]), Path::new("b.png"));
        assert!(specs[2].unit.is_none());
    }

    #[test]
    fn defaults_overlay_only_present_fields() {
        let job = JobFile::parse(SAMPLE).unwrap();
        let base = PrintDefaults::new().with_unit("inch").with_printer("Office_Laser");
        let defaults = job.defaults.apply(base);

        assert_eq!(defaults.width, Some(5.0));
        assert_eq!(defaults.height, None);
        assert_eq!(defaults.vertical_offset, 5.0);
        assert_eq!(defaults.unit, "cm");
        assert_eq!(defaults.printer.as_deref(), Some("Office_Laser"));
    }

    #[test]
    fn job_height_replaces_configured_width() {
        let job = JobFile::parse(r#"{ "defaults": { "height": 4 }, "images": [] }"#).unwrap();
        let defaults = job.defaults.apply(PrintDefaults::new().with_width(5.0));

        assert_eq!(defaults.width, None);
        assert_eq!(defaults.height, Some(4.0));
    }

    #[test]
    fn defaults_section_is_optional() {
        let job = JobFile::parse(r#"{ "images": ["a.jpg"] }"#).unwrap();
        let defaults = job.defaults.apply(PrintDefaults::new());
        assert_eq!(defaults, PrintDefaults::new());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(JobFile::parse(r#"{ "images": [], "colour": "red" }"#).is_err());
        assert!(JobFile::parse(r#"{ "defaults": { "widht": 5 }, "images": [] }"#).is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.json");
        std::fs::write(
            &job_path,
            r#"{ "images": ["a.jpg", { "image": "/abs/b.png", "height": 3 }] }"#,
        )
        .unwrap();

        let specs = JobFile::load(&job_path).unwrap().into_specs();
        assert_eq!(path_of(&specs[0]), dir.path().join("a.jpg"));
        assert_eq!(path_of(&specs[1]), Path::new("/abs/b.png"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = JobFile::load(Path::new("/nonexistent/job.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read job file"));
    }
}
