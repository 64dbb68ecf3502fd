//! CUPS-backed printer device (`lpstat`, `lpoptions`, `lpr`).
//!
//! The page is composed in memory on a [`RasterDevice`] and handed to the
//! spooler as a PNG when the document ends.

use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use image::DynamicImage;
use placement::{DeviceMetrics, Rect};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::device::DeviceContext;
use crate::paper::PaperSize;
use crate::raster::RasterDevice;
use crate::{PrinterError, Result};

static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:x(\d+))?dpi$").unwrap());

/// A printer known to the local CUPS server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrinter {
    pub name: String,
    pub status: String,
}

/// Values used when a printer does not report its own capabilities.
#[derive(Debug, Clone)]
pub struct CupsOptions {
    pub fallback_dpi: u32,
    pub fallback_paper: PaperSize,
    /// Directory for spool files handed to `lpr`.
    pub spool_dir: PathBuf,
}

impl Default for CupsOptions {
    fn default() -> Self {
        Self {
            fallback_dpi: 300,
            fallback_paper: PaperSize::letter(),
            spool_dir: default_spool_dir(),
        }
    }
}

/// `<cache dir>/image-print`, or the temp dir when there is no cache dir.
pub fn default_spool_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("image-print")
}

/// Run a CUPS tool and return its stdout.
fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!(program, ?args, "Running spooler command");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| PrinterError::Command {
            program: program.to_string(),
            message: format!("failed to run: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Command {
            program: program.to_string(),
            message: stderr.trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// List printers via `lpstat -p`.
pub fn list_printers() -> Result<Vec<SystemPrinter>> {
    match run("lpstat", &["-p"]) {
        Ok(stdout) => Ok(parse_lpstat_printers(&stdout)),
        Err(PrinterError::Command { message, .. })
            if message.contains("No destinations added") || message.contains("No printers") =>
        {
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// The system default destination via `lpstat -d`.
pub fn default_printer() -> Result<String> {
    let stdout = run("lpstat", &["-d"])?;
    parse_lpstat_default(&stdout).ok_or(PrinterError::NoDefaultPrinter)
}

/// Parse `lpstat -p` output: one `printer NAME <state>` line per queue.
///
/// Continuation lines (alerts, reasons) are indented and skipped.
fn parse_lpstat_printers(stdout: &str) -> Vec<SystemPrinter> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("printer "))
        .filter_map(|entry| {
            let (name, state) = entry.split_once(' ').unwrap_or((entry, ""));
            if name.is_empty() {
                return None;
            }
            // "is idle.  enabled since ..." keeps only the state sentence.
            let state = state.strip_prefix("is ").unwrap_or(state);
            let state = state.split_once('.').map_or(state, |(head, _)| head).trim();
            Some(SystemPrinter {
                name: name.to_string(),
                status: if state.is_empty() { "unknown" } else { state }.to_string(),
            })
        })
        .collect()
}

fn parse_lpstat_default(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let (_, name) = line.trim().split_once("system default destination:")?;
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Default choice of one option in `lpoptions -l` output.
///
/// Lines look like `PageSize/Media Size: Letter *A4 Legal`; the default is
/// marked with `*`.
fn parse_option_default(stdout: &str, option: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let (key, choices) = line.split_once(':')?;
        let key = key.split('/').next()?.trim();
        if key != option {
            return None;
        }
        choices
            .split_whitespace()
            .find_map(|c| c.strip_prefix('*'))
            .map(str::to_string)
    })
}

/// `600dpi` or `1200x600dpi` to `(x, y)` pixels per inch.
fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let caps = RE_RESOLUTION.captures(value)?;
    let x: u32 = caps[1].parse().ok()?;
    let y: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => x,
    };
    (x > 0 && y > 0).then_some((x, y))
}

/// Resolution and paper for `printer`, falling back to `options`.
fn query_capabilities(printer: &str, options: &CupsOptions) -> ((u32, u32), PaperSize) {
    let stdout = match run("lpoptions", &["-p", printer, "-l"]) {
        Ok(s) => s,
        Err(e) => {
            warn!(printer, error = %e, "Could not read printer options, using fallbacks");
            String::new()
        }
    };

    let resolution = parse_option_default(&stdout, "Resolution")
        .and_then(|r| parse_resolution(&r))
        .unwrap_or_else(|| {
            warn!(printer, dpi = options.fallback_dpi, "Printer resolution unknown, using fallback");
            (options.fallback_dpi, options.fallback_dpi)
        });

    let paper = match parse_option_default(&stdout, "PageSize").map(|p| PaperSize::from_name(&p)) {
        Some(Ok(paper)) => paper,
        Some(Err(e)) => {
            warn!(printer, error = %e, "Unsupported page size, using fallback");
            options.fallback_paper.clone()
        }
        None => options.fallback_paper.clone(),
    };

    (resolution, paper)
}

/// A CUPS printer opened for one print job.
#[derive(Debug)]
pub struct CupsDevice {
    printer: String,
    paper: PaperSize,
    raster: RasterDevice,
    spool_dir: PathBuf,
    spool_file: Option<PathBuf>,
    title: String,
}

impl CupsDevice {
    /// Open `printer`, or the system default when `None`.
    pub fn open(printer: Option<&str>, options: &CupsOptions) -> Result<Self> {
        let name = match printer {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => default_printer()?,
        };

        if !list_printers()?.iter().any(|p| p.name == name) {
            return Err(PrinterError::PrinterNotFound(name));
        }

        let (pixels_per_inch, paper) = query_capabilities(&name, options);
        Ok(Self::with_capabilities(name, pixels_per_inch, paper, options.spool_dir.clone()))
    }

    /// Build a device from already known capabilities.
    pub fn with_capabilities(
        printer: String,
        pixels_per_inch: (u32, u32),
        paper: PaperSize,
        spool_dir: PathBuf,
    ) -> Self {
        let metrics = DeviceMetrics::new(pixels_per_inch, paper.to_device_pixels(pixels_per_inch));
        info!(
            printer = %printer,
            paper = %paper.name,
            dpi_x = pixels_per_inch.0,
            dpi_y = pixels_per_inch.1,
            page_w = metrics.page_size.0,
            page_h = metrics.page_size.1,
            "Opened printer"
        );
        Self {
            printer,
            paper,
            raster: RasterDevice::new(metrics),
            spool_dir,
            spool_file: None,
            title: String::new(),
        }
    }

    pub fn printer(&self) -> &str {
        &self.printer
    }

    pub fn paper(&self) -> &PaperSize {
        &self.paper
    }

    /// `lpr` arguments for submitting the spooled page.
    fn lpr_args(&self, spool_file: &str) -> Vec<String> {
        let (dpi, _) = self.raster.metrics().pixels_per_inch;
        vec![
            "-P".into(),
            self.printer.clone(),
            "-T".into(),
            self.title.clone(),
            "-o".into(),
            format!("media={}", self.paper.name),
            "-o".into(),
            format!("ppi={dpi}"),
            spool_file.to_string(),
        ]
    }
}

impl DeviceContext for CupsDevice {
    fn metrics(&self) -> DeviceMetrics {
        self.raster.metrics()
    }

    fn start_doc(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        self.raster.start_doc(title)
    }

    fn start_page(&mut self) -> Result<()> {
        self.raster.start_page()
    }

    fn draw(&mut self, image: &DynamicImage, rect: Rect) -> Result<()> {
        self.raster.draw(image, rect)
    }

    fn end_page(&mut self) -> Result<()> {
        self.raster.end_page()
    }

    fn end_doc(&mut self) -> Result<()> {
        self.raster.end_doc()?;

        std::fs::create_dir_all(&self.spool_dir)?;
        let spool_file = self
            .spool_dir
            .join(format!("{}.png", uuid::Uuid::new_v4()));
        self.spool_file = Some(spool_file.clone());
        self.raster.save_png(&spool_file)?;

        let path = spool_file.to_string_lossy();
        let args = self.lpr_args(&path);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run("lpr", &args)?;

        info!(printer = %self.printer, title = %self.title, "Submitted print job");
        Ok(())
    }
}

impl Drop for CupsDevice {
    fn drop(&mut self) {
        if let Some(path) = self.spool_file.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                debug!(path = %path.display(), error = %e, "Failed to remove spool file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lpstat_queue_states() {
        let stdout = "\
printer Brother_HL_L2350DW is idle.  enabled since Mon 12 Oct 2026 09:14:02 AM
printer Canon_G3010 now printing Canon_G3010-17.  enabled since Mon 12 Oct 2026 09:20:45 AM
\tWaiting for printer to finish.
printer Zebra_ZD420
scheduler is running
";
        let printers = parse_lpstat_printers(stdout);

        let summary: Vec<(&str, &str)> = printers
            .iter()
            .map(|p| (p.name.as_str(), p.status.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("Brother_HL_L2350DW", "idle"),
                ("Canon_G3010", "now printing Canon_G3010-17"),
                ("Zebra_ZD420", "unknown"),
            ]
        );
    }

    #[test]
    fn lpstat_without_queues_lists_nothing() {
        assert!(parse_lpstat_printers("").is_empty());
        assert!(parse_lpstat_printers("lpstat: No destinations added.\n").is_empty());
    }

    #[test]
    fn parse_default_destination() {
        assert_eq!(
            parse_lpstat_default("system default destination: Office_Laser\n"),
            Some("Office_Laser".to_string())
        );
        assert_eq!(parse_lpstat_default("no system default destination\n"), None);
    }

    #[test]
    fn option_default_is_starred_choice() {
        let out = "PageSize/Media Size: Letter *A4 Legal\nResolution/Output Resolution: 300dpi *600dpi 1200x600dpi\nDuplex/2-Sided Printing: *None DuplexNoTumble\n";
        assert_eq!(parse_option_default(out, "PageSize").as_deref(), Some("A4"));
        assert_eq!(parse_option_default(out, "Resolution").as_deref(), Some("600dpi"));
        assert_eq!(parse_option_default(out, "InputSlot"), None);
    }

    #[test]
    fn option_without_default_is_none() {
        assert_eq!(parse_option_default("PageSize/Media Size: Letter A4\n", "PageSize"), None);
    }

    #[test]
    fn resolution_forms() {
        assert_eq!(parse_resolution("600dpi"), Some((600, 600)));
        assert_eq!(parse_resolution("1200x600dpi"), Some((1200, 600)));
        assert_eq!(parse_resolution("236dpcm"), None);
        assert_eq!(parse_resolution("0dpi"), None);
    }

    #[test]
    fn capabilities_give_page_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let device = CupsDevice::with_capabilities(
            "Office_Laser".into(),
            (300, 300),
            PaperSize::letter(),
            dir.path().to_path_buf(),
        );
        assert_eq!(device.printer(), "Office_Laser");
        assert_eq!(device.metrics(), DeviceMetrics::new((300, 300), (2550, 3300)));
    }

    #[test]
    fn lpr_args_carry_media_and_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = CupsDevice::with_capabilities(
            "Office_Laser".into(),
            (600, 600),
            PaperSize::from_name("A4").unwrap(),
            dir.path().to_path_buf(),
        );
        device.start_doc("image-print").unwrap();
        let args = device.lpr_args("/tmp/page.png");
        assert_eq!(
            args,
            [
                "-P",
                "Office_Laser",
                "-T",
                "image-print",
                "-o",
                "media=A4",
                "-o",
                "ppi=600",
                "/tmp/page.png"
            ]
        );
    }
}
