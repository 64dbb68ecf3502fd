//! Argument parsing and command execution.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use page_printer::cups::{default_printer, list_printers};
use page_printer::{
    CupsDevice, DEFAULT_TITLE, DeviceContext, PaperSize, RasterDevice, print_images,
    print_to_printer,
};
use placement::{DeviceMetrics, ImageSource, ImageSpec, PrintDefaults, plan_placements};
use tracing::info;

use crate::config::AppConfig;
use crate::config::defaults::describe_settings;
use crate::job_file::JobFile;

#[derive(Debug, Parser)]
#[command(
    name = "image-print",
    version,
    about = "Print images at a physical size, centered on the page",
    after_help = "EXAMPLES:\n  \
                  # 5 cm wide, centered\n  \
                  image-print print --width 5 photo.jpg\n\n  \
                  # 3 inches tall, 1 inch right of center\n  \
                  image-print print --unit inch --height 3 --horizontal-offset 1 photo.jpg\n\n  \
                  # Per-image overrides from a job file, rendered to a PNG instead of printed\n  \
                  image-print print --job job.json --dry-run page.png"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Place images on one page and send it to a printer
    Print(PrintArgs),

    /// Show where each image would be placed, without printing
    Plan {
        #[command(flatten)]
        args: PrintArgs,

        /// Use the fallback resolution and paper instead of querying the printer
        #[arg(long)]
        offline: bool,
    },

    /// List printers known to the system
    Printers,

    /// List configuration keys with their defaults
    Settings,
}

#[derive(Debug, Clone, Args)]
pub struct PrintArgs {
    /// Images printed with the call-level settings
    pub images: Vec<PathBuf>,

    /// Printed width of each image
    #[arg(long)]
    pub width: Option<f64>,

    /// Printed height of each image
    #[arg(long)]
    pub height: Option<f64>,

    /// Shift right from the page center (negative shifts left)
    #[arg(long, allow_hyphen_values = true)]
    pub horizontal_offset: Option<f64>,

    /// Shift down from the page center (negative shifts up)
    #[arg(long, allow_hyphen_values = true)]
    pub vertical_offset: Option<f64>,

    /// Unit for sizes and offsets: cm or inch
    #[arg(long)]
    pub unit: Option<String>,

    /// Printer name (default: system default printer)
    #[arg(short, long)]
    pub printer: Option<String>,

    /// JSON job file with defaults and per-image overrides
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Render the page to this PNG file instead of printing
    #[arg(long, value_name = "PNG")]
    pub dry_run: Option<PathBuf>,

    /// Resolution used when the printer does not report one
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Paper used when the printer does not report one (e.g. A4, Custom.100x150mm)
    #[arg(long)]
    pub paper: Option<String>,

    /// Document title shown in the print queue
    #[arg(long)]
    pub title: Option<String>,
}

/// Everything a print or plan command needs.
#[derive(Debug)]
pub struct PrintRequest {
    pub images: Vec<ImageSpec>,
    pub defaults: PrintDefaults,
    pub config: AppConfig,
    pub title: String,
}

impl PrintArgs {
    /// Merge configuration, job file and flags, in increasing precedence.
    pub fn into_request(self, mut config: AppConfig) -> anyhow::Result<PrintRequest> {
        if let Some(dpi) = self.dpi {
            if dpi == 0 {
                bail!("--dpi must be greater than zero");
            }
            config.fallback_dpi = dpi;
        }
        if let Some(paper) = &self.paper {
            config.fallback_paper = PaperSize::from_name(paper)?;
        }

        let mut defaults = config.print_defaults();
        let mut images = Vec::new();

        if let Some(job_path) = &self.job {
            let job = JobFile::load(job_path)?;
            defaults = job.defaults.apply(defaults);
            images.extend(job.into_specs());
        }
        images.extend(self.images.into_iter().map(ImageSpec::new));

        if images.is_empty() {
            bail!("no images given");
        }

        defaults.override_size(self.width, self.height);
        if let Some(v) = self.horizontal_offset {
            defaults.horizontal_offset = v;
        }
        if let Some(v) = self.vertical_offset {
            defaults.vertical_offset = v;
        }
        if let Some(unit) = self.unit {
            defaults.unit = unit;
        }
        if let Some(printer) = self.printer {
            defaults.printer = Some(printer);
        }

        let title = self.title.unwrap_or_else(|| {
            format!(
                "{DEFAULT_TITLE} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            )
        });

        Ok(PrintRequest {
            images,
            defaults,
            config,
            title,
        })
    }
}

/// Run a parsed command.
pub fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Print(args) => {
            let dry_run = args.dry_run.clone();
            let request = args.into_request(config)?;
            match dry_run {
                Some(out) => print_dry_run(request, &out),
                None => print(request),
            }
        }
        Commands::Plan { args, offline } => {
            let request = args.into_request(config)?;
            plan(request, offline)
        }
        Commands::Printers => show_printers(),
        Commands::Settings => {
            for line in describe_settings() {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn print(request: PrintRequest) -> anyhow::Result<()> {
    let rects = print_to_printer(
        request.images,
        &request.defaults,
        &request.config.cups_options(),
        &request.title,
    )
    .context("print failed")?;
    info!(images = rects.len(), "Print job sent");
    Ok(())
}

fn print_dry_run(request: PrintRequest, out: &std::path::Path) -> anyhow::Result<()> {
    let mut device = RasterDevice::new(request.config.fallback_metrics());
    let rects = print_images(&mut device, request.images, &request.defaults, &request.title)
        .context("dry run failed")?;
    device
        .save_png(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(
        images = rects.len(),
        title = device.title().unwrap_or_default(),
        path = %out.display(),
        "Dry run page written"
    );
    Ok(())
}

fn plan(request: PrintRequest, offline: bool) -> anyhow::Result<()> {
    let (target, metrics): (String, DeviceMetrics) = if offline {
        (
            format!("offline, {}", request.config.fallback_paper.name),
            request.config.fallback_metrics(),
        )
    } else {
        let device = CupsDevice::open(
            request.defaults.printer.as_deref(),
            &request.config.cups_options(),
        )?;
        (
            format!("{}, {}", device.printer(), device.paper().name),
            device.metrics(),
        )
    };

    let labels: Vec<String> = request.images.iter().map(image_label).collect();
    let placements = plan_placements(request.images, &request.defaults, &metrics)?;

    println!(
        "page {}x{} px at {}x{} dpi ({target})",
        metrics.page_size.0, metrics.page_size.1, metrics.pixels_per_inch.0, metrics.pixels_per_inch.1
    );
    for (label, placement) in labels.iter().zip(&placements) {
        println!("{label}\t{}", placement.rect);
    }
    Ok(())
}

fn image_label(spec: &ImageSpec) -> String {
    match &spec.image {
        ImageSource::Path(path) => path.display().to_string(),
        ImageSource::Bitmap(img) => format!("<bitmap {}x{}>", img.width(), img.height()),
    }
}

fn show_printers() -> anyhow::Result<()> {
    let printers = list_printers()?;
    if printers.is_empty() {
        println!("No printers found");
        return Ok(());
    }
    let default = default_printer().ok();
    for printer in printers {
        let marker = if default.as_deref() == Some(printer.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {}\t{}", printer.name, printer.status);
    }
    Ok(())
}
