mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_pageops::{
    Anchor, CompressionLevel, CompressionOptions, DeleteOptions, ExtractMode, ExtractOptions,
    MergeOptions, MetadataOptions, NumberFormat, NumberPosition, Operation, PageNumberOptions,
    PageSpec, Rgb, RotateOptions, WatermarkContent, WatermarkOptions,
};
use pdf_pipeline::{RunRequest, RunStatus, SourceFile, package, spawn_run};
use std::path::{Path, PathBuf};

use crate::logger::CliLogger;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF page tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory the result is written to
    #[arg(short = 'o', long, global = true, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the operation as a JSON job file
    #[arg(long, global = true)]
    save_job: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Concatenate PDFs in the given order
    Merge {
        /// Input PDF files
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },

    /// Copy selected pages into new PDFs
    Extract {
        input: PathBuf,

        #[command(flatten)]
        pages: PageArgs,

        /// How selected pages are grouped into outputs
        #[arg(long, default_value = "combined", value_enum)]
        mode: ExtractArg,

        /// Pages per output with `--mode chunks`
        #[arg(long, default_value = "1")]
        chunk_size: usize,
    },

    /// Set the rotation of selected pages
    Rotate {
        input: PathBuf,

        #[command(flatten)]
        pages: PageArgs,

        /// Clockwise angle, a multiple of 90
        #[arg(short, long, default_value = "90", allow_negative_numbers = true)]
        angle: i32,
    },

    /// Stamp text or an image on selected pages
    Watermark {
        input: PathBuf,

        #[command(flatten)]
        pages: PageArgs,

        /// Watermark text
        #[arg(long, conflicts_with = "image")]
        text: Option<String>,

        /// PNG or JPEG watermark image
        #[arg(long)]
        image: Option<PathBuf>,

        /// Font size in points
        #[arg(long, default_value = "48")]
        font_size: f32,

        /// Text color as #rrggbb
        #[arg(long, default_value = "#808080")]
        color: String,

        /// Image scale, points per pixel
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// 0.0 (invisible) to 1.0 (opaque)
        #[arg(long, default_value = "0.3")]
        opacity: f32,

        /// Counter-clockwise rotation in degrees
        #[arg(long, default_value = "45", allow_negative_numbers = true)]
        rotation: f32,

        #[arg(long, default_value = "center", value_enum)]
        position: AnchorArg,

        /// Distance from the page edge in points
        #[arg(long, default_value = "36")]
        margin: f32,
    },

    /// Add page numbers
    Number {
        input: PathBuf,

        #[arg(long, default_value = "bottom-center", value_enum)]
        position: PositionArg,

        #[arg(long, default_value = "arabic", value_enum)]
        format: FormatArg,

        /// Custom label, `{n}` is the number and `{total}` the page count
        #[arg(long)]
        template: Option<String>,

        /// Number given to the first numbered page
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        start: i64,

        #[arg(long)]
        skip_first: bool,

        #[arg(long)]
        skip_last: bool,

        #[arg(long, default_value = "")]
        prefix: String,

        #[arg(long, default_value = "")]
        suffix: String,

        #[arg(long, default_value = "12")]
        font_size: f32,

        /// Text color as #rrggbb
        #[arg(long, default_value = "#000000")]
        color: String,

        /// Distance from the page edge in points
        #[arg(long, default_value = "30")]
        margin: f32,
    },

    /// Set document metadata; fields not given are left alone
    Metadata {
        input: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        /// Comma separated
        #[arg(long)]
        keywords: Option<String>,

        #[arg(long)]
        creator: Option<String>,

        #[arg(long)]
        producer: Option<String>,
    },

    /// Shrink a PDF
    Compress {
        input: PathBuf,

        #[arg(long, default_value = "medium", value_enum)]
        level: LevelArg,

        /// Leave embedded images untouched
        #[arg(long)]
        keep_images: bool,

        #[arg(long)]
        remove_metadata: bool,

        #[arg(long)]
        remove_annotations: bool,

        #[arg(long)]
        remove_bookmarks: bool,

        #[arg(long)]
        remove_javascript: bool,
    },

    /// Remove selected pages
    Delete {
        input: PathBuf,

        #[command(flatten)]
        pages: PageArgs,
    },

    /// Show page count, page sizes and metadata
    Info { input: PathBuf },

    /// Run an operation stored in a JSON job file
    Run {
        /// Job file written by `--save-job`
        #[arg(short, long)]
        job: PathBuf,

        /// Input PDF files
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
}

/// Page selection shared by the page-oriented commands
#[derive(Args, Clone, Debug)]
struct PageArgs {
    /// `all`, `odd`, `even` or a list such as `1,3,5-7`
    #[arg(short, long, default_value = "all")]
    pages: String,

    /// First page of a range (overrides --pages)
    #[arg(long, requires = "to")]
    from: Option<i64>,

    /// Last page of a range
    #[arg(long, requires = "from")]
    to: Option<i64>,
}

impl PageArgs {
    fn spec(&self) -> PageSpec {
        match (self.from, self.to) {
            (Some(start), Some(end)) => PageSpec::Range { start, end },
            _ => PageSpec::parse(&self.pages),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractArg {
    Combined,
    PerPage,
    Chunks,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Clone, Copy, ValueEnum)]
enum PositionArg {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Arabic,
    Roman,
    Letter,
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Low,
    Medium,
    High,
    Maximum,
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::TopLeft => Self::TopLeft,
            AnchorArg::TopCenter => Self::TopCenter,
            AnchorArg::TopRight => Self::TopRight,
            AnchorArg::MiddleLeft => Self::MiddleLeft,
            AnchorArg::Center => Self::Center,
            AnchorArg::MiddleRight => Self::MiddleRight,
            AnchorArg::BottomLeft => Self::BottomLeft,
            AnchorArg::BottomCenter => Self::BottomCenter,
            AnchorArg::BottomRight => Self::BottomRight,
        }
    }
}

impl From<PositionArg> for NumberPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::TopLeft => Self::TopLeft,
            PositionArg::TopCenter => Self::TopCenter,
            PositionArg::TopRight => Self::TopRight,
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::BottomCenter => Self::BottomCenter,
            PositionArg::BottomRight => Self::BottomRight,
        }
    }
}

impl From<FormatArg> for NumberFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Arabic => Self::Arabic,
            FormatArg::Roman => Self::Roman,
            FormatArg::Letter => Self::Letter,
        }
    }
}

impl From<LevelArg> for CompressionLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Low => Self::Low,
            LevelArg::Medium => Self::Medium,
            LevelArg::High => Self::High,
            LevelArg::Maximum => Self::Maximum,
        }
    }
}

/// Turn a command into an operation plus its input files.
///
/// Returns `None` for commands that do not run an operation.
async fn build_operation(command: Commands) -> Result<Option<(Operation, Vec<PathBuf>)>> {
    let built = match command {
        Commands::Merge { inputs } => (Operation::Merge(MergeOptions::default()), inputs),

        Commands::Extract {
            input,
            pages,
            mode,
            chunk_size,
        } => {
            let mode = match mode {
                ExtractArg::Combined => ExtractMode::SingleCombined,
                ExtractArg::PerPage => ExtractMode::OnePerPage,
                ExtractArg::Chunks => ExtractMode::Chunks { size: chunk_size },
            };
            let options = ExtractOptions {
                pages: pages.spec(),
                mode,
            };
            (Operation::Extract(options), vec![input])
        }

        Commands::Rotate {
            input,
            pages,
            angle,
        } => {
            let options = RotateOptions {
                pages: pages.spec(),
                angle_degrees: angle,
            };
            (Operation::Rotate(options), vec![input])
        }

        Commands::Watermark {
            input,
            pages,
            text,
            image,
            font_size,
            color,
            scale,
            opacity,
            rotation,
            position,
            margin,
        } => {
            let content = match (image, text) {
                (Some(path), _) => {
                    let data = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    WatermarkContent::Image { data, scale }
                }
                (None, text) => WatermarkContent::Text {
                    text: text.unwrap_or_else(|| "CONFIDENTIAL".to_string()),
                    font_size,
                    color: Rgb::from_hex(&color)?,
                },
            };
            let options = WatermarkOptions {
                content,
                opacity,
                rotation_degrees: rotation,
                position: position.into(),
                margin,
                pages: pages.spec(),
            };
            (Operation::Watermark(options), vec![input])
        }

        Commands::Number {
            input,
            position,
            format,
            template,
            start,
            skip_first,
            skip_last,
            prefix,
            suffix,
            font_size,
            color,
            margin,
        } => {
            let format = match template {
                Some(template) => NumberFormat::Custom(template),
                None => format.into(),
            };
            let options = PageNumberOptions {
                position: position.into(),
                format,
                start_number: start,
                skip_first,
                skip_last,
                prefix,
                suffix,
                font_size,
                color: Rgb::from_hex(&color)?,
                margin,
            };
            (Operation::PageNumbers(options), vec![input])
        }

        Commands::Metadata {
            input,
            title,
            author,
            subject,
            keywords,
            creator,
            producer,
        } => {
            let options = MetadataOptions {
                title,
                author,
                subject,
                keywords,
                creator,
                producer,
            };
            (Operation::Metadata(options), vec![input])
        }

        Commands::Compress {
            input,
            level,
            keep_images,
            remove_metadata,
            remove_annotations,
            remove_bookmarks,
            remove_javascript,
        } => {
            let options = CompressionOptions {
                level: level.into(),
                remove_metadata,
                optimize_images: !keep_images,
                remove_annotations,
                remove_bookmarks,
                remove_javascript,
            };
            (Operation::Compress(options), vec![input])
        }

        Commands::Delete { input, pages } => {
            let options = DeleteOptions {
                pages: pages.spec(),
            };
            (Operation::Delete(options), vec![input])
        }

        Commands::Run { job, input } => {
            let operation = Operation::load(&job)
                .await
                .with_context(|| format!("Failed to load job {}", job.display()))?;
            (operation, input)
        }

        Commands::Info { .. } => return Ok(None),
    };

    Ok(Some(built))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Run the operation, wait for it, and write the packaged result
async fn execute(operation: Operation, inputs: &[PathBuf], output_dir: &Path) -> Result<PathBuf> {
    let mut sources = Vec::with_capacity(inputs.len());
    for path in inputs {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        sources.push(SourceFile::new(bytes, path.display().to_string()));
    }

    let kind = operation.kind();
    let (handle, mut updates) = spawn_run(RunRequest { operation, sources });
    log::debug!("Started {} ({})", handle.id(), kind);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancelling = false;
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(state) if state.status == RunStatus::Processing => {
                    log::info!("[{:>3}%] {}", state.progress, state.message);
                }
                Some(_) => {}
                None => break,
            },
            _ = &mut ctrl_c, if !cancelling => {
                log::warn!("Cancelling {}", handle.id());
                handle.cancel();
                cancelling = true;
            }
        }
    }

    let state = handle.finish().await;
    if state.status != RunStatus::Success {
        bail!("{} failed: {}", kind, state.message);
    }
    log::info!("{}", state.message);

    let stem = match inputs.first() {
        Some(first) => format!("{}-{}", kind.slug(), file_stem(first)),
        None => kind.slug().to_string(),
    };
    let package = package(state.outputs, &stem)?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let path = output_dir.join(&package.filename);
    tokio::fs::write(&path, &package.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

async fn show_info(input: &Path) -> Result<()> {
    let doc = pdf_pageops::load_pdf(input)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let metadata = pdf_pageops::codec::read_metadata(&doc);

    println!("{}", input.display());
    println!("  PDF version: {}", doc.version);
    println!("  Pages: {}", doc.get_pages().len());

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
        ("Created", &metadata.creation_date),
        ("Modified", &metadata.modification_date),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }

    for (number, &page_id) in doc.get_pages().iter() {
        let page_box = pdf_pageops::codec::page_box(&doc, page_id);
        let rotation = pdf_pageops::codec::rotation(&doc, page_id);
        if rotation == 0 {
            println!("  Page {number}: {:.0} x {:.0} pt", page_box.width, page_box.height);
        } else {
            println!(
                "  Page {number}: {:.0} x {:.0} pt, rotated {rotation}°",
                page_box.width, page_box.height
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::from_flags(cli.verbose, cli.quiet).init()?;

    if let Commands::Info { input } = &cli.command {
        return show_info(input).await;
    }

    let Some((operation, inputs)) = build_operation(cli.command).await? else {
        return Ok(());
    };

    if let Some(path) = &cli.save_job {
        operation
            .save(path)
            .await
            .with_context(|| format!("Failed to write job {}", path.display()))?;
        log::info!("Job saved → {}", path.display());
    }

    let written = execute(operation, &inputs, &cli.output_dir).await?;
    println!("{}", written.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(args: &[&str]) -> (Operation, Vec<PathBuf>) {
        let cli = Cli::try_parse_from(args).unwrap();
        build_operation(cli.command).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_merge_keeps_input_order() {
        let (operation, inputs) = parse(&["pdft", "merge", "b.pdf", "a.pdf"]).await;
        assert_eq!(operation, Operation::Merge(MergeOptions::default()));
        assert_eq!(inputs, vec![PathBuf::from("b.pdf"), PathBuf::from("a.pdf")]);
    }

    #[tokio::test]
    async fn test_extract_chunks() {
        let (operation, _) = parse(&[
            "pdft", "extract", "x.pdf", "-p", "1-6", "--mode", "chunks", "--chunk-size", "2",
        ])
        .await;
        assert_eq!(
            operation,
            Operation::Extract(ExtractOptions {
                pages: PageSpec::Explicit("1-6".to_string()),
                mode: ExtractMode::Chunks { size: 2 },
            })
        );
    }

    #[tokio::test]
    async fn test_rotate_range_and_negative_angle() {
        let (operation, _) = parse(&[
            "pdft", "rotate", "x.pdf", "--from", "2", "--to", "4", "--angle", "-90",
        ])
        .await;
        assert_eq!(
            operation,
            Operation::Rotate(RotateOptions {
                pages: PageSpec::Range { start: 2, end: 4 },
                angle_degrees: -90,
            })
        );
    }

    #[tokio::test]
    async fn test_number_template_overrides_format() {
        let (operation, _) = parse(&[
            "pdft", "number", "x.pdf", "--format", "roman", "--template", "{n}/{total}",
            "--skip-first", "--position", "top-right",
        ])
        .await;
        let Operation::PageNumbers(options) = operation else {
            panic!("expected page numbers");
        };
        assert_eq!(options.format, NumberFormat::Custom("{n}/{total}".to_string()));
        assert_eq!(options.position, NumberPosition::TopRight);
        assert!(options.skip_first);
        assert!(!options.skip_last);
    }

    #[tokio::test]
    async fn test_watermark_defaults_to_text() {
        let (operation, _) = parse(&["pdft", "watermark", "x.pdf", "--pages", "odd"]).await;
        let Operation::Watermark(options) = operation else {
            panic!("expected watermark");
        };
        assert_eq!(options.pages, PageSpec::Parity(pdf_pageops::Parity::Odd));
        assert!(matches!(
            options.content,
            WatermarkContent::Text { ref text, .. } if text == "CONFIDENTIAL"
        ));
    }

    #[tokio::test]
    async fn test_compress_flags() {
        let (operation, _) = parse(&[
            "pdft", "compress", "x.pdf", "--level", "maximum", "--keep-images",
            "--remove-javascript",
        ])
        .await;
        let Operation::Compress(options) = operation else {
            panic!("expected compress");
        };
        assert_eq!(options.level, CompressionLevel::Maximum);
        assert!(!options.optimize_images);
        assert!(options.remove_javascript);
        assert!(!options.remove_bookmarks);
    }

    #[test]
    fn test_rejects_conflicting_watermark_sources() {
        let result = Cli::try_parse_from([
            "pdft", "watermark", "x.pdf", "--text", "DRAFT", "--image", "logo.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_range_needs_both_ends() {
        assert!(Cli::try_parse_from(["pdft", "delete", "x.pdf", "--from", "2"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pdft", "info", "x.pdf", "-vv", "-o", "out"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
    }
}
