//! ecgpdf CLI - AliveCor report inspection and ECG recovery

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use ecgpdf::ecg::{self, DEFAULT_REPOSITORY};
use ecgpdf::render::{self, PageSummary};
use ecgpdf::{Document, EcgOptions, JsonFormat, OpenOptions, Recording, ReportSummary};

#[derive(Parser)]
#[command(name = "ecgpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Inspect AliveCor ECG report PDFs and recover their recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a page dictionary and its boxes
    Page {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Print a JSON summary instead
        #[arg(long)]
        json: bool,
    },

    /// Show or dump a page's content stream
    Content {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Write the decoded payload to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// List decoded operators instead of the payload summary
        #[arg(long)]
        ops: bool,
    },

    /// Extract page text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page index (0-based)
        #[arg(short, long, default_value = "0", conflicts_with = "all")]
        index: usize,

        /// Extract every page
        #[arg(long)]
        all: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Recover ECG recordings from report files
    Ecg {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Repository used to build recording URIs
        #[arg(long, env = "ECGPDF_REPOSITORY", default_value = DEFAULT_REPOSITORY)]
        repository: String,

        /// Chart time scale in mm/s
        #[arg(long, default_value = "25", value_parser = positive_scale)]
        time_scale: f64,

        /// Chart voltage scale in mm/mV
        #[arg(long, default_value = "10", value_parser = positive_scale)]
        voltage_scale: f64,

        /// Page holding the rhythm strip (0-based)
        #[arg(long, default_value = "0")]
        page: usize,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Recording description with signals and beat events
    Json,
    /// Sample and beat tables
    Csv,
}

fn positive_scale(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("scale must be greater than zero, got {}", s))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Page { input, index, json } => cmd_page(&input, index, json),
        Commands::Content {
            input,
            index,
            output,
            ops,
        } => cmd_content(&input, index, output.as_deref(), ops),
        Commands::Text {
            input,
            index,
            all,
            output,
        } => cmd_text(&input, index, all, output.as_deref()),
        Commands::Ecg {
            inputs,
            output,
            format,
            repository,
            time_scale,
            voltage_scale,
            page,
        } => {
            let options = EcgOptions::new()
                .with_time_scale(time_scale)
                .with_voltage_scale(voltage_scale)
                .with_page(page);
            cmd_ecg(&inputs, &output, format, &repository, &options)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::open_with_options(input, OpenOptions::new().lenient())?;
    let metadata = doc.metadata();

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    let Ok(page) = doc.page(0) else {
        return Ok(());
    };

    println!();
    println!("{}", "Report".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if let Ok(media_box) = page.media_box() {
        let (w, h) = media_box.size_mm();
        println!("{}: {} ({:.0} x {:.0} mm)", "Page size".bold(), media_box, w, h);
    }

    match page.extract_text() {
        Ok(text) => {
            let summary = ReportSummary::from_text(&text);
            for (label, value) in &summary.fields {
                println!("{}: {}", label.bold(), value);
            }
            if let Some(bpm) = summary.heart_rate_bpm {
                println!("{}: {} bpm", "Heart rate".bold(), bpm);
            }
        }
        Err(e) => log::warn!("Could not read report text: {}", e),
    }

    Ok(())
}

fn cmd_page(input: &Path, index: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::open(input)?;
    let page = doc.page(index)?;

    if json {
        let summary = PageSummary::from_page(&page)?;
        println!("{}", render::to_json(&summary, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Page".cyan().bold(),
        page.number(),
        format!("({})", page.id()).dimmed()
    );
    println!("{}", page.dictionary()?);
    println!("{}: {}", "MediaBox".bold(), page.media_box()?);
    println!("{}: {}", "CropBox".bold(), page.crop_box()?);

    Ok(())
}

fn cmd_content(
    input: &Path,
    index: usize,
    output: Option<&Path>,
    ops: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::open(input)?;
    let page = doc.page(index)?;
    let contents = page
        .contents()?
        .ok_or_else(|| format!("page {} has no content stream", page.number()))?;

    if ops {
        for op in contents.operations()? {
            let operands: Vec<String> = op.operands.iter().map(|v| v.to_string()).collect();
            if operands.is_empty() {
                println!("{}", op.operator.green());
            } else {
                println!("{} {}", operands.join(" "), op.operator.green());
            }
        }
        return Ok(());
    }

    let data = contents.data()?;

    if let Some(path) = output {
        fs::write(path, &data)?;
        println!("{} {}", "Saved to".green(), path.display());
        return Ok(());
    }

    let parts: Vec<String> = contents.parts().iter().map(|p| p.to_string()).collect();
    println!("{}: {}", "Streams".bold(), parts.join(", "));
    println!("{}: {}", "Filters".bold(), contents.filters()?.join(", "));
    println!("{}: {} bytes", "Encoded".bold(), contents.encoded_len()?);
    println!("{}: {} bytes", "Decoded".bold(), data.len());

    let prefix = &data[..data.len().min(80)];
    println!("{}", String::from_utf8_lossy(prefix).dimmed());

    Ok(())
}

fn cmd_text(
    input: &Path,
    index: usize,
    all: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient mode so one unreadable page does not hide the rest
    let doc = Document::open_with_options(input, OpenOptions::new().lenient())?;

    let text = if all {
        doc.extract_text_all()?.join("\n\n")
    } else {
        doc.page(index)?.extract_text()?
    };

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_ecg(
    inputs: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
    repository: &str,
    options: &EcgOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Scanning {} report(s)...", inputs.len()));

    let results = ecg::extract_ecg_batch(inputs, options);
    pb.finish_and_clear();

    let mut failed = 0;
    for (path, result) in results {
        let strip = match result {
            Ok(strip) => strip,
            Err(e) => {
                eprintln!("{} {}: {}", "Failed".red(), path.display(), e);
                failed += 1;
                continue;
            }
        };

        let stem = ecg::recording_name(&path);

        match format {
            OutputFormat::Json => {
                let recording = Recording::from_ecg(&strip, ecg::recording_uri(repository, &path));
                let out = output_dir.join(format!("{}.json", stem));
                fs::write(&out, render::to_json(&recording, JsonFormat::Pretty)?)?;
                println!("{} {}", "Saved to".green(), out.display());
            }
            OutputFormat::Csv => {
                let samples = output_dir.join(format!("{}.csv", stem));
                render::write_samples_csv(&strip, fs::File::create(&samples)?)?;
                let beats = output_dir.join(format!("{}_beats.csv", stem));
                render::write_beats_csv(&strip, fs::File::create(&beats)?)?;
                println!("{} {}", "Saved to".green(), samples.display());
                println!("{} {}", "Saved to".green(), beats.display());
            }
        }

        let rate = strip
            .mean_heart_rate()
            .map(|r| format!(", {:.0} bpm", r))
            .unwrap_or_default();
        println!(
            "  {} {} samples, {} beats, {:.0} s{}",
            "└─".dimmed(),
            strip.sample_count(),
            strip.beat_count(),
            strip.duration(),
            rate
        );
    }

    if failed > 0 {
        return Err(format!("{} of {} report(s) failed", failed, inputs.len()).into());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "ecgpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("AliveCor ECG report reader");
    println!();
    println!("License: MIT");
}
