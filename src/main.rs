use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use webpbatch::{
    format_file_size, format_signed_size, read_output, BatchResponse, Cli, Commands,
    ConversionReport, DirectoryScanner, UploadForm, UploadService, UploadedFile,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Scan {
            root,
            quality,
            threads,
        } => process_scan(root, quality, threads),
        Commands::Convert {
            files,
            output,
            holding,
            quality,
            move_originals,
            skip_existing,
            threads,
            json,
        } => {
            let form = UploadForm {
                files: files.iter().map(UploadedFile::from_local).collect(),
                quality,
                move_originals: Some(move_originals.to_string()),
                skip_existing: Some(skip_existing.to_string()),
            };
            process_convert(form, output, holding, threads, json)
        }
        Commands::Fetch { name, output, dest } => process_fetch(&name, output, dest),
    }
}

fn process_scan(root: PathBuf, quality: u8, threads: usize) -> Result<()> {
    let scanner = DirectoryScanner::new(&root)
        .with_quality(quality)
        .with_threads(threads)
        .with_progress(create_progress_bar());

    let report = scanner
        .run()
        .with_context(|| format!("Image conversion failed in {}", root.display()))?;

    print_summary(&report);
    Ok(())
}

fn process_convert(
    form: UploadForm,
    output: PathBuf,
    holding: PathBuf,
    threads: usize,
    json: bool,
) -> Result<()> {
    let service = UploadService::new(output, holding).with_threads(threads);
    let response = service.convert(form);

    if json {
        println!("{}", response.to_json().context("Failed to serialize response")?);
    } else if let Some(report) = response.report() {
        print_summary(report);
    }

    match response {
        BatchResponse::Completed { .. } => Ok(()),
        BatchResponse::Failed {
            message, status, ..
        } => anyhow::bail!("Conversion failed ({}): {}", status, message),
    }
}

fn process_fetch(name: &str, output: PathBuf, dest: Option<PathBuf>) -> Result<()> {
    let bytes = read_output(&output, name)
        .with_context(|| format!("Cannot fetch {} from {}", name, output.display()))?;

    let dest = dest.unwrap_or_else(|| Path::new(name).to_path_buf());
    std::fs::write(&dest, &bytes)
        .with_context(|| format!("Cannot write {}", dest.display()))?;

    println!("Saved {} ({}) to {}", name, format_file_size(bytes.len() as u64), dest.display());
    Ok(())
}

fn print_summary(report: &ConversionReport) {
    println!("=== Conversion Summary ===");
    println!("Converted: {}", report.converted());
    println!("Skipped:   {}", report.skipped());
    println!("Failed:    {}", report.failed());
    println!(
        "Size:      {} -> {}",
        format_file_size(report.total_original_size()),
        format_file_size(report.total_webp_size())
    );
    println!(
        "Saved:     {} ({:.1}%)",
        format_signed_size(report.space_saved()),
        report.savings_percent()
    );

    for file in report.files().iter().filter(|f| f.webp_name().is_none()) {
        println!("  {} [{:?}]: {}", file.original_name(), file.status(), file.message());
    }
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
