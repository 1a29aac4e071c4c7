use anyhow::Result;
use clap::Parser;
use console::{style, Term};
use indicatif::ProgressBar;
use std::time::Instant;

use pixelkit::cli::ConvertArgs;
use pixelkit::image_processing::ConversionEngine;
use pixelkit::json_output::JsonMessage;
use pixelkit::utils::{create_progress_bar, error_println, format_duration};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = ConvertArgs::parse();
    let target = args.target();
    let config = args.conversion_config();

    if !target.exists() {
        let message = format!("Path not found: {}", target.display());
        if args.json {
            JsonMessage::Error { message }.emit();
        } else {
            println!("{}", style(format!("❌ {}", message)).red().bold());
        }
        std::process::exit(1);
    }

    if args.json {
        JsonMessage::Start {
            target: target.display().to_string(),
            quality: config.quality,
            max_width: config.max_width,
            delete_original: config.delete_original,
        }
        .emit();
    } else {
        let max_width = config
            .max_width
            .map(|w| w.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "{}",
            style(format!(
                "🖼  Converting images to WebP (quality={}, max_width={})",
                config.quality, max_width
            ))
            .bold()
            .blue()
        );
        println!("📂 Target: {}", target.display());
        println!();
    }

    let delete_original = config.delete_original;
    let engine = ConversionEngine::new(config);
    let candidates = engine.discover_images(&target)?;

    let progress = if args.json || target.is_file() || !Term::stdout().is_term() {
        ProgressBar::hidden()
    } else {
        let pb = create_progress_bar(candidates.len() as u64);
        pb.set_message("Converting");
        pb
    };

    let result = engine.convert_all(&candidates, |report| {
        progress.inc(1);
        if args.json {
            JsonMessage::converted(report).emit();
            return;
        }
        for line in report.summary_lines() {
            if progress.is_hidden() {
                println!("{}", line);
            } else {
                progress.println(line);
            }
        }
    });

    let converted = match result {
        Ok(converted) => {
            progress.finish_and_clear();
            converted
        }
        Err(e) => {
            progress.abandon();
            if args.json {
                JsonMessage::Error {
                    message: format!("{:#}", e),
                }
                .emit();
            } else {
                error_println(&format!("{:#}", e));
            }
            std::process::exit(1);
        }
    };

    if args.json {
        JsonMessage::Summary {
            converted,
            duration_secs: start_time.elapsed().as_secs_f64(),
        }
        .emit();
        return Ok(());
    }

    if converted == 0 {
        println!(
            "{}",
            style("⚠  No supported images found. (Supported: JPEG, PNG, BMP, TIFF)").yellow()
        );
    } else {
        println!();
        println!(
            "{}",
            style(format!("✅ Done! Converted {} image(s) to WebP.", converted))
                .bold()
                .green()
        );
        if !delete_original {
            println!(
                "💡 Originals kept. Run without --keep-originals to remove them after converting."
            );
        }
        println!(
            "  Total time: {}",
            style(format_duration(start_time.elapsed())).dim()
        );
    }

    Ok(())
}
