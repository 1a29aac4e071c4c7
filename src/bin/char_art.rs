use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::fs;
use std::time::Instant;

use pixelkit::cli::{normalize_art_args, ArtArgs};
use pixelkit::image_processing::art::{default_output_path, render_html};
use pixelkit::utils::{
    bytes_to_kb, error_println, format_duration, is_valid_hex_color, verbose_println,
    warn_println,
};

fn print_usage() {
    println!("Usage: char-art <image_path> [options]");
    println!("  --width 80     Character width (default: 80)");
    println!("  --mode blocks  Mode: blocks, ascii, dots, text");
    println!("  --output out.html  Output file");
    println!("  --text LOVE    Custom text for text mode");
    println!("  --bg #0f0f1a   Background color");
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let normalized = normalize_art_args(std::env::args_os());
    let args = ArtArgs::parse_from(normalized.args);

    let Some(image_path) = args.image_path.clone() else {
        print_usage();
        std::process::exit(1);
    };

    if !image_path.exists() {
        println!(
            "{}",
            style(format!("❌ File not found: {}", image_path.display()))
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    for token in &normalized.ignored {
        verbose_println(
            args.verbose,
            &format!("Ignoring argument: {}", token.to_string_lossy()),
        );
    }

    if !args.mode_is_known() {
        warn_println(&format!(
            "Unknown mode '{}', rendering with blocks",
            args.mode
        ));
    }
    if !is_valid_hex_color(&args.background) {
        warn_println(&format!(
            "Background '{}' is not a hex color; using it as given",
            args.background
        ));
    }

    let config = args.art_config();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&image_path));

    println!(
        "{}",
        style(format!("🖼  Converting: {}", image_path.display()))
            .bold()
            .blue()
    );
    println!("   Mode: {}, Width: {} chars", args.mode, config.width);

    let html = match render_html(&image_path, &config) {
        Ok(html) => html,
        Err(e) => {
            error_println(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    fs::write(&output, &html)
        .with_context(|| format!("Failed to write HTML: {}", output.display()))?;
    let size = fs::metadata(&output)
        .with_context(|| format!("Failed to read metadata: {}", output.display()))?
        .len();

    println!(
        "{}",
        style(format!(
            "✅ Saved to {} ({:.0} KB)",
            output.display(),
            bytes_to_kb(size)
        ))
        .green()
        .bold()
    );
    println!("   Open in browser to see the result!");
    verbose_println(
        args.verbose,
        &format!("Rendered in {}", format_duration(start_time.elapsed())),
    );

    Ok(())
}
