pub mod art;
pub mod encode;
pub mod resize;

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::{
    bytes_to_kb, display_name, get_file_extension, has_valid_extension, reduction_percent,
    verbose_println,
};
use encode::PixelGrid;
use resize::scaled_dimensions;

/// Source extensions the converter picks up, in scan order
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

pub const DEFAULT_QUALITY: u8 = 80;
pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_DELETE_ORIGINAL: bool = true;

#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// WebP quality, 1-100
    pub quality: u8,
    /// Wider images are scaled down to this width
    pub max_width: Option<u32>,
    /// Remove the source once its WebP sibling is on disk
    pub delete_original: bool,
    pub verbose: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_width: Some(DEFAULT_MAX_WIDTH),
            delete_original: DEFAULT_DELETE_ORIGINAL,
            verbose: false,
        }
    }
}

/// Outcome of one successful conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_bytes: u64,
    pub destination_bytes: u64,
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub deleted_original: bool,
}

impl ConversionReport {
    pub fn source_kb(&self) -> f64 {
        bytes_to_kb(self.source_bytes)
    }

    pub fn destination_kb(&self) -> f64 {
        bytes_to_kb(self.destination_bytes)
    }

    /// Size reduction in percent, 0 for an empty source
    pub fn saved_percent(&self) -> f64 {
        reduction_percent(self.source_bytes, self.destination_bytes)
    }

    /// Success line, plus the deletion line when the original was removed
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "  {} {} → {}  ({:.0}KB → {:.0}KB, {:.0}% smaller)",
            style("✓").green().bold(),
            display_name(&self.source),
            style(display_name(&self.destination)).cyan(),
            self.source_kb(),
            self.destination_kb(),
            self.saved_percent()
        )];

        if self.deleted_original {
            lines.push(format!(
                "    🗑 Deleted original: {}",
                style(display_name(&self.source)).dim()
            ));
        }
        lines
    }
}

pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Candidate files for a target path
    ///
    /// A file target is returned as-is and filtered later by [`Self::convert_image`].
    /// A directory is scanned one level deep, grouped by extension in
    /// [`SUPPORTED_EXTENSIONS`] order; within a group, lowercase extensions come first and
    /// each half is sorted by file name.
    pub fn discover_images(&self, target: &Path) -> Result<Vec<PathBuf>> {
        if target.is_file() {
            return Ok(vec![target.to_path_buf()]);
        }

        verbose_println(
            self.config.verbose,
            &format!("Scanning directory: {}", target.display()),
        );

        let mut files = Vec::new();
        let walker = WalkDir::new(target)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file()
                && has_valid_extension(entry.path(), &SUPPORTED_EXTENSIONS)
            {
                files.push(entry.into_path());
            }
        }

        let mut ordered = Vec::with_capacity(files.len());
        for ext in SUPPORTED_EXTENSIONS {
            let (lower, other): (Vec<&PathBuf>, Vec<&PathBuf>) = files
                .iter()
                .filter(|path| get_file_extension(path).as_deref() == Some(ext))
                .partition(|path| path.extension().and_then(|e| e.to_str()) == Some(ext));
            ordered.extend(lower.into_iter().cloned());
            ordered.extend(other.into_iter().cloned());
        }

        verbose_println(
            self.config.verbose,
            &format!("Found {} candidate image(s)", ordered.len()),
        );
        Ok(ordered)
    }

    /// Convert one file to a sibling `.webp`
    ///
    /// Returns `Ok(None)` for unsupported extensions. Decode, encode and filesystem failures
    /// are returned as errors.
    pub fn convert_image(&self, src: &Path) -> Result<Option<ConversionReport>> {
        if !has_valid_extension(src, &SUPPORTED_EXTENSIONS) {
            verbose_println(
                self.config.verbose,
                &format!("Skipping unsupported file: {}", src.display()),
            );
            return Ok(None);
        }

        let dest = src.with_extension("webp");

        let img = image::open(src)
            .with_context(|| format!("Failed to open image: {}", src.display()))?;
        let mut grid = PixelGrid::from_dynamic(img);

        let (width, height) = grid.dimensions();
        let (new_width, new_height) = scaled_dimensions(width, height, self.config.max_width);
        if (new_width, new_height) != (width, height) {
            verbose_println(
                self.config.verbose,
                &format!(
                    "Resizing {} from {}x{} to {}x{}",
                    display_name(src),
                    width,
                    height,
                    new_width,
                    new_height
                ),
            );
            grid = grid.resize(new_width, new_height)?;
        }

        let webp_data = grid
            .encode_webp(self.config.quality)
            .with_context(|| format!("Failed to encode WebP for {}", src.display()))?;
        fs::write(&dest, &webp_data)
            .with_context(|| format!("Failed to write WebP: {}", dest.display()))?;

        let source_bytes = fs::metadata(src)
            .with_context(|| format!("Failed to read metadata: {}", src.display()))?
            .len();
        let destination_bytes = fs::metadata(&dest)
            .with_context(|| format!("Failed to read metadata: {}", dest.display()))?
            .len();

        let mut deleted_original = false;
        if self.config.delete_original {
            if destination_bytes == 0 {
                return Err(anyhow::anyhow!(
                    "Refusing to delete {}: {} is empty",
                    src.display(),
                    dest.display()
                ));
            }
            fs::remove_file(src)
                .with_context(|| format!("Failed to delete original: {}", src.display()))?;
            deleted_original = true;
        }

        Ok(Some(ConversionReport {
            source: src.to_path_buf(),
            destination: dest,
            source_bytes,
            destination_bytes,
            width: new_width,
            height: new_height,
            has_alpha: grid.has_alpha(),
            deleted_original,
        }))
    }

    /// Convert candidates in order, stopping at the first failure
    ///
    /// `on_converted` runs after each successful conversion. Returns how many files were
    /// converted; skipped files are not counted.
    pub fn convert_all<F>(&self, candidates: &[PathBuf], mut on_converted: F) -> Result<usize>
    where
        F: FnMut(&ConversionReport),
    {
        let mut converted = 0;
        for candidate in candidates {
            if let Some(report) = self.convert_image(candidate)? {
                converted += 1;
                on_converted(&report);
            }
        }
        Ok(converted)
    }
}
