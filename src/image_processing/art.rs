//! Character-art rendering: one resized pixel becomes one colored glyph in an HTML page.

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter, EnumString};

use super::resize::resize_rgb;

/// Brightness ramp from darkest (space) to brightest
pub const ASCII_RAMP: &[u8] = b" .,:-=+*#%@";
pub const BLOCK_GLYPH: &str = "██";
pub const DOT_GLYPH: &str = "●&thinsp;";

pub const DEFAULT_WIDTH: u32 = 80;
pub const DEFAULT_TEXT: &str = "LOVE";
pub const DEFAULT_BACKGROUND: &str = "#0f0f1a";

/// Character cells are roughly twice as tall as they are wide
const CELL_ASPECT_CORRECTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// Two full-block characters per cell
    #[default]
    Blocks,
    /// Doubled character from the brightness ramp
    Ascii,
    /// A single dot with a thin trailing space
    Dots,
    /// The custom text, one character per cell
    Text,
}

impl RenderMode {
    /// Exact, case-sensitive lookup by name
    pub fn lookup(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct ArtConfig {
    pub width: u32,
    pub mode: RenderMode,
    pub text: String,
    pub background: String,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            mode: RenderMode::Blocks,
            text: DEFAULT_TEXT.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Luma approximation used to pick ASCII glyphs (0.0 - 255.0)
pub fn perceived_brightness(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

/// Ramp character for a brightness value, scaled linearly over the ramp
pub fn ascii_glyph(brightness: f64) -> char {
    let last = ASCII_RAMP.len() - 1;
    let idx = (brightness / 255.0 * last as f64) as usize;
    ASCII_RAMP[idx.min(last)] as char
}

/// Rows of characters for a `width`-wide rendering of a `src_width`x`src_height` image
pub fn char_grid_height(width: u32, src_width: u32, src_height: u32) -> u32 {
    if src_width == 0 {
        return 1;
    }
    let aspect = src_height as f64 / src_width as f64;
    let rows = (width as f64 * aspect * CELL_ASPECT_CORRECTION).round() as u32;
    rows.max(1)
}

/// `{stem}-art.html` in the current directory
pub fn default_output_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    PathBuf::from(format!("{}-art.html", stem))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Picks the glyph for each cell; the text cursor runs across row boundaries
struct GlyphPicker {
    mode: RenderMode,
    text: Vec<String>,
    cursor: usize,
}

impl GlyphPicker {
    fn new(config: &ArtConfig) -> Result<Self> {
        let text: Vec<String> = config
            .text
            .chars()
            .map(|c| escape_html(&c.to_string()))
            .collect();

        if config.mode == RenderMode::Text && text.is_empty() {
            return Err(anyhow::anyhow!("Text mode needs a non-empty --text value"));
        }

        Ok(Self {
            mode: config.mode,
            text,
            cursor: 0,
        })
    }

    fn next(&mut self, r: u8, g: u8, b: u8) -> String {
        match self.mode {
            RenderMode::Blocks => BLOCK_GLYPH.to_string(),
            RenderMode::Ascii => {
                let c = ascii_glyph(perceived_brightness(r, g, b));
                let glyph = escape_html(&c.to_string());
                glyph.repeat(2)
            }
            RenderMode::Dots => DOT_GLYPH.to_string(),
            RenderMode::Text => {
                let glyph = self.text[self.cursor % self.text.len()].clone();
                self.cursor += 1;
                glyph
            }
        }
    }
}

/// One HTML line per pixel row of an image already sized to the character grid
pub fn render_rows(grid: &RgbImage, config: &ArtConfig) -> Result<Vec<String>> {
    let mut picker = GlyphPicker::new(config)?;
    let row_len = grid.width() as usize * 3;
    if row_len == 0 {
        return Ok(Vec::new());
    }

    let rows = grid
        .as_raw()
        .chunks_exact(row_len)
        .map(|row| {
            let mut line = String::with_capacity(row_len * 12);
            for px in row.chunks_exact(3) {
                let (r, g, b) = (px[0], px[1], px[2]);
                line.push_str(&format!(
                    "<span style=\"color:#{:02x}{:02x}{:02x}\">{}</span>",
                    r,
                    g,
                    b,
                    picker.next(r, g, b)
                ));
            }
            line
        })
        .collect();

    Ok(rows)
}

/// Wrap rendered rows in the standalone page
pub fn html_document(title: &str, background: &str, rows: &[String]) -> String {
    let lines_html = rows.join("<br>\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>HTML Art — {title}</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{
    background: {background};
    display: flex;
    justify-content: center;
    align-items: center;
    min-height: 100vh;
    padding: 20px;
    overflow-x: auto;
  }}
  .art {{
    font-family: "Courier New", monospace;
    font-size: 6px;
    line-height: 7px;
    letter-spacing: 0px;
    white-space: nowrap;
    user-select: none;
  }}
  @media (max-width: 768px) {{
    .art {{ font-size: 3px; line-height: 3.5px; }}
  }}
  @media (min-width: 1200px) {{
    .art {{ font-size: 8px; line-height: 9px; }}
  }}
</style>
</head>
<body>
<div class="art">
{lines_html}
</div>
</body>
</html>"#,
        title = escape_html(title),
        background = background,
        lines_html = lines_html,
    )
}

/// Decode `image_path`, fit it to the character grid and build the page
pub fn render_html(image_path: &Path, config: &ArtConfig) -> Result<String> {
    let img = image::open(image_path)
        .with_context(|| format!("Failed to open image: {}", image_path.display()))?
        .into_rgb8();

    let (src_width, src_height) = img.dimensions();
    let width = config.width.max(1);
    let height = char_grid_height(width, src_width, src_height);

    let grid = resize_rgb(&img, width, height)?;
    let rows = render_rows(&grid, config)?;

    let title = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(html_document(&title, &config.background, &rows))
}
