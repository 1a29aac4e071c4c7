use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::image_processing::art::{
    ArtConfig, RenderMode, DEFAULT_BACKGROUND, DEFAULT_TEXT, DEFAULT_WIDTH,
};
use crate::image_processing::{ConversionConfig, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};

/// Directory converted when no path is given, relative to the working directory
pub const DEFAULT_IMAGES_DIR: &str = "public/images";

#[derive(Parser, Debug)]
#[command(
    name = "webp-convert",
    version,
    about = "Convert JPEG/PNG/BMP/TIFF images to WebP",
    long_about = "
Batch WebP converter

Converts a single image, or every supported image directly inside a directory, to a WebP file
next to the source (same name, .webp extension). Wide images are scaled down to a maximum width
with a Lanczos3 filter. Images with an alpha channel keep it.

By default originals are DELETED after their WebP copy is written. Pass --keep-originals to
keep them.

Example Usage:
  # Convert everything in public/images/
  webp-convert

  # Convert a folder
  webp-convert path/to/folder

  # Convert one file, keep the original, higher quality
  webp-convert photo.jpg --quality 90 --keep-originals

  # Machine-readable output
  webp-convert photos/ --json"
)]
pub struct ConvertArgs {
    /// Image file or directory to convert (default: public/images)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// WebP quality (1-100)
    #[arg(
        short = 'q',
        long = "quality",
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        value_name = "N"
    )]
    pub quality: u8,

    /// Scale images wider than this down to this width
    #[arg(
        long = "max-width",
        default_value_t = DEFAULT_MAX_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..),
        value_name = "PX"
    )]
    pub max_width: u32,

    /// Keep the original size regardless of width
    #[arg(long = "no-resize")]
    pub no_resize: bool,

    /// Keep source files after converting
    #[arg(long = "keep-originals")]
    pub keep_originals: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Emit JSON lines instead of styled text
    #[arg(long = "json")]
    pub json: bool,
}

impl ConvertArgs {
    pub fn target(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR))
    }

    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig {
            quality: self.quality,
            max_width: if self.no_resize {
                None
            } else {
                Some(self.max_width)
            },
            delete_original: !self.keep_originals,
            verbose: self.verbose && !self.json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "char-art",
    version,
    args_override_self = true,
    about = "Render an image as colored character art in an HTML page",
    long_about = "
Character-art renderer

Resizes an image to a grid of characters and writes a standalone HTML page where every
character is colored like the pixel it stands for.

Modes:
  blocks  Two block characters per cell (default, closest to the photo)
  ascii   Characters from ' .,:-=+*#%@' picked by brightness
  dots    A dot per cell
  text    The --text string repeated across the picture

Unknown modes fall back to blocks. Unknown options are ignored.

Example Usage:
  char-art photo.webp
  char-art photo.webp --width 100 --mode ascii
  char-art photo.webp --mode text --text HELLO --bg '#000000' --output hello.html"
)]
pub struct ArtArgs {
    /// Image to render
    #[arg(value_name = "IMAGE")]
    pub image_path: Option<PathBuf>,

    /// Width in characters
    #[arg(
        long = "width",
        default_value_t = DEFAULT_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..),
        value_name = "N"
    )]
    pub width: u32,

    /// Rendering mode: blocks, ascii, dots, text
    #[arg(long = "mode", default_value = "blocks", allow_hyphen_values = true)]
    pub mode: String,

    /// Output HTML file (default: <image stem>-art.html)
    #[arg(long = "output", value_name = "FILE", allow_hyphen_values = true)]
    pub output: Option<PathBuf>,

    /// Text for "text" mode
    #[arg(long = "text", default_value = DEFAULT_TEXT, allow_hyphen_values = true)]
    pub text: String,

    /// Page background color
    #[arg(
        long = "bg",
        default_value = DEFAULT_BACKGROUND,
        value_name = "COLOR",
        allow_hyphen_values = true
    )]
    pub background: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl ArtArgs {
    /// Build the render configuration; unknown mode names become blocks
    pub fn art_config(&self) -> ArtConfig {
        ArtConfig {
            width: self.width,
            mode: RenderMode::lookup(&self.mode).unwrap_or_default(),
            text: self.text.clone(),
            background: self.background.clone(),
        }
    }

    pub fn mode_is_known(&self) -> bool {
        RenderMode::lookup(&self.mode).is_some()
    }
}

const ART_VALUE_FLAGS: [&str; 5] = ["--width", "--mode", "--output", "--text", "--bg"];
const ART_SWITCHES: [&str; 2] = ["-v", "--verbose"];
const PASSTHROUGH_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

/// Renderer argv after dropping what the renderer does not understand
#[derive(Debug, Default, PartialEq)]
pub struct NormalizedArgs {
    pub args: Vec<OsString>,
    pub ignored: Vec<OsString>,
}

/// Rewrite raw renderer arguments into something clap accepts
///
/// The first argument after the program name is always the image path. After it, each known
/// option consumes the following token as its value; an option with no following token and
/// any unknown token are dropped one at a time. The image path goes last, behind `--`, so a
/// path starting with `-` stays positional.
pub fn normalize_art_args<I, T>(raw: I) -> NormalizedArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut raw = raw.into_iter().map(Into::into);
    let mut normalized = NormalizedArgs::default();

    let program = raw.next().unwrap_or_else(|| OsString::from("char-art"));
    normalized.args.push(program);

    let Some(image_path) = raw.next() else {
        return normalized;
    };
    if PASSTHROUGH_FLAGS.iter().any(|flag| image_path == *flag) {
        normalized.args.push(image_path);
        return normalized;
    }

    let rest: Vec<OsString> = raw.collect();
    let mut i = 0;
    while i < rest.len() {
        let token = &rest[i];
        let is_value_flag = ART_VALUE_FLAGS.iter().any(|flag| token == *flag);

        if is_value_flag && i + 1 < rest.len() {
            normalized.args.push(token.clone());
            normalized.args.push(rest[i + 1].clone());
            i += 2;
        } else if ART_SWITCHES.iter().any(|flag| token == *flag)
            || PASSTHROUGH_FLAGS.iter().any(|flag| token == *flag)
        {
            normalized.args.push(token.clone());
            i += 1;
        } else {
            normalized.ignored.push(token.clone());
            i += 1;
        }
    }

    normalized.args.push(OsString::from("--"));
    normalized.args.push(image_path);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(args: &[&str]) -> ArtArgs {
        ArtArgs::try_parse_from(normalize_art_args(args.iter().copied()).args).unwrap()
    }

    #[test]
    fn test_convert_defaults() {
        let args = ConvertArgs::try_parse_from(["webp-convert"]).unwrap();
        assert_eq!(args.target(), PathBuf::from("public/images"));

        let config = args.conversion_config();
        assert_eq!(config.quality, 80);
        assert_eq!(config.max_width, Some(1200));
        assert!(config.delete_original);
    }

    #[test]
    fn test_convert_flags() {
        let args = ConvertArgs::try_parse_from([
            "webp-convert",
            "photos",
            "--quality",
            "65",
            "--no-resize",
            "--keep-originals",
        ])
        .unwrap();
        assert_eq!(args.target(), PathBuf::from("photos"));

        let config = args.conversion_config();
        assert_eq!(config.quality, 65);
        assert_eq!(config.max_width, None);
        assert!(!config.delete_original);
    }

    #[test]
    fn test_convert_quality_range() {
        assert!(ConvertArgs::try_parse_from(["webp-convert", "-q", "0"]).is_err());
        assert!(ConvertArgs::try_parse_from(["webp-convert", "-q", "101"]).is_err());
        assert!(ConvertArgs::try_parse_from(["webp-convert", "-q", "100"]).is_ok());
    }

    #[test]
    fn test_art_defaults() {
        let args = art(&["char-art", "cat.jpg"]);
        assert_eq!(args.image_path, Some(PathBuf::from("cat.jpg")));

        let config = args.art_config();
        assert_eq!(config.width, 80);
        assert_eq!(config.mode, RenderMode::Blocks);
        assert_eq!(config.text, "LOVE");
        assert_eq!(config.background, "#0f0f1a");
        assert!(args.output.is_none());
    }

    #[test]
    fn test_art_all_flags() {
        let args = art(&[
            "char-art", "cat.jpg", "--width", "40", "--mode", "ascii", "--output", "out.html",
            "--text", "HI", "--bg", "#000000",
        ]);
        assert_eq!(args.width, 40);
        assert_eq!(args.art_config().mode, RenderMode::Ascii);
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.text, "HI");
        assert_eq!(args.background, "#000000");
    }

    #[test]
    fn test_art_unknown_flags_skip_one_token() {
        let normalized = normalize_art_args(["char-art", "cat.jpg", "--fancy", "--width", "20"]);
        assert_eq!(normalized.ignored, vec![OsString::from("--fancy")]);

        let args = ArtArgs::try_parse_from(normalized.args).unwrap();
        assert_eq!(args.width, 20);

        // The value after an unknown flag is itself just another unknown token
        let args = art(&["char-art", "cat.jpg", "--fancy", "yes", "--mode", "dots"]);
        assert_eq!(args.art_config().mode, RenderMode::Dots);
    }

    #[test]
    fn test_art_trailing_flag_without_value_is_dropped() {
        let normalized = normalize_art_args(["char-art", "cat.jpg", "--width"]);
        assert_eq!(normalized.ignored, vec![OsString::from("--width")]);
        assert_eq!(ArtArgs::try_parse_from(normalized.args).unwrap().width, 80);
    }

    #[test]
    fn test_art_repeated_options_last_wins() {
        let args = art(&["char-art", "cat.jpg", "--width", "10", "--width", "20"]);
        assert_eq!(args.width, 20);

        let args = art(&["char-art", "cat.jpg", "--mode", "dots", "--mode", "ascii", "-v", "-v"]);
        assert_eq!(args.art_config().mode, RenderMode::Ascii);
        assert!(args.verbose);
    }

    #[test]
    fn test_art_unknown_mode_falls_back_to_blocks() {
        let args = art(&["char-art", "cat.jpg", "--mode", "sparkles"]);
        assert!(!args.mode_is_known());
        assert_eq!(args.art_config().mode, RenderMode::Blocks);
    }

    #[test]
    fn test_art_hyphen_values_and_paths() {
        let args = art(&["char-art", "-odd.png", "--text", "-=-"]);
        assert_eq!(args.image_path, Some(PathBuf::from("-odd.png")));
        assert_eq!(args.text, "-=-");
    }

    #[test]
    fn test_art_missing_image_path() {
        let args = art(&["char-art"]);
        assert!(args.image_path.is_none());
    }
}
