//! # Scrawl CLI
//!
//! Command-line interface for captcha generation.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a 150x60 PNG and print its secret
//! scrawl generate --out captcha.png
//!
//! # Arithmetic captcha as JPEG, reproducible
//! scrawl generate --math --seed 42 --out captcha.jpg
//!
//! # Start from a JSON config, override the line count
//! scrawl generate --config captcha.json --lines 4 --out captcha.gif
//!
//! # Check an answer (exit status 0 on match)
//! scrawl verify Kd7mZa kd7mza
//! ```
//!
//! Set `RUST_LOG=scrawl=debug` to trace the pipeline stages.

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scrawl::{
    Captcha, CaptchaConfig, CaptchaError, CodeKind, ColorSpec, FontSource, ImageFormat,
    verify_code,
};

/// Scrawl - Captcha image generator
#[derive(Parser, Debug)]
#[command(name = "scrawl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a captcha image and print its secret
    Generate {
        /// JSON configuration file; flags below override its values
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output file (format inferred from extension unless --format is given)
        #[arg(long, value_name = "FILE", default_value = "captcha.png")]
        out: PathBuf,

        /// Output format: png, jpeg or gif
        #[arg(long)]
        format: Option<ImageFormat>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Supersampling factor
        #[arg(long)]
        scale: Option<u32>,

        /// Number of wavy lines
        #[arg(long)]
        lines: Option<u32>,

        /// Noise level (0-10)
        #[arg(long)]
        noise: Option<u32>,

        /// Distortion strength (0 disables)
        #[arg(long)]
        perturbation: Option<f64>,

        /// Code length for string captchas
        #[arg(long)]
        length: Option<usize>,

        /// Use an arithmetic expression instead of a random string
        #[arg(long)]
        math: bool,

        /// TTF/OTF font file (defaults to the built-in bitmap font)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Background image (gif, jpeg or png)
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,

        /// Small text in the bottom-right corner
        #[arg(long)]
        signature: Option<String>,

        /// Background color (#RGB or #RRGGBB)
        #[arg(long)]
        background_color: Option<ColorSpec>,

        /// Code text color
        #[arg(long)]
        text_color: Option<ColorSpec>,

        /// Line color
        #[arg(long)]
        line_color: Option<ColorSpec>,

        /// Noise color
        #[arg(long)]
        noise_color: Option<ColorSpec>,

        /// Signature color
        #[arg(long)]
        signature_color: Option<ColorSpec>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compare a stored secret with an entered answer
    Verify {
        stored: String,
        entered: String,

        /// Require matching case
        #[arg(long)]
        case_sensitive: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, CaptchaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            out,
            format,
            width,
            height,
            scale,
            lines,
            noise,
            perturbation,
            length,
            math,
            font,
            background,
            signature,
            background_color,
            text_color,
            line_color,
            noise_color,
            signature_color,
            seed,
        } => {
            let mut cfg = match config {
                Some(path) => CaptchaConfig::from_json_file(&path)?,
                None => CaptchaConfig::new(150, 60),
            };

            // Flags override the file.
            if let Some(w) = width {
                cfg.image_width = w;
            }
            if let Some(h) = height {
                cfg.image_height = h;
            }
            if let Some(s) = scale {
                cfg.scale = s;
            }
            if let Some(n) = lines {
                cfg.num_lines = n;
            }
            if let Some(n) = noise {
                cfg.noise_level = n;
            }
            if let Some(p) = perturbation {
                cfg.perturbation = p;
            }
            if let Some(n) = length {
                cfg.code_length = n;
            }
            if math {
                cfg.code_type = CodeKind::Math;
            }
            if let Some(path) = font {
                cfg.font = FontSource::File(path);
            }
            if let Some(path) = background {
                cfg.background_image = Some(path);
            }
            if signature.is_some() {
                cfg.signature_text = signature;
            }
            cfg.background_color = background_color.or(cfg.background_color);
            cfg.text_color = text_color.or(cfg.text_color);
            cfg.line_color = line_color.or(cfg.line_color);
            cfg.noise_color = noise_color.or(cfg.noise_color);
            cfg.signature_color = signature_color.or(cfg.signature_color);

            let format = format
                .or_else(|| ImageFormat::from_path(&out))
                .unwrap_or(cfg.image_format);
            cfg.image_format = format;
            cfg.validate()?;

            info!(
                width = cfg.image_width,
                height = cfg.image_height,
                %format,
                "generating captcha"
            );

            let mut captcha = Captcha::new(cfg);
            let secret = match seed {
                Some(seed) => captcha.generate_with_rng(&mut StdRng::seed_from_u64(seed))?,
                None => captcha.generate()?,
            }
            .secret
            .clone();

            std::fs::write(&out, captcha.encode()?)?;
            info!(path = %out.display(), "saved captcha");
            println!("{}", secret);
            Ok(0)
        }

        Commands::Verify {
            stored,
            entered,
            case_sensitive,
        } => {
            if verify_code(&stored, &entered, case_sensitive) {
                println!("match");
                Ok(0)
            } else {
                println!("no match");
                Ok(1)
            }
        }
    }
}
