use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use symcodec::detector::finder::FinderDetector;
use symcodec::registry;
use symcodec::utils::binarization::adaptive_binarize;
use symcodec::{DecodeOptions, ECLevel, EncodeOptions, EncodingRequest, LuminanceImage};

#[derive(Parser)]
#[command(name = "symtool", version, about = "symcodec CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render content as a PNG
    Encode {
        /// Format literal, e.g. QR_CODE, CODE_128, EAN_13
        format: String,
        content: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 400)]
        width: i32,
        #[arg(long, default_value_t = 400)]
        height: i32,
        /// QR error correction level (L, M, Q, H)
        #[arg(long, default_value = "M")]
        ec: String,
        /// Quiet zone in modules
        #[arg(long)]
        quiet_zone: Option<usize>,
    },
    /// Decode the first symbol in an image
    Decode {
        image: PathBuf,
        /// Slower, more thorough search
        #[arg(long)]
        focus: bool,
    },
    /// Print binarization stats and QR finder candidates for an image
    DebugDetect {
        image: PathBuf,
        #[arg(long)]
        focus: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Encode {
            format,
            content,
            output,
            width,
            height,
            ec,
            quiet_zone,
        } => encode_cmd(&format, &content, &output, width, height, &ec, quiet_zone),
        Command::Decode { image, focus } => decode_cmd(&image, focus),
        Command::DebugDetect { image, focus } => debug_detect_cmd(&image, focus),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn load_luma(path: &Path) -> Result<LuminanceImage<'static>, String> {
    let img = image::open(path).map_err(|e| format!("Failed to load image {}: {e}", path.display()))?;
    Ok(LuminanceImage::from_gray_image(&img.to_luma8()))
}

fn encode_cmd(
    format: &str,
    content: &str,
    output: &Path,
    width: i32,
    height: i32,
    ec: &str,
    quiet_zone: Option<usize>,
) -> Result<(), String> {
    let symbology = registry::from_literal(format).ok_or_else(|| format!("Unknown format {format}"))?;
    let ec_level: ECLevel = ec.parse().map_err(|_| format!("Unknown EC level {ec}"))?;
    let options = EncodeOptions {
        ec_level,
        quiet_zone,
    };
    let request = EncodingRequest::new(content, symbology, width, height);
    let raster = symcodec::encode_request(&request, &options).map_err(|e| format!("Encode failed: {e}"))?;
    raster
        .to_rgba_image()
        .save(output)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    println!(
        "Wrote {} ({}x{}, {})",
        output.display(),
        raster.width(),
        raster.height(),
        symbology
    );
    Ok(())
}

fn decode_cmd(path: &Path, focus: bool) -> Result<(), String> {
    let image = load_luma(path)?;
    let start = Instant::now();
    let result = symcodec::decode_image(&image, &DecodeOptions::with_try_harder(focus));
    let elapsed = start.elapsed();
    match result {
        Ok(symbol) => {
            println!("{}\t{}", symbol.symbology, symbol.text);
            println!("Decoded in {:.2} ms", elapsed.as_secs_f64() * 1000.0);
            Ok(())
        }
        Err(e) => Err(format!("No symbol in {} ({e})", path.display())),
    }
}

fn debug_detect_cmd(path: &Path, focus: bool) -> Result<(), String> {
    let image = load_luma(path)?;
    println!("Image: {} ({}x{})", path.display(), image.width(), image.height());

    let binary = adaptive_binarize(&image);
    let total = binary.width() * binary.height();
    let dark = binary.count_ones();
    println!(
        "Binary: dark_pixels={} total={} dark_ratio={:.2}%",
        dark,
        total,
        if total == 0 { 0.0 } else { dark as f64 * 100.0 / total as f64 }
    );

    let patterns = FinderDetector::detect(&binary, focus);
    println!("Found {} finder patterns", patterns.len());
    for (i, pattern) in patterns.iter().take(10).enumerate() {
        println!(
            "  Pattern {}: center=({:.1}, {:.1}) module_size={:.2} count={}",
            i, pattern.center.x, pattern.center.y, pattern.module_size, pattern.count
        );
    }
    Ok(())
}
