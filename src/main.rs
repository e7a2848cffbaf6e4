use std::env;

use anyhow::{bail, Context, Result};
use log::info;

use qrforge::{BarcodeFormat, CharacterSet, ECLevel, EncodeHints, QRCodeWriter, Writer};

const USAGE: &str = "Usage: qrforge <text> <width> <height> <file-base> <extension> [charset]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() < 5 || args.len() > 6 {
        bail!(USAGE);
    }

    let text = &args[0];
    let width = args[1].parse::<i32>().with_context(|| format!("Invalid width {:?}", args[1]))?;
    let height = args[2].parse::<i32>().with_context(|| format!("Invalid height {:?}", args[2]))?;
    let path = format!("{}.{}", args[3], args[4]);
    let character_set = match args.get(5) {
        Some(label) => CharacterSet::from_label(label)
            .with_context(|| format!("Unsupported charset {label:?}"))?,
        None => CharacterSet::default(),
    };

    let hints = EncodeHints { error_correction: ECLevel::Q, character_set };
    let matrix = QRCodeWriter
        .encode(text, BarcodeFormat::QrCode, width, height, &hints)
        .context("Failed to encode QR code")?;
    matrix.save(&path).with_context(|| format!("Failed to write {path}"))?;

    info!("Wrote {}x{} QR code to {path}", matrix.width(), matrix.height());
    Ok(())
}
