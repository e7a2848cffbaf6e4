//! # qrforge
//!
//! A Rust library for encoding text into QR Code symbols (Model 2, versions 1-40) with
//! Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Mode selection**: Numeric, alphanumeric, byte & Kanji modes, picked from the text
//! - **Character sets**: ISO-8859-1 by default, any `encoding_rs` charset through an ECI header
//! - **Reed-Solomon Error Correction**: GF(256) codewords for levels L, M, Q & H
//! - **Masking**: All 8 masks scored in parallel, lowest penalty wins
//! - **Rendering**: Scaled pixel matrices with a 4 module quiet zone, savable as images
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrforge::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode("HELLO WORLD", ECLevel::M, "ISO-8859-1")?;
//! let grid = qr.to_bool_grid()?;
//! assert_eq!(grid.len(), qr.width());
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrforge::{CharacterSet, ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .version(Version::new(2)?)                 // If not provided, finds smallest version to fit text
//!     .ec_level(ECLevel::Q)                      // If not provided, defaults to ECLevel::L
//!     .charset(CharacterSet::from_label("UTF-8")?) // If not provided, defaults to ISO-8859-1
//!     .mask(MaskPattern::new(3)?)                // If not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = qr.to_image(4);
//! assert_eq!(img.width(), (25 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Writer
//!
//! ```rust,no_run
//! use qrforge::{BarcodeFormat, ECLevel, EncodeHints, QRCodeWriter, Writer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hints = EncodeHints { error_correction: ECLevel::Q, ..Default::default() };
//! let matrix = QRCodeWriter.encode("Hello", BarcodeFormat::QrCode, 300, 300, &hints)?;
//! matrix.save("hello.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod render;
pub mod writer;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::{CharacterSet, Mode, SymbolPlan};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
pub use render::{render_result, BitMatrix};
pub use writer::{BarcodeFormat, EncodeHints, QRCodeWriter, Writer};

/// Encodes text at the given EC level, converting it to bytes with the named charset.
/// Version, mode & mask are chosen automatically.
pub fn encode(text: &str, ec_level: ECLevel, charset: &str) -> QRResult<QR> {
    let charset = CharacterSet::from_label(charset)?;
    QRBuilder::new(text).ec_level(ec_level).charset(charset).build()
}
