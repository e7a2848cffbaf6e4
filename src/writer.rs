use std::fmt::{Display, Formatter};

use log::debug;

use crate::builder::QRBuilder;
use crate::common::codec::CharacterSet;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::ECLevel;
use crate::render::{render_result, BitMatrix};

// Barcode format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    MaxiCode,
    Pdf417,
    QrCode,
    Rss14,
    RssExpanded,
    UpcA,
    UpcE,
    UpcEanExtension,
}

impl Display for BarcodeFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Aztec => "AZTEC",
            Self::Codabar => "CODABAR",
            Self::Code39 => "CODE_39",
            Self::Code93 => "CODE_93",
            Self::Code128 => "CODE_128",
            Self::DataMatrix => "DATA_MATRIX",
            Self::Ean8 => "EAN_8",
            Self::Ean13 => "EAN_13",
            Self::Itf => "ITF",
            Self::MaxiCode => "MAXICODE",
            Self::Pdf417 => "PDF_417",
            Self::QrCode => "QR_CODE",
            Self::Rss14 => "RSS_14",
            Self::RssExpanded => "RSS_EXPANDED",
            Self::UpcA => "UPC_A",
            Self::UpcE => "UPC_E",
            Self::UpcEanExtension => "UPC_EAN_EXTENSION",
        };
        f.write_str(name)
    }
}

// Writer
//------------------------------------------------------------------------------

/// Options understood by writers.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct EncodeHints {
    pub error_correction: ECLevel,
    pub character_set: CharacterSet,
}

/// Encodes text as a barcode of the given format into a pixel matrix of at least
/// `width` x `height`.
pub trait Writer {
    fn encode(
        &self,
        contents: &str,
        format: BarcodeFormat,
        width: i32,
        height: i32,
        hints: &EncodeHints,
    ) -> QRResult<BitMatrix>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QRCodeWriter;

impl Writer for QRCodeWriter {
    fn encode(
        &self,
        contents: &str,
        format: BarcodeFormat,
        width: i32,
        height: i32,
        hints: &EncodeHints,
    ) -> QRResult<BitMatrix> {
        if contents.is_empty() {
            return Err(QRError::EmptyData);
        }
        if format != BarcodeFormat::QrCode {
            debug!("Rejecting {format}, only QR_CODE is supported");
            return Err(QRError::UnsupportedFormat);
        }
        if width <= 0 || height <= 0 {
            return Err(QRError::InvalidDimensions);
        }

        let qr = QRBuilder::new(contents)
            .ec_level(hints.error_correction)
            .charset(hints.character_set)
            .build()?;
        render_result(&qr, width as usize, height as usize)
    }
}

#[cfg(test)]
mod writer_tests {
    use test_case::test_case;

    use super::{BarcodeFormat, EncodeHints, QRCodeWriter, Writer};
    use crate::common::codec::CharacterSet;
    use crate::common::error::QRError;
    use crate::common::metadata::ECLevel;

    #[test]
    fn test_default_hints() {
        let hints = EncodeHints::default();
        assert_eq!(hints.error_correction, ECLevel::L);
        assert_eq!(hints.character_set, CharacterSet::Iso8859_1);
    }

    #[test]
    fn test_encode_qr() {
        let hints = EncodeHints { error_correction: ECLevel::Q, ..Default::default() };
        let bm = QRCodeWriter.encode("HELLO", BarcodeFormat::QrCode, 120, 100, &hints).unwrap();
        assert_eq!((bm.width(), bm.height()), (120, 100));
        assert!(bm.count_dark() > 0);
    }

    #[test_case(BarcodeFormat::Code128)]
    #[test_case(BarcodeFormat::Ean13)]
    #[test_case(BarcodeFormat::Pdf417)]
    fn test_unsupported_format(format: BarcodeFormat) {
        let res = QRCodeWriter.encode("HELLO", format, 100, 100, &EncodeHints::default());
        assert_eq!(res.unwrap_err(), QRError::UnsupportedFormat);
    }

    #[test_case(0, 100)]
    #[test_case(100, -1)]
    fn test_invalid_dimensions(w: i32, h: i32) {
        let res = QRCodeWriter.encode("HELLO", BarcodeFormat::QrCode, w, h, &EncodeHints::default());
        assert_eq!(res.unwrap_err(), QRError::InvalidDimensions);
    }

    #[test]
    fn test_empty_contents() {
        let res = QRCodeWriter.encode("", BarcodeFormat::QrCode, 100, 100, &EncodeHints::default());
        assert_eq!(res.unwrap_err(), QRError::EmptyData);
    }
}
