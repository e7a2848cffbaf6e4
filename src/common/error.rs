use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Invalid input
    EmptyData,
    InvalidDimensions,
    InvalidChar,
    UnsupportedFormat,
    UnsupportedCharset,
    InvalidVersion,
    InvalidECLevel,
    InvalidMaskingPattern,

    // Capacity & internal invariants
    DataTooLong,
    CapacityMismatch,
    EcBytesMismatch,
    RsBlocksMismatch,
    TotalBytesMismatch,
    InterleaveMismatch,
    IncompleteMatrix,

    // Galois field
    LogOfZero,
    InverseOfZero,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            // Invalid input
            Self::EmptyData => "Empty data",
            Self::InvalidDimensions => "Requested dimensions must be positive",
            Self::InvalidChar => "Character cannot be encoded in the chosen mode or charset",
            Self::UnsupportedFormat => "Only QR code format is supported",
            Self::UnsupportedCharset => "Unsupported character set",
            Self::InvalidVersion => "Invalid version",
            Self::InvalidECLevel => "Invalid error correction level",
            Self::InvalidMaskingPattern => "Invalid masking pattern",

            // Capacity & internal invariants
            Self::DataTooLong => "Data too long",
            Self::CapacityMismatch => "Assembled bits don't match data capacity",
            Self::EcBytesMismatch => "EC bytes differ between block groups",
            Self::RsBlocksMismatch => "RS block count mismatch",
            Self::TotalBytesMismatch => "Total bytes mismatch",
            Self::InterleaveMismatch => "Interleaved length doesn't match total bytes",
            Self::IncompleteMatrix => "Empty module found in matrix",

            // Galois field
            Self::LogOfZero => "Logarithm of zero is undefined",
            Self::InverseOfZero => "Zero has no multiplicative inverse",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
