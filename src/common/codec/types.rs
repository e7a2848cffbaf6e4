use encoding_rs::{Encoding, SHIFT_JIS, WINDOWS_1252};

use crate::common::error::{QRError, QRResult};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    pub const INDICATOR_BITS: usize = 4;

    #[inline]
    fn numeric_digit(char: u8) -> QRResult<u16> {
        match char {
            b'0'..=b'9' => Ok((char - b'0') as u16),
            _ => Err(QRError::InvalidChar),
        }
    }

    #[inline]
    pub(crate) fn alphanumeric_digit(char: u8) -> QRResult<u16> {
        let digit = match char {
            b'0'..=b'9' => char - b'0',
            b'A'..=b'Z' => char - b'A' + 10,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => return Err(QRError::InvalidChar),
        };
        Ok(digit as u16)
    }

    // Shift_JIS double byte char to its 13 bit kanji value
    fn kanji_value(hi: u8, lo: u8) -> QRResult<u16> {
        let code = ((hi as u16) << 8) | lo as u16;
        let sub = match code {
            0x8140..=0x9FFC => code - 0x8140,
            0xE040..=0xEBBF => code - 0xC140,
            _ => return Err(QRError::InvalidChar),
        };
        Ok((sub >> 8) * 0xC0 + (sub & 0xFF))
    }

    /// Packs a chunk of 1-3 digits, 1-2 alphanumeric chars, 1 byte or 1 kanji pair.
    pub fn encode_chunk(&self, data: &[u8]) -> QRResult<u16> {
        match (self, data.len()) {
            (Self::Numeric, 1..=3) => {
                data.iter().try_fold(0_u16, |n, b| Ok(n * 10 + Self::numeric_digit(*b)?))
            }
            (Self::Alphanumeric, 1..=2) => {
                data.iter().try_fold(0_u16, |n, b| Ok(n * 45 + Self::alphanumeric_digit(*b)?))
            }
            (Self::Byte, 1) => Ok(data[0] as u16),
            (Self::Kanji, 2) => Self::kanji_value(data[0], data[1]),
            _ => Err(QRError::InvalidChar),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Kanji | Self::Eci => false,
        }
    }

    /// Bit length of `len` units of data, where a unit is a byte or a kanji pair.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
            Self::Eci => 8,
        }
    }
}

#[cfg(test)]
mod mode_tests {
    use test_case::test_case;

    use super::Mode;
    use super::Mode::*;
    use crate::common::error::QRError;

    #[test]
    fn test_indicators() {
        assert_eq!(Numeric as u8, 0b0001);
        assert_eq!(Alphanumeric as u8, 0b0010);
        assert_eq!(Byte as u8, 0b0100);
        assert_eq!(Kanji as u8, 0b1000);
        assert_eq!(Eci as u8, 0b0111);
    }

    #[test]
    fn test_alphanumeric_digit() {
        assert_eq!(Mode::alphanumeric_digit(b'0'), Ok(0));
        assert_eq!(Mode::alphanumeric_digit(b'9'), Ok(9));
        assert_eq!(Mode::alphanumeric_digit(b'A'), Ok(10));
        assert_eq!(Mode::alphanumeric_digit(b'Z'), Ok(35));
        assert_eq!(Mode::alphanumeric_digit(b' '), Ok(36));
        assert_eq!(Mode::alphanumeric_digit(b':'), Ok(44));
    }

    #[test]
    fn test_invalid_alphanumeric_digit() {
        assert_eq!(Mode::alphanumeric_digit(b'a'), Err(QRError::InvalidChar));
    }

    #[test_case("012", 0b0000001100)]
    #[test_case("345", 0b0101011001)]
    #[test_case("867", 0b1101100011)]
    #[test_case("67", 0b1000011)]
    #[test_case("9", 0b1001)]
    fn test_numeric_encoding(data: &str, exp: u16) {
        assert_eq!(Numeric.encode_chunk(data.as_bytes()), Ok(exp));
    }

    #[test_case("AC", 0b00111001110)]
    #[test_case("-4", 0b11100111001)]
    #[test_case("2", 0b000010)]
    fn test_alphanumeric_encoding(data: &str, exp: u16) {
        assert_eq!(Alphanumeric.encode_chunk(data.as_bytes()), Ok(exp));
    }

    #[test_case(0x93, 0x5F, 0x0D9F)]
    #[test_case(0xE4, 0xAA, 0x1AAA)]
    #[test_case(0x81, 0x40, 0x0000)]
    fn test_kanji_encoding(hi: u8, lo: u8, exp: u16) {
        assert_eq!(Kanji.encode_chunk(&[hi, lo]), Ok(exp));
    }

    #[test]
    fn test_invalid_kanji() {
        assert!(Kanji.encode_chunk(&[0xA0, 0x40]).is_err());
        assert!(Kanji.encode_chunk(&[0x93]).is_err());
    }

    #[test_case(Numeric, b"1a"; "numeric_letter")]
    #[test_case(Numeric, b"1234"; "numeric_too_long")]
    #[test_case(Numeric, b""; "numeric_empty")]
    #[test_case(Alphanumeric, b"a"; "alphanumeric_lowercase")]
    #[test_case(Alphanumeric, b"ABC"; "alphanumeric_too_long")]
    #[test_case(Byte, b""; "byte_empty")]
    #[test_case(Byte, b"ab"; "byte_too_long")]
    #[test_case(Eci, b"1"; "eci")]
    fn test_invalid_chunk(mode: Mode, data: &[u8]) {
        assert_eq!(mode.encode_chunk(data), Err(QRError::InvalidChar));
    }

    #[test]
    fn test_contains() {
        assert!(Numeric.contains(b'0'));
        assert!(!Numeric.contains(b'A'));
        assert!(Alphanumeric.contains(b'Z'));
        assert!(Alphanumeric.contains(b':'));
        assert!(!Alphanumeric.contains(b'a'));
        assert!(!Alphanumeric.contains(b'@'));
        assert!(Byte.contains(0xFF));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Numeric.encoded_len(3), 10);
        assert_eq!(Numeric.encoded_len(2), 7);
        assert_eq!(Numeric.encoded_len(7), 24);
        assert_eq!(Alphanumeric.encoded_len(2), 11);
        assert_eq!(Alphanumeric.encoded_len(5), 28);
        assert_eq!(Byte.encoded_len(3), 24);
        assert_eq!(Kanji.encoded_len(2), 26);
    }
}

// Character set
//------------------------------------------------------------------------------

/// Charset used to turn text into bytes for byte & kanji modes.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum CharacterSet {
    /// Default charset of byte mode, no ECI header is emitted for it.
    #[default]
    Iso8859_1,
    Ascii,
    Other(&'static Encoding),
}

impl CharacterSet {
    pub fn from_label(label: &str) -> QRResult<Self> {
        let norm = label.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" | "iso-ir-100" | "cp819" => {
                return Ok(Self::Iso8859_1)
            }
            "ascii" | "us-ascii" | "iso646-us" | "ansi-x3.4-1968" => return Ok(Self::Ascii),
            _ => (),
        }

        let enc = Encoding::for_label(label.trim().as_bytes())
            .or_else(|| Encoding::for_label(norm.as_bytes()))
            .ok_or(QRError::UnsupportedCharset)?;
        // Latin-1 aliases resolve to windows-1252 in encoding_rs
        if enc == WINDOWS_1252 && !matches!(norm.as_str(), "windows-1252" | "cp1252" | "x-cp1252") {
            return Ok(Self::Iso8859_1);
        }
        // Encodings that can't produce their own bytes, like UTF-16 & replacement
        if enc.output_encoding() != enc {
            return Err(QRError::UnsupportedCharset);
        }
        Ok(Self::Other(enc))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
            Self::Other(enc) => enc.name(),
        }
    }

    pub fn is_shift_jis(&self) -> bool {
        matches!(self, Self::Other(enc) if *enc == SHIFT_JIS)
    }

    /// ECI assignment number, if the charset has one.
    pub fn eci(&self) -> Option<u8> {
        let eci = match self.name() {
            "ISO-8859-1" => 3,
            "ISO-8859-2" => 4,
            "ISO-8859-3" => 5,
            "ISO-8859-4" => 6,
            "ISO-8859-5" => 7,
            "ISO-8859-6" => 8,
            "ISO-8859-7" => 9,
            "ISO-8859-8" | "ISO-8859-8-I" => 10,
            "ISO-8859-10" => 12,
            "ISO-8859-13" => 15,
            "ISO-8859-14" => 16,
            "ISO-8859-15" => 17,
            "ISO-8859-16" => 18,
            "Shift_JIS" => 20,
            "windows-1250" => 21,
            "windows-1251" => 22,
            "windows-1252" => 23,
            "windows-1256" => 24,
            "UTF-8" => 26,
            "US-ASCII" => 27,
            "Big5" => 28,
            "gb18030" | "GBK" => 29,
            "EUC-KR" => 30,
            _ => return None,
        };
        Some(eci)
    }

    /// Encodes text into the charset's bytes; unmappable chars are an error.
    pub fn encode(&self, text: &str) -> QRResult<Vec<u8>> {
        match self {
            Self::Iso8859_1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| QRError::InvalidChar))
                .collect(),
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(QRError::InvalidChar)
                }
            }
            Self::Other(enc) => {
                let (bytes, _, had_errors) = enc.encode(text);
                if had_errors {
                    return Err(QRError::InvalidChar);
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

// Every lead byte must fall in a Shift_JIS double byte range
pub fn is_only_double_byte_kanji(bytes: &[u8]) -> bool {
    bytes.len() % 2 == 0
        && bytes.chunks_exact(2).all(|p| matches!(p[0], 0x81..=0x9F | 0xE0..=0xEB))
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub const ECI_DESIGNATOR_BITS: usize = 8;
