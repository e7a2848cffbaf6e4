use std::fmt::{Display, Error, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(&self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    #[default]
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Two bit code carried in the format information.
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl std::str::FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

#[cfg(test)]
mod ec_level_tests {
    use super::ECLevel;

    #[test]
    fn test_format_bits() {
        assert_eq!(ECLevel::L.format_bits(), 1);
        assert_eq!(ECLevel::M.format_bits(), 0);
        assert_eq!(ECLevel::Q.format_bits(), 3);
        assert_eq!(ECLevel::H.format_bits(), 2);
    }

    #[test]
    fn test_ordering() {
        assert!(ECLevel::L < ECLevel::M);
        assert!(ECLevel::M < ECLevel::Q);
        assert!(ECLevel::Q < ECLevel::H);
    }

    #[test]
    fn test_parse() {
        assert_eq!("q".parse::<ECLevel>(), Ok(ECLevel::Q));
        assert_eq!(" H ".parse::<ECLevel>(), Ok(ECLevel::H));
        assert!("X".parse::<ECLevel>().is_err());
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        if (1..=40).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(QRError::InvalidVersion)
        }
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let range = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][range],
            Mode::Alphanumeric => [9, 11, 13][range],
            Mode::Byte => [8, 16, 16][range],
            Mode::Kanji => [8, 10, 12][range],
            Mode::Eci => 0,
        }
    }

    // Modules left for data & ec after every function pattern and info area
    fn raw_data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn rs_blocks(self, ecl: ECLevel) -> usize {
        RS_BLOCK_COUNT[ecl as usize][self.0]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0]
    }

    pub fn ec_codewords(self, ecl: ECLevel) -> usize {
        self.rs_blocks(ecl) * self.ecc_per_block(ecl)
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ec_codewords(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    /// 18 bit version information: 6 bit version followed by the BCH(18, 6) remainder.
    pub fn info(self) -> u32 {
        let ver = self.0 as u32;
        let mut rem = ver;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_GENERATOR);
        }
        (ver << 12) | (rem & 0xFFF)
    }
}


// Format information
//------------------------------------------------------------------------------

/// 15 bit format information for an EC level & mask, masked with 0x5412.
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_GENERATOR);
    }
    ((data << 10) | (rem & 0x3FF)) ^ FORMAT_INFO_MASK
}


// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    pub version: Version,
    pub ec_level: ECLevel,
    pub mode: Mode,
    pub mask: Option<MaskPattern>,
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self.mask {
            Some(m) => write!(
                f,
                "{{ Version: {}, Ec level: {:?}, Mode: {:?}, Mask: {} }}",
                *self.version, self.ec_level, self.mode, *m
            ),
            None => write!(
                f,
                "{{ Version: {}, Ec level: {:?}, Mode: {:?}, Mask: None }}",
                *self.version, self.ec_level, self.mode
            ),
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_INFO_GENERATOR: u32 = 0x537;

const FORMAT_INFO_MASK: u32 = 0x5412;

const VERSION_INFO_GENERATOR: u32 = 0x1F25;

// Format info coordinates, most significant bit first. Negative indices wrap from the
// far edge of the grid.
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

// Indexed by [ec level][version], version 0 unused
static ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static RS_BLOCK_COUNT: [[usize; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];
