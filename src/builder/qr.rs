use image::{GrayImage, Luma};
use std::ops::Deref;

use crate::common::codec::{Mode, SymbolPlan};
use crate::common::mask::MaskPattern;
use crate::common::metadata::*;
use crate::common::{BitArray, EncRegionIter, QRError, QRResult};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// A square grid of modules with the metadata it was built for. Rows & columns are
/// indexed from the top left; negative indices count from the far edge.
#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mode: Mode,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel, mode: Mode) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mode, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> Metadata {
        Metadata { version: self.ver, ec_level: self.ecl, mode: self.mode, mask: self.mask }
    }

    /// Plan the symbol was built from, with the mask once one is applied.
    pub fn plan(&self) -> SymbolPlan {
        let plan = SymbolPlan::new(self.ver, self.ecl, self.mode);
        match self.mask {
            Some(mask) => plan.with_mask(mask),
            None => plan,
        }
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.is_dark()).count()
    }

    pub fn is_complete(&self) -> bool {
        !self.grid.contains(&Module::Empty)
    }

    /// Row major matrix, `true` for dark. Fails if any module was never drawn.
    pub fn to_bool_grid(&self) -> QRResult<Vec<Vec<bool>>> {
        if !self.is_complete() {
            return Err(QRError::IncompleteMatrix);
        }
        Ok(self.grid.chunks_exact(self.w).map(|row| row.iter().map(|m| m.is_dark()).collect()).collect())
    }

    pub(crate) fn to_color_rows(&self) -> Vec<Vec<Color>> {
        self.grid.chunks_exact(self.w).map(|row| row.iter().map(|m| **m).collect()).collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of bounds for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of bounds for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 finder centered at (r, c) along with its separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let clr = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => Color::Light,
                    (3 | -3, _) | (_, 3 | -3) => Color::Dark,
                    (2 | -2, _) | (_, 2 | -2) => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    // Alternating line starting dark on even indices
    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use crate::builder::QR;
    use crate::common::codec::Mode;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_timing_pattern_1() {
        let mut qr = QR::new(Version::MIN, ECLevel::L, Mode::Byte);
        qr.draw_timing_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Centers that would land on a finder pattern
        if (r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                let clr = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Color::Dark,
                    _ => Color::Light,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_SIDE);
        // Dark module above the bottom left separator
        self.set(-8, 8, on);
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, if number & mask == 0 { off_clr } else { on_clr });
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Reserves format & version areas, then places codewords along the zigzag path.
    /// Modules left over after the last codeword become light remainder bits.
    pub fn draw_encoding_region(&mut self, payload: &BitArray) -> QRResult<()> {
        self.reserve_format_area();
        self.draw_version_info();

        let mut coords = EncRegionIter::new(self.ver).filter(|&(r, c)| self.get(r, c) == Module::Empty);
        let mut placed = Vec::with_capacity(payload.len());
        for bit in payload.iter() {
            let (r, c) = coords.next().ok_or(QRError::CapacityMismatch)?;
            placed.push((r, c, Module::Data(Color::from(bit))));
        }
        let remainder = coords.map(|(r, c)| (r, c, Module::Data(Color::Light))).collect::<Vec<_>>();
        debug_assert_eq!(remainder.len(), self.ver.remainder_bits(), "Unexpected remainder bits");

        for (r, c, module) in placed.into_iter().chain(remainder) {
            self.set(r, c, module);
        }

        debug_assert!(self.is_complete(), "Empty module found after drawing encoding region");
        Ok(())
    }

    /// Flips every data module the pattern selects and writes the matching format info.
    /// Always applied to an unmasked grid.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    pub const QUIET_ZONE: usize = 4;

    /// Grayscale image with a 4 module light quiet zone, `module_sz` pixels per module.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = Self::QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        GrayImage::from_fn(total_sz, total_sz, |x, y| {
            if x < qz_sz || x >= qz_sz + qr_sz || y < qz_sz || y >= qz_sz + qr_sz {
                return Luma([255]);
            }
            let r = ((y - qz_sz) / module_sz) as i16;
            let c = ((x - qz_sz) / module_sz) as i16;
            self.get(r, c).select(Luma([255]), Luma([0]))
        })
    }
}


// Global constants
//------------------------------------------------------------------------------

// Version info coordinates, most significant bit first
static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];
