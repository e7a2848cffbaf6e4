use std::ops::Deref;

use log::{debug, trace};
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern)
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        (rc & 1) + (rc % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((rc & 1) + (rc % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let rc = r as i32 * c as i32;
        ((((r + c) & 1) as i32) + (rc % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Predicate over (row, col) telling whether a data module gets flipped.
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is checked on construction"),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Tries all 8 masks on copies of the unmasked symbol and keeps the one with the
/// lowest penalty, lowest index on ties.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let unmasked: &QR = qr;
    let (penalty, best) = MaskPattern::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|m| {
            let mut trial = unmasked.clone();
            trial.apply_mask(m);
            let penalty = compute_total_penalty(&trial);
            trace!("Mask {} penalty {penalty}", *m);
            (penalty, m)
        })
        .min()
        .unwrap_or((0, MaskPattern(0)));

    debug!("Chose mask {} with penalty {penalty}", *best);
    qr.apply_mask(best);
    best
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let grid = qr.to_color_rows();
    let adj_pen = compute_adjacent_penalty(&grid);
    let blk_pen = compute_block_penalty(&grid);
    let fp_pen_h = compute_finder_pattern_penalty(&grid, true);
    let fp_pen_v = compute_finder_pattern_penalty(&grid, false);
    let bal_pen = compute_balance_penalty(&grid);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// N1: runs of 5 or more same colored modules in a row or column
fn compute_adjacent_penalty(grid: &[Vec<Color>]) -> u32 {
    let w = grid.len();
    let run_penalty = |run: u32| if run >= 5 { 3 + (run - 5) } else { 0 };

    let mut pen = 0;
    for is_hor in [true, false] {
        for i in 0..w {
            let get = |j: usize| if is_hor { grid[i][j] } else { grid[j][i] };
            let mut last = get(0);
            let mut run = 0;
            for j in 0..w {
                let clr = get(j);
                if clr == last {
                    run += 1;
                } else {
                    pen += run_penalty(run);
                    last = clr;
                    run = 1;
                }
            }
            pen += run_penalty(run);
        }
    }
    pen
}

// N2: uniformly colored 2x2 blocks, overlaps included
fn compute_block_penalty(grid: &[Vec<Color>]) -> u32 {
    let w = grid.len();
    let mut cnt = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = grid[r][c];
            if clr == grid[r + 1][c] && clr == grid[r][c + 1] && clr == grid[r + 1][c + 1] {
                cnt += 1;
            }
        }
    }
    cnt * 3
}

// N3: 1:1:3:1:1 finder like pattern with 4 light modules on either side. The
// symbol edge counts as light.
fn compute_finder_pattern_penalty(grid: &[Vec<Color>], is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let w = grid.len() as i32;
    let mut pen = 0;
    for i in 0..w {
        let get = |j: i32| {
            if is_hor {
                grid[i as usize][j as usize]
            } else {
                grid[j as usize][i as usize]
            }
        };
        let is_light = |from: i32, to: i32| (from.max(0)..to.min(w)).all(|x| get(x) == Color::Light);
        for j in 0..w - 6 {
            if (j..j + 7).map(get).eq(PATTERN.iter().copied())
                && (is_light(j - 4, j) || is_light(j + 7, j + 11))
            {
                pen += 40;
            }
        }
    }
    pen
}

// N4: deviation of dark ratio from 50%, in 10 point steps per 5%
fn compute_balance_penalty(grid: &[Vec<Color>]) -> u32 {
    let w = grid.len();
    let total = w * w;
    let dark_cnt = grid.iter().flatten().filter(|c| c.is_dark()).count();
    let five_percent_variances = (dark_cnt * 2).abs_diff(total) * 10 / total;
    (five_percent_variances * 10) as u32
}
