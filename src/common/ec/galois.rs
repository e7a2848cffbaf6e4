use once_cell::sync::Lazy;

use crate::common::error::{QRError, QRResult};

/// GF(256) with primitive x^8 + x^4 + x^3 + x^2 + 1 and generator base 0.
pub static QR_CODE_FIELD_256: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x011D, 256, 0));

// Galois field
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGF {
    exp_table: Vec<u8>,
    log_table: Vec<u8>,
    size: usize,
    generator_base: usize,
}

impl GenericGF {
    /// Builds exp & log tables for a field of `size` elements, at most 256.
    pub fn new(primitive: usize, size: usize, generator_base: usize) -> Self {
        debug_assert!(size.is_power_of_two() && size <= 256, "Unsupported field size: {size}");

        let mut exp_table = vec![0; size];
        let mut log_table = vec![0; size];
        let mut x = 1;
        for e in exp_table.iter_mut() {
            *e = x as u8;
            x <<= 1;
            if x >= size {
                x ^= primitive;
                x &= size - 1;
            }
        }
        for (i, &e) in exp_table.iter().enumerate().take(size - 1) {
            log_table[e as usize] = i as u8;
        }

        Self { exp_table, log_table, size, generator_base }
    }

    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    // Addition & subtraction are the same in GF(2^n)
    pub fn add_or_subtract(a: u8, b: u8) -> u8 {
        a ^ b
    }

    pub fn exp(&self, a: usize) -> u8 {
        self.exp_table[a % (self.size - 1)]
    }

    #[cfg(test)]
    pub fn log(&self, a: u8) -> QRResult<usize> {
        if a == 0 {
            return Err(QRError::LogOfZero);
        }
        Ok(self.log_table[a as usize] as usize)
    }

    pub fn inverse(&self, a: u8) -> QRResult<u8> {
        if a == 0 {
            return Err(QRError::InverseOfZero);
        }
        Ok(self.exp_table[self.size - 1 - self.log_table[a as usize] as usize])
    }

    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = self.log_table[a as usize] as usize + self.log_table[b as usize] as usize;
        self.exp_table[log_sum % (self.size - 1)]
    }

    pub fn build_monomial(&self, degree: usize, coefficient: u8) -> GenericGFPoly<'_> {
        if coefficient == 0 {
            return GenericGFPoly::zero(self);
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        GenericGFPoly::new(self, coefficients)
    }
}


// Polynomial over a Galois field
//------------------------------------------------------------------------------

/// Coefficients are stored from the highest degree term down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGFPoly<'a> {
    field: &'a GenericGF,
    coefficients: Vec<u8>,
}

impl<'a> GenericGFPoly<'a> {
    pub fn new(field: &'a GenericGF, coefficients: Vec<u8>) -> Self {
        let first_non_zero = coefficients.iter().position(|&c| c != 0);
        let coefficients = match first_non_zero {
            None => vec![0],
            Some(0) => coefficients,
            Some(i) => coefficients[i..].to_vec(),
        };
        Self { field, coefficients }
    }

    pub fn zero(field: &'a GenericGF) -> Self {
        Self { field, coefficients: vec![0] }
    }

    pub fn one(field: &'a GenericGF) -> Self {
        Self { field, coefficients: vec![1] }
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    pub fn coefficient(&self, degree: usize) -> u8 {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    #[cfg(test)]
    pub fn evaluate_at(&self, a: u8) -> u8 {
        match a {
            0 => self.coefficient(0),
            1 => self.coefficients.iter().fold(0, |acc, &c| GenericGF::add_or_subtract(acc, c)),
            _ => self.coefficients.iter().fold(0, |acc, &c| {
                GenericGF::add_or_subtract(self.field.multiply(a, acc), c)
            }),
        }
    }

    pub fn add_or_subtract(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let diff = larger.len() - smaller.len();
        let mut sum = larger[..diff].to_vec();
        sum.extend(
            larger[diff..].iter().zip(smaller.iter()).map(|(&a, &b)| GenericGF::add_or_subtract(a, b)),
        );
        Self::new(self.field, sum)
    }

    pub fn multiply(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }

        let mut product = vec![0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] ^= self.field.multiply(a, b);
            }
        }
        Self::new(self.field, product)
    }

    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return Self::zero(self.field);
        }
        let mut product = Vec::with_capacity(self.coefficients.len() + degree);
        product.extend(self.coefficients.iter().map(|&c| self.field.multiply(c, coefficient)));
        product.resize(self.coefficients.len() + degree, 0);
        Self::new(self.field, product)
    }

    /// Long division, returning quotient & remainder.
    pub fn divide(&self, other: &Self) -> QRResult<(Self, Self)> {
        if other.is_zero() {
            return Err(QRError::InverseOfZero);
        }

        let mut quotient = Self::zero(self.field);
        let mut remainder = self.clone();
        let inverse_denominator_lead = self.field.inverse(other.coefficient(other.degree()))?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_diff = remainder.degree() - other.degree();
            let scale =
                self.field.multiply(remainder.coefficient(remainder.degree()), inverse_denominator_lead);
            let term = other.multiply_by_monomial(degree_diff, scale);
            let iteration_quotient = self.field.build_monomial(degree_diff, scale);
            quotient = quotient.add_or_subtract(&iteration_quotient);
            remainder = remainder.add_or_subtract(&term);
        }

        Ok((quotient, remainder))
    }
}
