use super::galois::{GenericGF, GenericGFPoly};
use crate::common::error::{QRError, QRResult};

// Reed Solomon encoder
//------------------------------------------------------------------------------

/// Computes a fixed number of EC codewords per block. Holds no mutable state, so a
/// single encoder can be shared across threads.
#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder<'a> {
    field: &'a GenericGF,
    generator: GenericGFPoly<'a>,
    ec_len: usize,
}

impl<'a> ReedSolomonEncoder<'a> {
    pub fn new(field: &'a GenericGF, ec_len: usize) -> Self {
        Self { field, generator: Self::build_generator(field, ec_len), ec_len }
    }

    // (x - a^b)(x - a^(b+1))...(x - a^(b+n-1)) where b is the generator base
    fn build_generator(field: &'a GenericGF, degree: usize) -> GenericGFPoly<'a> {
        (0..degree).fold(GenericGFPoly::one(field), |gen, i| {
            let root = field.exp(i + field.generator_base());
            gen.multiply(&GenericGFPoly::new(field, vec![1, root]))
        })
    }

    /// Remainder of data * x^k divided by the generator, left padded to k bytes.
    pub fn encode(&self, data: &[u8]) -> QRResult<Vec<u8>> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }
        if self.ec_len == 0 {
            return Ok(vec![]);
        }

        let info = GenericGFPoly::new(self.field, data.to_vec());
        let info = info.multiply_by_monomial(self.ec_len, 1);
        let (_, remainder) = info.divide(&self.generator)?;

        let coefficients = remainder.coefficients();
        let mut ecc = vec![0; self.ec_len - coefficients.len()];
        ecc.extend_from_slice(coefficients);
        Ok(ecc)
    }
}

#[cfg(test)]
mod rs_tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::ReedSolomonEncoder;
    use crate::common::ec::galois::{GenericGFPoly, QR_CODE_FIELD_256};

    #[test_case(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17")]
    #[test_case(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10")]
    #[test_case(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'")]
    fn test_ecc(data: &[u8], ec_len: usize, exp: &[u8]) {
        let rs = ReedSolomonEncoder::new(&QR_CODE_FIELD_256, ec_len);
        assert_eq!(rs.encode(data).unwrap(), exp);
    }

    #[test]
    fn test_generator_degree_2() {
        // (x - 1)(x - 2) = x^2 + 3x + 2
        let rs = ReedSolomonEncoder::new(&QR_CODE_FIELD_256, 2);
        assert_eq!(rs.generator.coefficients(), [1, 3, 2]);
    }

    #[test]
    fn test_zero_data_has_zero_ecc() {
        let rs = ReedSolomonEncoder::new(&QR_CODE_FIELD_256, 7);
        assert_eq!(rs.encode(&[0; 19]).unwrap(), vec![0; 7]);
    }

    #[test]
    fn test_empty_data() {
        let rs = ReedSolomonEncoder::new(&QR_CODE_FIELD_256, 7);
        assert!(rs.encode(&[]).is_err());
    }

    proptest! {
        // Codeword must vanish at every generator root
        #[test]
        fn proptest_syndromes(
            data in prop::collection::vec(any::<u8>(), 1..60),
            ec_len in 2usize..31,
        ) {
            let gf = &*QR_CODE_FIELD_256;
            let rs = ReedSolomonEncoder::new(gf, ec_len);
            let ecc = rs.encode(&data).unwrap();
            prop_assert_eq!(ecc.len(), ec_len);

            let mut codeword = data.clone();
            codeword.extend(ecc);
            let poly = GenericGFPoly::new(gf, codeword);
            for i in 0..ec_len {
                prop_assert_eq!(poly.evaluate_at(gf.exp(i)), 0);
            }
        }
    }
}
