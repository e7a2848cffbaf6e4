pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use encoding_rs::SHIFT_JIS;
    use log::debug;

    use crate::common::bit_utils::BitArray;
    use crate::common::codec::{
        is_only_double_byte_kanji, CharacterSet, Mode, ECI_DESIGNATOR_BITS,
    };
    use crate::common::error::{QRError, QRResult};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_eci, push_header, push_payload, push_terminator};

    /// Version & capacity figures fixed for one encode. The mask is unset until the
    /// symbol has been masked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SymbolPlan {
        pub version: Version,
        pub ec_level: ECLevel,
        pub mode: Mode,
        pub matrix_width: usize,
        pub total_bytes: usize,
        pub data_bytes: usize,
        pub rs_blocks: usize,
        pub ec_bytes_total: usize,
        pub chosen_mask: Option<MaskPattern>,
    }

    impl SymbolPlan {
        pub fn new(version: Version, ec_level: ECLevel, mode: Mode) -> Self {
            Self {
                version,
                ec_level,
                mode,
                matrix_width: version.width(),
                total_bytes: version.total_codewords(),
                data_bytes: version.data_codewords(ec_level),
                rs_blocks: version.rs_blocks(ec_level),
                ec_bytes_total: version.ec_codewords(ec_level),
                chosen_mask: None,
            }
        }

        pub fn with_mask(self, mask: MaskPattern) -> Self {
            Self { chosen_mask: Some(mask), ..self }
        }

        pub fn data_bit_capacity(&self) -> usize {
            self.data_bytes << 3
        }
    }

    pub fn choose_mode(text: &str, charset: CharacterSet) -> Mode {
        if charset.is_shift_jis() {
            if let Ok(bytes) = charset.encode(text) {
                if !bytes.is_empty() && is_only_double_byte_kanji(&bytes) {
                    return Mode::Kanji;
                }
            }
        }

        let mut has_numeric = false;
        let mut has_alphanumeric = false;
        for b in text.bytes() {
            if Mode::Numeric.contains(b) {
                has_numeric = true;
            } else if Mode::Alphanumeric.contains(b) {
                has_alphanumeric = true;
            } else {
                return Mode::Byte;
            }
        }

        if has_alphanumeric {
            Mode::Alphanumeric
        } else if has_numeric {
            Mode::Numeric
        } else {
            Mode::Byte
        }
    }

    /// Smallest version holding the payload and its headers, or the pinned version if it fits.
    pub fn plan(
        payload_bits: usize,
        mode: Mode,
        ecl: ECLevel,
        eci_bits: usize,
        pinned: Option<Version>,
    ) -> QRResult<SymbolPlan> {
        let fits = |ver: Version| {
            let header_bits = eci_bits + Mode::INDICATOR_BITS + ver.char_cnt_bits(mode);
            ver.data_bit_capacity(ecl) >= payload_bits + header_bits
        };

        let ver = match pinned {
            Some(v) if fits(v) => v,
            Some(_) => return Err(QRError::DataTooLong),
            None => Version::all().find(|v| fits(*v)).ok_or(QRError::DataTooLong)?,
        };
        Ok(SymbolPlan::new(ver, ecl, mode))
    }

    /// Headers, payload, terminator & padding, exactly filling the plan's data capacity.
    pub fn assemble(
        plan: &SymbolPlan,
        eci: Option<u8>,
        char_cnt: usize,
        payload: &BitArray,
    ) -> QRResult<BitArray> {
        let bit_capacity = plan.data_bit_capacity();
        let mut out = BitArray::with_capacity(bit_capacity);

        if let Some(designator) = eci {
            push_eci(designator, &mut out);
        }
        let cnt_bits = plan.version.char_cnt_bits(plan.mode);
        push_header(plan.mode, char_cnt, cnt_bits, &mut out)?;
        out.append(payload);
        if out.len() > bit_capacity {
            return Err(QRError::DataTooLong);
        }

        push_terminator(&mut out, bit_capacity);
        pad_remaining_capacity(&mut out, bit_capacity);
        if out.len() != bit_capacity {
            return Err(QRError::CapacityMismatch);
        }
        Ok(out)
    }

    /// Picks mode & version for the text and returns its data codewords.
    pub fn encode_payload(
        text: &str,
        ecl: ECLevel,
        charset: CharacterSet,
        version: Option<Version>,
        mode: Option<Mode>,
    ) -> QRResult<(BitArray, SymbolPlan)> {
        let mode = mode.unwrap_or_else(|| choose_mode(text, charset));

        let (bytes, char_cnt) = match mode {
            Mode::Numeric | Mode::Alphanumeric => {
                if !text.bytes().all(|b| mode.contains(b)) {
                    return Err(QRError::InvalidChar);
                }
                (text.as_bytes().to_vec(), text.len())
            }
            Mode::Byte => {
                let bytes = charset.encode(text)?;
                let len = bytes.len();
                (bytes, len)
            }
            Mode::Kanji => {
                let bytes = CharacterSet::Other(SHIFT_JIS).encode(text)?;
                if !is_only_double_byte_kanji(&bytes) {
                    return Err(QRError::InvalidChar);
                }
                let len = bytes.len() / 2;
                (bytes, len)
            }
            // ECI only ever prefixes a byte segment
            Mode::Eci => return Err(QRError::InvalidChar),
        };

        let mut payload = BitArray::with_capacity(mode.encoded_len(char_cnt));
        push_payload(mode, &bytes, &mut payload)?;

        let eci = match (mode, charset) {
            (Mode::Byte, CharacterSet::Iso8859_1) => None,
            (Mode::Byte, cs) => cs.eci(),
            _ => None,
        };
        let eci_bits = eci.map_or(0, |_| Mode::INDICATOR_BITS + ECI_DESIGNATOR_BITS);

        let plan = plan(payload.len(), mode, ecl, eci_bits, version)?;
        debug!(
            "Planned version {} for {:?} mode, {} chars, {} payload bits, eci {:?}",
            *plan.version,
            mode,
            char_cnt,
            payload.len(),
            eci
        );

        let data = assemble(&plan, eci, char_cnt, &payload)?;
        Ok((data, plan))
    }

    #[cfg(test)]
    mod encode_tests {
        use test_case::test_case;

        use super::{choose_mode, encode_payload, plan, CharacterSet, ECLevel, MaskPattern, Mode, Version};
        use crate::common::error::QRError;

        #[test_case("0123456789", Mode::Numeric)]
        #[test_case("AC-42", Mode::Alphanumeric)]
        #[test_case("ABC1", Mode::Alphanumeric)]
        #[test_case("hello", Mode::Byte)]
        #[test_case("HELLO!", Mode::Byte)]
        #[test_case("é", Mode::Byte)]
        #[test_case("", Mode::Byte)]
        fn test_choose_mode(text: &str, exp: Mode) {
            assert_eq!(choose_mode(text, CharacterSet::default()), exp);
        }

        #[test]
        fn test_choose_kanji_mode() {
            let sjis = CharacterSet::from_label("Shift_JIS").unwrap();
            assert_eq!(choose_mode("点茗", sjis), Mode::Kanji);
            assert_eq!(choose_mode("点茗", CharacterSet::from_label("UTF-8").unwrap()), Mode::Byte);
            assert_eq!(choose_mode("AB", sjis), Mode::Alphanumeric);
            assert_eq!(choose_mode("ab", sjis), Mode::Byte);
            assert_eq!(choose_mode("", sjis), Mode::Byte);
        }

        #[test]
        fn test_hello_world_codewords() {
            let (data, plan) =
                encode_payload("HELLO WORLD", ECLevel::M, CharacterSet::default(), None, None)
                    .unwrap();
            assert_eq!(*plan.version, 1);
            assert_eq!(plan.mode, Mode::Alphanumeric);
            assert_eq!(data.data(), b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11");
        }

        #[test]
        fn test_numeric_codewords() {
            let (data, plan) =
                encode_payload("01234567", ECLevel::M, CharacterSet::default(), None, None)
                    .unwrap();
            assert_eq!(plan.mode, Mode::Numeric);
            assert_eq!(
                data.data(),
                [
                    0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
                    0x11, 0xEC, 0x11
                ]
            );
        }

        #[test]
        fn test_eci_header() {
            let utf8 = CharacterSet::from_label("UTF-8").unwrap();
            let (data, plan) = encode_payload("é", ECLevel::L, utf8, None, None).unwrap();
            assert_eq!(plan.mode, Mode::Byte);
            assert_eq!(data.data()[..7], [0x71, 0xA4, 0x02, 0xC3, 0xA9, 0x00, 0xEC]);
            assert_eq!(data.len(), plan.data_bytes * 8);
        }

        #[test]
        fn test_no_eci_for_default_charset() {
            let (data, _) =
                encode_payload("é", ECLevel::L, CharacterSet::default(), None, None).unwrap();
            assert_eq!(data.data()[..3], [0x40, 0x1E, 0x90]);
        }

        #[test]
        fn test_kanji_codewords() {
            let sjis = CharacterSet::from_label("Shift_JIS").unwrap();
            let (data, plan) = encode_payload("点茗", ECLevel::H, sjis, None, None).unwrap();
            assert_eq!(plan.mode, Mode::Kanji);
            // 1000 00000010 0110110011111 1101010101010 0000
            assert_eq!(data.data()[..5], [0x80, 0x26, 0xCF, 0xEA, 0xA8]);
        }

        #[test_case("a".repeat(2953), ECLevel::L, 40)]
        #[test_case("1".repeat(7089), ECLevel::L, 40)]
        #[test_case("A".repeat(4296), ECLevel::L, 40)]
        #[test_case("1".repeat(41), ECLevel::L, 1)]
        #[test_case("1".repeat(42), ECLevel::L, 2)]
        #[test_case("a".repeat(17), ECLevel::L, 1)]
        #[test_case("a".repeat(7), ECLevel::H, 1)]
        #[test_case("a".repeat(8), ECLevel::H, 2)]
        fn test_version_search(text: String, ecl: ECLevel, exp: usize) {
            let (data, plan) =
                encode_payload(&text, ecl, CharacterSet::default(), None, None).unwrap();
            assert_eq!(*plan.version, exp);
            assert_eq!(data.len(), plan.data_bytes * 8);
        }

        #[test_case("a".repeat(2954))]
        #[test_case("1".repeat(7090))]
        #[test_case("A".repeat(4297))]
        fn test_data_too_long(text: String) {
            let res = encode_payload(&text, ECLevel::L, CharacterSet::default(), None, None);
            assert_eq!(res.unwrap_err(), QRError::DataTooLong);
        }

        #[test]
        fn test_eci_counts_toward_capacity() {
            let utf8 = CharacterSet::from_label("UTF-8").unwrap();
            let fits = encode_payload(&"a".repeat(2952), ECLevel::L, utf8, None, None);
            assert_eq!(*fits.unwrap().1.version, 40);
            let overflow = encode_payload(&"a".repeat(2953), ECLevel::L, utf8, None, None);
            assert_eq!(overflow.unwrap_err(), QRError::DataTooLong);
        }

        #[test]
        fn test_pinned_version() {
            let ver = Version::new(5).unwrap();
            let (_, plan) =
                encode_payload("HELLO", ECLevel::Q, CharacterSet::default(), Some(ver), None)
                    .unwrap();
            assert_eq!(plan.version, ver);
            let res = encode_payload(
                &"a".repeat(100),
                ECLevel::Q,
                CharacterSet::default(),
                Some(Version::new(2).unwrap()),
                None,
            );
            assert_eq!(res.unwrap_err(), QRError::DataTooLong);
        }

        #[test]
        fn test_forced_mode() {
            let cs = CharacterSet::default();
            let (_, plan) = encode_payload("123", ECLevel::L, cs, None, Some(Mode::Byte)).unwrap();
            assert_eq!(plan.mode, Mode::Byte);
            let res = encode_payload("12a", ECLevel::L, cs, None, Some(Mode::Numeric));
            assert_eq!(res.unwrap_err(), QRError::InvalidChar);
            let res = encode_payload("abc", ECLevel::L, cs, None, Some(Mode::Kanji));
            assert_eq!(res.unwrap_err(), QRError::InvalidChar);
        }

        #[test]
        fn test_unmappable_char() {
            let res = encode_payload("€", ECLevel::L, CharacterSet::default(), None, None);
            assert_eq!(res.unwrap_err(), QRError::InvalidChar);
        }

        #[test]
        fn test_plan_figures() {
            let plan = plan(0, Mode::Byte, ECLevel::Q, 0, Some(Version::new(5).unwrap())).unwrap();
            assert_eq!(plan.matrix_width, 37);
            assert_eq!(plan.total_bytes, 134);
            assert_eq!(plan.data_bytes, 62);
            assert_eq!(plan.rs_blocks, 4);
            assert_eq!(plan.ec_bytes_total, 72);
            assert_eq!(plan.chosen_mask, None);
            let mask = MaskPattern::new(6).unwrap();
            assert_eq!(plan.with_mask(mask).chosen_mask, Some(mask));
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitArray;
    use crate::common::codec::{Mode, ECI_DESIGNATOR_BITS, PADDING_CODEWORDS};
    use crate::common::error::{QRError, QRResult};

    pub fn push_eci(designator: u8, out: &mut BitArray) {
        out.push_bits(Mode::Eci as u8, Mode::INDICATOR_BITS);
        out.push_bits(designator, ECI_DESIGNATOR_BITS);
    }

    pub fn push_header(
        mode: Mode,
        char_cnt: usize,
        cnt_bits: usize,
        out: &mut BitArray,
    ) -> QRResult<()> {
        if char_cnt >= (1 << cnt_bits) {
            return Err(QRError::DataTooLong);
        }
        out.push_bits(mode as u8, Mode::INDICATOR_BITS);
        out.push_bits(char_cnt as u32, cnt_bits);
        Ok(())
    }

    pub fn push_payload(mode: Mode, data: &[u8], out: &mut BitArray) -> QRResult<()> {
        match mode {
            Mode::Numeric => push_numeric_data(data, out),
            Mode::Alphanumeric => push_alphanumeric_data(data, out),
            Mode::Byte => push_byte_data(data, out),
            Mode::Kanji => push_kanji_data(data, out),
            Mode::Eci => Err(QRError::InvalidChar),
        }
    }

    fn push_numeric_data(data: &[u8], out: &mut BitArray) -> QRResult<()> {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            out.push_bits(Mode::Numeric.encode_chunk(chunk)?, len);
        }
        Ok(())
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitArray) -> QRResult<()> {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk)?, len);
        }
        Ok(())
    }

    fn push_byte_data(data: &[u8], out: &mut BitArray) -> QRResult<()> {
        out.extend_bytes(data);
        Ok(())
    }

    fn push_kanji_data(data: &[u8], out: &mut BitArray) -> QRResult<()> {
        for pair in data.chunks(2) {
            out.push_bits(Mode::Kanji.encode_chunk(pair)?, 13);
        }
        Ok(())
    }

    pub fn push_terminator(out: &mut BitArray, bit_capacity: usize) {
        let bit_len = out.len();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitArray, bit_capacity: usize) {
        push_padding_bits(out);
        push_padding_codewords(out, bit_capacity);
    }

    fn push_padding_bits(out: &mut BitArray) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitArray, bit_capacity: usize) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = bit_capacity.saturating_sub(out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
