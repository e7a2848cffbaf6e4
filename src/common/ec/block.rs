use std::ops::Deref;

use log::trace;
use rayon::prelude::*;

use super::galois::QR_CODE_FIELD_256;
use super::rs::ReedSolomonEncoder;
use crate::common::bit_utils::BitArray;
use crate::common::error::{QRError, QRResult};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPair {
    pub data_bytes: Vec<u8>,
    pub ec_bytes: Vec<u8>,
}

/// Data & EC byte counts of a block. The trailing `total % blocks` blocks carry one
/// extra data byte.
pub fn num_bytes_for_block(
    total_bytes: usize,
    data_bytes: usize,
    rs_blocks: usize,
    block_id: usize,
) -> QRResult<(usize, usize)> {
    if rs_blocks == 0 || block_id >= rs_blocks {
        return Err(QRError::RsBlocksMismatch);
    }

    let group2_blocks = total_bytes % rs_blocks;
    let group1_blocks = rs_blocks - group2_blocks;
    let group1_total = total_bytes / rs_blocks;
    let group2_total = group1_total + 1;
    let group1_data = data_bytes / rs_blocks;
    let group2_data = group1_data + 1;
    let group1_ec = group1_total.checked_sub(group1_data).ok_or(QRError::EcBytesMismatch)?;
    let group2_ec = group2_total - group2_data;

    if group1_ec != group2_ec {
        return Err(QRError::EcBytesMismatch);
    }
    if rs_blocks != group1_blocks + group2_blocks {
        return Err(QRError::RsBlocksMismatch);
    }
    if total_bytes
        != (group1_data + group1_ec) * group1_blocks + (group2_data + group2_ec) * group2_blocks
    {
        return Err(QRError::TotalBytesMismatch);
    }

    if block_id < group1_blocks {
        Ok((group1_data, group1_ec))
    } else {
        Ok((group2_data, group2_ec))
    }
}

/// Splits data codewords into RS blocks, computes their EC bytes in parallel and
/// interleaves data then EC bytes across blocks.
pub fn interleave_with_ec_bytes(
    bits: &BitArray,
    total_bytes: usize,
    data_bytes: usize,
    rs_blocks: usize,
) -> QRResult<BitArray> {
    if bits.size_in_bytes() != data_bytes {
        return Err(QRError::CapacityMismatch);
    }

    let mut layout = Vec::with_capacity(rs_blocks);
    let mut offset = 0;
    for block_id in 0..rs_blocks {
        let (num_data, num_ec) = num_bytes_for_block(total_bytes, data_bytes, rs_blocks, block_id)?;
        layout.push((offset, num_data, num_ec));
        offset += num_data;
    }
    if offset != data_bytes {
        return Err(QRError::CapacityMismatch);
    }

    // Every block shares one EC length, so one generator serves them all
    let ec_len = layout.first().map_or(0, |&(_, _, ec)| ec);
    let encoder = ReedSolomonEncoder::new(&QR_CODE_FIELD_256, ec_len);
    let blocks = layout
        .par_iter()
        .map(|&(offset, num_data, _)| {
            let data_bytes = bits.to_bytes(offset << 3, num_data);
            let ec_bytes = encoder.encode(&data_bytes)?;
            Ok(BlockPair { data_bytes, ec_bytes })
        })
        .collect::<QRResult<Vec<_>>>()?;
    trace!("Split {} data bytes into {} blocks with {ec_len} ec bytes each", data_bytes, blocks.len());

    let data_blocks = blocks.iter().map(|b| b.data_bytes.as_slice()).collect::<Vec<_>>();
    let ec_blocks = blocks.iter().map(|b| b.ec_bytes.as_slice()).collect::<Vec<_>>();
    let mut res = BitArray::with_capacity(total_bytes << 3);
    res.extend_bytes(&interleave(&data_blocks));
    res.extend_bytes(&interleave(&ec_blocks));

    if res.size_in_bytes() != total_bytes {
        return Err(QRError::InterleaveMismatch);
    }
    Ok(res)
}

/// Takes the i-th element of every block that has one, for increasing i.
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

#[cfg(test)]
mod block_tests {
    use test_case::test_case;

    use super::{interleave, interleave_with_ec_bytes, num_bytes_for_block};
    use crate::common::bit_utils::BitArray;
    use crate::common::error::QRError;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }

    // 5-Q: 2 blocks of 15 data bytes followed by 2 blocks of 16
    #[test_case(0, (15, 18))]
    #[test_case(1, (15, 18))]
    #[test_case(2, (16, 18))]
    #[test_case(3, (16, 18))]
    fn test_num_bytes_for_block(block_id: usize, exp: (usize, usize)) {
        assert_eq!(num_bytes_for_block(134, 62, 4, block_id), Ok(exp));
    }

    #[test]
    fn test_block_split_for_every_symbol() {
        for ver in Version::all() {
            for ecl in ECLevel::ALL {
                let blocks = ver.rs_blocks(ecl);
                let total = ver.total_codewords();
                let data = ver.data_codewords(ecl);
                let sum = (0..blocks)
                    .map(|b| num_bytes_for_block(total, data, blocks, b).unwrap())
                    .fold(0, |acc, (d, e)| acc + d + e);
                assert_eq!(sum, total, "Version {} {ecl:?}", *ver);
            }
        }
    }

    #[test]
    fn test_ec_bytes_mismatch() {
        assert_eq!(num_bytes_for_block(26, 30, 1, 0), Err(QRError::EcBytesMismatch));
        assert_eq!(num_bytes_for_block(134, 62, 4, 4), Err(QRError::RsBlocksMismatch));
    }

    #[test]
    fn test_single_block() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let res = interleave_with_ec_bytes(&BitArray::from_bytes(msg), 26, 16, 1).unwrap();
        let mut exp = msg.to_vec();
        exp.extend_from_slice(b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
        assert_eq!(res.data(), exp);
    }

    #[test]
    fn test_multi_block() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let exp_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let res = interleave_with_ec_bytes(&BitArray::from_bytes(msg), 134, 62, 4).unwrap();
        let out = res.data();
        assert_eq!(out.len(), 134);

        // First column of data then last data byte of the longer blocks
        assert_eq!(out[..4], [msg[0], msg[15], msg[30], msg[46]]);
        assert_eq!(out[60..62], [msg[45], msg[61]]);
        let ec_blocks = exp_ec.iter().map(|e| e.to_vec()).collect::<Vec<_>>();
        assert_eq!(out[62..], interleave(&ec_blocks)[..]);
    }

    #[test]
    fn test_capacity_mismatch() {
        let res = interleave_with_ec_bytes(&BitArray::from_bytes(&[0; 15]), 26, 16, 1);
        assert_eq!(res.unwrap_err(), QRError::CapacityMismatch);
    }
}
