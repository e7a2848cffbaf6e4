use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit array
//------------------------------------------------------------------------------

/// Growable sequence of bits packed most significant bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitArray {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity((bit_capacity + 7) >> 3), len: 0 }
    }

    pub fn from_bytes(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size_in_bytes(&self) -> usize {
        (self.len + 7) >> 3
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "Out of bitarray bounds: Len {}, Pos {}", self.len, pos);

        self.data[pos >> 3] & (0b10000000 >> (pos & 7)) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

// Push bits for bit array
//------------------------------------------------------------------------------

impl BitArray {
    /// Appends the lowest `size` bits of `bits`, most significant first.
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(size <= max_bits, "Bit count exceeds type width: Size {size}");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );

        for i in (0..size).rev() {
            self.push((bits >> i) & T::one() == T::one());
        }
    }

    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    pub fn append(&mut self, other: &BitArray) {
        if self.len & 7 == 0 {
            self.data.extend_from_slice(&other.data);
            self.len += other.len;
        } else {
            other.iter().for_each(|b| self.push(b));
        }
    }

    pub fn extend_bytes(&mut self, arr: &[u8]) {
        if self.len & 7 == 0 {
            self.data.extend_from_slice(arr);
            self.len += arr.len() << 3;
        } else {
            arr.iter().for_each(|b| self.push_bits(*b, 8));
        }
    }

    /// Packs `count` bytes starting at `bit_offset`, padding past the end with zeros.
    pub fn to_bytes(&self, bit_offset: usize, count: usize) -> Vec<u8> {
        let mut res = vec![0; count];
        let mut pos = bit_offset;
        for byte in res.iter_mut() {
            for _ in 0..8 {
                *byte <<= 1;
                if pos < self.len && self.get(pos) {
                    *byte |= 1;
                }
                pos += 1;
            }
        }
        res
    }
}
