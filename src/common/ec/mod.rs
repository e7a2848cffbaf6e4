pub mod block;
pub mod galois;
pub mod rs;

pub use block::interleave_with_ec_bytes;
