pub mod hash;

pub use hash::md5_hex;
