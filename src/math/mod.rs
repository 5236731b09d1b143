pub mod decompose;
pub mod element;
pub mod encode;
pub mod matrix;
pub mod params;
pub mod poly;
pub mod poly_q;
pub mod ring;
pub mod sampling;
pub mod toeplitz;
pub mod vector;

mod ntt;
mod prime;

#[cfg(test)]
pub(crate) mod utils;
