#![doc = include_str!("../README.md")]

pub mod vector;

pub use vector::Iter;
pub use vector::Vector;
