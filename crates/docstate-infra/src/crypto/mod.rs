//! Text cipher filter pair.

pub mod aescbc;
