mod dot_taiko_register;

pub use dot_taiko_register::{DotTaikoIndexer, DOT_TAIKO_ADDRESSES};
