mod ma;

pub use ma::*;
