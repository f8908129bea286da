pub mod score;

pub use score::word_value;
