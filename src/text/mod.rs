// Text preparation layer: chunking, transcript cleaning, normalization
pub mod chunk;
pub mod clean;
pub mod normalize;
pub mod stopwords;

pub use chunk::chunk;
pub use clean::clean_transcript;
pub use normalize::normalize;
