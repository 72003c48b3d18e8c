// Pipeline processing: column mapping, record building, founder extraction

pub mod founders;
pub mod mapping;
pub mod normalize;
