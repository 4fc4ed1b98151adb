//! Objects used to encode the path finding problem into boolean formulas, and to decode their models.

mod path_decoder;
pub use path_decoder::PathDecoder;

mod reduction_encoder;
pub use reduction_encoder::path_var;
pub use reduction_encoder::symbol_var;
pub use reduction_encoder::ReductionEncoder;
