pub mod concatenator;
pub mod line_matrix;
pub mod text;

pub use concatenator::{ConcatEntry, ConcatProgress, ConcatReport, Concatenator};
pub use line_matrix::{LineMatrix, LineMatrixBuilder, MatrixShape, RaggedPolicy};
pub use text::read_text;
