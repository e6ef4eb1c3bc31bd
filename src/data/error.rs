#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("row {row}: cannot parse sample date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: concentration {value} is not a finite number")]
    InvalidConcentration { row: usize, value: f64 },

    #[error("sample table has no rows")]
    Empty,
}
