pub mod csv_record;
pub mod image;
pub mod login_attempt;
pub mod user;

/// Rows per multi-row INSERT, kept well under SQLite's bound-parameter limit.
pub const INSERT_BATCH_SIZE: usize = 400;
