pub mod prelude;

pub mod csv_records;
pub mod images;
pub mod login_attempts;
pub mod users;
