pub use super::csv_records::Entity as CsvRecords;
pub use super::images::Entity as Images;
pub use super::login_attempts::Entity as LoginAttempts;
pub use super::users::Entity as Users;
