/// File extensions accepted by the image import, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub mod limits {

    pub const DEFAULT_HISTORY_LIMIT: u64 = 10;

    pub const MAX_HISTORY_LIMIT: u64 = 100;
}
