//! Domain types for the supplier portal with strong typing.
//!
//! Suppliers are a closed set, so they are modelled as an enum rather than
//! free-form strings; IDs use the Newtype pattern to prevent mixing.

pub mod navigation;
pub mod session;

pub use navigation::{NavAction, Page};
pub use session::SessionState;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two business partners served by the portal.
///
/// Each supplier has its own image folder, raw-data CSV and clusters CSV
/// (see [`crate::config::SuppliersConfig`]).
///
/// # Examples
///
/// ```rust
/// use supplier_portal::domain::Supplier;
///
/// let supplier: Supplier = "md-elektronik".parse().unwrap();
/// assert_eq!(supplier.display_name(), "MD ELEKTRONIK");
/// assert_eq!(supplier.slug(), "md-elektronik");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Supplier {
    MdElektronik,
    Rosenberger,
}

impl Supplier {
    pub const ALL: [Self; 2] = [Self::MdElektronik, Self::Rosenberger];

    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::MdElektronik => "md-elektronik",
            Self::Rosenberger => "rosenberger",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::MdElektronik => "MD ELEKTRONIK",
            Self::Rosenberger => "Rosenberger",
        }
    }

    /// File name offered when downloading this supplier's clusters CSV.
    #[must_use]
    pub fn clusters_download_name(&self) -> String {
        format!(
            "clusters_{}.csv",
            self.display_name().to_lowercase().replace(' ', "_")
        )
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Supplier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|supplier| {
                supplier.slug().eq_ignore_ascii_case(s)
                    || supplier.display_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("Unknown supplier: {s}"))
    }
}

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_parses_slug_and_display_name() {
        assert_eq!("rosenberger".parse::<Supplier>(), Ok(Supplier::Rosenberger));
        assert_eq!(
            "MD ELEKTRONIK".parse::<Supplier>(),
            Ok(Supplier::MdElektronik)
        );
        assert!("leoni".parse::<Supplier>().is_err());
    }

    #[test]
    fn supplier_serde_uses_slug() {
        let json = serde_json::to_string(&Supplier::MdElektronik).unwrap();
        assert_eq!(json, "\"md-elektronik\"");
        let back: Supplier = serde_json::from_str("\"rosenberger\"").unwrap();
        assert_eq!(back, Supplier::Rosenberger);
    }

    #[test]
    fn clusters_download_name_is_lowercase_with_underscores() {
        assert_eq!(
            Supplier::MdElektronik.clusters_download_name(),
            "clusters_md_elektronik.csv"
        );
        assert_eq!(
            Supplier::Rosenberger.clusters_download_name(),
            "clusters_rosenberger.csv"
        );
    }

    #[test]
    fn user_id_display() {
        let id = UserId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
