//! Typed documents for the four collections and the assignment state machine.
//!
//! Documents are schemaless JSON in the store. These types read them
//! leniently (missing arrays are empty, empty-string references are absent)
//! and serialize back to the same camelCase field names, so the engine can
//! diff a working copy against what it read and write only changed fields.

mod artist;
mod artwork;
mod assignment;
mod id;
mod location;
mod show;

pub use artist::{Artist, ArtistRole, ArtistStatus};
pub use artwork::{Artwork, NewArtwork};
pub use assignment::{Assignment, ShowStatus, Transition, TransitionError};
pub use id::{generate_artwork_id, validate_id};
pub use location::Location;
pub use show::{Show, ShowState};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::Collection;

/// A document type stored in one collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send {
    /// Collection holding documents of this type.
    const COLLECTION: Collection;

    /// Document id.
    fn id(&self) -> &str;
}

/// `Option<String>` stored as a plain string where `""` means absent.
pub(crate) mod empty_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}

/// Implements lossless string conversions for a status-like enum with an
/// `Other(String)` catch-all, so unknown stored values survive a round trip.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Stored string form.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                let known = match raw.as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                };
                match known {
                    Some(value) => value,
                    None => $name::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use string_enum;
