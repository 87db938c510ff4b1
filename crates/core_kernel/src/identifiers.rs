//! Strongly-typed identifiers for domain entities
//!
//! Every aggregate is keyed by a UUID wrapped in its own newtype, so a
//! `JeuneId` can never be handed to a repository expecting a `ConseillerId`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Consumes the identifier, yielding the UUID stored in the database
            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Beneficiaire domain identifiers
define_id!(JeuneId, "JEU");
define_id!(ConseillerId, "CON");
define_id!(AgenceId, "AGC");
define_id!(ListeDeDiffusionId, "LDD");
define_id!(SuggestionId, "SUG");

// Action domain identifiers
define_id!(ActionId, "ACT");
define_id!(CommentaireId, "COM");

// Rendez-vous domain identifiers
define_id!(RendezVousId, "RDV");

// Scheduling identifiers
define_id!(SuiviJobId, "SJB");
