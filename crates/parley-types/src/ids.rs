//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Actors, dimensions and pending deliveries each get a distinct newtype so
//! the compiler rejects an actor id where a dimension id is expected. All
//! ids use UUID v7 (time-ordered), which keeps log output roughly sortable
//! by creation time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a message participant (player or other actor).
    ActorId
}

define_id! {
    /// Unique identifier for a disjoint spatial region ("dimension").
    ///
    /// Distances are only comparable between two locations in the same
    /// dimension.
    DimensionId
}

define_id! {
    /// Unique identifier for a missive waiting in the delivery queue.
    DeliveryId
}
