//! Closed enumerations stored as string tags.
//!
//! Every tag is parsed strictly: an unknown `status`, `type`, `icon` or
//! `color` is a validation error, never a pass-through string.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::{parse_enum, ValidationError};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Canonical wire tags, in declaration order.
            pub const TAGS: &'static [&'static str] = &[$($tag),+];

            const ACCEPTED: &'static [(&'static str, $name)] = &[
                $(($tag, $name::$variant), $(($alias, $name::$variant),)*)+
            ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                parse_enum($field, value, Self::ACCEPTED, Self::TAGS)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::try_from(raw.as_str()).map_err(D::Error::custom)
            }
        }
    };
}

wire_enum!(
    /// Progress status shared by phases and entries.
    Status, field = "status" {
        Planned => "Planned",
        InProgress => "In Progress" | "InProgress",
        Completed => "Completed",
    }
);

wire_enum!(
    /// Kind of learning artifact an entry records.
    EntryType, field = "type" {
        Project => "project",
        Lab => "lab",
        Certification => "certification",
        Exercise => "exercise",
        Note => "note",
    }
);

wire_enum!(
    /// Icon tag rendered on a journey card.
    Icon, field = "icon" {
        Cloud => "cloud",
        Server => "server",
        Terminal => "terminal",
        Code => "code",
        Database => "database",
        Shield => "shield",
        Network => "network",
        Cpu => "cpu",
        Book => "book",
        Rocket => "rocket",
    }
);

wire_enum!(
    /// Accent color tag for a journey.
    Color, field = "color" {
        Blue => "blue",
        Cyan => "cyan",
        Teal => "teal",
        Green => "green",
        Yellow => "yellow",
        Orange => "orange",
        Red => "red",
        Pink => "pink",
        Purple => "purple",
        Indigo => "indigo",
    }
);

impl Default for Status {
    fn default() -> Self {
        Status::Planned
    }
}
