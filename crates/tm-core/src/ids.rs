//! String-backed identifier wrappers.
//!
//! Upstream feeds identify vehicles, routes, and stops with opaque strings
//! (`"1234_A..N03R"`, `"L"`, `"A32N"`), so unlike dense integer indices these
//! wrap a `String`.  All ids are `Ord + Hash` so they key both `HashMap`s and
//! ordered `BTreeMap`s without ceremony.

use std::fmt;

/// Generate a typed id wrapper around a `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A tracked moving object (one vehicle), stable across polls.
    pub struct EntityId;
}

string_id! {
    /// A transit line; keys the route path index.
    pub struct RouteId;
}

string_id! {
    /// A platform or stop.  The trailing character may carry a direction.
    pub struct StopId;
}
