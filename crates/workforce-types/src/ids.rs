//! Type-safe identifier wrappers.
//!
//! Run identifiers wrap a UUID v7 (time-ordered). Event identifiers wrap a
//! UUID v5 derived from the event's stable key, so that re-running a year
//! reproduces the exact same ids. Business keys that arrive from the census
//! or the scenario definition (employee, scenario, plan design) are string
//! newtypes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Namespace for deriving deterministic event ids (UUID v5).
const EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93d0_4b7a_8e15_c0d7_5a92_e3b1);

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a `String` business key.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from anything string-like.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a single pipeline run.
    RunId
}

impl RunId {
    /// Create a new run identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

define_id! {
    /// Unique identifier for a simulation event.
    EventId
}

impl EventId {
    /// Derive an event id from the event's stable key.
    ///
    /// The same key always yields the same id, across processes and runs.
    pub fn derive(stable_key: &str) -> Self {
        Self(Uuid::new_v5(&EVENT_NAMESPACE, stable_key.as_bytes()))
    }
}

define_key! {
    /// Census identifier of an employee (e.g. `EMP_000123`, `NH_2026_000004`).
    EmployeeId
}

define_key! {
    /// Identifier of the scenario a run belongs to.
    ScenarioId
}

define_key! {
    /// Identifier of the plan design whose parameters drive a run.
    PlanDesignId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_event_ids_are_stable() {
        let a = EventId::derive("baseline:default:EMP_1:2025:hire:1");
        let b = EventId::derive("baseline:default:EMP_1:2025:hire:1");
        let c = EventId::derive("baseline:default:EMP_1:2025:hire:2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let id = EmployeeId::new("EMP_000001");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"EMP_000001\""));
    }

    #[test]
    fn run_ids_are_distinct() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
