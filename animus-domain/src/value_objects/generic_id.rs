// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Generic, type-safe entity identifier built on top of a UUID v4.
//!
//! Each entity in the system gets its own marker type so that, for example,
//! a `ProjectId` and a `DatasetId` cannot be swapped at a call site even
//! though both wrap the same underlying `Uuid` representation.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

use crate::GovernanceError;

/// Per-category validation hook for [`GenericId`].
pub trait IdCategory {
    fn category_name() -> &'static str;

    fn validate_id(id: &Uuid) -> Result<(), GovernanceError> {
        if id.is_nil() {
            return Err(GovernanceError::invalid(format!("{} id cannot be nil", Self::category_name())));
        }
        Ok(())
    }
}

/// Generic identifier value object that concrete entity IDs wrap.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct GenericId<T: IdCategory> {
    value: Uuid,
    _phantom: PhantomData<T>,
}

impl<T: IdCategory> Serialize for GenericId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.to_string().serialize(serializer)
    }
}

impl<'de, T: IdCategory> Deserialize<'de> for GenericId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = Uuid::parse_str(&s).map_err(|e| serde::de::Error::custom(e.to_string()))?;
        Ok(Self { value, _phantom: PhantomData })
    }
}

impl<T: IdCategory> GenericId<T> {
    /// Generates a fresh, random identifier.
    pub fn new() -> Self {
        Self { value: Uuid::new_v4(), _phantom: PhantomData }
    }

    pub fn from_uuid(value: Uuid) -> Result<Self, GovernanceError> {
        T::validate_id(&value)?;
        Ok(Self { value, _phantom: PhantomData })
    }

    pub fn from_string(s: &str) -> Result<Self, GovernanceError> {
        let value = Uuid::parse_str(s).map_err(|e| GovernanceError::invalid(format!("invalid id format: {e}")))?;
        Self::from_uuid(value)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.value
    }

    pub fn category(&self) -> &'static str {
        T::category_name()
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        T::validate_id(&self.value)
    }

    pub fn is_nil(&self) -> bool {
        self.value.is_nil()
    }

    #[cfg(test)]
    pub fn nil() -> Self {
        Self { value: Uuid::nil(), _phantom: PhantomData }
    }
}

impl<T: IdCategory> Default for GenericId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdCategory> Display for GenericId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T: IdCategory> Hash for GenericId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdCategory> FromStr for GenericId<T> {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl<T: IdCategory> From<GenericId<T>> for Uuid {
    fn from(id: GenericId<T>) -> Self {
        id.value
    }
}

impl<T: IdCategory> AsRef<Uuid> for GenericId<T> {
    fn as_ref(&self) -> &Uuid {
        &self.value
    }
}

/// Declares a newtype wrapper around [`GenericId`] for a single entity category.
///
/// Expands to a marker type, the public `XId(GenericId<XMarker>)` struct, and
/// the delegating inherent methods every entity id needs (`new`, `parse`,
/// `as_uuid`, `Display`, `FromStr`, serde).
#[macro_export]
macro_rules! define_id {
    ($name:ident, $category:literal) => {
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name($crate::value_objects::generic_id::GenericId<marker::Marker>);

        #[doc(hidden)]
        mod marker {
            #[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
            pub struct Marker;

            impl $crate::value_objects::generic_id::IdCategory for Marker {
                fn category_name() -> &'static str {
                    $category
                }
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self($crate::value_objects::generic_id::GenericId::new())
            }

            pub fn parse(s: &str) -> Result<Self, $crate::GovernanceError> {
                Ok(Self($crate::value_objects::generic_id::GenericId::from_string(s)?))
            }

            pub fn from_uuid(value: uuid::Uuid) -> Result<Self, $crate::GovernanceError> {
                Ok(Self($crate::value_objects::generic_id::GenericId::from_uuid(value)?))
            }

            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0.as_uuid()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::GovernanceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
    struct TestEntity;

    impl IdCategory for TestEntity {
        fn category_name() -> &'static str {
            "test"
        }
    }

    type TestId = GenericId<TestEntity>;

    #[test]
    fn ids_are_unique() {
        assert_ne!(TestId::new(), TestId::new());
    }

    #[test]
    fn roundtrips_through_json() {
        let id = TestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn nil_id_fails_validation() {
        assert!(TestId::nil().validate().is_err());
    }
}
