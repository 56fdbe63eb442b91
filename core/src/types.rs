//! Domain DTOs for the people collection.
//!
//! # Design
//! These mirror the mock server's schema but are defined independently so
//! the core never depends on Axum types. Integration tests catch drift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::link::Link;

/// Request payload for creating a person: the only field the loader sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
}

/// A person resource as returned by the API, with its HAL links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
}

impl Person {
    pub fn self_href(&self) -> Option<&str> {
        self.links.get("self").map(|l| l.href.as_str())
    }
}
