//! Conversion of a W3C `Link` response header into HAL `_links`.
//!
//! ```text
//! <http://localhost:8080/persons>; rel="persons",<http://localhost:8080/profile/persons>; rel="profile"
//! ```
//! becomes
//! ```json
//! {"_links": {"persons": {"href": "http://localhost:8080/persons"},
//!             "profile": {"href": "http://localhost:8080/profile/persons"}}}
//! ```
//!
//! # Design
//! Bracket and quote removal is positional: exactly one character is dropped
//! from each end of the trimmed part, whatever those characters are. Only
//! structural problems (wrong part count, no `=`, nothing left after
//! stripping) are reported, as `ApiError::MalformedLinkHeader`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const PROFILE: &str = "profile";

/// One `<url>; rel="name"` segment of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHeaderEntry {
    pub relation: String,
    pub href: String,
}

/// A single HAL link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// HAL `_links`: relation name to link, unique per relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLinks {
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, Link>,
}

impl HalLinks {
    pub fn get(&self, relation: &str) -> Option<&Link> {
        self.links.get(relation)
    }

    pub fn href(&self, relation: &str) -> Option<&str> {
        self.get(relation).map(|l| l.href.as_str())
    }

    /// The `href` of `relation`, or `MissingRelation`.
    pub fn require(&self, relation: &str) -> Result<&str, ApiError> {
        self.href(relation)
            .ok_or_else(|| ApiError::MissingRelation(relation.to_string()))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<LinkHeaderEntry> for HalLinks {
    /// Later entries with the same relation overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = LinkHeaderEntry>>(iter: I) -> Self {
        let links = iter
            .into_iter()
            .map(|e| (e.relation, Link { href: e.href }))
            .collect();
        HalLinks { links }
    }
}

/// Parse a `Link` header into HAL links.
pub fn parse_link_header(header: &str) -> Result<HalLinks, ApiError> {
    Ok(parse_link_entries(header)?.into_iter().collect())
}

/// Parse a `Link` header into its entries, in header order.
pub fn parse_link_entries(header: &str) -> Result<Vec<LinkHeaderEntry>, ApiError> {
    header.split(',').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<LinkHeaderEntry, ApiError> {
    let malformed = || ApiError::MalformedLinkHeader {
        segment: segment.to_string(),
    };

    let parts: Vec<&str> = segment.split(';').collect();
    let [target, rel] = parts.as_slice() else {
        return Err(malformed());
    };

    let href = strip_ends(target.trim()).ok_or_else(malformed)?;
    let (_, quoted) = rel.split_once('=').ok_or_else(malformed)?;
    let relation = strip_ends(quoted.trim()).ok_or_else(malformed)?;

    if href.is_empty() || relation.is_empty() {
        return Err(malformed());
    }

    Ok(LinkHeaderEntry {
        relation: relation.to_string(),
        href: href.to_string(),
    })
}

/// Drop exactly one character from each end, or `None` if there are fewer
/// than two.
fn strip_ends(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}
