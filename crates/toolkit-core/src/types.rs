//! Strong domain types for the toolkit engine.
//!
//! Newtypes keep product ids and entity names from being mixed up with
//! arbitrary strings, and the closed [`Action`] and [`HttpMethod`] enums make
//! the normalized vocabulary explicit.
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::{Action, EntityName, HttpMethod, ProductId};
//!
//! let product = ProductId::new("hubspot");
//! let entity = EntityName::new("contacts");
//! let action: Action = "list".parse().unwrap();
//! let method: HttpMethod = "get".parse().unwrap();
//!
//! assert_eq!(product.as_str(), "hubspot");
//! assert_eq!(entity.singular(), "contact");
//! assert_eq!(action, Action::List);
//! assert_eq!(method, HttpMethod::Get);
//! ```

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known entity names of the normalized vocabulary.
///
/// The vocabulary is open: adapters may emit other names, which simply rank
/// lowest during scoring.
pub mod entities {
    /// People records (`persons` in Pipedrive, `contacts` in HubSpot).
    pub const CONTACTS: &str = "contacts";
    /// Companies and organizations.
    pub const ORGANISATIONS: &str = "organisations";
    /// Sales opportunities.
    pub const DEALS: &str = "deals";
    /// Calls, meetings, tasks.
    pub const ACTIVITIES: &str = "activities";
    /// Accounting invoices.
    pub const INVOICES: &str = "invoices";
    /// Catalog products.
    pub const PRODUCTS: &str = "products";
    /// Support tickets.
    pub const TICKETS: &str = "tickets";
    /// Deal / quote line items.
    pub const LINE_ITEMS: &str = "line_items";
    /// Sales quotes.
    pub const QUOTES: &str = "quotes";
}

/// Product identifier (newtype over String).
///
/// The internal key of an integrated product, e.g. `hubspot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalized entity name (newtype over String).
///
/// Entity names are plural (`contacts`, `activities`); [`EntityName::singular`]
/// derives the form used in per-record operation names such as
/// `get_contact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Creates a new entity name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the entity name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the singular form of the entity name.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::EntityName;
    ///
    /// assert_eq!(EntityName::new("contacts").singular(), "contact");
    /// assert_eq!(EntityName::new("activities").singular(), "activity");
    /// assert_eq!(EntityName::new("line_items").singular(), "line_item");
    /// assert_eq!(EntityName::new("address").singular(), "address");
    /// ```
    #[must_use]
    pub fn singular(&self) -> String {
        let name = self.0.as_str();
        if let Some(stem) = name.strip_suffix("ies") {
            format!("{stem}y")
        } else if name.ends_with("ss") {
            name.to_string()
        } else if let Some(stem) = name.strip_suffix('s') {
            stem.to_string()
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One of the five normalized CRUD operation kinds.
///
/// Variant order is the presentation order used by mappings
/// (`list`, `get`, `create`, `update`, `delete`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read a collection of records.
    List,
    /// Read one record by identifier.
    Get,
    /// Create a record.
    Create,
    /// Modify a record by identifier.
    Update,
    /// Remove a record by identifier.
    Delete,
}

impl Action {
    /// All actions in presentation order.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// Returns the lowercase name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` if the action addresses a single existing record.
    #[must_use]
    pub const fn requires_identifier(&self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }

    /// Returns `true` for actions that send a request body.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "get" => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(Error::Config {
                message: format!(
                    "invalid action: '{s}' (expected: list, get, create, update, or delete)"
                ),
            }),
        }
    }
}

/// HTTP methods a capability may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the uppercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::Config {
                message: format!("unsupported HTTP method: '{s}'"),
            }),
        }
    }
}
