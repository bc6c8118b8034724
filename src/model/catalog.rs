use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Record};
use crate::error::{BookingError, BookingResult};
use crate::Id;

/// Which catalog a bookable resource comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Equipment,
    Room,
}

impl ResourceKind {
    pub const fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Equipment => "equipment",
            ResourceKind::Room => "rooms",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ResourceKind::Equipment => "Equipment",
            ResourceKind::Room => "Room",
        }
    }
}

/// Points at one bookable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: Id,
}

impl ResourceRef {
    pub fn equipment(id: impl Into<Id>) -> Self {
        Self {
            kind: ResourceKind::Equipment,
            id: id.into(),
        }
    }

    pub fn room(id: impl Into<Id>) -> Self {
        Self {
            kind: ResourceKind::Room,
            id: id.into(),
        }
    }

    /// Subcollection holding this resource's bookings, e.g. `equipment/{id}/bookings`.
    pub fn bookings_collection(&self) -> String {
        format!("{}/{}/bookings", self.kind.collection(), self.id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.collection(), self.id)
    }
}

/// An equipment item or room listed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(skip)]
    pub id: Id,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    /// Older equipment documents store the link under `image`.
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub type Equipment = CatalogItem;
pub type Room = CatalogItem;

impl Record for CatalogItem {
    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// The add-equipment / add-room form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCatalogItem {
    pub name: String,
    pub kind: String,
    pub description: String,
}

impl NewCatalogItem {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> BookingResult<()> {
        require(&self.name, "Name is required")?;
        require(&self.kind, "Type is required")
    }

    pub fn into_item(self, image_url: Option<String>, created_at: DateTime<Utc>) -> CatalogItem {
        CatalogItem {
            id: Id::new(),
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            description: self.description,
            image_url,
            created_at: Some(created_at),
        }
    }
}

/// An image file picked in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// File names become storage paths, so they must be a single plain segment.
    pub fn validate(&self) -> BookingResult<()> {
        require(&self.file_name, "Image file name is required")?;
        if self.file_name.contains('/') || self.file_name.contains('\\') || self.file_name == ".." {
            return Err(BookingError::validation(format!(
                "Invalid image file name '{}'",
                self.file_name
            )));
        }
        if self.bytes.is_empty() {
            return Err(BookingError::validation("Image file is empty"));
        }
        Ok(())
    }
}
