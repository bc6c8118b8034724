//! Equipment and room catalogs.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::{BookingError, BookingResult};
use crate::model::{CatalogItem, ImageUpload, NewCatalogItem, ResourceKind, ResourceRef};
use crate::store::{DocumentStore, FileStorage};

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStorage>,
    image_prefix: String,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
        image_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            files,
            image_prefix: image_prefix.into(),
        }
    }

    /// Adds an equipment item. Equipment must come with an image.
    pub async fn add_equipment(
        &self,
        form: NewCatalogItem,
        image: Option<ImageUpload>,
    ) -> BookingResult<CatalogItem> {
        let image = image.ok_or_else(|| BookingError::validation("Please choose an image"))?;
        self.add(ResourceKind::Equipment, form, Some(image)).await
    }

    /// Adds a room; the image is optional.
    pub async fn add_room(
        &self,
        form: NewCatalogItem,
        image: Option<ImageUpload>,
    ) -> BookingResult<CatalogItem> {
        self.add(ResourceKind::Room, form, image).await
    }

    async fn add(
        &self,
        kind: ResourceKind,
        form: NewCatalogItem,
        image: Option<ImageUpload>,
    ) -> BookingResult<CatalogItem> {
        form.validate()?;
        let image_url = match image {
            Some(image) => {
                image.validate()?;
                let path = format!("{}/{}", self.image_prefix, image.file_name);
                Some(self.files.upload(&path, image.bytes).await?)
            }
            None => None,
        };

        let mut item = form.into_item(image_url, Utc::now());
        item.id = self
            .store
            .create(kind.collection(), serde_json::to_value(&item)?)
            .await?;
        info!(collection = kind.collection(), id = %item.id, name = %item.name, "catalog item added");
        Ok(item)
    }

    /// Items of one catalog ordered by name.
    pub async fn list(&self, kind: ResourceKind) -> BookingResult<Vec<CatalogItem>> {
        let mut items = self
            .store
            .query(kind.collection(), &[])
            .await?
            .into_iter()
            .map(|doc| doc.decode::<CatalogItem>())
            .collect::<BookingResult<Vec<_>>>()?;
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    pub async fn list_equipment(&self) -> BookingResult<Vec<CatalogItem>> {
        self.list(ResourceKind::Equipment).await
    }

    pub async fn list_rooms(&self) -> BookingResult<Vec<CatalogItem>> {
        self.list(ResourceKind::Room).await
    }

    pub async fn get(&self, resource: &ResourceRef) -> BookingResult<CatalogItem> {
        self.store
            .get(resource.kind.collection(), &resource.id)
            .await?
            .ok_or_else(|| BookingError::not_found(resource.kind.label(), &resource.id))?
            .decode()
    }

    pub async fn get_equipment(&self, id: &str) -> BookingResult<CatalogItem> {
        self.get(&ResourceRef::equipment(id)).await
    }

    pub async fn get_room(&self, id: &str) -> BookingResult<CatalogItem> {
        self.get(&ResourceRef::room(id)).await
    }
}
