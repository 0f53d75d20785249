//! Shared setup for catalog service tests.

#![allow(dead_code)]

use std::sync::Arc;

use publikasi_catalog::memory::{MemoryStore, StubCoverRenderer};
use publikasi_catalog::Catalog;
use publikasi_core::{
    Actor, Category, CategoryInput, Publication, PublicationMetadata, Role, UploadedFile,
    UserAccount,
};

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n";

pub struct Harness {
    pub store: MemoryStore,
    pub catalog: Catalog,
    pub admin: UserAccount,
    pub uploader: UserAccount,
}

impl Harness {
    /// Catalog with one admin and one regular uploader, covers enabled.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let admin = store.add_user("admin@bps.go.id", Role::Admin);
        let uploader = store.add_user("uploader@bps.go.id", Role::User);
        let backends = store
            .backends()
            .with_covers(Arc::new(StubCoverRenderer::new(store.clone())));
        Self {
            catalog: Catalog::new(backends),
            store,
            admin,
            uploader,
        }
    }

    /// Catalog without a cover renderer.
    pub fn without_covers() -> Self {
        let store = MemoryStore::new();
        let admin = store.add_user("admin@bps.go.id", Role::Admin);
        let uploader = store.add_user("uploader@bps.go.id", Role::User);
        Self {
            catalog: Catalog::new(store.backends()),
            store,
            admin,
            uploader,
        }
    }

    pub fn admin_actor(&self) -> Actor {
        Actor::admin(self.admin.id)
    }

    pub fn uploader_actor(&self) -> Actor {
        Actor::user(self.uploader.id)
    }

    pub async fn root(&self, name: &str) -> Category {
        self.catalog
            .categories
            .create(CategoryInput::new(name))
            .await
            .unwrap()
    }

    pub async fn child(&self, name: &str, parent: &Category) -> Category {
        self.catalog
            .categories
            .create(CategoryInput::new(name).with_parent(parent.id))
            .await
            .unwrap()
    }

    pub async fn upload(&self, title: &str, year: i32, category: &Category) -> Publication {
        self.catalog
            .publications
            .upload(
                PublicationMetadata::new(title, year, category.id),
                pdf("report.pdf"),
                &self.uploader_actor(),
            )
            .await
            .unwrap()
    }
}

pub fn pdf(name: &str) -> UploadedFile {
    UploadedFile::pdf(name, PDF_BYTES.to_vec())
}
