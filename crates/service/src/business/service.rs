use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use models::business::{self, BusinessChanges};
use models::user;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::repository::BusinessRepository;
use crate::access::ensure_owner;
use crate::errors::ServiceError;
use crate::storage::{image_store::image_url, ImageStore};

/// The caller's profile: user fields plus their business card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub business_name: String,
    pub bio: String,
    pub logo: String,
    pub owner_id: i32,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub join_date: DateTime<FixedOffset>,
}

#[derive(Clone)]
pub struct BusinessService {
    repo: Arc<dyn BusinessRepository>,
    images: Arc<ImageStore>,
    base_url: String,
}

impl BusinessService {
    pub fn new(repo: Arc<dyn BusinessRepository>, images: Arc<ImageStore>, base_url: impl Into<String>) -> Self {
        Self { repo, images, base_url: base_url.into() }
    }

    pub async fn get(&self, id: i32) -> Result<business::Model, ServiceError> {
        self.repo.find_business(id).await?.ok_or_else(|| ServiceError::not_found("business"))
    }

    pub async fn for_owner(&self, owner: &user::Model) -> Result<business::Model, ServiceError> {
        self.repo
            .find_business_by_owner(owner.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("business"))
    }

    pub async fn profile(&self, caller: &user::Model) -> Result<Profile, ServiceError> {
        let biz = self.for_owner(caller).await?;
        Ok(Profile {
            business_name: biz.name,
            bio: biz.description,
            logo: image_url(&self.base_url, &biz.logo),
            owner_id: biz.owner_id,
            username: caller.username.clone(),
            email: caller.email.clone(),
            verified: caller.is_verified,
            join_date: caller.join_date,
        })
    }

    #[instrument(skip(self, caller, changes), fields(caller_id = caller.id))]
    pub async fn update(&self, caller: &user::Model, id: i32, changes: BusinessChanges) -> Result<business::Model, ServiceError> {
        let biz = self.get(id).await?;
        ensure_owner(&biz, caller)?;
        let updated = self.repo.update_business(biz.id, changes).await?;
        info!(business_id = updated.id, "business_updated");
        Ok(updated)
    }

    /// Store a new logo for the caller's business; returns its public URL.
    #[instrument(skip(self, caller, bytes), fields(caller_id = caller.id, size = bytes.len()))]
    pub async fn upload_logo(&self, caller: &user::Model, original_name: &str, bytes: Vec<u8>) -> Result<String, ServiceError> {
        let biz = self.for_owner(caller).await?;
        let filename = self.images.save(original_name, bytes).await?;
        let changes = BusinessChanges { logo: Some(filename.clone()), ..Default::default() };
        if let Err(e) = self.repo.update_business(biz.id, changes).await {
            self.images.remove(&filename).await;
            return Err(e.into());
        }
        if biz.logo != business::DEFAULT_LOGO {
            self.images.remove(&biz.logo).await;
        }
        info!(business_id = biz.id, %filename, "logo_uploaded");
        Ok(image_url(&self.base_url, &filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::AuthError;
    use crate::auth::repository::UserRepository;
    use crate::mock::MockStore;
    use async_trait::async_trait;
    use models::errors::ModelError;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(8, 8, image::Rgb([9, 9, 9])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn temp_images() -> Arc<ImageStore> {
        Arc::new(ImageStore::new(std::env::temp_dir().join(format!("bee_logo_{}", uuid::Uuid::new_v4())), 200, 200))
    }

    fn stored_files(images: &ImageStore) -> Vec<String> {
        std::fs::read_dir(images.dir())
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.file_name().to_string_lossy().into_owned()).collect())
            .unwrap_or_default()
    }

    /// Reads from the mock store but refuses every write.
    struct ReadOnly(Arc<MockStore>);

    #[async_trait]
    impl BusinessRepository for ReadOnly {
        async fn find_business(&self, id: i32) -> Result<Option<business::Model>, ModelError> {
            self.0.find_business(id).await
        }
        async fn find_business_by_owner(&self, owner_id: i32) -> Result<Option<business::Model>, ModelError> {
            self.0.find_business_by_owner(owner_id).await
        }
        async fn update_business(&self, _id: i32, _changes: BusinessChanges) -> Result<business::Model, ModelError> {
            Err(ModelError::Db("read only".into()))
        }
    }

    async fn setup() -> (BusinessService, Arc<MockStore>, user::Model, user::Model) {
        let store = Arc::new(MockStore::default());
        let images = Arc::new(ImageStore::new(std::env::temp_dir().join(format!("bee_logo_{}", uuid::Uuid::new_v4())), 200, 200));
        let svc = BusinessService::new(store.clone(), images, "http://bee.test");
        let alice = store.create_user("alice", "alice@example.com", "hash").await.unwrap();
        let bob = store.create_user("bob", "bob@example.com", "hash").await.unwrap();
        (svc, store, alice, bob)
    }

    #[tokio::test]
    async fn profile_combines_user_and_business() {
        let (svc, _, alice, _) = setup().await;
        let profile = svc.profile(&alice).await.unwrap();
        assert_eq!(profile.business_name, "Business by alice");
        assert_eq!(profile.bio, business::UNSPECIFIED);
        assert_eq!(profile.logo, "http://bee.test/static/images/default.jpg");
        assert_eq!(profile.owner_id, alice.id);
        assert!(!profile.verified);
    }

    #[tokio::test]
    async fn owner_can_update_others_cannot() {
        let (svc, _, alice, bob) = setup().await;
        let biz = svc.for_owner(&alice).await.unwrap();

        let changes = BusinessChanges { city: Some("Kampala".into()), ..Default::default() };
        let updated = svc.update(&alice, biz.id, changes.clone()).await.unwrap();
        assert_eq!(updated.city, "Kampala");

        let err = svc.update(&bob, biz.id, changes).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::NotOwner)));
    }

    #[tokio::test]
    async fn missing_business_is_not_found() {
        let (svc, _, alice, _) = setup().await;
        assert!(matches!(svc.get(12345).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(&alice, 12345, BusinessChanges::default()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn bad_logo_extension_leaves_business_untouched() {
        let (svc, _, alice, _) = setup().await;
        let err = svc.upload_logo(&alice, "logo.gif", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Media(_)));
        assert_eq!(svc.for_owner(&alice).await.unwrap().logo, business::DEFAULT_LOGO);
    }

    #[tokio::test]
    async fn new_logo_replaces_the_old_file() {
        let store = Arc::new(MockStore::default());
        let images = temp_images();
        let svc = BusinessService::new(store.clone(), images.clone(), "http://bee.test");
        let alice = store.create_user("alice", "alice@example.com", "hash").await.unwrap();

        let first = svc.upload_logo(&alice, "a.png", png()).await.unwrap();
        let second = svc.upload_logo(&alice, "b.jpg", png()).await.unwrap();
        let kept = stored_files(&images);
        assert_eq!(kept.len(), 1);
        assert!(second.ends_with(&kept[0]));
        assert!(!first.ends_with(&kept[0]));
        tokio::fs::remove_dir_all(images.dir()).await.ok();
    }

    #[tokio::test]
    async fn failed_logo_update_leaves_no_file_behind() {
        let store = Arc::new(MockStore::default());
        let images = temp_images();
        let svc = BusinessService::new(Arc::new(ReadOnly(store.clone())), images.clone(), "http://bee.test");
        let alice = store.create_user("alice", "alice@example.com", "hash").await.unwrap();

        let err = svc.upload_logo(&alice, "a.png", png()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)), "{err:?}");
        assert!(stored_files(&images).is_empty());
        assert_eq!(svc.for_owner(&alice).await.unwrap().logo, business::DEFAULT_LOGO);
        tokio::fs::remove_dir_all(images.dir()).await.ok();
    }
}
