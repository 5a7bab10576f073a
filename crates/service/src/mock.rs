//! In-memory repositories and a recording mailer for tests and doc examples.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use models::business::{self, BusinessChanges};
use models::errors::ModelError;
use models::product::{self, NewProduct, ProductChanges};
use models::{product_image, user};

use crate::auth::repository::UserRepository;
use crate::business::repository::BusinessRepository;
use crate::mail::{MailError, Mailer, OutgoingMail};
use crate::product::repository::ProductRepository;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, user::Model>,
    businesses: BTreeMap<i32, business::Model>,
    products: BTreeMap<i32, product::Model>,
    images: BTreeMap<i32, product_image::Model>,
    links: Vec<(i32, i32)>, // (product_id, product_image_id)
    next_id: i32,
}

impl Tables {
    fn next(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mirrors the relational store closely enough for service and router tests:
/// unique columns conflict, a user gets its business on insert, deletes cascade.
#[derive(Default)]
pub struct MockStore {
    tables: Mutex<Tables>,
}

impl MockStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_user_by_id(&self, id: i32) -> Result<Option<user::Model>, ModelError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ModelError> {
        Ok(self.lock().users.values().find(|u| u.username == username.trim()).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, ModelError> {
        Ok(self.lock().users.values().find(|u| u.email == email.trim()).cloned())
    }

    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<user::Model, ModelError> {
        user::validate_username(username)?;
        user::validate_email(email)?;
        let (username, email) = (username.trim().to_string(), email.trim().to_string());
        let mut t = self.lock();
        if t.users.values().any(|u| u.username == username || u.email == email) {
            return Err(ModelError::Conflict("user".into()));
        }
        let business_name = business::default_name(&username);
        if t.businesses.values().any(|b| b.name == business_name) {
            return Err(ModelError::Conflict("business".into()));
        }
        let created = user::Model {
            id: t.next(),
            username,
            email,
            password: password_hash.to_string(),
            is_verified: false,
            join_date: Utc::now().into(),
        };
        let biz = business::Model {
            id: t.next(),
            name: business_name,
            city: business::UNSPECIFIED.into(),
            region: business::UNSPECIFIED.into(),
            description: business::UNSPECIFIED.into(),
            logo: business::DEFAULT_LOGO.into(),
            owner_id: created.id,
        };
        t.businesses.insert(biz.id, biz);
        t.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn mark_verified(&self, id: i32) -> Result<user::Model, ModelError> {
        let mut t = self.lock();
        let u = t.users.get_mut(&id).ok_or_else(|| ModelError::not_found("user"))?;
        u.is_verified = true;
        Ok(u.clone())
    }
}

#[async_trait]
impl BusinessRepository for MockStore {
    async fn find_business(&self, id: i32) -> Result<Option<business::Model>, ModelError> {
        Ok(self.lock().businesses.get(&id).cloned())
    }

    async fn find_business_by_owner(&self, owner_id: i32) -> Result<Option<business::Model>, ModelError> {
        Ok(self.lock().businesses.values().find(|b| b.owner_id == owner_id).cloned())
    }

    async fn update_business(&self, id: i32, changes: BusinessChanges) -> Result<business::Model, ModelError> {
        changes.validate()?;
        let mut t = self.lock();
        if let Some(name) = &changes.name {
            if t.businesses.values().any(|b| b.id != id && b.name == name.trim()) {
                return Err(ModelError::Conflict("business".into()));
            }
        }
        let b = t.businesses.get_mut(&id).ok_or_else(|| ModelError::not_found("business"))?;
        if let Some(name) = changes.name { b.name = name.trim().to_string(); }
        if let Some(city) = changes.city { b.city = city.trim().to_string(); }
        if let Some(region) = changes.region { b.region = region.trim().to_string(); }
        if let Some(description) = changes.description { b.description = description; }
        if let Some(logo) = changes.logo { b.logo = logo; }
        Ok(b.clone())
    }
}

#[async_trait]
impl ProductRepository for MockStore {
    async fn create_product(&self, business_id: i32, input: NewProduct) -> Result<product::Model, ModelError> {
        let pricing = input.validate()?;
        let mut t = self.lock();
        let name = input.name.trim().to_string();
        if t.products.values().any(|p| p.name == name) {
            return Err(ModelError::Conflict("product".into()));
        }
        let created = product::Model {
            id: t.next(),
            name,
            category: input.category.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| business::UNSPECIFIED.into()),
            description: input.description,
            original_price: pricing.original_price,
            current_price: pricing.current_price,
            percentage_discount: pricing.percentage_discount,
            offer_expiration_date: input.offer_expiration_date.unwrap_or_else(|| Utc::now().date_naive()),
            business_id,
            featured_image: None,
        };
        t.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_product(&self, id: i32) -> Result<Option<product::Model>, ModelError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn list_products(&self, page_idx: u64, per_page: u64) -> Result<Vec<product::Model>, ModelError> {
        let skip = (page_idx * per_page) as usize;
        Ok(self.lock().products.values().skip(skip).take(per_page as usize).cloned().collect())
    }

    async fn update_product(&self, id: i32, mut changes: ProductChanges) -> Result<product::Model, ModelError> {
        changes.validate()?;
        let mut t = self.lock();
        if let Some(name) = &changes.name {
            if t.products.values().any(|p| p.id != id && p.name == name.trim()) {
                return Err(ModelError::Conflict("product".into()));
            }
        }
        let p = t.products.get_mut(&id).ok_or_else(|| ModelError::not_found("product"))?;
        if let Some(name) = changes.name { p.name = name.trim().to_string(); }
        if let Some(category) = changes.category { p.category = category; }
        if let Some(description) = changes.description { p.description = description; }
        if let Some(price) = changes.original_price { p.original_price = price; }
        if let Some(price) = changes.current_price { p.current_price = price; }
        if let Some(date) = changes.offer_expiration_date { p.offer_expiration_date = date; }
        Ok(p.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<bool, ModelError> {
        let mut t = self.lock();
        t.links.retain(|(pid, _)| *pid != id);
        Ok(t.products.remove(&id).is_some())
    }

    async fn attach_image(&self, product_id: i32, filename: &str) -> Result<product_image::Model, ModelError> {
        let mut t = self.lock();
        if !t.products.contains_key(&product_id) {
            return Err(ModelError::not_found("product"));
        }
        let image = product_image::Model { id: t.next(), image: filename.to_string() };
        t.images.insert(image.id, image.clone());
        t.links.push((product_id, image.id));
        if let Some(p) = t.products.get_mut(&product_id) {
            if p.featured_image.is_none() {
                p.featured_image = Some(filename.to_string());
            }
        }
        Ok(image)
    }

    async fn product_images(&self, p: &product::Model) -> Result<Vec<product_image::Model>, ModelError> {
        let t = self.lock();
        Ok(t.links
            .iter()
            .filter(|(pid, _)| *pid == p.id)
            .filter_map(|(_, iid)| t.images.get(iid).cloned())
            .collect())
    }
}

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Poll until at least `n` messages arrived (mail goes out on a spawned task).
    pub async fn wait_for(&self, n: usize) -> Vec<OutgoingMail> {
        for _ in 0..200 {
            let sent = self.sent();
            if sent.len() >= n {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).push(mail);
        Ok(())
    }
}
