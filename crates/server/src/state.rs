use std::sync::Arc;

use service::auth::repository::UserRepository;
use service::auth::token::TokenIssuer;
use service::auth::AuthService;
use service::business::repository::BusinessRepository;
use service::business::BusinessService;
use service::mail::Mailer;
use service::product::repository::ProductRepository;
use service::product::ProductService;
use service::storage::ImageStore;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub auth: AuthService,
    pub businesses: BusinessService,
    pub products: ProductService,
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

impl ServerState {
    /// Wire the services over one store that backs every repository.
    pub fn new<S>(store: Arc<S>, mailer: Arc<dyn Mailer>, cfg: &configs::AppConfig) -> Self
    where
        S: UserRepository + BusinessRepository + ProductRepository + 'static,
    {
        let base_url = cfg.server.base_url.trim_end_matches('/').to_string();
        let images = Arc::new(ImageStore::from_config(&cfg.media));
        let auth = AuthService::new(store.clone(), TokenIssuer::from_config(&cfg.auth), mailer, base_url.clone());
        let businesses = BusinessService::new(store.clone(), images.clone(), base_url.clone());
        let products = ProductService::new(store.clone(), store, images, base_url);
        Self {
            auth,
            businesses,
            products,
            static_dir: cfg.media.static_dir.clone(),
            max_upload_bytes: cfg.media.max_upload_bytes,
        }
    }
}
