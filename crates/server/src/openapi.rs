use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegistrationRequest { pub username: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub access_token: String, pub token_type: String }

#[derive(ToSchema)]
pub struct BusinessUpdateRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

#[derive(ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    #[schema(example = "20.00")]
    pub original_price: String,
    #[schema(example = "15.00")]
    pub current_price: String,
    #[schema(format = Date)]
    pub offer_expiration_date: Option<String>,
}

#[derive(ToSchema)]
pub struct ProductUpdateRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub original_price: Option<String>,
    pub current_price: Option<String>,
    #[schema(format = Date)]
    pub offer_expiration_date: Option<String>,
}

#[derive(ToSchema)]
pub struct UploadRequest {
    #[schema(format = Binary)]
    pub file: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::registration,
        crate::routes::auth::token,
        crate::routes::auth::verification,
        crate::routes::users::me,
        crate::routes::business::get,
        crate::routes::business::update,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::uploads::profile,
        crate::routes::uploads::product,
    ),
    components(
        schemas(
            HealthResponse,
            RegistrationRequest,
            TokenRequest,
            TokenResponse,
            BusinessUpdateRequest,
            ProductRequest,
            ProductUpdateRequest,
            UploadRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "business"),
        (name = "products"),
        (name = "uploads")
    )
)]
pub struct ApiDoc;
