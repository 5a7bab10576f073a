pub mod errors;
pub mod db;
pub mod user;
pub mod business;
pub mod product;
pub mod product_image;
pub mod product_product_image;

#[cfg(test)]
mod tests;
