use std::{io::Cursor, path::PathBuf};

use image::{imageops::FilterType, DynamicImage, ImageFormat};
use thiserror::Error;
use tokio::fs;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File extension not allowed")]
    ExtensionNotAllowed,
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("image io error: {0}")]
    Io(String),
}

/// Lower-cased extension of an uploaded file name, if it is one we accept.
pub fn allowed_extension(filename: &str) -> Result<String, MediaError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(MediaError::ExtensionNotAllowed)?;
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) { Ok(ext) } else { Err(MediaError::ExtensionNotAllowed) }
}

/// `{20 hex chars}.{ext}`
pub fn random_filename(ext: &str) -> String {
    let bytes: [u8; 10] = rand::random();
    let stem: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{stem}.{ext}")
}

/// Public URL of a stored image.
pub fn image_url(base_url: &str, filename: &str) -> String {
    format!("{}/static/images/{}", base_url.trim_end_matches('/'), filename)
}

/// Decodes, resizes and writes uploaded images.
#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
    width: u32,
    height: u32,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(dir: P, width: u32, height: u32) -> Self {
        Self { dir: dir.into(), width, height }
    }

    pub fn from_config(cfg: &configs::MediaConfig) -> Self {
        Self::new(cfg.images_dir(), cfg.image_width, cfg.image_height)
    }

    pub fn dir(&self) -> &PathBuf { &self.dir }

    /// Store `bytes` uploaded as `original_name`; returns the generated file name.
    pub async fn save(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        let ext = allowed_extension(original_name)?;
        let format = ImageFormat::from_extension(&ext).ok_or(MediaError::ExtensionNotAllowed)?;
        let (width, height) = (self.width, self.height);

        let encoded = tokio::task::spawn_blocking(move || resize_and_encode(&bytes, format, width, height))
            .await
            .map_err(|e| MediaError::Io(e.to_string()))??;

        fs::create_dir_all(&self.dir).await.map_err(|e| MediaError::Io(e.to_string()))?;
        let filename = random_filename(&ext);
        fs::write(self.dir.join(&filename), encoded)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;
        tracing::debug!(%filename, width, height, "image_stored");
        Ok(filename)
    }

    /// Delete a stored file. Failures are logged; a missing file is not an error.
    pub async fn remove(&self, filename: &str) {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            tracing::warn!(%filename, "refusing to remove image outside the store");
            return;
        }
        match fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => tracing::debug!(%filename, "image_removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(%filename, error = %e, "image_remove_failed"),
        }
    }
}

fn resize_and_encode(bytes: &[u8], format: ImageFormat, width: u32, height: u32) -> Result<Vec<u8>, MediaError> {
    let img = image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;
    let mut resized = img.resize_exact(width, height, FilterType::Lanczos3);
    if format == ImageFormat::Jpeg {
        // jpeg has no alpha channel
        resized = DynamicImage::ImageRgb8(resized.to_rgb8());
    }
    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, format)
        .map_err(|e| MediaError::Io(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([200, 150, 0, 128])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("bee_images_{}", uuid::Uuid::new_v4()));
        ImageStore::new(dir, 200, 200)
    }

    #[test]
    fn extension_rules() {
        assert_eq!(allowed_extension("logo.PNG").unwrap(), "png");
        assert_eq!(allowed_extension("a.b.jpeg").unwrap(), "jpeg");
        assert!(allowed_extension("shell.gif").is_err());
        assert!(allowed_extension("noext").is_err());
        assert!(allowed_extension("png").is_err());
    }

    #[test]
    fn random_names_are_twenty_hex_chars() {
        let a = random_filename("png");
        let (stem, ext) = a.split_once('.').unwrap();
        assert_eq!(stem.len(), 20);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
        assert_ne!(a, random_filename("png"));
    }

    #[test]
    fn urls_point_at_static_images() {
        assert_eq!(image_url("http://localhost:8000/", "x.png"), "http://localhost:8000/static/images/x.png");
    }

    #[tokio::test]
    async fn saved_png_is_resized() {
        let store = temp_store();
        let name = store.save("photo.png", png_bytes(640, 480)).await.unwrap();
        let written = image::open(store.dir().join(&name)).unwrap();
        assert_eq!((written.width(), written.height()), (200, 200));
        fs::remove_dir_all(store.dir()).await.ok();
    }

    #[tokio::test]
    async fn rgba_upload_saved_as_jpeg() {
        let store = temp_store();
        let name = store.save("photo.jpg", png_bytes(50, 80)).await.unwrap();
        assert!(name.ends_with(".jpg"));
        let written = image::open(store.dir().join(&name)).unwrap();
        assert_eq!((written.width(), written.height()), (200, 200));
        fs::remove_dir_all(store.dir()).await.ok();
    }

    #[tokio::test]
    async fn non_image_bytes_fail_to_decode() {
        let store = temp_store();
        let err = store.save("fake.png", b"definitely not a png".to_vec()).await.unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[tokio::test]
    async fn remove_deletes_only_stored_names() {
        let store = temp_store();
        let name = store.save("photo.png", png_bytes(10, 10)).await.unwrap();
        let outside = store.dir().with_extension("keep");
        fs::write(&outside, b"x").await.unwrap();
        let escape = format!("../{}", outside.file_name().unwrap().to_string_lossy());

        store.remove(&escape).await;
        assert!(outside.exists());
        store.remove(&name).await;
        assert!(!store.dir().join(&name).exists());
        // second removal is a no-op
        store.remove(&name).await;

        fs::remove_file(&outside).await.ok();
        fs::remove_dir_all(store.dir()).await.ok();
    }

    #[tokio::test]
    async fn disallowed_extension_never_touches_disk() {
        let store = temp_store();
        let err = store.save("anim.gif", png_bytes(4, 4)).await.unwrap_err();
        assert!(matches!(err, MediaError::ExtensionNotAllowed));
        assert!(!store.dir().exists());
    }
}
