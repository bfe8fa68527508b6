//! # Image gateway — recipe images on the local filesystem
//!
//! Images are not database rows: each one is a file under
//! `<dir>/recipes/<recipe id>/<filename>`, so a recipe's images are always
//! scoped under its id. Filenames carrying path separators or dot
//! components are rejected before any filesystem call, keeping every path
//! inside the configured base directory.

use std::path::PathBuf;

use store::Image;

use crate::error::Error;

/// File-backed storage for recipe images.
#[derive(Clone, Debug)]
pub struct ImageService {
    dir: PathBuf,
}

impl ImageService {
    /// `dir` is the base images directory from
    /// [`Settings`](crate::settings::Settings).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store `data` as `filename` under the recipe's image directory.
    pub async fn create(
        &self,
        recipe_id: i64,
        filename: &str,
        data: &[u8],
    ) -> Result<Image, Error> {
        check_filename(filename)?;
        let dir = self.image_dir(recipe_id);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(filename), data).await?;
        Ok(Image {
            recipe_id,
            filename: filename.to_string(),
        })
    }

    /// List every image stored for a recipe, sorted by filename. A recipe
    /// without an image directory simply has no images.
    pub async fn by_recipe_id(&self, recipe_id: i64) -> Result<Vec<Image>, Error> {
        let dir = self.image_dir(recipe_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            images.push(Image {
                recipe_id,
                filename: entry.file_name().to_string_lossy().into_owned(),
            });
        }
        images.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(images)
    }

    /// Delete one stored image.
    pub async fn delete(&self, image: &Image) -> Result<(), Error> {
        check_filename(&image.filename)?;
        let path = self.image_dir(image.recipe_id).join(&image.filename);
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    fn image_dir(&self, recipe_id: i64) -> PathBuf {
        self.dir.join("recipes").join(recipe_id.to_string())
    }
}

fn check_filename(filename: &str) -> Result<(), Error> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(Error::FilenameInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (tempfile::TempDir, ImageService) {
        let dir = tempfile::tempdir().unwrap();
        let is = ImageService::new(dir.path());
        (dir, is)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (_dir, is) = service();

        is.create(7, "b-crumb.jpg", b"crumb").await.unwrap();
        is.create(7, "a-crust.jpg", b"crust").await.unwrap();
        is.create(8, "other.jpg", b"other").await.unwrap();

        let images = is.by_recipe_id(7).await.unwrap();
        assert_eq!(images.len(), 2);
        // Sorted by filename, scoped to the recipe.
        assert_eq!(images[0].filename, "a-crust.jpg");
        assert_eq!(images[1].filename, "b-crumb.jpg");
        assert_eq!(images[0].path(), "/images/recipes/7/a-crust.jpg");
    }

    #[tokio::test]
    async fn test_recipe_without_images_lists_empty() {
        let (_dir, is) = service();
        assert!(is.by_recipe_id(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_the_file() {
        let (_dir, is) = service();

        let image = is.create(7, "crust.jpg", b"crust").await.unwrap();
        is.delete(&image).await.unwrap();
        assert!(is.by_recipe_id(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_traversal_filenames_are_rejected() {
        let (_dir, is) = service();

        for filename in ["", ".", "..", "../evil.jpg", "a/b.jpg", "a\\b.jpg"] {
            let err = is.create(7, filename, b"x").await.unwrap_err();
            assert!(matches!(err, Error::FilenameInvalid), "{filename:?}");
        }
    }
}
