//! Named asset registry

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::config::Config;
use super::handle::AssetHandle;
use super::AssetError;
use crate::renderer::Sprite;

/// The kinds of asset a manager can load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Sprite,
    Config,
    Text,
}

/// A loaded asset of any kind
#[derive(Debug, Clone)]
pub enum Asset {
    Sprite(AssetHandle<Sprite>),
    Config(AssetHandle<Config>),
    Text(AssetHandle<String>),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Sprite(_) => AssetKind::Sprite,
            Self::Config(_) => AssetKind::Config,
            Self::Text(_) => AssetKind::Text,
        }
    }
}

/// Assets keyed by name, loaded from paths relative to a root directory
#[derive(Debug)]
pub struct AssetManager {
    root: PathBuf,
    assets: FxHashMap<String, Asset>,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assets: FxHashMap::default(),
        }
    }

    /// Directory asset paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load `path` (relative to the root) as `kind` and store it under `name`,
    /// replacing any asset already stored there
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if a
    /// config file has an unsupported extension
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>, kind: AssetKind) -> Result<Asset, AssetError> {
        match kind {
            AssetKind::Sprite => self.load_sprite(name, path).map(Asset::Sprite),
            AssetKind::Config => self.load_config(name, path).map(Asset::Config),
            AssetKind::Text => self.load_text(name, path).map(Asset::Text),
        }
    }

    /// Load an image as a sprite
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or decoded
    pub fn load_sprite(&mut self, name: &str, path: impl AsRef<Path>) -> Result<AssetHandle<Sprite>, AssetError> {
        let full_path = self.root.join(path);
        let sprite = AssetHandle::new(Sprite::load(&full_path)?);
        self.store(name, &full_path, Asset::Sprite(sprite.clone()));
        Ok(sprite)
    }

    /// Load a YAML, JSON or RON config file
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported extensions, unreadable files or
    /// malformed content
    pub fn load_config(&mut self, name: &str, path: impl AsRef<Path>) -> Result<AssetHandle<Config>, AssetError> {
        let full_path = self.root.join(path);
        let config = AssetHandle::new(Config::load(&full_path)?);
        self.store(name, &full_path, Asset::Config(config.clone()));
        Ok(config)
    }

    /// Load a UTF-8 text file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn load_text(&mut self, name: &str, path: impl AsRef<Path>) -> Result<AssetHandle<String>, AssetError> {
        let full_path = self.root.join(path);
        let text = std::fs::read_to_string(&full_path).map_err(|source| AssetError::Io {
            path: full_path.clone(),
            source,
        })?;
        let text = AssetHandle::new(text);
        self.store(name, &full_path, Asset::Text(text.clone()));
        Ok(text)
    }

    fn store(&mut self, name: &str, path: &Path, asset: Asset) {
        log::debug!("Loaded {:?} asset {name:?} from {}", asset.kind(), path.display());
        if self.assets.insert(name.to_owned(), asset).is_some() {
            log::debug!("Asset {name:?} replaced");
        }
    }

    /// Store an already-built asset under `name`
    pub fn insert(&mut self, name: &str, asset: Asset) {
        self.assets.insert(name.to_owned(), asset);
    }

    /// Look up an asset, warning when it does not exist
    pub fn get(&self, name: &str) -> Option<Asset> {
        let asset = self.assets.get(name).cloned();
        if asset.is_none() {
            log::warn!("Asset with key {name:?} does not exist");
        }
        asset
    }

    pub fn sprite(&self, name: &str) -> Option<AssetHandle<Sprite>> {
        match self.get(name)? {
            Asset::Sprite(sprite) => Some(sprite),
            other => {
                log::warn!("Asset {name:?} is a {:?}, not a sprite", other.kind());
                None
            }
        }
    }

    pub fn config(&self, name: &str) -> Option<AssetHandle<Config>> {
        match self.get(name)? {
            Asset::Config(config) => Some(config),
            other => {
                log::warn!("Asset {name:?} is a {:?}, not a config", other.kind());
                None
            }
        }
    }

    pub fn text(&self, name: &str) -> Option<AssetHandle<String>> {
        match self.get(name)? {
            Asset::Text(text) => Some(text),
            other => {
                log::warn!("Asset {name:?} is a {:?}, not text", other.kind());
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Drop the manager's handle to an asset. Unknown names are ignored.
    pub fn unload(&mut self, name: &str) -> Option<Asset> {
        self.assets.remove(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_load_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("car.png"), 4, 2);
        std::fs::write(dir.path().join("config.yaml"), "cars:\n  sf25_path: car.png\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let mut assets = AssetManager::new(dir.path());
        let config = assets.load_config("config", "config.yaml").unwrap();
        let sprite_path = config.get_str(&["cars", "sf25_path"]).unwrap().to_owned();
        let sprite = assets.load_sprite("car", sprite_path).unwrap();
        let text = assets.load_text("notes", "notes.txt").unwrap();

        assert_eq!(sprite.source().size(), (4, 2));
        assert_eq!(text.as_str(), "hello");
        assert_eq!(assets.len(), 3);
        assert_eq!(assets.get("car").map(|a| a.kind()), Some(AssetKind::Sprite));
    }

    #[test]
    fn test_missing_asset_is_none() {
        let assets = AssetManager::new(".");
        assert!(assets.get("nothing").is_none());
        assert!(assets.sprite("nothing").is_none());
    }

    #[test]
    fn test_kind_mismatch_is_none() {
        let mut assets = AssetManager::new(".");
        assets.insert("greeting", Asset::Text(AssetHandle::new("hi".to_owned())));
        assert!(assets.sprite("greeting").is_none());
        assert!(assets.config("greeting").is_none());
        assert_eq!(assets.text("greeting").unwrap().as_str(), "hi");
    }

    #[test]
    fn test_unsupported_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "a = 1").unwrap();

        let mut assets = AssetManager::new(dir.path());
        let err = assets.load_config("config", "config.toml").unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedConfigFormat { .. }));
        assert!(!assets.contains("config"));
    }

    #[test]
    fn test_unload_keeps_outstanding_handles() {
        let mut assets = AssetManager::new(".");
        let text = AssetHandle::new("kept".to_owned());
        assets.insert("text", Asset::Text(text.clone()));

        assert!(assets.unload("text").is_some());
        assert!(assets.unload("text").is_none());
        assert!(assets.is_empty());
        assert_eq!(text.as_str(), "kept");
    }
}
