//! Structured key-value config assets

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AssetError;

/// Text formats a config asset can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

/// A parsed config tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config(Value);

impl Config {
    /// Read and parse a config file, choosing the parser by extension
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::UnsupportedConfigFormat`] for unknown
    /// extensions, or an I/O or parse error
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| AssetError::UnsupportedConfigFormat {
            path: path.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format).map_err(|message| AssetError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse config text in a known format
    ///
    /// # Errors
    ///
    /// Returns the parser's message if the text is malformed
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, String> {
        let value = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string())?,
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
            ConfigFormat::Ron => ron::from_str(text).map_err(|e| e.to_string())?,
        };
        Ok(Self(value))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Look up a nested value with a JSON pointer such as `/cars/sf25_path`
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// Look up a nested value by key path, e.g. `["cars", "welcome_text"]`
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(&self.0, |value, key| value.get(*key))
    }

    pub fn get_str(&self, keys: &[&str]) -> Option<&str> {
        self.get(keys).and_then(Value::as_str)
    }

    pub fn get_f64(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys).and_then(Value::as_f64)
    }

    /// Deserialize the whole tree into a typed structure
    ///
    /// # Errors
    ///
    /// Returns an error if the tree does not match `T`
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;

    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/config.yaml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("config.YML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("config.ron")), Some(ConfigFormat::Ron));
        assert_eq!(ConfigFormat::from_path(Path::new("config.toml")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), None);
    }

    #[test]
    fn test_formats_agree() {
        let yaml = Config::parse("cars:\n  welcome_text: hi\n  speed: 2.5\n", ConfigFormat::Yaml).unwrap();
        let json = Config::parse(r#"{"cars": {"welcome_text": "hi", "speed": 2.5}}"#, ConfigFormat::Json).unwrap();
        let ron = Config::parse(r#"{"cars": {"welcome_text": "hi", "speed": 2.5}}"#, ConfigFormat::Ron).unwrap();

        for config in [&yaml, &json, &ron] {
            assert_eq!(config.get_str(&["cars", "welcome_text"]), Some("hi"));
            assert_eq!(config.get_f64(&["cars", "speed"]), Some(2.5));
            assert_eq!(config.pointer("/cars/welcome_text"), config.get(&["cars", "welcome_text"]));
        }
    }

    #[test]
    fn test_missing_keys() {
        let config = Config::parse("a: 1", ConfigFormat::Yaml).unwrap();
        assert!(config.get(&["b"]).is_none());
        assert!(config.get_str(&["a"]).is_none());
        assert!(config.get(&["a", "deeper"]).is_none());
    }

    #[test]
    fn test_typed_deserialize() {
        #[derive(Deserialize)]
        struct Cars {
            sf25_path: String,
        }
        #[derive(Deserialize)]
        struct Root {
            cars: Cars,
        }

        let config = Config::parse("cars:\n  sf25_path: sf25.png\n", ConfigFormat::Yaml).unwrap();
        let root: Root = config.deserialize().unwrap();
        assert_eq!(root.cars.sf25_path, "sf25.png");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let unsupported = dir.path().join("config.ini");
        std::fs::write(&unsupported, "a=1").unwrap();
        assert!(matches!(
            Config::load(&unsupported),
            Err(AssetError::UnsupportedConfigFormat { .. })
        ));

        let broken = dir.path().join("config.json");
        let mut file = std::fs::File::create(&broken).unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(Config::load(&broken), Err(AssetError::Parse { .. })));

        assert!(matches!(
            Config::load(dir.path().join("missing.yaml")),
            Err(AssetError::Io { .. })
        ));
    }
}
