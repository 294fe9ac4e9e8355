use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSection {
    pub dist: String,
    pub delete: bool,
    pub collision: String, // "overwrite", "skip", "rename", "backup", "fail"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PathsSection {
    pub base_dir: String, // empty means the executable's directory
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LogSection {
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub sort: SortSection,
    pub paths: PathsSection,
    pub log: LogSection,
}

impl Default for SortSection {
    fn default() -> Self {
        Self {
            dist: "./dist".to_string(),
            delete: false,
            collision: "overwrite".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sort.dist, "./dist");
        assert!(!config.sort.delete);
        assert_eq!(config.sort.collision, "overwrite");
        assert!(config.paths.base_dir.is_empty());
        assert!(!config.log.verbose);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[sort]\ncollision = \"rename\"\n").unwrap();
        assert_eq!(config.sort.collision, "rename");
        assert_eq!(config.sort.dist, "./dist");
    }

    #[test]
    fn test_default_serializes_and_parses_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("[sort]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sort.dist, "./dist");
    }
}
