use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tripmode_core::rules::{
    normalize_extension, validate_max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS,
};

const APP_DIR: &str = "tripmode";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub default_owner: Option<String>,
    pub import: ImportConfig,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub max_file_size_bytes: u64,
    pub accepted_extensions: Vec<String>,
    pub csv: CsvColumnsConfig,
    pub macos_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvColumnsConfig {
    pub name_column: Option<String>,
    pub email_column: Option<String>,
    pub phone_column: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accepted_extensions: SUPPORTED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            csv: CsvColumnsConfig::default(),
            macos_group: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid import.max_file_size_bytes value: {0}")]
    InvalidMaxFileSize(u64),
    #[error("invalid import.accepted_extensions entry: {0}")]
    InvalidExtension(String),
    #[error("import.accepted_extensions must not be empty")]
    EmptyExtensions,
    #[error("invalid default_owner value")]
    InvalidDefaultOwner,
    #[error("invalid import.csv.{field}: column name must not be blank")]
    InvalidCsvColumn { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_owner: Option<String>,
    import: Option<ImportFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    max_file_size_bytes: Option<u64>,
    accepted_extensions: Option<Vec<String>>,
    macos_group: Option<String>,
    csv: Option<CsvColumnsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CsvColumnsFile {
    name_column: Option<String>,
    email_column: Option<String>,
    phone_column: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(owner) = parsed.default_owner {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ConfigError::InvalidDefaultOwner);
        }
        config.default_owner = Some(owner.to_string());
    }

    let Some(import) = parsed.import else {
        return Ok(config);
    };

    if let Some(max) = import.max_file_size_bytes {
        config.import.max_file_size_bytes =
            validate_max_upload_bytes(max).map_err(|_| ConfigError::InvalidMaxFileSize(max))?;
    }

    if let Some(extensions) = import.accepted_extensions {
        if extensions.is_empty() {
            return Err(ConfigError::EmptyExtensions);
        }
        let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
        for raw in extensions {
            let ext = normalize_extension(&raw).map_err(|_| ConfigError::InvalidExtension(raw))?;
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        config.import.accepted_extensions = normalized;
    }

    if let Some(group) = import.macos_group {
        let group = group.trim();
        if !group.is_empty() {
            config.import.macos_group = Some(group.to_string());
        }
    }

    if let Some(csv) = import.csv {
        config.import.csv = CsvColumnsConfig {
            name_column: column_override("name_column", csv.name_column)?,
            email_column: column_override("email_column", csv.email_column)?,
            phone_column: column_override("phone_column", csv.phone_column)?,
        };
    }

    Ok(config)
}

fn column_override(field: &'static str, value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(column) if column.trim().is_empty() => Err(ConfigError::InvalidCsvColumn { field }),
        other => Ok(other),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigError, ConfigFile, CsvColumnsFile, ImportFile};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tripmode_core::rules::DEFAULT_MAX_UPLOAD_BYTES;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            default_owner: Some(" uid-1 ".to_string()),
            import: Some(ImportFile {
                max_file_size_bytes: Some(1024),
                accepted_extensions: Some(vec!["VCF".to_string(), ".vcf".to_string()]),
                macos_group: Some("Friends".to_string()),
                csv: Some(CsvColumnsFile {
                    name_column: Some("Nickname".to_string()),
                    email_column: None,
                    phone_column: None,
                }),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.default_owner.as_deref(), Some("uid-1"));
        assert_eq!(merged.import.max_file_size_bytes, 1024);
        assert_eq!(merged.import.accepted_extensions, vec![".vcf".to_string()]);
        assert_eq!(merged.import.macos_group.as_deref(), Some("Friends"));
        assert_eq!(merged.import.csv.name_column.as_deref(), Some("Nickname"));
    }

    #[test]
    fn merge_config_defaults_without_import_table() {
        let merged = merge_config(ConfigFile::default()).expect("merge");
        assert_eq!(merged.import.max_file_size_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(merged.import.accepted_extensions.len(), 3);
    }

    #[test]
    fn merge_config_rejects_unknown_extension_and_zero_size() {
        let parsed = ConfigFile {
            import: Some(ImportFile {
                accepted_extensions: Some(vec!["txt".to_string()]),
                ..ImportFile::default()
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidExtension(_))
        ));

        let parsed = ConfigFile {
            import: Some(ImportFile {
                max_file_size_bytes: Some(0),
                ..ImportFile::default()
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidMaxFileSize(0))
        ));
    }

    #[test]
    fn merge_config_rejects_blank_column_override() {
        let parsed = ConfigFile {
            import: Some(ImportFile {
                csv: Some(CsvColumnsFile {
                    phone_column: Some("  ".to_string()),
                    ..CsvColumnsFile::default()
                }),
                ..ImportFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("phone_column"));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "default_owner = \"uid-7\"\n[import]\nmax_file_size_bytes = 2048\n[import.csv]\nemail_column = \"Work Email\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.default_owner.as_deref(), Some("uid-7"));
        assert_eq!(config.import.max_file_size_bytes, 2048);
        assert_eq!(config.import.csv.email_column.as_deref(), Some("Work Email"));
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[import]\nmax_size = 1\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
