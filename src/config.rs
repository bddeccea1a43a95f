use crate::error::{QuizError, Result};
use crate::types::config::QuizConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "theoquiz.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".theoquiz/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/theoquiz/config.toml";

/// Loads global, project and local config in that order. `explicit` replaces
/// the project file and must exist.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<QuizConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<QuizConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(QuizError::ConfigParse(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            merge_file_if_exists(&mut merged, path)?;
        }
        None => merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?,
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: QuizConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| QuizError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config file");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| QuizError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ResultsFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_defaults_when_no_files_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None, None).expect("load should not fail");
        assert_eq!(cfg.results.top, 30);
        assert!(cfg.quiz.length.is_none());
    }

    #[test]
    fn load_config_merges_global_project_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[results]
top = 5
format = "json"

[explain]
model = "global-model"
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[quiz]
length = 40
seed = 7

[results]
top = 10
"#,
        )
        .expect("project config should write");

        fs::create_dir_all(root.path().join(".theoquiz")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[quiz]
length = 20
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), None, Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.quiz.length, Some(20));
        assert_eq!(cfg.quiz.seed, Some(7));
        assert_eq!(cfg.results.top, 10);
        assert_eq!(cfg.results.format, ResultsFormat::Json);
        assert_eq!(cfg.explain.model, "global-model");
    }

    #[test]
    fn explicit_config_replaces_project_file() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[results]\ntop = 10\n")
            .expect("project config should write");
        let explicit = root.path().join("other.toml");
        fs::write(&explicit, "[results]\ntop = 3\n").expect("explicit config should write");

        let cfg = load_config_with_global(root.path(), Some(&explicit), None)
            .expect("load should succeed");
        assert_eq!(cfg.results.top, 3);

        let missing = root.path().join("missing.toml");
        let err = load_config_with_global(root.path(), Some(&missing), None)
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[results]\ntop = 0\n")
            .expect("project config should write");

        let err = load_config_with_global(root.path(), None, None)
            .expect_err("top = 0 should be rejected");
        assert!(matches!(err, QuizError::ConfigParse(_)));
    }
}
