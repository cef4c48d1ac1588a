use crate::detect::OriginMap;
use crate::values::ConfigValue;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Parse an inline YAML document into a tree.
pub(crate) fn tree(yaml: &str) -> ConfigValue {
    ConfigValue::from_yaml_str(yaml).unwrap()
}

pub(crate) fn origins(pairs: &[(&str, &str)]) -> OriginMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Write `contents` to `rel` under `root`, creating parent directories.
pub(crate) fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A bundle directory with a primary document and named sub-documents.
pub(crate) fn create_bundle(primary: &str, subdocs: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "values.yaml", primary);
    for (alias, contents) in subdocs {
        write_file(dir.path(), &format!("charts/{}/values.yaml", alias), contents);
    }
    dir
}
