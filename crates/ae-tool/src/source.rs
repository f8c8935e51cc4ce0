use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::ToolError;

/// Reads every asset file under a directory into the path-keyed map the
/// loader expects. Paths are bundle-relative with forward slashes so the
/// same bundle loads identically across platforms.
pub fn read_assets_from_dir(root: &Path) -> Result<BTreeMap<String, String>, ToolError> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.to_str() else {
            continue;
        };
        if !(name.ends_with(ae_api::VARS_SUFFIX) || name.ends_with(ae_api::DIALOG_SUFFIX)) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .expect("walked path should be under root")
            .to_string_lossy()
            .replace('\\', "/");
        let content = fs::read_to_string(path).map_err(|source| ToolError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        files.insert(relative, content);
    }

    if files.is_empty() {
        return Err(ToolError::AssetsEmpty {
            path: root.to_path_buf(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_recognized_files_recursively() {
        let root = std::env::temp_dir().join("ae-tool-source-collect");
        let nested = root.join("dialogs");
        fs::create_dir_all(&nested).expect("temp dirs should create");
        fs::write(root.join("global.vars.json"), "{}").expect("file should write");
        fs::write(nested.join("intro.dialog.json"), "{}").expect("file should write");
        fs::write(root.join("notes.txt"), "ignored").expect("file should write");

        let files = read_assets_from_dir(&root).expect("assets should read");
        assert_eq!(files.len(), 2);
        assert!(files.contains_key("global.vars.json"));
        assert!(files.contains_key("dialogs/intro.dialog.json"));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let root = std::env::temp_dir().join("ae-tool-source-empty");
        fs::create_dir_all(&root).expect("temp dir should create");
        let error = read_assets_from_dir(&root).err();
        assert!(matches!(error, Some(ToolError::AssetsEmpty { .. })));
    }
}
