use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Compose `{directory}/{title}{extension}` for the renamed note, keeping
/// the original extension (or its absence).
pub fn compose_target_path(original: &Path, title: &str) -> PathBuf {
    let mut file_name = String::from(title);
    if let Some(ext) = original.extension().and_then(|e| e.to_str()) {
        file_name.push('.');
        file_name.push_str(ext);
    }
    match original.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Move the note to its composed target path. Collision semantics belong to
/// the file system; no retry with a different title happens here.
pub fn rename_note(original: &Path, title: &str) -> Result<PathBuf> {
    let target = compose_target_path(original, title);
    fs::rename(original, &target).with_context(|| {
        format!(
            "failed to rename {} to {}",
            original.display(),
            target.display()
        )
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{compose_target_path, rename_note};
    use std::fs;
    use std::path::{Path, PathBuf};

    #[test]
    fn keeps_directory_and_extension() {
        let got = compose_target_path(Path::new("/notes/untitled.md"), "Quarterly Revenue Report");
        assert_eq!(got, PathBuf::from("/notes/Quarterly Revenue Report.md"));
    }

    #[test]
    fn handles_extensionless_files() {
        let got = compose_target_path(Path::new("/notes/untitled"), "Project Plan");
        assert_eq!(got, PathBuf::from("/notes/Project Plan"));
    }

    #[test]
    fn handles_bare_relative_names() {
        let got = compose_target_path(Path::new("untitled.md"), "Project Plan");
        assert_eq!(got, PathBuf::from("Project Plan.md"));
    }

    #[test]
    fn rename_moves_the_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let original = tmp.path().join("untitled.md");
        fs::write(&original, "note body").expect("write note");

        let target = rename_note(&original, "Project Plan").expect("rename succeeds");

        assert_eq!(target, tmp.path().join("Project Plan.md"));
        assert!(!original.exists());
        assert_eq!(fs::read_to_string(&target).expect("read moved"), "note body");
    }
}
