//! Zip packager over a directory walk.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use entigen_core::{
    application::{ApplicationError, ports::Packager},
    domain::ArchiveResult,
    error::{EntigenError, EntigenResult},
};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Writes every regular file under a root into a deflate zip.
///
/// Entry names are relative to the root and always use `/`. The archive
/// itself is skipped when it lives inside the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ZipPackager {
    pub fn new() -> Self {
        Self
    }

    fn write_archive(root: &Path, archive_path: &Path) -> Result<usize, String> {
        let file = File::create(archive_path).map_err(|e| e.to_string())?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let mut entries = 0;
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| e.to_string())?;
            let path = entry.path();

            if !entry.file_type().is_file() || path == archive_path {
                continue;
            }

            let name = entry_name(root, path)?;
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| format!("{name}: {e}"))?;
            let mut source = File::open(path).map_err(|e| format!("{name}: {e}"))?;
            io::copy(&mut source, &mut writer).map_err(|e| format!("{name}: {e}"))?;

            debug!(entry = %name, "Archived");
            entries += 1;
        }

        writer.finish().map_err(|e| e.to_string())?;
        Ok(entries)
    }
}

impl Packager for ZipPackager {
    #[instrument(skip(self), fields(root = %root.display(), archive = %archive_path.display()))]
    fn package_directory(&self, root: &Path, archive_path: &Path) -> EntigenResult<ArchiveResult> {
        let entries = Self::write_archive(root, archive_path).map_err(|reason| {
            EntigenError::from(ApplicationError::PackageFailed {
                path: archive_path.to_path_buf(),
                reason,
            })
        })?;

        info!(entries, "Archive written");
        Ok(ArchiveResult {
            path: archive_path.to_path_buf(),
            entries,
        })
    }
}

fn entry_name(root: &Path, path: &Path) -> Result<String, String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| format!("{} is outside {}", path.display(), root.display()))?;

    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Read};
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn tree(root: &Path) {
        fs::create_dir_all(root.join("src/main/java/com/demo/model")).unwrap();
        fs::create_dir_all(root.join("src/db")).unwrap();
        fs::write(root.join("pom.xml"), "<project/>").unwrap();
        fs::write(
            root.join("src/main/java/com/demo/model/Order.java"),
            "class Order {}",
        )
        .unwrap();
        fs::write(root.join("src/db/generated_schema.sql"), "CREATE TABLE o ();").unwrap();
    }

    fn names(archive: &Path) -> Vec<String> {
        let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn archives_every_file_with_slash_names() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("app");
        tree(&root);
        let archive = temp.path().join("out.zip");

        let result = ZipPackager::new().package_directory(&root, &archive).unwrap();

        assert_eq!(result.entries, 3);
        assert_eq!(result.path, archive);
        let mut entries = names(&archive);
        entries.sort();
        assert_eq!(
            entries,
            vec![
                "pom.xml",
                "src/db/generated_schema.sql",
                "src/main/java/com/demo/model/Order.java",
            ]
        );
    }

    #[test]
    fn archive_inside_root_is_not_included() {
        let temp = TempDir::new().unwrap();
        tree(temp.path());
        let archive = temp.path().join("Order-generated-app.zip");

        let result = ZipPackager::new()
            .package_directory(temp.path(), &archive)
            .unwrap();

        assert_eq!(result.entries, 3);
        assert!(!names(&archive).iter().any(|n| n.ends_with(".zip")));
    }

    #[test]
    fn content_survives_compression() {
        let temp = TempDir::new().unwrap();
        tree(temp.path());
        let archive = temp.path().join("app.zip");
        ZipPackager::new()
            .package_directory(temp.path(), &archive)
            .unwrap();

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut content = String::new();
        zip.by_name("src/db/generated_schema.sql")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "CREATE TABLE o ();");
    }

    #[test]
    fn unwritable_archive_path_is_a_package_error() {
        let temp = TempDir::new().unwrap();
        tree(temp.path());
        let archive = temp.path().join("missing-dir/app.zip");

        let err = ZipPackager::new()
            .package_directory(temp.path(), &archive)
            .unwrap_err();
        assert!(matches!(
            err,
            EntigenError::Application(ApplicationError::PackageFailed { .. })
        ));
    }
}
