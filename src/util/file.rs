use crate::config::constants;
use std::path::{Path, PathBuf};
use tracing::debug;

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
}

/// Check if the file is decoded as a spreadsheet workbook
pub fn is_workbook_file(path: &Path) -> bool {
    lowercase_extension(path)
        .is_some_and(|ext| constants::WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

/// Output file name for a batch: its base name with the output extension substituted
pub fn output_file_name(batch: &Path) -> Option<PathBuf> {
    let stem = batch.file_stem()?;
    let mut name = PathBuf::from(stem);
    name.set_extension(constants::OUTPUT_EXTENSION);
    Some(name)
}

/// File filter trait
pub trait FileFilter: Send + Sync {
    fn should_include(&self, path: &Path) -> bool;
}

/// Accepts files whose extension is listed; an empty list accepts every file
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }
}

impl FileFilter for ExtensionFilter {
    fn should_include(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        lowercase_extension(path).is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Recursive file collector. Files come back in traversal order, which is
/// platform dependent; nothing downstream may rely on it.
pub struct FileCollector<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> FileCollector<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    pub async fn collect(&self, root: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut files = Vec::new();
        self.collect_dir(root, &mut files).await?;
        debug!("Collected {} files under {:?}", files.len(), root);
        Ok(files)
    }

    fn collect_dir<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    self.collect_dir(&path, files).await?;
                } else if file_type.is_file() || is_symlinked_file(&path).await {
                    if self.filter.should_include(&path) {
                        files.push(path);
                    }
                } else {
                    debug!("Skipping non-file entry: {:?}", path);
                }
            }

            Ok(())
        })
    }
}

/// Symlinks to directories are not descended into
async fn is_symlinked_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}
