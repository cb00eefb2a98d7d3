use crate::errors::CourseError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Creates the output folder. Succeeds if it already exists.
#[tracing::instrument]
pub async fn create_output_dir(path: &Path) -> Result<(), CourseError> {
    if let Err(e) = fs::create_dir_all(path).await {
        tracing::error!("Failed to create destination directory\nError : {}", e);
        return Err(CourseError::ErrorCreatingDestinationDirectory(format!(
            "{} | {}",
            path.to_string_lossy(),
            e
        )));
    }
    Ok(())
}

/// Writes `content` to `dir/file_name`, replacing any previous file.
#[tracing::instrument(skip(content))]
pub async fn write_document(
    dir: &Path,
    file_name: &str,
    content: &str,
) -> Result<PathBuf, CourseError> {
    let path = dir.join(file_name);
    let file_operation_error = |e: std::io::Error| {
        tracing::error!(
            "Error writing file : {}\nError : {} | {}",
            path.to_string_lossy(),
            e,
            e.kind()
        );
        CourseError::FileOperationError {
            file_name: path.to_string_lossy().to_string(),
            message: format!("{} | {}", e, e.kind()),
        }
    };

    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .await
        .map_err(file_operation_error)?;
    file.write_all(content.as_bytes())
        .await
        .map_err(file_operation_error)?;
    file.flush().await.map_err(file_operation_error)?;

    Ok(path)
}
