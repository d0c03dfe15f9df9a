//! Save-file: turn a result into `(bytes, mime_type, filename)` and write it.

use crate::error::ConvertError;
use crate::format::{Format, FormatCatalog};
use crate::materialize::MaterializedOutput;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// A file ready to hand to a download or save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download<'a> {
    pub bytes: Cow<'a, [u8]>,
    pub mime_type: Cow<'a, str>,
    pub filename: Cow<'a, str>,
}

impl<'a> Download<'a> {
    /// Build the download for `output`, produced for `format`.
    ///
    /// Binary results carry their own MIME type and filename; text uses
    /// the catalogue's entries for `format`. Decode failures cannot be saved.
    pub fn from_output(
        output: &'a MaterializedOutput,
        format: Format,
        catalog: &FormatCatalog,
    ) -> Result<Self, ConvertError> {
        match output {
            MaterializedOutput::Text { content } => Ok(Download {
                bytes: Cow::Borrowed(content.as_bytes()),
                mime_type: Cow::Owned(catalog.mime_type(format).to_string()),
                filename: Cow::Owned(catalog.download_filename(format)),
            }),
            MaterializedOutput::Binary {
                bytes,
                mime_type,
                filename,
            } => Ok(Download {
                bytes: Cow::Borrowed(bytes),
                mime_type: Cow::Borrowed(mime_type),
                filename: Cow::Borrowed(filename),
            }),
            MaterializedOutput::DecodeError(e) => Err(ConvertError::NotDownloadable {
                reason: e.to_string(),
            }),
        }
    }
}

/// Write `output` to `dest`.
///
/// When `dest` is an existing directory the suggested filename is used
/// inside it. Uses atomic write (temp file + rename) to prevent partial
/// files. Returns the path written.
pub async fn save_output(
    output: &MaterializedOutput,
    format: Format,
    catalog: &FormatCatalog,
    dest: impl AsRef<Path>,
) -> Result<PathBuf, ConvertError> {
    let download = Download::from_output(output, format, catalog)?;
    let dest = dest.as_ref();

    let path = if tokio::fs::metadata(dest)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        dest.join(&*download.filename)
    } else {
        dest.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ConvertError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, &*download.bytes)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(ConvertError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        });
    }

    info!(
        "Saved {} bytes ({}) to {}",
        download.bytes.len(),
        download.mime_type,
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::materialize;

    #[test]
    fn text_download_uses_catalogue() {
        let out = materialize("a,b\n1,2\n", Format::Csv);
        let cat = FormatCatalog::standard();
        let d = Download::from_output(&out, Format::Csv, &cat).unwrap();
        assert_eq!(d.bytes.as_ref(), b"a,b\n1,2\n");
        assert_eq!(d.mime_type, "text/csv");
        assert_eq!(d.filename, "converted-document.csv");
    }

    #[test]
    fn unmapped_text_download_falls_back() {
        let out = materialize("x", Format::Muse);
        let cat = FormatCatalog::empty();
        let d = Download::from_output(&out, Format::Muse, &cat).unwrap();
        assert_eq!(d.mime_type, "text/plain");
        assert_eq!(d.filename, "converted-document.txt");
    }

    #[test]
    fn decode_failure_is_not_downloadable() {
        let out = materialize("%%%", Format::Docx);
        let err = Download::from_output(&out, Format::Docx, &FormatCatalog::standard()).unwrap_err();
        assert!(matches!(err, ConvertError::NotDownloadable { .. }));
    }

    #[tokio::test]
    async fn saves_into_directory_with_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = materialize("SGVsbG8=", Format::Pdf);
        let path = save_output(&out, Format::Pdf, &FormatCatalog::standard(), dir.path())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("converted-document.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"Hello");
    }

    #[tokio::test]
    async fn saves_to_explicit_path_creating_parents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/out.html");
        let out = materialize("<p>Hi</p>", Format::Html);
        let path = save_output(&out, Format::Html, &FormatCatalog::standard(), &dest)
            .await
            .unwrap();
        assert_eq!(path, dest);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "<p>Hi</p>");
        assert!(!dir.path().join("nested/out.html.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory occupies the target name.
        let blocker = dir.path().join("converted-document.pdf");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let out = materialize("SGVsbG8=", Format::Pdf);
        let err = save_output(&out, Format::Pdf, &FormatCatalog::standard(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::OutputWriteFailed { .. }));
        assert!(!dir.path().join("converted-document.pdf.tmp").exists());
        assert!(blocker.join("keep").exists());
    }
}
