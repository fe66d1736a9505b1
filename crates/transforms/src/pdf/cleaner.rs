use crate::{file::names::OutputNames, pdf::error::PdfError};
use async_trait::async_trait;
use engine_core::{error::TransformError, transform::ItemTransform};
use lopdf::{Dictionary, Document, Object, StringFormat};
use model::{
    core::utils::extension_lowercase,
    execution::{
        item::InputItem,
        params::{MetadataMap, Prefix},
    },
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PdfCleanParams {
    /// Folder receiving the cleaned copies, usually `<base>/<prefix>`.
    pub output_dir: PathBuf,
    pub prefix: Prefix,
    pub metadata: MetadataMap,
}

impl PdfCleanParams {
    /// `<base>/<prefix>`: the folder cleaned copies are written to.
    pub fn output_dir_for(base: &Path, prefix: &Prefix) -> PathBuf {
        base.join(prefix.as_str())
    }

    /// `<output_dir>/<prefix>_<file name>`.
    pub fn output_path(&self, source: &Path) -> Option<PathBuf> {
        let name = source.file_name()?.to_string_lossy();
        Some(self.output_dir.join(format!("{}_{name}", self.prefix)))
    }
}

/// Copies each PDF to its destination, then replaces the copy's metadata.
/// The source file is only ever read.
#[derive(Debug, Default)]
pub struct MetadataRewrite {
    names: OutputNames,
}

#[async_trait]
impl ItemTransform for MetadataRewrite {
    type Params = PdfCleanParams;

    fn name(&self) -> &'static str {
        "pdf-clean"
    }

    fn skip_reason(&self, item: &InputItem, _params: &PdfCleanParams) -> Option<String> {
        (extension_lowercase(item.path()).as_deref() != Some("pdf"))
            .then(|| format!("{} is not a .pdf file", item.file_name()))
    }

    fn describe(&self, item: &InputItem) -> String {
        format!("Cleaning: {}", item.label())
    }

    async fn apply(
        &self,
        item: &InputItem,
        params: &PdfCleanParams,
    ) -> Result<PathBuf, TransformError> {
        let source = item.path();
        let dest = params
            .output_path(source)
            .ok_or_else(|| TransformError::Failed(format!("{} has no file name", source.display())))?;
        let dest = self.names.reserve(dest);

        if same_file(source, &dest).await {
            return Err(TransformError::Failed(format!(
                "destination {} would overwrite the source",
                dest.display()
            )));
        }

        if let Err(err) = copy_and_rewrite(source, &dest, &params.metadata).await {
            discard_partial(&dest).await;
            return Err(err);
        }

        info!(dest = %dest.display(), "Metadata replaced");
        Ok(dest)
    }
}

async fn copy_and_rewrite(
    source: &Path,
    dest: &Path,
    metadata: &MetadataMap,
) -> Result<(), TransformError> {
    tokio::fs::copy(source, dest).await?;
    debug!(source = %source.display(), dest = %dest.display(), "Copied source to destination");

    let target = dest.to_path_buf();
    let metadata = metadata.clone();
    tokio::task::spawn_blocking(move || rewrite_metadata(&target, &metadata))
        .await
        .map_err(|e| TransformError::Failed(format!("metadata rewrite task failed: {e}")))?
        .map_err(|e| TransformError::Failed(e.to_string()))
}

/// Removes whatever a failed copy or rewrite left at `dest`.
async fn discard_partial(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => debug!(dest = %dest.display(), "Removed partial copy"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dest = %dest.display(), error = %e, "Failed to remove partial copy"),
    }
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Rewrites the document information dictionary of the PDF at `path` in
/// place: the old dictionary and the catalog's XMP stream are dropped and a
/// new dictionary holding exactly `metadata` is written.
pub fn rewrite_metadata(path: &Path, metadata: &MetadataMap) -> Result<(), PdfError> {
    let mut doc = Document::load(path)?;

    if let Ok(&Object::Reference(info_id)) = doc.trailer.get(b"Info") {
        doc.objects.remove(&info_id);
    }
    doc.trailer.remove(b"Info");

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::MissingCatalog)?;
    let catalog = doc
        .get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfError::MissingCatalog)?;
    if let Some(Object::Reference(xmp_id)) = catalog.remove(b"Metadata") {
        doc.objects.remove(&xmp_id);
    }

    let mut info = Dictionary::new();
    for (key, value) in metadata.iter() {
        info.set(key, text_string(value));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", info_id);

    doc.save(path)?;
    Ok(())
}

/// PDF text string: a literal for ASCII, UTF-16BE with a byte-order mark
/// otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
