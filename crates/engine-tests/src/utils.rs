use crate::{CapturingDisplay, CapturingNotifier, TEST_POLL_MS};
use engine_core::{context::batch::BatchContext, transform::ItemTransform};
use engine_runtime::{
    batch::{executor::execute, runner::BatchReport},
    error::RunnerError,
};
use lopdf::{Document, Object, dictionary};
use model::execution::item::InputItem;
use std::{path::Path, time::Duration};

/// Runs `transform` over `items` through the executor with capturing
/// collaborators and returns all three for inspection.
pub async fn run_scenario<T: ItemTransform>(
    transform: T,
    items: Vec<InputItem>,
    params: T::Params,
) -> (
    Result<BatchReport, RunnerError>,
    CapturingDisplay,
    CapturingNotifier,
) {
    let display = CapturingDisplay::default();
    let notifier = CapturingNotifier::default();
    let result = execute(
        transform,
        BatchContext::builder(items, params),
        display.clone(),
        &notifier,
        Duration::from_millis(TEST_POLL_MS),
    )
    .await;
    (result, display, notifier)
}

/// Writes a two-page PDF whose info dictionary names its author.
pub fn write_pdf(path: &Path, author: &str) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for _ in 0..2 {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(2),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Author" => Object::string_literal(author),
        "Producer" => Object::string_literal("Scanner Suite 9"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.save(path).unwrap();
}

/// Reads a text entry of the PDF's info dictionary, if present.
pub fn pdf_info_entry(path: &Path, key: &str) -> Option<Vec<u8>> {
    let doc = Document::load(path).unwrap();
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;
    info.get(key.as_bytes())
        .ok()
        .and_then(|v| v.as_str().ok())
        .map(<[u8]>::to_vec)
}

/// Makes an executable shell script standing in for the transcoder.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
