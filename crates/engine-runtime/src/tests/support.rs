use async_trait::async_trait;
use engine_core::{
    error::TransformError,
    notify::{NoticeLevel, ProgressDisplay, StatusNotifier},
    transform::ItemTransform,
};
use model::{core::utils::extension_lowercase, execution::item::InputItem};
use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// Mock transform driven by the input file name:
// `ok*` succeeds, `fail*` fails, `missing*` reports a missing tool,
// `panic*` panics, `explode*` panics while being described,
// and anything with a `.skip` extension is skipped.
pub struct ScriptedTransform {
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedTransform {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ItemTransform for ScriptedTransform {
    type Params = ();

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn skip_reason(&self, item: &InputItem, _params: &()) -> Option<String> {
        (extension_lowercase(item.path()).as_deref() == Some("skip"))
            .then(|| format!("{} is not applicable", item.file_name()))
    }

    fn describe(&self, item: &InputItem) -> String {
        if item.file_name().starts_with("explode") {
            panic!("cannot describe {}", item.file_name());
        }
        format!("Working: {}", item.label())
    }

    async fn apply(&self, item: &InputItem, _params: &()) -> Result<PathBuf, TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = item.file_name();
        if name.starts_with("fail") {
            Err(TransformError::Failed(format!("{name} is broken")))
        } else if name.starts_with("missing") {
            Err(TransformError::ToolMissing {
                tool: "fake-tool".into(),
                detail: "No such file or directory".into(),
            })
        } else if name.starts_with("panic") {
            panic!("boom in {name}");
        } else {
            Ok(item.path().with_extension("out"))
        }
    }
}

pub fn items(names: &[&str]) -> Vec<InputItem> {
    names
        .iter()
        .map(|n| InputItem::file(format!("/batch/{n}")))
        .collect()
}

#[derive(Debug, Default)]
pub struct DisplayLog {
    pub updates: Vec<(String, f64)>,
    pub completions: usize,
}

/// Display whose log stays readable after the executor consumes it.
#[derive(Clone, Default)]
pub struct SharedDisplay(pub Arc<Mutex<DisplayLog>>);

impl ProgressDisplay for SharedDisplay {
    fn update(&mut self, message: &str, fraction: f64) {
        self.0.lock().unwrap().updates.push((message.to_string(), fraction));
    }

    fn complete(&mut self) {
        self.0.lock().unwrap().completions += 1;
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(NoticeLevel, String, String)>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices.lock().unwrap().iter().map(|(l, _, _)| *l).collect()
    }
}

impl StatusNotifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, detail: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, title.to_string(), detail.to_string()));
    }
}
