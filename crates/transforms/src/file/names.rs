use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::warn;

/// Output paths handed out during one batch.
///
/// Two items that map to the same output name would otherwise overwrite each
/// other. The first keeps the name; later ones get `<stem>_2.<ext>`,
/// `<stem>_3.<ext>`, … in item order.
#[derive(Debug, Default)]
pub struct OutputNames {
    taken: Mutex<HashSet<PathBuf>>,
}

impl OutputNames {
    pub fn reserve(&self, candidate: PathBuf) -> PathBuf {
        let mut taken = self.taken.lock().unwrap_or_else(PoisonError::into_inner);
        if taken.insert(candidate.clone()) {
            return candidate;
        }

        let mut n = 2;
        loop {
            let alternative = numbered(&candidate, n);
            if taken.insert(alternative.clone()) {
                warn!(
                    wanted = %candidate.display(),
                    using = %alternative.display(),
                    "Output name already used in this batch"
                );
                return alternative;
            }
            n += 1;
        }
    }
}

fn numbered(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}
