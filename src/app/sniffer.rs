use mime_guess::from_path;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PROBE_LEN: u64 = 1024;

/// Best-effort check that a file holds text.
///
/// A `text/*` guess from the extension wins outright. Otherwise the first
/// 1024 bytes must decode as UTF-8; any I/O failure counts as not text.
pub fn is_text_file(path: &Path) -> bool {
    if from_path(path)
        .first_raw()
        .is_some_and(|mime| mime.starts_with("text/"))
    {
        return true;
    }

    let mut head = Vec::with_capacity(PROBE_LEN as usize);
    let read = File::open(path).and_then(|file| file.take(PROBE_LEN).read_to_end(&mut head));
    if let Err(err) = read {
        log::debug!("Probe of {} failed: {}", path.display(), err);
        return false;
    }

    match std::str::from_utf8(&head) {
        Ok(_) => true,
        // A multi-byte character split by the probe window is still text.
        Err(err) => err.error_len().is_none(),
    }
}
