use crate::error::{Result, TextMergeError};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Read a whole file as UTF-8 text.
///
/// With `normalize_newlines`, `\r\n` and lone `\r` are turned into `\n`.
pub fn read_text(path: &Path, normalize_newlines: bool) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| TextMergeError::read(path, e))?;

    let text = String::from_utf8(bytes).map_err(|_| TextMergeError::Encoding {
        path: path.to_path_buf(),
    })?;

    if normalize_newlines {
        Ok(normalize(&text).into_owned())
    } else {
        Ok(text)
    }
}

pub fn normalize(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Split text into lines on `\n`, keeping empty trailing segments.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}
