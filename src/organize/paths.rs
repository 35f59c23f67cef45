use std::sync::LazyLock;

use chrono::Month;
use regex::Regex;

use super::error::OrganizeError;

/// Leftmost run of eight ASCII digits, anywhere in the name.
static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8}").expect("date token pattern is valid"));

/// A validated `YYYYMMDD` token taken from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken(String);

impl DateToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> &str {
        &self.0[0..4]
    }

    pub fn month_code(&self) -> &str {
        &self.0[4..6]
    }
}

/// Find and validate the date token in `filename`.
///
/// Only the leftmost 8-digit run is considered. It must start with `20`.
pub fn extract_date_token(filename: &str) -> Result<DateToken, OrganizeError> {
    let token = DATE_TOKEN
        .find(filename)
        .map(|m| m.as_str())
        .ok_or_else(|| OrganizeError::NoDateToken {
            filename: filename.to_string(),
        })?;

    if token.len() != 8 || !token.starts_with("20") {
        return Err(OrganizeError::InvalidDateToken {
            token: token.to_string(),
            filename: filename.to_string(),
        });
    }
    Ok(DateToken(token.to_string()))
}

/// Folder name for a two-digit month code: `"07"` → `"07-July"`.
pub fn month_folder(code: &str) -> Option<String> {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u8 = code.parse().ok()?;
    let month = Month::try_from(number).ok()?;
    Some(format!("{}-{}", code, month.name()))
}

/// Last `/`-separated segment of a remote path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a remote path into `(parent, leaf)` on its last `/`.
///
/// A leaf directly under the root gets `/` as its parent.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", leaf)) => ("/", leaf),
        Some((parent, leaf)) => (parent, leaf),
        None => ("", path),
    }
}

/// Where a source file belongs under the target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// `<root><YYYY>`
    pub year_folder: String,
    /// `<root><YYYY>/<MM-Month>`
    pub month_folder: String,
    /// `<root><YYYY>/<MM-Month>/<filename>`
    pub file: String,
}

/// Compute the destination of `filename` under `target_root`, which must
/// end in `/`.
pub fn destination_for(target_root: &str, filename: &str) -> Result<Destination, OrganizeError> {
    let token = extract_date_token(filename)?;
    tracing::debug!(token = token.as_str(), "Found date token");
    let month = month_folder(token.month_code()).ok_or_else(|| OrganizeError::UnknownMonth {
        code: token.month_code().to_string(),
        filename: filename.to_string(),
    })?;

    let year_folder = format!("{}{}", target_root, token.year());
    let month_folder = format!("{}/{}", year_folder, month);
    let file = format!("{}/{}", month_folder, filename);
    Ok(Destination {
        year_folder,
        month_folder,
        file,
    })
}
