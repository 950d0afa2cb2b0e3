//! REST payloads and their mapping onto the domain model.
//!
//! Everything here is pure so it can be tested without a server.

use applint_core::platform::CheckRunRequest;
use applint_domain::{ChangeKind, ChangedFile, TreeEntry};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{GitHubError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub files: Option<Vec<CompareFile>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareFile {
    pub filename: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeItem {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentBody<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunCreated {
    pub id: u64,
}

/// `added`, `removed` and `renamed` map directly; everything else is a modification.
pub fn change_kind(status: &str) -> ChangeKind {
    match status {
        "added" => ChangeKind::Added,
        "removed" => ChangeKind::Removed,
        "renamed" => ChangeKind::Renamed,
        _ => ChangeKind::Modified,
    }
}

pub fn changed_files(response: CompareResponse) -> Vec<ChangedFile> {
    response
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|f| {
            let kind = change_kind(&f.status);
            ChangedFile::new(f.filename, kind)
        })
        .collect()
}

/// Blobs become files, everything else (trees, submodules) directories.
///
/// A truncated listing is an error: structural checks need every entry.
pub fn tree_entries(response: TreeResponse) -> Result<Vec<TreeEntry>> {
    if response.truncated {
        return Err(GitHubError::Decode(format!(
            "tree listing truncated after {} entries",
            response.tree.len()
        )));
    }
    Ok(response
        .tree
        .into_iter()
        .filter_map(|item| {
            let path = item.path.filter(|p| !p.is_empty())?;
            Some(if item.kind == "blob" {
                TreeEntry::file(path)
            } else {
                TreeEntry::directory(path)
            })
        })
        .collect())
}

/// Text of a contents response. Directory listings, symlinks and submodules
/// have no blob content and yield `None`.
pub fn decode_content(payload: Value) -> Result<Option<String>> {
    if payload.is_array() {
        return Ok(None);
    }
    let item: ContentItem = serde_json::from_value(payload)?;
    if item.kind != "file" {
        return Ok(None);
    }
    let Some(content) = item.content else {
        return Ok(None);
    };
    if let Some(encoding) = item.encoding.as_deref() {
        if encoding != "base64" {
            return Err(GitHubError::Decode(format!("unsupported content encoding '{encoding}'")));
        }
    }

    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| GitHubError::Decode(format!("invalid base64 content: {e}")))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Body for creating (`include_head`) or updating a completed check run.
pub fn check_run_body(request: &CheckRunRequest, include_head: bool) -> Value {
    let mut body = json!({
        "name": request.name,
        "status": "completed",
        "conclusion": request.conclusion,
        "completed_at": request.completed_at.to_rfc3339(),
        "output": {
            "title": request.title,
            "summary": request.summary,
            "annotations": request.annotations,
        },
    });
    if include_head {
        body["head_sha"] = Value::String(request.head_sha.clone());
    }
    body
}
