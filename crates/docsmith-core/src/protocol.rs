//! Request/response messages for the caller boundary.
//!
//! Each inbound message is a JSON object whose `"command"` field selects the
//! operation; each reply is tagged by `"type"`. Field names are camelCase.
//!
//! ```json
//! {"command": "applyChange", "id": "4f1c..."}
//! {"type": "outcome", "outcome": {"success": true, "message": "Applied ..."}}
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::WorkspaceAnalysis;
use crate::changes::{
    ActivityEntry, ChangeId, ChangeMetadata, ChangeOutcome, ChangeRecord, ChangeStats,
    ChangeStatus,
};
use crate::errors::DocsmithError;
use crate::generate::GenerationReport;

/// An operation requested by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Scan the open workspace.
    AnalyzeWorkspace,

    /// Record a file that was just created.
    TrackFileCreation {
        file_path: String,
        content: String,
        #[serde(default)]
        metadata: ChangeMetadata,
    },

    /// Record a file that was just edited.
    TrackFileModification {
        file_path: String,
        original_content: String,
        new_content: String,
        #[serde(default)]
        metadata: ChangeMetadata,
    },

    /// Record generated content that was just written.
    TrackContentGeneration {
        file_path: String,
        content: String,
        #[serde(default)]
        original_content: Option<String>,
        #[serde(default)]
        metadata: ChangeMetadata,
    },

    /// Propose a change without touching the file.
    TrackManualAction {
        file_path: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        original_content: Option<String>,
        #[serde(default)]
        new_content: Option<String>,
        #[serde(default)]
        metadata: ChangeMetadata,
    },

    ApplyChange {
        id: ChangeId,
    },

    RevertChange {
        id: ChangeId,
    },

    /// Render a record's diff as Markdown.
    ViewDiff {
        id: ChangeId,
    },

    GetChange {
        id: ChangeId,
    },

    /// List activity, optionally filtered by status.
    GetActivities {
        #[serde(default)]
        status: Option<ChangeStatus>,
    },

    GetChangeStats,

    ClearAllChanges,

    /// Generate every missing document. `includeOutdated` falls back to
    /// `generation.includeOutdated` from config.
    GenerateMissingDocs {
        #[serde(default)]
        include_outdated: Option<bool>,
    },
}

/// The reply to a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Response {
    Analysis {
        analysis: Box<WorkspaceAnalysis>,
    },
    /// A tracking request stored this record.
    ChangeRecorded {
        record: ChangeRecord,
    },
    /// Result of apply or revert.
    Outcome {
        outcome: ChangeOutcome,
    },
    Diff {
        id: ChangeId,
        markdown: String,
    },
    Change {
        record: ChangeRecord,
    },
    Activities {
        activities: Vec<ActivityEntry>,
    },
    Stats {
        stats: ChangeStats,
    },
    Cleared,
    Generation {
        report: GenerationReport,
    },
    /// The operation failed; the session is still usable.
    Error {
        message: String,
    },
}

impl Response {
    /// Wrap an error as a reply.
    pub fn error(err: impl std::fmt::Display) -> Self {
        Response::Error {
            message: err.to_string(),
        }
    }

    /// Whether this reply reports a failure.
    pub fn is_error(&self) -> bool {
        match self {
            Response::Error { .. } => true,
            Response::Outcome { outcome } => !outcome.success,
            _ => false,
        }
    }
}

/// Decode one inbound message.
///
/// # Errors
///
/// Returns [`DocsmithError::InvalidCommand`] for malformed JSON, an unknown
/// `command`, or missing fields.
pub fn parse_request(input: &str) -> Result<Request, DocsmithError> {
    serde_json::from_str(input).map_err(|e| DocsmithError::InvalidCommand(e.to_string()))
}

/// Encode a reply as a single JSON line (no trailing newline).
pub fn encode_response(response: &Response) -> Result<String, DocsmithError> {
    Ok(serde_json::to_string(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        let req = parse_request(r#"{"command":"applyChange","id":"abc"}"#).unwrap();
        assert_eq!(
            req,
            Request::ApplyChange {
                id: ChangeId::new("abc")
            }
        );

        let req = parse_request(
            r##"{"command":"trackFileCreation","filePath":"docs/API.md","content":"# API"}"##,
        )
        .unwrap();
        assert_eq!(
            req,
            Request::TrackFileCreation {
                file_path: "docs/API.md".into(),
                content: "# API".into(),
                metadata: ChangeMetadata::default(),
            }
        );

        let req = parse_request(r#"{"command":"getActivities","status":"pending"}"#).unwrap();
        assert_eq!(
            req,
            Request::GetActivities {
                status: Some(ChangeStatus::Pending)
            }
        );

        assert_eq!(
            parse_request(r#"{"command":"getChangeStats"}"#).unwrap(),
            Request::GetChangeStats
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = parse_request(r#"{"command":"formatDisk"}"#).unwrap_err();
        assert!(matches!(err, DocsmithError::InvalidCommand(_)));

        assert!(matches!(
            parse_request(r#"{"command":"applyChange"}"#),
            Err(DocsmithError::InvalidCommand(_))
        ));
        assert!(matches!(
            parse_request("not json"),
            Err(DocsmithError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_response_shape() {
        let line = encode_response(&Response::Stats {
            stats: ChangeStats {
                total: 2,
                applied: 1,
                pending: 1,
                reverted: 0,
            },
        })
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["type"], "stats");
        assert_eq!(json["stats"]["total"], 2);

        let cleared = encode_response(&Response::Cleared).unwrap();
        assert_eq!(cleared, r#"{"type":"cleared"}"#);

        assert!(Response::error("boom").is_error());
        assert!(!Response::Cleared.is_error());
    }
}
