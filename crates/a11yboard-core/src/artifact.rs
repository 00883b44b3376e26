//! Artifact tabs: classification by content type and tab ordering.

use tracing::debug;

use crate::models::{Artifact, ArtifactContent};
use crate::tabs::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Text,
    Image,
}

impl ArtifactKind {
    /// Rendering branch for a `Content-Type` header. `None` means the
    /// artifact gets no tab.
    pub fn classify(content_type: &str) -> Option<Self> {
        let ct = content_type.to_ascii_lowercase();
        if ct.contains("text") {
            Some(ArtifactKind::Text)
        } else if ct.contains("image") {
            Some(ArtifactKind::Image)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactBody {
    Text(String),
    Image { mime: String, bytes: Vec<u8> },
}

impl ArtifactBody {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactBody::Text(_) => ArtifactKind::Text,
            ArtifactBody::Image { .. } => ArtifactKind::Image,
        }
    }
}

/// A dynamically added tab showing one artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactTab {
    pub artifact: Artifact,
    /// Index in the artifact list; tabs are ordered by it.
    pub position: usize,
    pub body: ArtifactBody,
}

impl ArtifactTab {
    pub fn from_content(artifact: Artifact, position: usize, content: ArtifactContent) -> Option<Self> {
        let body = match ArtifactKind::classify(&content.content_type) {
            Some(ArtifactKind::Text) => {
                ArtifactBody::Text(String::from_utf8_lossy(&content.bytes).into_owned())
            }
            Some(ArtifactKind::Image) => ArtifactBody::Image {
                mime: content.content_type,
                bytes: content.bytes,
            },
            None => {
                debug!(
                    "No viewer for artifact {} ({})",
                    artifact.filename, content.content_type
                );
                return None;
            }
        };
        Some(Self {
            artifact,
            position,
            body,
        })
    }

    pub fn tab(&self) -> Tab {
        Tab::Artifact(self.artifact.id.clone())
    }

    pub fn title(&self) -> &str {
        &self.artifact.filename
    }
}

/// Insert `tab` keeping `tabs` sorted by list position, so the order does
/// not depend on which response arrived first. A tab for the same artifact
/// replaces the old one.
pub fn insert_ordered(tabs: &mut Vec<ArtifactTab>, tab: ArtifactTab) {
    if let Some(existing) = tabs.iter_mut().find(|t| t.artifact.id == tab.artifact.id) {
        *existing = tab;
        return;
    }
    let idx = tabs.partition_point(|t| t.position < tab.position);
    tabs.insert(idx, tab);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(id: &str, filename: &str) -> Artifact {
        Artifact {
            id: id.to_string(),
            filename: filename.to_string(),
            ..Default::default()
        }
    }

    fn content(ct: &str, body: &[u8]) -> ArtifactContent {
        ArtifactContent {
            content_type: ct.to_string(),
            bytes: body.to_vec(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(ArtifactKind::classify("text/plain; charset=utf-8"), Some(ArtifactKind::Text));
        assert_eq!(ArtifactKind::classify("image/png"), Some(ArtifactKind::Image));
        assert_eq!(ArtifactKind::classify("application/octet-stream"), None);
    }

    #[test]
    fn test_text_artifact_becomes_code_tab() {
        let tab = ArtifactTab::from_content(artifact("a", "log.txt"), 0, content("text/plain", b"hello"))
            .unwrap();
        assert_eq!(tab.body, ArtifactBody::Text("hello".to_string()));
        assert_eq!(tab.tab(), Tab::Artifact("a".to_string()));
    }

    #[test]
    fn test_image_artifact_keeps_bytes() {
        let tab = ArtifactTab::from_content(artifact("b", "shot.png"), 1, content("image/png", &[137, 80]))
            .unwrap();
        assert_eq!(tab.body.kind(), ArtifactKind::Image);
    }

    #[test]
    fn test_unknown_type_has_no_tab() {
        assert!(ArtifactTab::from_content(artifact("c", "x.bin"), 2, content("application/zip", b"")).is_none());
    }

    #[test]
    fn test_insert_ordered_by_position() {
        let mut tabs = Vec::new();
        for (id, pos) in [("c", 2), ("a", 0), ("b", 1)] {
            let tab = ArtifactTab::from_content(artifact(id, id), pos, content("text/plain", b"")).unwrap();
            insert_ordered(&mut tabs, tab);
        }
        let ids: Vec<_> = tabs.iter().map(|t| t.artifact.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
