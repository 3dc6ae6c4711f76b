use std::fmt;

use crate::codec::FrameKind;

/// Progress of an encode or decode pass.
///
/// ```text
/// Init → HeaderHandled → SignatureDone → ExtensionLenDone → ExtensionDone
///      → PayloadLenDone → PayloadDone → Complete
/// ```
///
/// Any error moves the pass to `Failed`, which accepts no further operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    HeaderHandled,
    SignatureDone,
    ExtensionLenDone,
    ExtensionDone,
    PayloadLenDone,
    PayloadDone,
    Complete,
    Failed,
}

impl Stage {
    /// The frame that must be processed next, if any.
    pub fn next_frame(self) -> Option<FrameKind> {
        match self {
            Stage::HeaderHandled => Some(FrameKind::Signature),
            Stage::SignatureDone => Some(FrameKind::ExtensionLength),
            Stage::ExtensionLenDone => Some(FrameKind::Extension),
            Stage::ExtensionDone => Some(FrameKind::PayloadLength),
            Stage::PayloadLenDone => Some(FrameKind::Payload),
            Stage::Init | Stage::PayloadDone | Stage::Complete | Stage::Failed => None,
        }
    }

    /// The stage reached once `frame` has been processed.
    pub fn after(frame: FrameKind) -> Self {
        match frame {
            FrameKind::Signature => Stage::SignatureDone,
            FrameKind::ExtensionLength => Stage::ExtensionLenDone,
            FrameKind::Extension => Stage::ExtensionDone,
            FrameKind::PayloadLength => Stage::PayloadLenDone,
            FrameKind::Payload => Stage::PayloadDone,
        }
    }

    /// Whether the pass has ended, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::HeaderHandled => "header-handled",
            Stage::SignatureDone => "signature-done",
            Stage::ExtensionLenDone => "extension-length-done",
            Stage::ExtensionDone => "extension-done",
            Stage::PayloadLenDone => "payload-length-done",
            Stage::PayloadDone => "payload-done",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FRAME_ORDER;

    #[test]
    fn walking_the_frames_visits_frame_order() {
        let mut stage = Stage::HeaderHandled;
        let mut visited = Vec::new();
        while let Some(frame) = stage.next_frame() {
            visited.push(frame);
            stage = Stage::after(frame);
        }
        assert_eq!(visited, FRAME_ORDER);
        assert_eq!(stage, Stage::PayloadDone);
    }

    #[test]
    fn terminal_stages() {
        assert!(Stage::Complete.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::PayloadDone.is_terminal());
        assert_eq!(Stage::Failed.next_frame(), None);
        assert_eq!(Stage::Init.next_frame(), None);
    }
}
