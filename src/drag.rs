/// Dragging an open tab onto a group
use crate::tabs::OpenTab;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        tab: OpenTab,
    },
    Over {
        tab: OpenTab,
        group_id: String,
    },
}

/// A completed drop: bookmark `tab` into `group_id`
#[derive(Debug, Clone, PartialEq)]
pub struct TabDrop {
    pub tab: OpenTab,
    pub group_id: String,
}

impl DragSession {
    pub fn start(&mut self, tab: OpenTab) {
        *self = DragSession::Dragging { tab };
    }

    /// The pointer entered a group; ignored when nothing is being dragged
    pub fn over(&mut self, group_id: &str) {
        if let Some(tab) = self.tab().cloned() {
            *self = DragSession::Over {
                tab,
                group_id: group_id.to_string(),
            };
        }
    }

    /// The pointer left the highlighted group
    pub fn leave(&mut self) {
        if let DragSession::Over { tab, .. } = self {
            *self = DragSession::Dragging { tab: tab.clone() };
        }
    }

    /// Finish the gesture
    ///
    /// Returns a drop only when a tab is being dragged and there is a group
    /// under it, either `target` or the last group it was over. The session
    /// is idle afterwards in every case.
    pub fn end(&mut self, target: Option<&str>) -> Option<TabDrop> {
        match std::mem::take(self) {
            DragSession::Idle => None,
            DragSession::Dragging { tab } => target.map(|group_id| TabDrop {
                tab,
                group_id: group_id.to_string(),
            }),
            DragSession::Over { tab, group_id } => Some(TabDrop {
                tab,
                group_id: target.map(str::to_string).unwrap_or(group_id),
            }),
        }
    }

    pub fn cancel(&mut self) {
        *self = DragSession::Idle;
    }

    pub fn tab(&self) -> Option<&OpenTab> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging { tab } | DragSession::Over { tab, .. } => Some(tab),
        }
    }

    /// Group currently highlighted as the drop target
    pub fn active_group(&self) -> Option<&str> {
        match self {
            DragSession::Over { group_id, .. } => Some(group_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab() -> OpenTab {
        OpenTab::new(7, "GitHub".to_string(), "https://github.com".to_string())
    }

    #[test]
    fn test_drop_on_group() {
        let mut session = DragSession::default();
        session.start(tab());
        session.over("g1");
        assert_eq!(session.active_group(), Some("g1"));

        let drop = session.end(Some("g1")).unwrap();

        assert_eq!(drop.tab.id, 7);
        assert_eq!(drop.group_id, "g1");
        assert_eq!(session, DragSession::Idle);
    }

    #[test]
    fn test_end_without_target_cancels() {
        let mut session = DragSession::default();
        session.start(tab());

        assert!(session.end(None).is_none());
        assert_eq!(session, DragSession::Idle);
    }

    #[test]
    fn test_end_uses_last_hovered_group() {
        let mut session = DragSession::default();
        session.start(tab());
        session.over("g1");
        session.over("g2");

        let drop = session.end(None).unwrap();
        assert_eq!(drop.group_id, "g2");
    }

    #[test]
    fn test_leave_clears_highlight() {
        let mut session = DragSession::default();
        session.start(tab());
        session.over("g1");
        session.leave();

        assert_eq!(session.active_group(), None);
        assert!(session.end(None).is_none());
    }

    #[test]
    fn test_over_while_idle_is_ignored() {
        let mut session = DragSession::default();
        session.over("g1");
        assert_eq!(session, DragSession::Idle);
        assert!(session.end(Some("g1")).is_none());
    }

    #[test]
    fn test_cancel() {
        let mut session = DragSession::default();
        session.start(tab());
        session.cancel();
        assert!(session.tab().is_none());
    }
}
