//! Events emitted by an organize run.
//!
//! A run produces zero or more `Progress`/`Status` events followed by exactly
//! one terminal event (`Completed` or `Error`).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OrganizeEvent {
    /// Integer percentage, non-decreasing within one run.
    Progress(u8),
    Status(String),
    Completed { message: String, moved: usize },
    Error(String),
}

impl OrganizeEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Error(_))
    }
}

/// `floor(processed / total * 100)`, computed in integers.
pub fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (processed.min(total) * 100) / total;
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_floors() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_terminal_events() {
        assert!(OrganizeEvent::Error("x".into()).is_terminal());
        assert!(OrganizeEvent::Completed {
            message: "done".into(),
            moved: 1
        }
        .is_terminal());
        assert!(!OrganizeEvent::Progress(10).is_terminal());
        assert!(!OrganizeEvent::Status("x".into()).is_terminal());
    }

    #[test]
    fn test_events_serialize_to_json() {
        let json = |e: &OrganizeEvent| serde_json::to_string(e).unwrap();
        assert_eq!(
            json(&OrganizeEvent::Progress(40)),
            r#"{"event":"progress","data":40}"#
        );
        assert_eq!(
            json(&OrganizeEvent::Error("x".into())),
            r#"{"event":"error","data":"x"}"#
        );
        assert_eq!(
            json(&OrganizeEvent::Completed {
                message: "done".into(),
                moved: 2
            }),
            r#"{"event":"completed","data":{"message":"done","moved":2}}"#
        );
    }
}
