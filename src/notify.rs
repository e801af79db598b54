// src/notify.rs
// Announcement port for result events. The evaluator never calls this; the
// results view does, and the host decides how an announcement is played.

use std::io::Write;
use std::sync::Mutex;

use crate::logging::{log_info, log_warning};
use crate::settings::Language;

pub const WIN_AUDIO_ARABIC: &str = "/game/arabic/win.mp3";
pub const FAILED_AUDIO_ARABIC: &str = "/game/arabic/failed.mp3";
pub const LOCK_AUDIO: &str = "/game/lock.m4a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    Won,
    Failed,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// Pre-recorded clip to play.
    Audio(&'static str),
    /// Text for speech synthesis.
    Speech(&'static str),
}

impl Announcement {
    /// Arabic results use recorded clips, other languages use speech; locking always clicks.
    pub fn for_event(event: NotificationEvent, language: Language) -> Self {
        match (event, language) {
            (NotificationEvent::Locked, _) => Announcement::Audio(LOCK_AUDIO),
            (NotificationEvent::Won, Language::Arabic) => Announcement::Audio(WIN_AUDIO_ARABIC),
            (NotificationEvent::Failed, Language::Arabic) => Announcement::Audio(FAILED_AUDIO_ARABIC),
            (NotificationEvent::Won, _) => Announcement::Speech("This player won"),
            (NotificationEvent::Failed, _) => Announcement::Speech("This player lost"),
        }
    }
}

pub trait Notifier {
    fn notify(&self, event: NotificationEvent, language: Language);
}

/// Logs the announcement and rings the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, event: NotificationEvent, language: Language) {
        match Announcement::for_event(event, language) {
            Announcement::Audio(path) => log_info(&format!("Playing {path}")),
            Announcement::Speech(text) => log_info(&format!("Saying \"{text}\"")),
        }
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            log_warning(&format!("Could not ring terminal bell: {e}"));
        }
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _event: NotificationEvent, _language: Language) {}
}

/// Keeps every announcement it is asked to make.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(NotificationEvent, Announcement)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(NotificationEvent, Announcement)> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent, language: Language) {
        if let Ok(mut events) = self.events.lock() {
            events.push((event, Announcement::for_event(event, language)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcements_by_language() {
        assert_eq!(
            Announcement::for_event(NotificationEvent::Won, Language::Arabic),
            Announcement::Audio("/game/arabic/win.mp3")
        );
        assert_eq!(
            Announcement::for_event(NotificationEvent::Failed, Language::Arabic),
            Announcement::Audio("/game/arabic/failed.mp3")
        );
        assert_eq!(
            Announcement::for_event(NotificationEvent::Won, Language::English),
            Announcement::Speech("This player won")
        );
        assert_eq!(
            Announcement::for_event(NotificationEvent::Failed, Language::English),
            Announcement::Speech("This player lost")
        );
        for language in [Language::Arabic, Language::English] {
            assert_eq!(
                Announcement::for_event(NotificationEvent::Locked, language),
                Announcement::Audio("/game/lock.m4a")
            );
        }
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NotificationEvent::Won, Language::English);
        notifier.notify(NotificationEvent::Locked, Language::English);
        let events = notifier.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], (NotificationEvent::Won, Announcement::Speech("This player won")));
        assert_eq!(events[1].0, NotificationEvent::Locked);
    }
}
