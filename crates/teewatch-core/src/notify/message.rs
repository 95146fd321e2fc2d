use html_escape::encode_safe;
use indoc::formatdoc;

use super::FoundSlot;
use crate::config::NotificationConfig;

/// A rendered e-mail ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl NotificationMessage {
    pub fn for_slot(found: &FoundSlot, addressing: &NotificationConfig) -> Self {
        let players = found.slot.named_participants();
        let players_html = if players.is_empty() {
            "<li><em>Nobody booked yet</em></li>".to_string()
        } else {
            players
                .iter()
                .map(|name| format!("<li>{}</li>", encode_safe(name)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let html = formatdoc! {r#"
            <h2>Tee time available</h2>
            <p><strong>Date:</strong> {date}<br>
            <strong>Time:</strong> {time}<br>
            <strong>Open spots:</strong> {open}</p>
            <p>Currently booked:</p>
            <ul>
            {players_html}
            </ul>
        "#,
            date = encode_safe(&found.date),
            time = encode_safe(&found.time),
            open = open_spots_label(found),
        };

        Self {
            from: addressing.from.clone(),
            to: addressing.to.clone(),
            cc: addressing.cc.clone(),
            subject: format!("Tee time available: {} {}", found.date, found.time),
            html,
        }
    }
}

fn open_spots_label(found: &FoundSlot) -> String {
    if found.slot.participants.is_empty() {
        "all".to_string()
    } else {
        found.slot.open_count().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{Participant, SlotInfo};

    fn addressing() -> NotificationConfig {
        NotificationConfig {
            from: "Tee Watch <teewatch@mg.example.com>".into(),
            to: vec!["alice@example.com".into()],
            cc: vec!["bob@example.com".into()],
        }
    }

    #[test]
    fn message_lists_named_players() {
        let found = FoundSlot::new(
            "2022/10/15",
            "13:20",
            SlotInfo::new(
                true,
                vec![
                    Participant::named("J. Smith"),
                    Participant::named("A. <Jones>"),
                    Participant::open(),
                    Participant::open(),
                ],
            ),
        );

        let msg = NotificationMessage::for_slot(&found, &addressing());

        assert_eq!(msg.subject, "Tee time available: 2022/10/15 13:20");
        assert_eq!(msg.cc, vec!["bob@example.com".to_string()]);
        assert!(msg.html.contains("<li>J. Smith</li>"));
        assert!(msg.html.contains("<li>A. &lt;Jones&gt;</li>"));
        assert!(msg.html.contains("<strong>Open spots:</strong> 2"));
    }

    #[test]
    fn player_names_cannot_inject_markup() {
        let found = FoundSlot::new(
            "2022/10/15",
            "13:20",
            SlotInfo::new(
                true,
                vec![
                    Participant::named("O'Neil & \"Sons\""),
                    Participant::named("<script>alert(1)</script>"),
                    Participant::open(),
                ],
            ),
        );

        let msg = NotificationMessage::for_slot(&found, &addressing());

        assert!(msg.html.contains("O&#x27;Neil &amp; &quot;Sons&quot;"));
        assert!(!msg.html.contains("<script>"));
        assert!(msg.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_slot_says_nobody_booked() {
        let found = FoundSlot::new("2022/10/15", "13:50", SlotInfo::new(true, vec![]));
        let msg = NotificationMessage::for_slot(&found, &addressing());
        assert!(msg.html.contains("Nobody booked yet"));
        assert!(msg.html.contains("<strong>Open spots:</strong> all"));
    }
}
