//! Direct-message inbox rows.

use chrono::{DateTime, Utc};

use super::avatar::avatar_img;
use super::esc;
use super::fmt;

/// One conversation in the inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxEntry {
    pub other_uid: String,
    pub other_name: String,
    pub other_photo: String,
    pub last_text: String,
    pub last_at: Option<DateTime<Utc>>,
    pub unread: bool,
}

pub fn inbox_html(entries: &[InboxEntry], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return "<div class=\"track-sub\">No conversations yet.</div>".to_string();
    }
    entries.iter().map(|e| inbox_row_html(e, now)).collect()
}

fn inbox_row_html(entry: &InboxEntry, now: DateTime<Utc>) -> String {
    let dot = if entry.unread {
        "<span class=\"badge-dot\" title=\"Unread\"></span>"
    } else {
        ""
    };
    let time = entry
        .last_at
        .map(|ts| fmt::time_ago(ts, now))
        .unwrap_or_default();

    format!(
        "<div class=\"thread\" data-uid=\"{uid}\">\
{avatar}\
<div class=\"thread-main\">\
<div class=\"title\">{name} {dot}</div>\
<div class=\"preview\">{preview}</div>\
</div>\
<div class=\"time\">{time}</div>\
</div>",
        uid = esc(&entry.other_uid),
        avatar = avatar_img(&entry.other_photo, 36),
        name = esc(&entry.other_name),
        preview = esc(&entry.last_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inbox_renders_the_empty_state() {
        assert!(inbox_html(&[], Utc::now()).contains("No conversations yet."));
    }

    #[test]
    fn unread_rows_carry_the_dot() {
        let entry = InboxEntry {
            other_uid: "u2".into(),
            other_name: "nova".into(),
            other_photo: String::new(),
            last_text: "see you".into(),
            last_at: None,
            unread: true,
        };
        let html = inbox_html(&[entry.clone()], Utc::now());
        assert!(html.contains("badge-dot"));

        let read = InboxEntry {
            unread: false,
            ..entry
        };
        assert!(!inbox_html(&[read], Utc::now()).contains("badge-dot"));
    }
}
