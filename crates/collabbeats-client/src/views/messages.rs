//! Chat-room and direct-message bubbles.

use collabbeats_shared::{ChatMessage, DmMessage};

use super::esc;
use super::fmt;

/// A room message: author chip (linked to their profile), time, then a GIF
/// or text body.
pub fn chat_message_html(m: &ChatMessage, me: Option<&str>) -> String {
    let mine = me == Some(m.user_id.as_str());
    let class = if mine { "msg mine" } else { "msg" };
    let name = if m.username.is_empty() {
        "user"
    } else {
        m.username.as_str()
    };
    let photo = if m.photo_url.is_empty() {
        String::new()
    } else {
        format!("<img class=\"msg-avatar\" src=\"{}\" alt=\"\">", esc(&m.photo_url))
    };
    let chip = format!(
        "<a class=\"msg-user\" href=\"profile.html?uid={}\">{photo}<span>{}</span></a>",
        esc(&m.user_id),
        esc(name),
    );
    let time = m.created_at.map(fmt::clock).unwrap_or_default();

    let body = match &m.gif_url {
        Some(gif) => format!("<img class=\"chat-gif\" src=\"{}\" alt=\"gif\" />", esc(gif)),
        None => format!(
            "<div class=\"text\">{}</div>",
            esc(m.text.as_deref().unwrap_or(""))
        ),
    };

    format!(
        "<div class=\"{class}\"><div class=\"meta\">{chip} &bull; {time}</div>{body}</div>"
    )
}

/// A DM bubble. The conversation only has two parties, so authorship is
/// just "You" or "User".
pub fn dm_message_html(m: &DmMessage, me: &str) -> String {
    let mine = m.user_id == me;
    let class = if mine { "msg mine" } else { "msg" };
    let who = if mine { "You" } else { "User" };
    let time = m.created_at.map(fmt::clock).unwrap_or_default();

    let body = match (&m.text, &m.gif_url) {
        (Some(text), _) => esc(text),
        (None, Some(gif)) => {
            format!("<img class=\"chat-gif\" src=\"{}\" alt=\"gif\">", esc(gif))
        }
        (None, None) => String::new(),
    };

    format!(
        "<div class=\"{class}\"><div class=\"meta\">{who} &bull; {time}</div><div class=\"text\">{body}</div></div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_messages_are_marked_mine() {
        let m = DmMessage {
            user_id: "me".into(),
            text: Some("yo".into()),
            gif_url: None,
            created_at: None,
        };
        assert!(dm_message_html(&m, "me").contains("msg mine"));
        assert!(dm_message_html(&m, "them").starts_with("<div class=\"msg\">"));
    }

    #[test]
    fn gif_messages_render_an_image() {
        let m = ChatMessage {
            user_id: "u1".into(),
            username: "nova".into(),
            photo_url: String::new(),
            text: None,
            gif_url: Some("https://g/x.gif".into()),
            created_at: None,
        };
        let html = chat_message_html(&m, None);
        assert!(html.contains("chat-gif"));
        assert!(html.contains("https://g/x.gif"));
    }

    #[test]
    fn message_text_is_escaped() {
        let m = ChatMessage {
            user_id: "u1".into(),
            username: "<nova>".into(),
            photo_url: String::new(),
            text: Some("<img onerror=x>".into()),
            gif_url: None,
            created_at: None,
        };
        let html = chat_message_html(&m, None);
        assert!(html.contains("&lt;img onerror=x&gt;"));
        assert!(html.contains("&lt;nova&gt;"));
    }
}
