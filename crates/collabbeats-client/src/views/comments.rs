//! Comment rows for the comments modal.

use chrono::{DateTime, Utc};

use super::esc;
use super::fmt;

/// One renderable comment, with the viewer's delete affordance computed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    pub id: String,
    pub author_uid: String,
    pub author_name: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub can_delete: bool,
}

/// The modal list. Zero rows renders the designated empty state, never a
/// blank pane.
pub fn comment_rows_html(rows: &[CommentRow]) -> String {
    if rows.is_empty() {
        return "<div class=\"muted\">No comments yet.</div>".to_string();
    }
    rows.iter().map(comment_row_html).collect()
}

fn comment_row_html(row: &CommentRow) -> String {
    let when = row.created_at.map(fmt::stamp).unwrap_or_default();
    let delete = if row.can_delete {
        format!(
            "<button class=\"pill\" data-del=\"{}\">Delete</button>",
            esc(&row.id)
        )
    } else {
        String::new()
    };

    format!(
        "<div class=\"note\" data-cid=\"{id}\">\
<div class=\"row\">\
<div class=\"muted\">{author} &bull; {when}</div>\
{delete}\
</div>\
<div class=\"note-text\">{text}</div>\
</div>",
        id = esc(&row.id),
        author = esc(&row.author_name),
        text = esc(&row.text),
    )
}
