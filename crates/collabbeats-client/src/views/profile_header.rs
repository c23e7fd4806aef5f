//! The profile header block.

use super::avatar::avatar_img;
use super::esc;

/// Header state for a profile, computed for the current viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileHeader {
    pub uid: String,
    pub username: String,
    pub photo_url: String,
    pub looking_for: Vec<String>,
    pub followers: i64,
    pub following: i64,
    pub is_owner: bool,
    pub am_following: bool,
    pub signed_in: bool,
}

/// "Looking for" badges, or the designated placeholder.
pub fn badges_html(tags: &[String]) -> String {
    if tags.is_empty() {
        return "<span class=\"muted-sm\">Not specified</span>".to_string();
    }
    tags.iter()
        .map(|t| format!("<span class=\"tag tag-muted\">{}</span>", esc(t)))
        .collect()
}

pub fn profile_header_html(header: &ProfileHeader) -> String {
    let avatar = if header.is_owner {
        format!(
            "<div class=\"avatar-block\">{}<label for=\"avatarFile\" class=\"pill\" title=\"Change profile photo\">Change</label>\
<input id=\"avatarFile\" type=\"file\" accept=\"image/*\" style=\"display:none\"></div>",
            avatar_img(&header.photo_url, 96)
        )
    } else {
        avatar_img(&header.photo_url, 96)
    };

    let follow_btn = if header.signed_in && !header.is_owner {
        let label = if header.am_following {
            "Following"
        } else {
            "Follow"
        };
        let state = if header.am_following { "on" } else { "off" };
        format!(
            "<button id=\"followBtn\" class=\"pill\" type=\"button\" data-state=\"{state}\">{label}</button>"
        )
    } else {
        String::new()
    };
    let dm_btn = if header.signed_in && !header.is_owner {
        "<button id=\"dmBtn\" class=\"pill\" type=\"button\">Message</button>"
    } else {
        ""
    };
    let sign_out = if header.is_owner {
        "<button id=\"signOutBtnTop\" class=\"pill\" type=\"button\">Sign out</button>"
    } else {
        ""
    };
    let edit_tags = if header.is_owner {
        "<button id=\"lfEdit\" class=\"pill\" type=\"button\">Edit</button>"
    } else {
        ""
    };

    format!(
        "<div class=\"profile-header\">\
{avatar}\
<div class=\"profile-main\">\
<div class=\"profile-name\">{name}</div>\
<div class=\"profile-uid\">{uid}</div>\
<div class=\"muted-sm\">Looking for</div>\
<div id=\"lfView\" class=\"row-center\">{badges}</div>\
{edit_tags}\
<div class=\"profile-counts\">\
<button id=\"followersPill\" class=\"pill link\" type=\"button\">Followers: <strong id=\"followersCount\">{followers}</strong></button>\
<button id=\"followingPill\" class=\"pill link\" type=\"button\">Following: <strong id=\"followingCount\">{following}</strong></button>\
</div>\
<div class=\"profile-actions\">{follow_btn}{dm_btn}{sign_out}</div>\
</div>\
</div>",
        name = esc(&header.username),
        uid = esc(&header.uid),
        badges = badges_html(&header.looking_for),
        followers = header.followers,
        following = header.following,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ProfileHeader {
        ProfileHeader {
            uid: "u1".into(),
            username: "nova".into(),
            photo_url: String::new(),
            looking_for: vec![],
            followers: 2,
            following: 5,
            is_owner: false,
            am_following: false,
            signed_in: true,
        }
    }

    #[test]
    fn visitor_sees_follow_and_message() {
        let html = profile_header_html(&header());
        assert!(html.contains("followBtn"));
        assert!(html.contains("dmBtn"));
        assert!(!html.contains("Sign out"));
        assert!(html.contains("Not specified"));
    }

    #[test]
    fn owner_sees_editing_affordances_instead() {
        let mut h = header();
        h.is_owner = true;
        let html = profile_header_html(&h);
        assert!(html.contains("avatarFile"));
        assert!(html.contains("Sign out"));
        assert!(html.contains("lfEdit"));
        assert!(!html.contains("followBtn"));
    }

    #[test]
    fn follow_state_shows_in_the_button() {
        let mut h = header();
        h.am_following = true;
        let html = profile_header_html(&h);
        assert!(html.contains("data-state=\"on\""));
        assert!(html.contains(">Following</button>"));
    }

    #[test]
    fn counts_are_rendered() {
        let html = profile_header_html(&header());
        assert!(html.contains("followersCount\">2"));
        assert!(html.contains("followingCount\">5"));
    }
}
