//! Avatar rendering with an inline-SVG placeholder for users without a
//! photo.

use super::esc;

/// Grey head-and-shoulders placeholder, inlined as a data URL so it needs
/// no asset pipeline. Attribute values are single-quoted to survive being
/// embedded in a double-quoted `src`.
pub const PERSON_SVG: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 80 80'><circle cx='40' cy='40' r='40' fill='%231f2937'/><circle cx='40' cy='30' r='14' fill='%239ca3af'/><path d='M12,74c5-16,26-18,28-18s23,2,28,18' fill='%239ca3af'/></svg>";

/// An `<img>` tag for a user photo, falling back to the placeholder.
pub fn avatar_img(photo_url: &str, size: u32) -> String {
    if photo_url.is_empty() {
        format!(
            "<img src=\"{PERSON_SVG}\" alt=\"\" style=\"width:{size}px;height:{size}px;border-radius:999px\">"
        )
    } else {
        format!(
            "<img src=\"{}\" alt=\"\" style=\"width:{size}px;height:{size}px;border-radius:999px;object-fit:cover\">",
            esc(photo_url)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_gets_the_placeholder() {
        let html = avatar_img("", 36);
        assert!(html.contains("data:image/svg+xml"));
        assert!(html.contains("width:36px"));
    }

    #[test]
    fn photo_urls_are_escaped() {
        let html = avatar_img("https://x/a.png?b=1&c=2", 40);
        assert!(html.contains("https://x/a.png?b=1&amp;c=2"));
        assert!(!html.contains("svg+xml"));
    }
}
