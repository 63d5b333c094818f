use regex::Regex;
use std::sync::OnceLock;

fn youtube_patterns() -> &'static [Regex; 2] {
    static RE: OnceLock<[Regex; 2]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("static regex"),
            Regex::new(r"youtube\.com/v/([^&\n?#]+)").expect("static regex"),
        ]
    })
}

/// Extracts the video id from the common YouTube URL shapes.
#[must_use]
pub fn youtube_id(url: &str) -> Option<String> {
    youtube_patterns()
        .iter()
        .find_map(|re| re.captures(url).map(|c| c[1].to_string()))
}

#[must_use]
pub fn youtube_thumbnail(id: &str) -> String {
    format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_id() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=abc123&t=10").as_deref(),
            Some("abc123")
        );
        assert_eq!(youtube_id("https://youtu.be/xyz").as_deref(), Some("xyz"));
        assert_eq!(
            youtube_id("https://youtube.com/embed/emb?autoplay=1").as_deref(),
            Some("emb")
        );
        assert_eq!(youtube_id("http://youtube.com/v/old").as_deref(), Some("old"));
        assert_eq!(youtube_id("https://vimeo.com/123"), None);
    }
}
