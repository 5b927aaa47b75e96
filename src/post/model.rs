use serde::{Deserialize, Serialize};

pub const DEFAULT_COVER_DIR: &str = "/images/blog";

/// JSON names of the fields a post must carry, in validation order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "label",
    "title",
    "date",
    "author",
    "readTime",
    "summary",
    "coverImage",
    "slug",
    "content",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub label: String,
    pub title: String,
    /// DD/MM/YYYY
    pub date: String,
    pub author: String,
    pub read_time: String,
    pub summary: String,
    pub cover_image: String,
    pub slug: String,
    /// Markdown body.
    pub content: String,
}

impl BlogPost {
    /// Cover image path a post with this slug must declare.
    pub fn expected_cover(slug: &str) -> String {
        Self::expected_cover_in(DEFAULT_COVER_DIR, slug)
    }

    pub fn expected_cover_in(cover_dir: &str, slug: &str) -> String {
        format!("{}/{}.jpeg", cover_dir.trim_end_matches('/'), slug)
    }

    /// Public URL of the post on the site, e.g. `wrappers.es/blog/<slug>`.
    pub fn link(&self, site_url: &str) -> String {
        format!("{}/blog/{}", site_url.trim_end_matches('/'), self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BlogPost {
        BlogPost {
            label: "IA para tu PyME".into(),
            title: "Agentes verticales".into(),
            date: "09/04/2025".into(),
            author: "Jon Ortega".into(),
            read_time: "5 MIN".into(),
            summary: "Resumen".into(),
            cover_image: "/images/blog/agentes-verticales.jpeg".into(),
            slug: "agentes-verticales".into(),
            content: "# Hola\n\nTexto".into(),
        }
    }

    #[test]
    fn test_expected_cover() {
        assert_eq!(
            BlogPost::expected_cover("mi-post"),
            "/images/blog/mi-post.jpeg"
        );
        assert_eq!(
            BlogPost::expected_cover_in("/img/", "mi-post"),
            "/img/mi-post.jpeg"
        );
    }

    #[test]
    fn test_sample_cover_follows_slug() {
        let post = sample();
        assert_eq!(post.cover_image, BlogPost::expected_cover(&post.slug));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn test_link() {
        assert_eq!(
            sample().link("wrappers.es/"),
            "wrappers.es/blog/agentes-verticales"
        );
    }
}
