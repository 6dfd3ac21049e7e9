//! Markdown heading extraction

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.+?)\s*$").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[[^\]]*\]\(|<img[\s>]").unwrap();
}

/// How many lines below a heading an image still counts as "directly under it"
const IMAGE_WINDOW: usize = 5;

/// A heading found in a Markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Heading text with surrounding whitespace trimmed
    pub text: String,
    /// Zero-based line number
    pub line: usize,
    /// Whether an image appears within the next few lines, before any
    /// subsequent heading
    pub followed_by_image: bool,
}

/// Extract ATX-style headings (`# text` .. `###### text`) from Markdown
pub fn extract_headings(text: &str) -> Vec<Heading> {
    let lines: Vec<&str> = text.lines().collect();
    let mut headings = Vec::new();

    for (line_no, line) in lines.iter().enumerate() {
        let Some(caps) = HEADING.captures(line) else {
            continue;
        };

        let level = caps[1].len() as u8;
        let text = caps[2].to_string();

        let mut followed_by_image = false;
        for follow in lines.iter().skip(line_no + 1).take(IMAGE_WINDOW) {
            if HEADING.is_match(follow) {
                break;
            }
            if IMAGE.is_match(follow) {
                followed_by_image = true;
                break;
            }
        }

        headings.push(Heading {
            level,
            text,
            line: line_no,
            followed_by_image,
        });
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_levels_and_text() {
        let doc = "# Title\n\nbody\n\n## Getting Started\n### Install\n";
        let headings = extract_headings(doc);

        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].text, "Title");
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].text, "Getting Started");
        assert_eq!(headings[2].level, 3);
    }

    #[test]
    fn test_image_directly_under_heading() {
        let doc = "## Architecture\n\n![diagram](docs/arch.png)\n";
        let headings = extract_headings(doc);
        assert!(headings[0].followed_by_image);
    }

    #[test]
    fn test_html_img_counts() {
        let doc = "## Architecture\n<img src=\"arch.png\">\n";
        let headings = extract_headings(doc);
        assert!(headings[0].followed_by_image);
    }

    #[test]
    fn test_image_too_far_down_does_not_count() {
        let doc = "## Architecture\n\n\n\n\n\n\n![diagram](arch.png)\n";
        let headings = extract_headings(doc);
        assert!(!headings[0].followed_by_image);
    }

    #[test]
    fn test_image_under_next_heading_does_not_count() {
        let doc = "## Architecture\n## Screenshots\n![shot](s.png)\n";
        let headings = extract_headings(doc);
        assert!(!headings[0].followed_by_image);
        assert!(headings[1].followed_by_image);
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        let doc = "#no-heading\n####### seven\n";
        assert!(extract_headings(doc).is_empty());
    }
}
