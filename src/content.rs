//! Post body assembly for publishing.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::MovieDetails;

pub fn post_title(details: &MovieDetails) -> String {
    let title = details.title.trim();
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

/// Render the HTML body of a post. Absent fields produce no markup.
pub fn render_post(details: &MovieDetails, max_screenshots: usize) -> String {
    let mut html = String::new();
    let title = post_title(details);

    if let Some(poster) = &details.poster_image {
        html.push_str(&format!(
            "<p style=\"text-align: center;\"><img class=\"aligncenter\" src=\"{}\" alt=\"{}\" /></p>\n",
            attr(poster),
            attr(&title)
        ));
    }

    let info = [
        ("IMDb Rating", &details.imdb_rating),
        ("Genre", &details.genre),
        ("Language", &details.language),
        ("Quality", &details.quality),
        ("Director", &details.director),
    ];
    let rows: Vec<String> = info
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(|v| format!("<li><strong>{}:</strong> {}</li>", label, text(v)))
        })
        .collect();
    if !rows.is_empty() {
        html.push_str(&format!("<h3>{} Info</h3>\n<ul>\n", text(&title)));
        for row in rows {
            html.push_str(&row);
            html.push('\n');
        }
        html.push_str("</ul>\n");
    }

    if let Some(storyline) = &details.storyline {
        html.push_str(&format!("<h3>Storyline</h3>\n<p>{}</p>\n", text(storyline)));
    }

    if !details.screenshots.is_empty() && max_screenshots > 0 {
        html.push_str("<h3>Screenshots</h3>\n<p style=\"text-align: center;\">\n");
        for shot in details.screenshots.iter().take(max_screenshots) {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{} screenshot\" />\n",
                attr(shot),
                attr(&title)
            ));
        }
        html.push_str("</p>\n");
    }

    if !details.download_links.is_empty() {
        html.push_str("<h3>Download Links</h3>\n");
        for link in &details.download_links {
            html.push_str(&format!(
                "<p style=\"text-align: center;\"><strong>{}</strong><br /><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Download</a></p>\n",
                text(&link.label),
                attr(&link.url)
            ));
        }
    }

    html
}
