use scraper::{ElementRef, Html};

/// Title used when a page has no `h1`.
pub const NO_TITLE: &str = "No Title Found";

/// Tags whose contents never count as page text.
const NON_CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// Title and body pulled out of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub body: String,
}

/// Parsed HTML document with tag lookups in document order.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parsing is error-recovering: any string yields a document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn find_first(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.find_all(tag).next()
    }

    /// Elements named `tag` (case-insensitive). The iterator borrows only the document.
    pub fn find_all<'a>(&'a self, tag: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let tag = tag.to_ascii_lowercase();
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| el.value().name() == tag)
    }

    /// Detaches every `tag` element, with its subtree. Returns how many were removed.
    pub fn remove_all(&mut self, tag: &str) -> usize {
        let ids: Vec<_> = self.find_all(tag).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }
}

/// Raw text of an element and its descendants, untrimmed.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn extract(html: &str) -> ExtractedContent {
    let mut doc = Document::parse(html);
    for tag in NON_CONTENT_TAGS {
        doc.remove_all(tag);
    }

    let title = doc
        .find_first("h1")
        .map(text_content)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let mut body = String::new();
    for p in doc.find_all("p") {
        body.push_str(&text_content(p));
        body.push_str("\n\n");
    }

    ExtractedContent { title, body }
}
