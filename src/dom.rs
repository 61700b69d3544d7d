use scraper::{ElementRef, Selector};

/// The handful of lookups the card extractor needs from a parsed document.
///
/// Lookups return `None` or an empty `Vec` when nothing matches; they never fail.
pub trait DomNode<'a>: Copy {
    fn select_first(self, selector: &Selector) -> Option<Self>;
    fn select_all(self, selector: &Selector) -> Vec<Self>;
    /// Concatenated text of all descendants, with surrounding whitespace removed.
    fn trimmed_text(self) -> String;
    fn attribute(self, name: &str) -> Option<&'a str>;
    fn class_tokens(self) -> Vec<&'a str>;
}

impl<'a> DomNode<'a> for ElementRef<'a> {
    fn select_first(self, selector: &Selector) -> Option<Self> {
        self.select(selector).next()
    }

    fn select_all(self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn trimmed_text(self) -> String {
        self.text().collect::<String>().trim().to_owned()
    }

    fn attribute(self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    // `Element::classes` does not promise attribute order, so split the raw attribute.
    fn class_tokens(self) -> Vec<&'a str> {
        self.value()
            .attr("class")
            .map(|classes| classes.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}
