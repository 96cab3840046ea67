use scraper::ElementRef;

/// Text of a node with every text fragment trimmed and glued back together.
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn joins_trimmed_fragments() {
        let doc = Html::parse_fragment("<div>\n  Runtime <span> 2h 22m </span>\n</div>");
        let div = doc.select(&Selector::parse("div").unwrap()).next().unwrap();
        assert_eq!(stripped_text(div), "Runtime2h 22m");
    }

    #[test]
    fn nbsp_is_trimmed() {
        let doc = Html::parse_fragment("<span>&nbsp;(3.2M)</span>");
        let span = doc.select(&Selector::parse("span").unwrap()).next().unwrap();
        assert_eq!(stripped_text(span), "(3.2M)");
    }
}
