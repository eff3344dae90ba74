use std::sync::OnceLock;

/// Locale tags the product endpoints emit on `ItemAttributes`.
pub const ITEM_ATTRIBUTE_LOCALES: [&str; 13] = [
    "de-DE", "en-EN", "es-ES", "fr-FR", "it-IT", "en-US", "en-GB", "en-CA", "fr-CA", "es-MX",
    "ja-JP", "en-IN", "en-AU",
];

const NAMESPACE_PREFIX: &str = "ns2:";

fn substitutions() -> &'static [(String, String)] {
    static TABLE: OnceLock<Vec<(String, String)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = ITEM_ATTRIBUTE_LOCALES
            .iter()
            .map(|locale| {
                (
                    format!(r#"<ns2:ItemAttributes xml:lang="{locale}">"#),
                    format!("<ItemAttributes><Language>{locale}</Language>"),
                )
            })
            .collect::<Vec<_>>();
        table.push((
            String::from("</ns2:ItemAttributes>"),
            String::from("</ItemAttributes>"),
        ));
        table.push((NAMESPACE_PREFIX.to_owned(), String::new()));
        // Longest match wins at each position.
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    })
}

/// Rewrites namespaced `ItemAttributes` so the language becomes a child
/// element, then strips every remaining `ns2:` prefix.
///
/// Runs on the raw body before parsing. Replaced text is never rescanned.
pub fn normalize_item_attributes(body: &str) -> String {
    let table = substitutions();
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while !rest.is_empty() {
        if let Some((from, to)) = table.iter().find(|(from, _)| rest.starts_with(from.as_str())) {
            out.push_str(to);
            rest = &rest[from.len()..];
            continue;
        }
        let step = rest.chars().next().map_or(1, char::len_utf8);
        out.push_str(&rest[..step]);
        rest = &rest[step..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_attribute_becomes_child_element() {
        let body = r#"<ns2:ItemAttributes xml:lang="de-DE"><ns2:Title>Tasse</ns2:Title></ns2:ItemAttributes>"#;
        assert_eq!(
            normalize_item_attributes(body),
            "<ItemAttributes><Language>de-DE</Language><Title>Tasse</Title></ItemAttributes>"
        );
    }

    #[test]
    fn every_listed_locale_is_rewritten() {
        for locale in ITEM_ATTRIBUTE_LOCALES {
            let body = format!(r#"<ns2:ItemAttributes xml:lang="{locale}"></ns2:ItemAttributes>"#);
            assert_eq!(
                normalize_item_attributes(&body),
                format!("<ItemAttributes><Language>{locale}</Language></ItemAttributes>")
            );
        }
    }

    #[test]
    fn unlisted_locale_keeps_attribute_but_loses_prefix() {
        let body = r#"<ns2:ItemAttributes xml:lang="nl-NL"/>"#;
        assert_eq!(
            normalize_item_attributes(body),
            r#"<ItemAttributes xml:lang="nl-NL"/>"#
        );
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        let body = "<ns2:Title>Größe – 東京</ns2:Title>";
        assert_eq!(normalize_item_attributes(body), "<Title>Größe – 東京</Title>");
    }
}
