//! Lightweight XML field extraction.
//!
//! The captured configs are machine-generated and well-formed, so simple
//! string scanning is enough to pull out the handful of fields the drivers
//! need. Matching is namespace-agnostic: `<ns:tag>` and `<tag>` both hit.

/// Text content of the first `<tag>...</tag>` element.
pub fn tag_text(xml: &str, tag: &str) -> Option<String> {
    let (start, _) = find_open_tag(xml, tag)?;
    let after = &xml[start..];
    let content_start = after.find('>')? + 1;
    let content = &after[content_start..];
    let end = content.find("</")?;
    let value = content[..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Attribute value on the first `<tag ... attr="...">` element.
pub fn tag_attr(xml: &str, tag: &str, attr: &str) -> Option<String> {
    let (start, _) = find_open_tag(xml, tag)?;
    let after = &xml[start..];
    let element = &after[..after.find('>')?];
    attr_value(element, attr)
}

/// Attribute lookup on an element selected by another attribute, for
/// documents shaped like `<Str N="Name" V="MUX-3"/>`: find the first
/// element of any tag carrying `key_attr="key"`, return its `value_attr`.
pub fn attr_by_key(xml: &str, key_attr: &str, key: &str, value_attr: &str) -> Option<String> {
    let needle_dq = format!("{key_attr}=\"{key}\"");
    let needle_sq = format!("{key_attr}='{key}'");
    let at = match (xml.find(needle_dq.as_str()), xml.find(needle_sq.as_str())) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    let element_start = xml[..at].rfind('<')?;
    let element = &xml[element_start..];
    let element = &element[..element.find('>')?];
    attr_value(element, value_attr)
}

/// Inner slices of every `<tag>...</tag>` element, in document order.
pub fn sections<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let close_pattern = format!("</{tag}");
    let mut out = Vec::new();
    let mut rest = xml;
    while let Some((start, _)) = find_open_tag(rest, tag) {
        let after = &rest[start..];
        let Some(content_start) = after.find('>') else {
            break;
        };
        let content = &after[content_start + 1..];
        let Some(end) = content.find(close_pattern.as_str()) else {
            break;
        };
        out.push(&content[..end]);
        let consumed = start + content_start + 1 + end + close_pattern.len();
        rest = &rest[consumed..];
    }
    out
}

/// Locate `<tag` or `<ns:tag` followed by a delimiter, returning the offset
/// of `<` and the length of the matched opener.
fn find_open_tag(xml: &str, tag: &str) -> Option<(usize, usize)> {
    let plain = format!("<{tag}");
    let prefixed = format!(":{tag}");
    let mut search_from = 0;
    while search_from < xml.len() {
        let slice = &xml[search_from..];
        let hit = match (slice.find(plain.as_str()), slice.find(prefixed.as_str())) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return None,
        };
        let opener_len = plain.len();
        let end = search_from + hit + opener_len;
        // reject partial matches like <tagger> for <tag>
        match xml.as_bytes().get(end) {
            Some(b'>') | Some(b' ') | Some(b'/') | Some(b'\t') | Some(b'\n') | Some(b'\r') => {
                // walk back to the actual '<' for prefixed matches
                let lt = xml[..search_from + hit + 1]
                    .rfind('<')
                    .unwrap_or(search_from + hit);
                return Some((lt, end - lt));
            }
            _ => search_from = end,
        }
    }
    None
}

fn attr_value(element: &str, attr: &str) -> Option<String> {
    let pattern = format!("{attr}=");
    let mut search_from = 0;
    while let Some(hit) = element[search_from..].find(pattern.as_str()) {
        let at = search_from + hit;
        // require a word boundary so N= does not match inside aN=
        let boundary = at == 0
            || element
                .as_bytes()
                .get(at - 1)
                .is_some_and(|b| b.is_ascii_whitespace());
        let after = &element[at + pattern.len()..];
        if boundary {
            let quote = after.chars().next()?;
            if quote == '"' || quote == '\'' {
                let value = &after[1..];
                let end = value.find(quote)?;
                return Some(value[..end].to_string());
            }
        }
        search_from = at + pattern.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_text() {
        let xml = "<reply><product>Elemental Live</product><version>2.15.3</version></reply>";
        assert_eq!(tag_text(xml, "product").as_deref(), Some("Elemental Live"));
        assert_eq!(tag_text(xml, "version").as_deref(), Some("2.15.3"));
        assert_eq!(tag_text(xml, "hostname"), None);
    }

    #[test]
    fn test_tag_text_namespaced() {
        let xml = "<tds:product>SVP4000</tds:product>";
        assert_eq!(tag_text(xml, "product").as_deref(), Some("SVP4000"));
    }

    #[test]
    fn test_tag_text_rejects_partial_name_match() {
        let xml = "<products>nope</products><product>yes</product>";
        assert_eq!(tag_text(xml, "product").as_deref(), Some("yes"));
    }

    #[test]
    fn test_tag_attr() {
        let xml = r#"<modelName value="SPR1200" unit="1"/>"#;
        assert_eq!(tag_attr(xml, "modelName", "value").as_deref(), Some("SPR1200"));
        assert_eq!(tag_attr(xml, "modelName", "serial"), None);
    }

    #[test]
    fn test_attr_by_key() {
        let xml = r#"<cfg><Str N="Location" V="rack 4"/><Str N="Name" V="MUX-3"/></cfg>"#;
        assert_eq!(attr_by_key(xml, "N", "Name", "V").as_deref(), Some("MUX-3"));
        assert_eq!(attr_by_key(xml, "N", "Owner", "V"), None);
    }

    #[test]
    fn test_attr_by_key_any_tag() {
        let xml = r#"<cfg><Int N="m_caDir5UniqueId" V="123 456"/></cfg>"#;
        assert_eq!(
            attr_by_key(xml, "N", "m_caDir5UniqueId", "V").as_deref(),
            Some("123 456")
        );
    }

    #[test]
    fn test_sections() {
        let xml = "<network>\
            <eth_config><id>0</id><eth_dev>eth0</eth_dev></eth_config>\
            <eth_config><id>1</id><eth_dev>eth1</eth_dev></eth_config>\
            </network>";
        let parts = sections(xml, "eth_config");
        assert_eq!(parts.len(), 2);
        assert_eq!(tag_text(parts[0], "eth_dev").as_deref(), Some("eth0"));
        assert_eq!(tag_text(parts[1], "eth_dev").as_deref(), Some("eth1"));
    }

    #[test]
    fn test_sections_none() {
        assert!(sections("<a><b/></a>", "eth_config").is_empty());
    }
}
