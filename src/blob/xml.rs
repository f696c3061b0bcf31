//! Minimal readers for the service's XML bodies (listing results and errors)

use super::error::StorageError;
use super::types::{BlobEntry, BlobSegment, PageToken};
use std::borrow::Cow;

struct Element<'a> {
    attrs: &'a str,
    content: &'a str,
    end: usize,
}

/// Find the first `<tag ...>content</tag>` (or self-closing `<tag/>`) in `xml`.
fn find_element<'a>(xml: &'a str, tag: &str) -> Option<Element<'a>> {
    let open = format!("<{}", tag);
    let mut from = 0;

    loop {
        let start = xml[from..].find(&open)? + from;
        let after = start + open.len();

        // `<Blob` also prefixes `<Blobs>` and `<BlobPrefix>`
        if !matches!(xml[after..].chars().next()?, '>' | '/' | ' ' | '\t' | '\r' | '\n') {
            from = after;
            continue;
        }

        let tag_end = xml[after..].find('>')? + after;
        let attrs = &xml[after..tag_end];
        if attrs.ends_with('/') {
            return Some(Element {
                attrs,
                content: "",
                end: tag_end + 1,
            });
        }

        let close = format!("</{}>", tag);
        let content_start = tag_end + 1;
        let content_end = xml[content_start..].find(&close)? + content_start;
        return Some(Element {
            attrs,
            content: &xml[content_start..content_end],
            end: content_end + close.len(),
        });
    }
}

/// Text of the first `tag` element, entities left as-is.
pub(crate) fn element_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    find_element(xml, tag).map(|element| element.content)
}

/// Replace the five predefined entities and numeric character references.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return Cow::Owned(out);
        };

        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                .and_then(Result::ok)
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn blob_name(blob: &str) -> Result<String, StorageError> {
    let name = find_element(blob, "Name")
        .ok_or_else(|| StorageError::Malformed("blob without a Name element".to_string()))?;
    let text = unescape(name.content);

    // Names with characters XML cannot carry come back percent-encoded
    if name.attrs.contains("Encoded=\"true\"") {
        return urlencoding::decode(&text)
            .map(|decoded| decoded.into_owned())
            .map_err(|e| StorageError::Malformed(format!("bad encoded blob name: {}", e)));
    }

    Ok(text.into_owned())
}

/// Parse one `EnumerationResults` page of a flat blob listing.
pub(crate) fn parse_list_blobs(xml: &str) -> Result<BlobSegment, StorageError> {
    if find_element(xml, "EnumerationResults").is_none() {
        return Err(StorageError::Malformed(
            "listing response has no EnumerationResults element".to_string(),
        ));
    }

    let mut entries = Vec::new();
    if let Some(blobs) = find_element(xml, "Blobs") {
        let mut rest = blobs.content;
        while let Some(blob) = find_element(rest, "Blob") {
            entries.push(BlobEntry::new(blob_name(blob.content)?));
            rest = &rest[blob.end..];
        }
    }

    let next_marker = find_element(xml, "NextMarker").map(|m| unescape(m.content).into_owned());

    Ok(BlobSegment {
        entries,
        next: PageToken::from_next_marker(next_marker),
    })
}
