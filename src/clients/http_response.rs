//! HTTP response types for the YouTube client.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::clients::http_request::ResponseFormat;

/// An HTTP response from the YouTube API or the OAuth endpoints.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lower-case name.
    pub headers: HashMap<String, Vec<String>>,
    /// The body as received.
    pub raw_body: String,
    /// The body decoded per the request's [`ResponseFormat`]; `Null` when empty.
    pub body: Value,
}

impl HttpResponse {
    /// Creates a response, decoding `raw_body` according to `format`.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        raw_body: String,
        format: ResponseFormat,
    ) -> Self {
        let body = decode_body(&raw_body, format);
        Self {
            code,
            headers,
            raw_body,
            body,
        }
    }

    /// Returns `true` for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of a header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

fn decode_body(raw_body: &str, format: ResponseFormat) -> Value {
    if raw_body.trim().is_empty() {
        return Value::Null;
    }

    match format {
        ResponseFormat::Json => serde_json::from_str(raw_body).unwrap_or_else(|error| {
            tracing::debug!(%error, "response body is not valid JSON");
            Value::Null
        }),
        ResponseFormat::Xml => xml_to_value(raw_body).unwrap_or_else(|error| {
            tracing::debug!(%error, "response body is not valid XML");
            Value::Null
        }),
        ResponseFormat::Text => Value::String(raw_body.to_string()),
    }
}

/// Converts an XML document into a JSON-like mapping.
///
/// Elements become keys; repeated siblings become arrays; attributes are
/// stored under `@name`; text of an element with attributes or children is
/// stored under `$text`, otherwise the element maps to its text.
///
/// # Errors
///
/// Returns the parser error for malformed documents, including documents
/// that end before every element is closed.
///
/// # Example
///
/// ```rust
/// use yt::clients::xml_to_value;
///
/// let value = xml_to_value(r#"<feed><entry id="1">a</entry><entry id="2">b</entry></feed>"#).unwrap();
/// assert_eq!(value["feed"]["entry"][1]["@id"], "2");
/// assert_eq!(value["feed"]["entry"][0]["$text"], "a");
/// ```
pub fn xml_to_value(xml: &str) -> Result<Value, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // (element name, attributes and children, text)
    let mut stack: Vec<(String, Map<String, Value>, String)> =
        vec![(String::new(), Map::new(), String::new())];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (name, map) = open_element(&start)?;
                stack.push((name, map, String::new()));
            }
            Event::Empty(start) => {
                let (name, map) = open_element(&start)?;
                if let Some((_, parent, _)) = stack.last_mut() {
                    insert_child(parent, name, element_value(map, String::new()));
                }
            }
            Event::Text(text) => {
                if let Some((_, _, buffer)) = stack.last_mut() {
                    buffer.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some((_, _, buffer)) = stack.last_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some((name, map, text)) = stack.pop() {
                        if let Some((_, parent, _)) = stack.last_mut() {
                            insert_child(parent, name, element_value(map, text));
                        }
                    }
                }
            }
            Event::Eof => {
                if let Some((name, _, _)) = stack.get(1) {
                    return Err(quick_xml::Error::UnexpectedEof(format!("unclosed element <{name}>")));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(stack
        .into_iter()
        .next()
        .map_or(Value::Null, |(_, root, _)| Value::Object(root)))
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, Map<String, Value>), quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut map = Map::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        map.insert(format!("@{key}"), Value::String(value));
    }
    Ok((name, map))
}

fn element_value(mut map: Map<String, Value>, text: String) -> Value {
    if map.is_empty() {
        return Value::String(text);
    }
    if !text.is_empty() {
        map.insert("$text".to_string(), Value::String(text));
    }
    Value::Object(map)
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            map.entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        map
    }

    #[test]
    fn test_json_body_is_decoded() {
        let response = HttpResponse::new(
            200,
            HashMap::new(),
            r#"{"items":[{"id":"a"}]}"#.to_string(),
            ResponseFormat::Json,
        );
        assert_eq!(response.body, json!({"items": [{"id": "a"}]}));
        assert!(response.is_success());
    }

    #[test]
    fn test_empty_body_is_null() {
        let response = HttpResponse::new(204, HashMap::new(), String::new(), ResponseFormat::Json);
        assert!(response.body.is_null());
    }

    #[test]
    fn test_invalid_json_keeps_raw_body() {
        let response = HttpResponse::new(
            502,
            HashMap::new(),
            "<html>Bad Gateway</html>".to_string(),
            ResponseFormat::Json,
        );
        assert!(response.body.is_null());
        assert_eq!(response.raw_body, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_text_format_keeps_string() {
        let response = HttpResponse::new(200, HashMap::new(), "ok".to_string(), ResponseFormat::Text);
        assert_eq!(response.body, json!("ok"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(
            200,
            headers(&[("location", "https://upload.example/session")]),
            String::new(),
            ResponseFormat::Json,
        );
        assert_eq!(response.header("Location"), Some("https://upload.example/session"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_xml_to_value_nested_document() {
        let xml = r#"<?xml version="1.0"?>
            <feed xmlns="http://www.w3.org/2005/Atom">
              <title>Uploads</title>
              <entry><id>one</id></entry>
              <entry><id>two</id></entry>
              <link rel="next" href="https://example.com/next"/>
            </feed>"#;

        let value = xml_to_value(xml).unwrap();

        assert_eq!(value["feed"]["title"], "Uploads");
        assert_eq!(value["feed"]["@xmlns"], "http://www.w3.org/2005/Atom");
        assert_eq!(value["feed"]["entry"][0]["id"], "one");
        assert_eq!(value["feed"]["entry"][1]["id"], "two");
        assert_eq!(value["feed"]["link"]["@href"], "https://example.com/next");
    }

    #[test]
    fn test_xml_body_is_decoded_per_format() {
        let response = HttpResponse::new(
            200,
            HashMap::new(),
            "<errors><error><code>TooManyRecentCalls</code></error></errors>".to_string(),
            ResponseFormat::Xml,
        );
        assert_eq!(response.body["errors"]["error"]["code"], "TooManyRecentCalls");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(xml_to_value("<a><b></a>").is_err());
    }

    #[test]
    fn test_truncated_xml_is_an_error() {
        let error = xml_to_value("<feed><entry>").unwrap_err();
        assert!(matches!(error, quick_xml::Error::UnexpectedEof(ref what) if what.contains("<feed>")));
        assert!(xml_to_value("<feed><entry/>").is_err());
    }
}
