use std::collections::HashMap;

use axum::http::HeaderMap;
use serde_json::Value;

/// Raw field name -> value pairs as they arrived in the request body.
pub type RawFields = HashMap<String, String>;

/// Parse a request body based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawFields, String> {
    let ct = content_type.unwrap_or("application/x-www-form-urlencoded");

    if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("multipart/form-data") {
        Err("multipart".to_string())
    } else {
        // Form encoding is what browsers send by default, JSON second
        parse_form_urlencoded(body)
            .or_else(|_| parse_json(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawFields, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    Ok(form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

fn parse_json(body: &[u8]) -> Result<RawFields, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    let Value::Object(obj) = value else {
        return Err("Expected a JSON object".to_string());
    };

    let mut map = RawFields::new();
    for (key, value) in obj {
        let text = match value {
            Value::String(s) => s,
            Value::Null => continue,
            other => other.to_string(),
        };
        map.insert(key, text);
    }
    Ok(map)
}

/// Parse multipart form data using multer. File parts are read as text like any other field.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<RawFields, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = RawFields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, value);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_encoded_fields() {
        let fields = parse_body(
            Some("application/x-www-form-urlencoded"),
            b"name=Jane+Doe&work-email=jane%40acme.com",
        )
        .unwrap();
        assert_eq!(fields["name"], "Jane Doe");
        assert_eq!(fields["work-email"], "jane@acme.com");
    }

    #[test]
    fn json_values_are_stringified() {
        let fields = parse_body(
            Some("application/json"),
            br#"{"name":"Jane","phone":4712345678,"hear-about":null}"#,
        )
        .unwrap();
        assert_eq!(fields["name"], "Jane");
        assert_eq!(fields["phone"], "4712345678");
        assert!(!fields.contains_key("hear-about"));
    }

    #[test]
    fn json_array_is_rejected() {
        assert!(parse_body(Some("application/json"), b"[1,2]").is_err());
    }

    #[tokio::test]
    async fn parses_multipart_fields() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"country\"\r\n\r\n\
            Norway\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"organization\"\r\n\r\n\
            Acme AS\r\n\
            --XyZ--\r\n";
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            "multipart/form-data; boundary=XyZ".parse().unwrap(),
        );

        let fields = parse_multipart(&headers, bytes::Bytes::from(body)).await.unwrap();
        assert_eq!(fields["country"], "Norway");
        assert_eq!(fields["organization"], "Acme AS");
    }
}
