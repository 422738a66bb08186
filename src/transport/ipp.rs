//! # IPP Transport
//!
//! Submits jobs to a printer or CUPS queue with an IPP/1.1 `Print-Job`
//! request (RFC 8010 encoding, carried over HTTP).
//!
//! ## Request Layout
//!
//! ```text
//! 01 01                 version 1.1
//! 00 02                 operation-id = Print-Job
//! xx xx xx xx           request-id (big-endian i32)
//! 01                    operation-attributes-tag
//!   47 "attributes-charset"          "utf-8"
//!   48 "attributes-natural-language" "en"
//!   45 "printer-uri"                 <destination>
//!   42 "requesting-user-name"        "Thermal Printer"
//!   42 "job-name"                    "Thermal Printer"
//!   49 "document-format"             "application/octet-stream"
//! 03                    end-of-attributes-tag
//! <document bytes>
//! ```
//!
//! Each attribute is `tag, name-length (u16 BE), name, value-length (u16 BE), value`.
//!
//! ## Response
//!
//! `version (2) | status-code (u16 BE) | request-id (i32 BE) | attribute groups`.
//! Status codes `0x0000..=0x00FF` are "successful-ok" variants.
//!
//! ## Destinations
//!
//! `http://` and `https://` URLs are used as-is. `ipp://` and `ipps://` map to
//! `http://` and `https://` with the IPP default port 631 when none is given.
//! The destination string itself is always sent as `printer-uri`.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use super::{Transport, http_client};
use crate::error::PrintError;

/// Content type of IPP requests
pub const CONTENT_TYPE_IPP: &str = "application/ipp";

/// Default IPP port
pub const DEFAULT_PORT: u16 = 631;

/// Print-Job operation id
pub const OP_PRINT_JOB: u16 = 0x0002;

/// Name used for both the requesting user and the job
pub const DEFAULT_JOB_NAME: &str = "Thermal Printer";

// Delimiter tags
pub const TAG_OPERATION_ATTRIBUTES: u8 = 0x01;
pub const TAG_JOB_ATTRIBUTES: u8 = 0x02;
pub const TAG_END_OF_ATTRIBUTES: u8 = 0x03;

// Value tags
pub const TAG_INTEGER: u8 = 0x21;
pub const TAG_TEXT_WITHOUT_LANGUAGE: u8 = 0x41;
pub const TAG_NAME_WITHOUT_LANGUAGE: u8 = 0x42;
pub const TAG_KEYWORD: u8 = 0x44;
pub const TAG_URI: u8 = 0x45;
pub const TAG_CHARSET: u8 = 0x47;
pub const TAG_NATURAL_LANGUAGE: u8 = 0x48;
pub const TAG_MIME_MEDIA_TYPE: u8 = 0x49;

static NEXT_REQUEST_ID: AtomicI32 = AtomicI32::new(1);

/// A `Print-Job` request ready to encode.
#[derive(Debug, Clone)]
pub struct PrintJobRequest<'a> {
    pub request_id: i32,
    pub printer_uri: &'a str,
    pub user_name: &'a str,
    pub job_name: &'a str,
    pub document_format: &'a str,
    pub document: &'a [u8],
}

impl<'a> PrintJobRequest<'a> {
    pub fn new(printer_uri: &'a str, document: &'a [u8]) -> Self {
        Self {
            request_id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            printer_uri,
            user_name: DEFAULT_JOB_NAME,
            job_name: DEFAULT_JOB_NAME,
            document_format: "application/octet-stream",
            document,
        }
    }

    /// Encode the request body, document included.
    ///
    /// Fails if an attribute value does not fit its 16-bit length field.
    pub fn encode(&self) -> Result<Vec<u8>, PrintError> {
        let mut out = Vec::with_capacity(256 + self.document.len());
        out.extend_from_slice(&[1, 1]);
        out.extend_from_slice(&OP_PRINT_JOB.to_be_bytes());
        out.extend_from_slice(&self.request_id.to_be_bytes());

        out.push(TAG_OPERATION_ATTRIBUTES);
        write_attribute(&mut out, TAG_CHARSET, "attributes-charset", b"utf-8")?;
        write_attribute(&mut out, TAG_NATURAL_LANGUAGE, "attributes-natural-language", b"en")?;
        write_attribute(&mut out, TAG_URI, "printer-uri", self.printer_uri.as_bytes())?;
        write_attribute(
            &mut out,
            TAG_NAME_WITHOUT_LANGUAGE,
            "requesting-user-name",
            self.user_name.as_bytes(),
        )?;
        write_attribute(
            &mut out,
            TAG_NAME_WITHOUT_LANGUAGE,
            "job-name",
            self.job_name.as_bytes(),
        )?;
        write_attribute(
            &mut out,
            TAG_MIME_MEDIA_TYPE,
            "document-format",
            self.document_format.as_bytes(),
        )?;
        out.push(TAG_END_OF_ATTRIBUTES);

        out.extend_from_slice(self.document);
        Ok(out)
    }
}

fn write_attribute(
    out: &mut Vec<u8>,
    tag: u8,
    name: &str,
    value: &[u8],
) -> Result<(), PrintError> {
    let name_len = field_len(name, name.len())?;
    let value_len = field_len(name, value.len())?;
    out.push(tag);
    out.extend_from_slice(&name_len.to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&value_len.to_be_bytes());
    out.extend_from_slice(value);
    Ok(())
}

fn field_len(name: &str, len: usize) -> Result<u16, PrintError> {
    u16::try_from(len).map_err(|_| {
        PrintError::Transport(format!(
            "IPP attribute '{}' is {} bytes, limit is {}",
            name,
            len,
            u16::MAX
        ))
    })
}

/// One attribute value from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub tag: u8,
    pub name: String,
    pub value: Vec<u8>,
}

/// A decoded IPP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IppResponse {
    pub version: (u8, u8),
    pub status: u16,
    pub request_id: i32,
    pub attributes: Vec<Attribute>,
}

impl IppResponse {
    /// Decode a response body.
    pub fn parse(bytes: &[u8]) -> Result<Self, PrintError> {
        let mut reader = Reader { bytes, pos: 0 };
        let version = (reader.u8()?, reader.u8()?);
        let status = reader.u16()?;
        let request_id = reader.u32()? as i32;

        let mut attributes: Vec<Attribute> = Vec::new();
        while reader.pos < bytes.len() {
            let tag = reader.u8()?;
            if tag == TAG_END_OF_ATTRIBUTES {
                break;
            }
            if tag < 0x10 {
                // Start of another attribute group
                continue;
            }
            let name_len = reader.u16()? as usize;
            let name = reader.take(name_len)?;
            let value_len = reader.u16()? as usize;
            let value = reader.take(value_len)?.to_vec();

            // An empty name continues the previous attribute's value set
            let name = if name.is_empty() {
                attributes
                    .last()
                    .map(|a| a.name.clone())
                    .unwrap_or_default()
            } else {
                String::from_utf8_lossy(name).into_owned()
            };
            attributes.push(Attribute { tag, name, value });
        }

        Ok(Self {
            version,
            status,
            request_id,
            attributes,
        })
    }

    /// Whether the status is in the successful-ok range.
    pub fn is_success(&self) -> bool {
        self.status <= 0x00FF
    }

    /// First value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The `job-id` assigned by the printer, if any.
    pub fn job_id(&self) -> Option<i32> {
        let attr = self.attribute("job-id")?;
        let bytes: [u8; 4] = attr.value.as_slice().try_into().ok()?;
        Some(i32::from_be_bytes(bytes))
    }

    /// The human-readable `status-message`, if any.
    pub fn status_message(&self) -> Option<String> {
        self.attribute("status-message")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PrintError> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(PrintError::Transport(format!(
                "Truncated IPP response: wanted {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.bytes.len()
            )));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, PrintError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, PrintError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, PrintError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Map a destination to the HTTP URL the request is POSTed to.
///
/// ## Example
///
/// ```
/// use rasterprint::transport::ipp::http_url;
///
/// assert_eq!(
///     http_url("ipp://printer.local/printers/M200")?,
///     "http://printer.local:631/printers/M200"
/// );
/// assert_eq!(
///     http_url("http://localhost:631/printers/M200")?,
///     "http://localhost:631/printers/M200"
/// );
/// # Ok::<(), rasterprint::error::PrintError>(())
/// ```
pub fn http_url(destination: &str) -> Result<String, PrintError> {
    let (scheme, rest) = destination
        .split_once("://")
        .ok_or_else(|| PrintError::Transport(format!("Not a printer URL: {}", destination)))?;

    let http_scheme = match scheme.to_ascii_lowercase().as_str() {
        "http" | "https" => return Ok(destination.to_string()),
        "ipp" => "http",
        "ipps" => "https",
        other => {
            return Err(PrintError::Transport(format!(
                "Unsupported URL scheme '{}' for IPP",
                other
            )));
        }
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        return Err(PrintError::Transport(format!("Missing host in {}", destination)));
    }

    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()));
    let authority = if has_port {
        authority.to_string()
    } else {
        format!("{}:{}", authority, DEFAULT_PORT)
    };

    Ok(format!("{}://{}{}", http_scheme, authority, path))
}

/// Sends jobs as IPP `Print-Job` requests.
pub struct IppTransport {
    client: reqwest::Client,
}

impl IppTransport {
    pub fn new() -> Result<Self, PrintError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

#[async_trait]
impl Transport for IppTransport {
    fn name(&self) -> &'static str {
        "ipp"
    }

    async fn send(&self, data: &[u8], destination: &str) -> Result<(), PrintError> {
        let url = http_url(destination)?;
        let request = PrintJobRequest::new(destination, data);
        let body = request.encode()?;
        debug!(url = %url, request_id = request.request_id, "sending Print-Job");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_IPP)
            .body(body)
            .send()
            .await
            .map_err(|e| PrintError::Transport(format!("IPP request to {} failed: {}", url, e)))?;

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(PrintError::Transport(format!(
                "IPP request to {} returned HTTP {}",
                url, http_status
            )));
        }

        let reply = response
            .bytes()
            .await
            .map_err(|e| PrintError::Transport(format!("Failed to read IPP response: {}", e)))?;
        let ipp = IppResponse::parse(&reply)?;

        if !ipp.is_success() {
            return Err(PrintError::Transport(format!(
                "Printer rejected job with IPP status 0x{:04X}{}",
                ipp.status,
                ipp.status_message()
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            )));
        }

        info!(
            destination,
            job_id = ?ipp.job_id(),
            bytes = data.len(),
            "print job accepted"
        );
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request<'a>(uri: &'a str, doc: &'a [u8]) -> PrintJobRequest<'a> {
        PrintJobRequest {
            request_id: 7,
            ..PrintJobRequest::new(uri, doc)
        }
    }

    #[test]
    fn test_request_header() {
        let body = request("ipp://localhost/printers/M200", &[]).encode().unwrap();
        assert_eq!(&body[..8], &[0x01, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x07]);
        assert_eq!(body[8], TAG_OPERATION_ATTRIBUTES);
    }

    #[test]
    fn test_first_attribute_is_charset() {
        let body = request("ipp://localhost/printers/M200", &[]).encode().unwrap();
        let name = b"attributes-charset";
        assert_eq!(body[9], TAG_CHARSET);
        assert_eq!(&body[10..12], &(name.len() as u16).to_be_bytes());
        assert_eq!(&body[12..12 + name.len()], name);
        let value_at = 12 + name.len();
        assert_eq!(&body[value_at..value_at + 2], &[0x00, 0x05]);
        assert_eq!(&body[value_at + 2..value_at + 7], b"utf-8");
    }

    #[test]
    fn test_document_follows_end_tag() {
        let doc = [0x1B, 0x40, 0x0A, 0xFF];
        let body = request("http://localhost:631/printers/M200", &doc).encode().unwrap();
        let split = body.len() - doc.len();
        assert_eq!(body[split - 1], TAG_END_OF_ATTRIBUTES);
        assert_eq!(&body[split..], &doc);
    }

    #[test]
    fn test_request_parses_as_attribute_stream() {
        // The request uses the same framing as a response, so the parser can
        // read it back (status field holds the operation id here).
        let body = request("ipp://host/printers/M200", &[]).encode().unwrap();
        let parsed = IppResponse::parse(&body).unwrap();

        assert_eq!(parsed.version, (1, 1));
        assert_eq!(parsed.status, OP_PRINT_JOB);
        assert_eq!(parsed.request_id, 7);
        let names: Vec<&str> = parsed.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "attributes-charset",
                "attributes-natural-language",
                "printer-uri",
                "requesting-user-name",
                "job-name",
                "document-format",
            ]
        );
        assert_eq!(
            parsed.attribute("document-format").unwrap().value,
            b"application/octet-stream".to_vec()
        );
        assert_eq!(
            parsed.attribute("job-name").unwrap().value,
            b"Thermal Printer".to_vec()
        );
    }

    #[test]
    fn test_oversized_printer_uri_is_rejected() {
        let uri = format!("ipp://host/{}", "p".repeat(u16::MAX as usize));
        match request(&uri, &[]).encode() {
            Err(PrintError::Transport(msg)) => assert!(msg.contains("printer-uri"), "{}", msg),
            other => panic!("expected transport error, got {:?}", other),
        }

        // Exactly 65535 bytes still fits
        let uri = "p".repeat(u16::MAX as usize);
        let body = request(&uri, &[]).encode().unwrap();
        let parsed = IppResponse::parse(&body).unwrap();
        assert_eq!(parsed.attribute("printer-uri").unwrap().value.len(), 65535);
    }

    #[test]
    fn test_request_ids_increase() {
        let a = PrintJobRequest::new("ipp://h/p", &[]);
        let b = PrintJobRequest::new("ipp://h/p", &[]);
        assert!(b.request_id > a.request_id);
    }

    fn response(status: u16, attrs: &[(u8, &str, &[u8])]) -> Vec<u8> {
        let mut out = vec![1, 1];
        out.extend_from_slice(&status.to_be_bytes());
        out.extend_from_slice(&9i32.to_be_bytes());
        out.push(TAG_OPERATION_ATTRIBUTES);
        write_attribute(&mut out, TAG_CHARSET, "attributes-charset", b"utf-8").unwrap();
        out.push(TAG_JOB_ATTRIBUTES);
        for (tag, name, value) in attrs {
            write_attribute(&mut out, *tag, name, value).unwrap();
        }
        out.push(TAG_END_OF_ATTRIBUTES);
        out
    }

    #[test]
    fn test_parse_success_with_job_id() {
        let body = response(0x0000, &[(TAG_INTEGER, "job-id", &42i32.to_be_bytes())]);
        let parsed = IppResponse::parse(&body).unwrap();

        assert!(parsed.is_success());
        assert_eq!(parsed.request_id, 9);
        assert_eq!(parsed.job_id(), Some(42));
        assert_eq!(parsed.status_message(), None);
    }

    #[test]
    fn test_parse_error_status() {
        let body = response(
            0x0400,
            &[(TAG_TEXT_WITHOUT_LANGUAGE, "status-message", b"Bad request")],
        );
        let parsed = IppResponse::parse(&body).unwrap();

        assert!(!parsed.is_success());
        assert_eq!(parsed.status_message().as_deref(), Some("Bad request"));
    }

    #[test]
    fn test_successful_ok_range() {
        // 0x0001 = successful-ok-ignored-or-substituted-attributes
        let parsed = IppResponse::parse(&response(0x0001, &[])).unwrap();
        assert!(parsed.is_success());
        let parsed = IppResponse::parse(&response(0x0100, &[])).unwrap();
        assert!(!parsed.is_success());
    }

    #[test]
    fn test_parse_additional_values_keep_name() {
        let mut body = response(0x0000, &[(TAG_KEYWORD, "job-state-reasons", b"none")]);
        // Splice an additional value (empty name) before the end tag
        body.pop();
        write_attribute(&mut body, TAG_KEYWORD, "", b"job-printing").unwrap();
        body.push(TAG_END_OF_ATTRIBUTES);

        let parsed = IppResponse::parse(&body).unwrap();
        let reasons: Vec<_> = parsed
            .attributes
            .iter()
            .filter(|a| a.name == "job-state-reasons")
            .collect();
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons[1].value, b"job-printing".to_vec());
    }

    #[test]
    fn test_parse_truncated() {
        assert!(IppResponse::parse(&[1, 1, 0]).is_err());
        let mut body = response(0, &[]);
        body.truncate(body.len() - 4);
        assert!(IppResponse::parse(&body).is_err());
    }

    #[test]
    fn test_http_url_mapping() {
        assert_eq!(
            http_url("ipp://printer.local/printers/M200").unwrap(),
            "http://printer.local:631/printers/M200"
        );
        assert_eq!(
            http_url("ipps://printer.local:8631/ipp/print").unwrap(),
            "https://printer.local:8631/ipp/print"
        );
        assert_eq!(http_url("ipp://printer").unwrap(), "http://printer:631/");
        assert_eq!(
            http_url("https://cups.example/printers/M200").unwrap(),
            "https://cups.example/printers/M200"
        );
    }

    #[test]
    fn test_http_url_rejects_other_schemes() {
        assert!(http_url("/dev/usb/lp0").is_err());
        assert!(http_url("ftp://host/file").is_err());
        assert!(http_url("ipp:///printers/M200").is_err());
    }
}
