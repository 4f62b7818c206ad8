//! Turning uploads and web pages into plain text for extraction.

use std::io::{Cursor, Read};
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use scraper::{Html, Node};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Invalid DOCX: {0}")]
    Docx(String),

    #[error("Invalid PDF: {0}")]
    Pdf(String),
}

const SKIPPED_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// HTTP page fetcher with its own timeout, separate from the model client.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Visible text of the page at `url`, or an empty string on any failure.
    pub async fn fetch_text(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return String::new();
        }
        match self.try_fetch(url).await {
            Ok(text) => {
                debug!("Fetched {} chars of text from {url}", text.len());
                text
            }
            Err(e) => {
                warn!("Could not fetch {url}: {e}");
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String, SourceError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html_to_text(&html))
    }
}

/// Whitespace-collapsed document text with script/style/noscript removed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Plain text of an uploaded document, chosen by file extension.
/// Unsupported extensions give an empty string.
pub fn read_document(filename: &str, bytes: &[u8]) -> Result<String, SourceError> {
    let name = filename.to_ascii_lowercase();
    if name.ends_with(".txt") {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    } else if name.ends_with(".docx") {
        read_docx(bytes)
    } else if name.ends_with(".pdf") {
        read_pdf(bytes)
    } else {
        debug!("Ignoring upload with unsupported extension: {filename}");
        Ok(String::new())
    }
}

/// Paragraph texts from `word/document.xml`, one per line.
fn read_docx(bytes: &[u8]) -> Result<String, SourceError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| SourceError::Docx(e.to_string()))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| SourceError::Docx("missing word/document.xml".to_string()))?
        .read_to_string(&mut doc_xml)
        .map_err(|e| SourceError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    // Text boxes nest <w:p> inside a paragraph; their text joins the outer one.
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // <w:p/> is an empty paragraph.
                if depth == 0 && e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 1 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    depth = depth.saturating_sub(1);
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| SourceError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Per-page text joined by newlines.
fn read_pdf(bytes: &[u8]) -> Result<String, SourceError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| SourceError::Pdf(e.to_string()))?;
    // pdf-extract separates pages with form feeds.
    Ok(text
        .split('\x0C')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_html_to_text_drops_scripts_and_collapses_whitespace() {
        let html = r#"
            <html>
              <head><title>Acme</title><style>body { color: red; }</style></head>
              <body>
                <h1>About   Acme</h1>
                <script>var tracking = 1;</script>
                <p>We build
                   rockets.</p>
                <noscript>Enable JavaScript</noscript>
              </body>
            </html>"#;
        assert_eq!(html_to_text(html), "Acme About Acme We build rockets.");
    }

    #[test]
    fn test_read_txt_is_lossy_utf8() {
        let text = read_document("ad.TXT", b"Data Scientist\n\xffBerlin").unwrap();
        assert!(text.starts_with("Data Scientist\n"));
        assert!(text.ends_with("Berlin"));
    }

    #[test]
    fn test_unsupported_extension_is_empty() {
        assert_eq!(read_document("ad.rtf", b"{\\rtf1 hello}").unwrap(), "");
        assert_eq!(read_document("noextension", b"hello").unwrap(), "");
    }

    #[test]
    fn test_read_docx_joins_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Senior Data Scientist</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Berlin, </w:t></w:r><w:r><w:t>Germany</w:t></w:r></w:p>
    <w:p><w:r><w:t>Python &amp; SQL</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = read_document("vacancy.docx", &docx_bytes(xml)).unwrap();
        assert_eq!(text, "Senior Data Scientist\nBerlin, Germany\nPython & SQL");
    }

    #[test]
    fn test_read_docx_keeps_text_box_inside_its_paragraph() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t xml:space="preserve">Intro </w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p><w:p/></w:txbxContent></w:pict></w:r><w:r><w:t xml:space="preserve"> tail</w:t></w:r></w:p>
    <w:p><w:r><w:t>Next</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = read_document("vacancy.docx", &docx_bytes(xml)).unwrap();
        assert_eq!(text, "Intro Boxed tail\nNext");
    }

    #[test]
    fn test_docx_without_document_xml_is_an_error() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = read_document("a.docx", buffer.get_ref()).unwrap_err();
        assert!(matches!(err, SourceError::Docx(_)));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        assert!(matches!(
            read_document("a.pdf", b"definitely not a pdf"),
            Err(SourceError::Pdf(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_text_strips_markup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><p>Acme builds rockets.</p><script>x()</script></body></html>",
            ))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        let text = fetcher.fetch_text(&format!("{}/about", server.uri())).await;
        assert_eq!(text, "Acme builds rockets.");
    }

    #[tokio::test]
    async fn test_fetch_failures_are_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.fetch_text(&format!("{}/missing", server.uri())).await, "");
        assert_eq!(fetcher.fetch_text("   ").await, "");
        assert_eq!(fetcher.fetch_text("not a url").await, "");
    }
}
