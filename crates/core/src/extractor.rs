use crate::error::IngestError;
use lopdf::Document;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError> {
        if !path.exists() {
            return Err(IngestError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("knowledge document not found: {}", path.display()),
            )));
        }

        let document = Document::load(path).map_err(map_load_error)?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| IngestError::PdfParse(error.to_string()))?;

            if !text.trim().is_empty() {
                pages.push(PageText {
                    number: page_no,
                    text,
                });
            }
        }

        if pages.is_empty() {
            return Err(IngestError::PdfParse(format!(
                "pdf had no readable page text: {}",
                path.display()
            )));
        }

        Ok(pages)
    }
}

// An unreadable file is an io failure, not a malformed document.
fn map_load_error(error: lopdf::Error) -> IngestError {
    match error {
        lopdf::Error::IO(error) => IngestError::Io(error),
        other => IngestError::PdfParse(other.to_string()),
    }
}

/// Loads the knowledge document into ordered page texts. A failure here
/// is fatal to startup: without pages there is nothing to index.
pub fn extract_page_texts(path: &Path) -> Result<Vec<PageText>, IngestError> {
    LopdfExtractor.extract_pages(path)
}

#[cfg(test)]
mod tests {
    use super::extract_page_texts;
    use crate::error::IngestError;
    use std::path::Path;

    #[test]
    fn missing_document_is_an_io_error() {
        let result = extract_page_texts(Path::new("/nonexistent/data.pdf"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }

    #[test]
    fn load_io_failures_map_to_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped = super::map_load_error(lopdf::Error::IO(io));
        assert!(matches!(mapped, IngestError::Io(_)));

        let mapped = super::map_load_error(lopdf::Error::Header);
        assert!(matches!(mapped, IngestError::PdfParse(_)));
    }

    #[test]
    fn unreadable_existing_path_is_an_io_error() -> Result<(), Box<dyn std::error::Error>> {
        // A directory exists but cannot be read as a document.
        let dir = tempfile::tempdir()?;
        let result = extract_page_texts(dir.path());
        assert!(matches!(result, Err(IngestError::Io(_))));
        Ok(())
    }

    #[test]
    fn broken_document_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%broken")?;

        let result = extract_page_texts(&path);
        assert!(matches!(result, Err(IngestError::PdfParse(_))));
        Ok(())
    }
}
