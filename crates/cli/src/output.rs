//! The single JSON line written to stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use rinku_core::LinkMetadata;
use serde::Serialize;

/// Final payload of an invocation. Absent optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Render mode: path of the cached preview card.
    Preview { image: PathBuf },

    /// Metadata mode.
    Metadata {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<PathBuf>,
    },

    Error { error: String },
}

impl Response {
    pub fn metadata(metadata: LinkMetadata, image: Option<PathBuf>) -> Self {
        Response::Metadata { title: metadata.title, url: metadata.url, image }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error { error: message.into() }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Response::Error { .. } => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        }
    }

    /// Write the response as one line and return the process exit code.
    ///
    /// Encoding or write failures are reported through `tracing` and exit 1.
    pub fn emit(&self, out: &mut impl Write) -> ExitCode {
        let line = match serde_json::to_string(self) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to encode response: {e}");
                return ExitCode::FAILURE;
            }
        };

        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::error!("failed to write response: {e}");
            return ExitCode::FAILURE;
        }

        self.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinku_core::{ImageHandle, TargetUrl};

    fn emitted(response: &Response) -> (String, ExitCode) {
        let mut out = Vec::new();
        let code = response.emit(&mut out);
        (String::from_utf8(out).unwrap(), code)
    }

    #[test]
    fn test_metadata_without_image() {
        let metadata = LinkMetadata::new(
            &TargetUrl::parse("example.com").unwrap(),
            Some("Example Domain".into()),
            None,
            None,
        );

        let (line, code) = emitted(&Response::metadata(metadata, None));
        assert_eq!(line, "{\"title\":\"Example Domain\",\"url\":\"https://example.com\"}\n");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_metadata_with_image_no_title() {
        let metadata = LinkMetadata::new(
            &TargetUrl::parse("https://example.com/a").unwrap(),
            None,
            Some("https://example.com/canonical".into()),
            Some(ImageHandle::new("https://example.com/og.png")),
        );

        let (line, _) = emitted(&Response::metadata(metadata, Some(PathBuf::from("/cache/abc.png"))));
        assert_eq!(line, "{\"url\":\"https://example.com/canonical\",\"image\":\"/cache/abc.png\"}\n");
    }

    #[test]
    fn test_preview() {
        let (line, code) = emitted(&Response::Preview { image: PathBuf::from("/cache/def.png") });
        assert_eq!(line, "{\"image\":\"/cache/def.png\"}\n");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_error() {
        let (line, code) = emitted(&Response::error("Invalid flag '-x'. Did you mean '--x'?"));
        assert_eq!(line, "{\"error\":\"Invalid flag '-x'. Did you mean '--x'?\"}\n");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[cfg(unix)]
    #[test]
    fn test_unencodable_path_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/cache/\xff.png"));
        let (line, code) = emitted(&Response::Preview { image: path });
        assert!(line.is_empty());
        assert_eq!(code, ExitCode::FAILURE);
    }
}
