//! Defaults shared by the library and the command-line front end.

/// Page budget per output volume when none is configured.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Published location of the RFC Editor's index.
pub const DEFAULT_INDEX_URL: &str = "https://www.rfc-editor.org/rfc-index.xml";

/// PDF rendition of an RFC. `{number}` is the unpadded RFC number.
pub const DEFAULT_DOCUMENT_URL_TEMPLATE: &str =
    "https://www.rfc-editor.org/rfc/pdfrfc/rfc{number}.txt.pdf";

/// File name looked up by the directory source.
pub const DEFAULT_DOCUMENT_FILE_TEMPLATE: &str = "rfc{number}.txt.pdf";

/// XML namespace of `rfc-index.xml`.
pub const RFC_INDEX_NAMESPACE: &str = "http://www.rfc-editor.org/rfc-index";

/// Extension of written volumes.
pub const VOLUME_EXTENSION: &str = "pdf";

/// Per-request timeout for HTTP fetches, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Prefix used for RFC document ids (`RFC0791`).
pub const RFC_ID_PREFIX: &str = "RFC";

/// Minimum digit width of the numeric part of a document id.
pub const DOC_ID_DIGITS: usize = 4;

/// `User-Agent` sent with HTTP requests.
pub const USER_AGENT: &str = concat!("rfcbook/", env!("CARGO_PKG_VERSION"));
