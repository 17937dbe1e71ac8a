//! Digital signature detection
//!
//! Editing a signed document invalidates its signatures, so callers warn the
//! user before they start. Detection is a heuristic and never fails: any
//! library error is logged and treated as "not signed".

use tracing::{debug, warn};

use super::traits::DocumentHandle;

/// Information-dictionary flag set by libraries that track signatures
pub const SIGNATURES_PRESENT_FLAG: &str = "IsSignaturesPresent";

/// Annotation subtypes that indicate a signature field
const SIGNATURE_SUBTYPES: [&str; 2] = ["Widget", "Sig"];

/// Whether the document looks digitally signed.
///
/// Signed when the information dictionary carries
/// [`SIGNATURES_PRESENT_FLAG`], or when the first page has a form widget or
/// signature annotation.
pub async fn detect_signatures(doc: &dyn DocumentHandle) -> bool {
    match doc.metadata().await {
        Ok(meta) if meta.flag(SIGNATURES_PRESENT_FLAG) => {
            debug!("Signature flag present in document info");
            return true;
        }
        Ok(_) => {}
        Err(e) => warn!("Signature check: failed to read metadata: {}", e),
    }

    if doc.page_count() == 0 {
        return false;
    }

    let page = match doc.get_page(1).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Signature check: failed to load first page: {}", e);
            return false;
        }
    };

    match page.annotations().await {
        Ok(annotations) => annotations
            .iter()
            .any(|a| SIGNATURE_SUBTYPES.contains(&a.subtype.as_str())),
        Err(e) => {
            warn!("Signature check: failed to read annotations: {}", e);
            false
        }
    }
}
