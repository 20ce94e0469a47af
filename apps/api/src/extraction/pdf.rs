use std::panic::{self, AssertUnwindSafe};

use super::ExtractionError;

pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "parser panicked".to_string());
            tracing::warn!("pdf-extract panicked: {reason}");
            Err(ExtractionError::Pdf(reason))
        }
    }
}
