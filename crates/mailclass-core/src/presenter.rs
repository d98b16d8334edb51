//! Display values derived from a classification result.

use crate::{ClassificationResult, Provider};

/// The only category rendered in the primary bucket.
pub const PRIMARY_CATEGORY: &str = "Produtivo";

/// Read-only view over a result, plus the provider that was requested.
#[derive(Debug, Clone, Copy)]
pub struct ResultPresenter<'a> {
    result: &'a ClassificationResult,
    requested_provider: Provider,
}

impl<'a> ResultPresenter<'a> {
    pub fn new(result: &'a ClassificationResult, requested_provider: Provider) -> Self {
        Self {
            result,
            requested_provider,
        }
    }

    /// Strict equality with "Produtivo". Every other value, including
    /// "Improdutivo" and the empty string, is secondary.
    pub fn is_primary_bucket(&self) -> bool {
        self.result.category == PRIMARY_CATEGORY
    }

    pub fn category(&self) -> &'a str {
        &self.result.category
    }

    pub fn confidence(&self) -> String {
        format_confidence(self.result.confidence)
    }

    /// Provider reported by the backend, else the one that was requested.
    pub fn provider_label(&self) -> &'a str {
        match self.result.provider.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => self.requested_provider.as_str(),
        }
    }

    pub fn suggested_reply(&self) -> &'a str {
        &self.result.suggested_reply
    }

    pub fn language(&self) -> &'a str {
        &self.result.language
    }

    pub fn preview(&self) -> &'a str {
        &self.result.preview
    }
}

/// Percentage with one fractional digit: `0.873` -> `"87.3%"`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Human-readable size in base-1024 units, at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(category: &str, confidence: f64, provider: Option<&str>) -> ClassificationResult {
        ClassificationResult {
            category: category.to_string(),
            confidence,
            suggested_reply: "Olá!".to_string(),
            language: "pt".to_string(),
            preview: "...".to_string(),
            provider: provider.map(str::to_string),
        }
    }

    #[test]
    fn only_produtivo_is_primary() {
        let r = result("Produtivo", 0.5, None);
        assert!(ResultPresenter::new(&r, Provider::OpenAi).is_primary_bucket());

        for other in ["Improdutivo", "", "Unknown", "produtivo", "Produtivo "] {
            let r = result(other, 0.5, None);
            assert!(
                !ResultPresenter::new(&r, Provider::OpenAi).is_primary_bucket(),
                "{other:?} should be secondary"
            );
        }
    }

    #[test]
    fn confidence_has_one_decimal() {
        assert_eq!(format_confidence(0.873), "87.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
        let r = result("Produtivo", 0.5, None);
        assert_eq!(ResultPresenter::new(&r, Provider::OpenAi).confidence(), "50.0%");
    }

    #[test]
    fn provider_falls_back_to_requested() {
        let reported = result("Produtivo", 0.5, Some("huggingface"));
        assert_eq!(
            ResultPresenter::new(&reported, Provider::OpenAi).provider_label(),
            "huggingface"
        );

        let missing = result("Produtivo", 0.5, None);
        assert_eq!(
            ResultPresenter::new(&missing, Provider::HuggingFace).provider_label(),
            "huggingface"
        );

        let empty = result("Produtivo", 0.5, Some(""));
        assert_eq!(
            ResultPresenter::new(&empty, Provider::OpenAi).provider_label(),
            "openai"
        );
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
