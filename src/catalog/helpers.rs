//! Resource identifier derivation
//!
//! Static reports live under `file:///resources/` and generated documents
//! under `file:///generated/`, so the two namespaces never collide.

/// Scheme and authority shared by every resource URI.
pub const URI_PREFIX: &str = "file:///";
/// Category of pre-supplied reports.
pub const STATIC_CATEGORY: &str = "resources";
/// Category of documents created at runtime.
pub const GENERATED_CATEGORY: &str = "generated";
/// Prefix of every generated resource name.
pub const GENERATED_NAME_PREFIX: &str = "GENERATED_";
/// Public extension of every document resource.
pub const RESOURCE_EXTENSION: &str = "pdf";
/// Content-type tag of every document resource.
pub const DOCUMENT_MIME_TYPE: &str = "application/pdf";

/// Catalog name of a generated document, case-normalized.
///
/// `"jan-report"` becomes `"GENERATED_JAN-REPORT"`.
pub fn generated_resource_name(name: &str) -> String {
    format!("{}{}", GENERATED_NAME_PREFIX, name.to_uppercase())
}

/// Public URI of a generated document.
pub fn generated_resource_uri(name: &str) -> String {
    format!(
        "{}{}/{}.{}",
        URI_PREFIX, GENERATED_CATEGORY, name, RESOURCE_EXTENSION
    )
}

/// Catalog name of a quarterly report.
pub fn report_resource_name(quarter: u8) -> String {
    format!("2025_QUARTER_{}_ETF_PERSPECTIVES", quarter)
}

/// Public URI of a quarterly report.
pub fn report_resource_uri(quarter: u8) -> String {
    format!(
        "{}{}/etf_perspectives_2025_q{}.{}",
        URI_PREFIX, STATIC_CATEGORY, quarter, RESOURCE_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identifiers() {
        assert_eq!(generated_resource_name("Q1-Summary"), "GENERATED_Q1-SUMMARY");
        assert_eq!(
            generated_resource_uri("jan-report"),
            "file:///generated/jan-report.pdf"
        );
    }

    #[test]
    fn report_identifiers() {
        assert_eq!(report_resource_name(2), "2025_QUARTER_2_ETF_PERSPECTIVES");
        assert_eq!(
            report_resource_uri(2),
            "file:///resources/etf_perspectives_2025_q2.pdf"
        );
    }

    #[test]
    fn namespaces_are_disjoint() {
        for quarter in 1..=4 {
            assert!(!report_resource_name(quarter).starts_with(GENERATED_NAME_PREFIX));
        }
    }
}
