//! Result classification
//!
//! Each hit is labelled by its `_source.type` discriminator, and a result
//! set gets one aggregate [`Intent`].

use crate::search::Hit;
use serde::{Deserialize, Serialize};

/// Presentation template for a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    /// Component / package record
    TemplateA,
    /// Vulnerability record
    TemplateB,
    Unknown,
}

/// Aggregate nature of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Cve,
    Package,
    Mixed,
    Error,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intent::Cve => "cve",
            Intent::Package => "package",
            Intent::Mixed => "mixed",
            Intent::Error => "error",
        };
        f.write_str(s)
    }
}

/// A hit paired with its template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedHit {
    pub template: Template,
    pub data: Hit,
}

pub fn is_vulnerability(hit: &Hit) -> bool {
    hit.doc_type()
        .is_some_and(|t| t.eq_ignore_ascii_case("cve"))
}

pub fn is_component(hit: &Hit) -> bool {
    hit.doc_type()
        .is_some_and(|t| t.eq_ignore_ascii_case("component"))
}

pub fn template_for(hit: &Hit) -> Template {
    if is_vulnerability(hit) {
        Template::TemplateB
    } else if is_component(hit) {
        Template::TemplateA
    } else {
        Template::Unknown
    }
}

pub fn classify_hit(hit: Hit) -> ClassifiedHit {
    ClassifiedHit {
        template: template_for(&hit),
        data: hit,
    }
}

/// Classify every hit, preserving order
pub fn classify(hits: Vec<Hit>) -> Vec<ClassifiedHit> {
    hits.into_iter().map(classify_hit).collect()
}

/// Infer the aggregate intent of a result set.
///
/// Empty sets read as `package`. Anything that is neither all-vulnerability
/// nor all-component, unknown records included, is `mixed`.
pub fn infer_intent(hits: &[Hit]) -> Intent {
    if hits.is_empty() {
        return Intent::Package;
    }
    if hits.iter().all(is_vulnerability) {
        Intent::Cve
    } else if hits.iter().all(is_component) {
        Intent::Package
    } else {
        Intent::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(doc_type: &str) -> Hit {
        Hit::from_source(json!({ "type": doc_type }))
    }

    #[test]
    fn test_templates() {
        assert_eq!(template_for(&hit("cve")), Template::TemplateB);
        assert_eq!(template_for(&hit("CVE")), Template::TemplateB);
        assert_eq!(template_for(&hit("Component")), Template::TemplateA);
        assert_eq!(template_for(&hit("advisory")), Template::Unknown);
        assert_eq!(template_for(&Hit::from_source(json!({}))), Template::Unknown);
    }

    #[test]
    fn test_classify_preserves_order() {
        let classified = classify(vec![hit("component"), hit("cve"), hit("other")]);
        let templates: Vec<Template> = classified.iter().map(|c| c.template).collect();
        assert_eq!(
            templates,
            vec![Template::TemplateA, Template::TemplateB, Template::Unknown]
        );
    }

    #[test]
    fn test_intents() {
        assert_eq!(infer_intent(&[]), Intent::Package);
        assert_eq!(infer_intent(&[hit("cve"), hit("CVE")]), Intent::Cve);
        assert_eq!(infer_intent(&[hit("component")]), Intent::Package);
        assert_eq!(infer_intent(&[hit("cve"), hit("component")]), Intent::Mixed);
    }

    #[test]
    fn test_unknown_counts_toward_mixed() {
        assert_eq!(infer_intent(&[hit("other")]), Intent::Mixed);
        assert_eq!(infer_intent(&[hit("cve"), hit("other")]), Intent::Mixed);
    }

    #[test]
    fn test_wire_names() {
        let classified = classify_hit(hit("cve"));
        let value = serde_json::to_value(&classified).unwrap();
        assert_eq!(value["template"], "TemplateB");
        assert_eq!(value["data"]["_source"]["type"], "cve");
        assert_eq!(serde_json::to_value(Intent::Mixed).unwrap(), "mixed");
        assert_eq!(Intent::Error.to_string(), "error");
    }
}
