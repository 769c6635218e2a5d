//! Prompt compilation for query generation

/// Field vocabulary used when no schema snapshot is available
pub const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "name",
    "category",
    "value",
    "package.name",
    "package.friendly_name",
    "package.desc",
    "package.version",
];

/// Instruction text bound to the field vocabulary it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    instructions: String,
    fields: Vec<String>,
}

impl CompiledPrompt {
    /// Instruction block sent ahead of the user prompt
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Field paths embedded in the instructions
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the built-in vocabulary was used instead of a snapshot
    pub fn uses_default_fields(&self) -> bool {
        self.fields.iter().map(String::as_str).eq(DEFAULT_FIELDS.iter().copied())
    }

    /// Final text handed to the model for one request
    pub fn framed(&self, user_prompt: &str) -> String {
        format!(
            "{}\nPrompt: {}\nElasticsearch Query:",
            self.instructions, user_prompt
        )
    }
}

/// Build the instruction block from the live field list.
///
/// An empty list falls back to [`DEFAULT_FIELDS`].
pub fn compile(schema_fields: &[String]) -> CompiledPrompt {
    let fields: Vec<String> = if schema_fields.is_empty() {
        DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
    } else {
        schema_fields.to_vec()
    };

    let instructions = build_instructions(&fields.join(", "));

    CompiledPrompt {
        instructions,
        fields,
    }
}

fn build_instructions(field_list: &str) -> String {
    format!(
        "You are an expert in Elasticsearch. Given a user's natural language prompt, \
         generate a minimal Elasticsearch JSON query (no explanations, just the JSON) \
         that would retrieve relevant records from an index with these available fields: {}. \
         If the prompt is about a CVE, search for the value in all likely fields, including: \
         id, original.cve.epss.cve, original.cve.kev.cveID, \
         original.cve.osv.affected.package.name, and any other field that could contain \
         a CVE identifier. \
         If the prompt is about a component, search for both root-level fields and nested \
         fields under package.name and package.friendly_name. For example, if the user prompt \
         is a component name like 'Log4jScanner', match on package.friendly_name and \
         package.name fields. \
         If the prompt is ambiguous, return a match_all query.",
        field_list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_use_defaults() {
        let prompt = compile(&[]);
        assert!(prompt.uses_default_fields());
        assert!(prompt.instructions().contains(
            "id, name, category, value, package.name, package.friendly_name, package.desc, package.version"
        ));
    }

    #[test]
    fn test_snapshot_fields_rendered_verbatim() {
        let fields = vec![
            "id".to_string(),
            "original.cve.kev.cveID".to_string(),
            "type".to_string(),
        ];
        let prompt = compile(&fields);

        assert!(!prompt.uses_default_fields());
        assert_eq!(prompt.fields(), fields.as_slice());
        assert!(prompt
            .instructions()
            .contains("available fields: id, original.cve.kev.cveID, type."));
    }

    #[test]
    fn test_domain_rules_present() {
        let text = compile(&[]).instructions().to_string();
        assert!(text.contains("original.cve.epss.cve"));
        assert!(text.contains("original.cve.osv.affected.package.name"));
        assert!(text.contains("Log4jScanner"));
        assert!(text.contains("match_all"));
    }

    #[test]
    fn test_framing() {
        let prompt = compile(&[]);
        let framed = prompt.framed("show me CVE-2020-1472");

        assert!(framed.starts_with(prompt.instructions()));
        assert!(framed.ends_with("\nPrompt: show me CVE-2020-1472\nElasticsearch Query:"));
    }

    #[test]
    fn test_empty_user_prompt_still_framed() {
        let framed = compile(&[]).framed("");
        assert!(framed.ends_with("\nPrompt: \nElasticsearch Query:"));
    }
}
