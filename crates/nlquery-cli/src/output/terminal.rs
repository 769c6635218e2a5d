//! Terminal output formatter

use nlquery_core::{ClassifiedHit, PipelineResponse, Results, SchemaSnapshot};
use serde_json::Value;

pub fn format_response(response: &PipelineResponse) -> String {
    let mut output = format!("intent: {}\n", response.intent);

    if let Some(ref error) = response.error {
        output.push_str(&format!("error:  {}\n", error));
        return output;
    }

    match &response.results {
        None => output.push_str("No matching records\n"),
        Some(Results::Single(hit)) => output.push_str(&format_hit(hit)),
        Some(Results::All(hits)) => {
            output.push_str(&format!("{} records\n", hits.len()));
            for hit in hits {
                output.push_str(&format_hit(hit));
            }
        }
    }

    output
}

fn format_hit(hit: &ClassifiedHit) -> String {
    let source = &hit.data.source;
    let label = display_label(source);
    let id = hit.data.id().unwrap_or("-");
    format!("  [{:?}] {} #{}\n", hit.template, label, id)
}

/// Best human-readable name for a record
fn display_label(source: &Value) -> String {
    let candidates = [
        source.pointer("/package/friendly_name"),
        source.pointer("/package/name"),
        source.get("name"),
        source.get("id"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "(unnamed)".to_string())
}

pub fn format_schema(snapshot: Option<&SchemaSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "No schema snapshot stored; prompts use the default field list\n".to_string();
    };

    let mut output = format!(
        "Documents:  {}\nFields:     {}\n\n",
        snapshot.doc_count,
        snapshot.fields.len()
    );
    for field in &snapshot.fields {
        output.push_str(&format!("  {}\n", field));
    }
    output
}
