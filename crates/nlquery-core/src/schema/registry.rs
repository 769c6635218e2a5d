//! Access to the persisted schema snapshot

use super::{SchemaSnapshot, SnapshotBuilder};
use crate::error::Result;
use crate::prompt::{self, CompiledPrompt};
use crate::search::SearchBackend;
use serde_json::Value;
use std::sync::Arc;

/// Reads and replaces the single live [`SchemaSnapshot`]
#[derive(Clone)]
pub struct SchemaRegistry {
    backend: Arc<dyn SearchBackend>,
}

impl SchemaRegistry {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Latest snapshot, or `None` when it is missing or unreadable
    pub async fn latest(&self) -> Option<SchemaSnapshot> {
        match self.backend.load_schema().await {
            Ok(Some(snapshot)) => Some(snapshot),
            Ok(None) => {
                tracing::warn!("No schema snapshot stored, using default fields");
                None
            }
            Err(e) => {
                tracing::warn!("Schema snapshot unavailable, using default fields: {}", e);
                None
            }
        }
    }

    /// Field list of the latest snapshot, empty when unavailable
    pub async fn fields(&self) -> Vec<String> {
        self.latest()
            .await
            .map(|snapshot| snapshot.fields)
            .unwrap_or_default()
    }

    /// Compile the query-generation instructions against the latest fields
    pub async fn compile_prompt(&self) -> CompiledPrompt {
        prompt::compile(&self.fields().await)
    }

    /// Rebuild the snapshot from a full scan of the data index and replace
    /// the stored one
    pub async fn refresh(&self) -> Result<SchemaSnapshot> {
        let mut builder = SnapshotBuilder::default();
        self.backend
            .scan_documents(&mut |doc: &Value| builder.add(doc))
            .await?;

        self.replace(builder.finish()).await
    }

    /// Build a snapshot from `documents` and replace the stored one
    pub async fn publish(&self, documents: &[Value]) -> Result<SchemaSnapshot> {
        self.replace(SchemaSnapshot::from_documents(documents)).await
    }

    async fn replace(&self, snapshot: SchemaSnapshot) -> Result<SchemaSnapshot> {
        self.backend.store_schema(&snapshot).await?;

        tracing::info!(
            fields = snapshot.fields.len(),
            doc_count = snapshot.doc_count,
            "Schema snapshot replaced"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NlQueryError;
    use crate::llm::GeneratedQuery;
    use crate::search::Hit;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryBackend {
        documents: Mutex<Vec<Value>>,
        stored: Mutex<Option<SchemaSnapshot>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl SearchBackend for MemoryBackend {
        fn backend_type(&self) -> &'static str {
            "memory"
        }

        async fn search(&self, _query: &GeneratedQuery, _size: usize) -> Result<Vec<Hit>> {
            Ok(vec![])
        }

        async fn load_schema(&self) -> Result<Option<SchemaSnapshot>> {
            if self.fail_reads {
                return Err(NlQueryError::Backend("connection refused".to_string()));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn store_schema(&self, snapshot: &SchemaSnapshot) -> Result<()> {
            *self.stored.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }

        async fn scan_documents(
            &self,
            visit: &mut (dyn for<'v> FnMut(&'v Value) + Send),
        ) -> Result<usize> {
            let documents = self.documents.lock().unwrap().clone();
            documents.iter().for_each(|doc| visit(doc));
            Ok(documents.len())
        }
    }

    #[tokio::test]
    async fn test_missing_snapshot_yields_empty_fields() {
        let registry = SchemaRegistry::new(Arc::new(MemoryBackend::default()));
        assert!(registry.latest().await.is_none());
        assert!(registry.fields().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_soft() {
        let backend = MemoryBackend {
            fail_reads: true,
            ..Default::default()
        };
        let registry = SchemaRegistry::new(Arc::new(backend));
        assert!(registry.fields().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let backend = Arc::new(MemoryBackend {
            documents: Mutex::new(vec![
                json!({"id": "CVE-2021-44228", "type": "cve"}),
                json!({"type": "component", "package": {"name": "log4j-core"}}),
            ]),
            ..Default::default()
        });
        *backend.stored.lock().unwrap() = Some(SchemaSnapshot {
            fields: vec!["stale".to_string()],
            doc_count: 1,
        });

        let registry = SchemaRegistry::new(backend.clone());
        let snapshot = registry.refresh().await.unwrap();

        assert_eq!(snapshot.doc_count, 2);
        assert_eq!(
            registry.fields().await,
            vec!["id", "package", "package.name", "type"]
        );
    }

    #[tokio::test]
    async fn test_refresh_overwrites_previous_scan() {
        let backend = Arc::new(MemoryBackend::default());
        let registry = SchemaRegistry::new(backend.clone());

        *backend.documents.lock().unwrap() = vec![json!({"a": 1})];
        registry.refresh().await.unwrap();
        *backend.documents.lock().unwrap() = vec![json!({"b": 1})];
        registry.refresh().await.unwrap();

        assert_eq!(registry.fields().await, vec!["b"]);
    }

    #[tokio::test]
    async fn test_publish_overwrites() {
        let registry = SchemaRegistry::new(Arc::new(MemoryBackend::default()));
        registry.publish(&[json!({"a": 1})]).await.unwrap();
        registry.publish(&[json!({"b": 1})]).await.unwrap();
        assert_eq!(registry.fields().await, vec!["b"]);
    }

    #[tokio::test]
    async fn test_compile_prompt_follows_snapshot() {
        let backend = Arc::new(MemoryBackend::default());
        let registry = SchemaRegistry::new(backend.clone());
        let fallback = registry.compile_prompt().await.framed("log4j");

        *backend.stored.lock().unwrap() = Some(SchemaSnapshot {
            fields: vec!["id".to_string(), "type".to_string()],
            doc_count: 1,
        });
        let compiled = registry.compile_prompt().await.framed("log4j");

        assert_ne!(fallback, compiled);
        assert!(compiled.contains("id, type"));
    }
}
