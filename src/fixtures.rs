use crate::store::Store;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub groups: Vec<GroupFixture>,
}

#[derive(Debug, Deserialize)]
pub struct GroupFixture {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

impl Fixtures {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Malformed fixtures file")
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixtures from {}", path.display()))?;
        Self::parse(&raw)
    }

    /// Seeds groups. Slugs already present are an error.
    pub fn apply(&self, store: &Store) -> anyhow::Result<()> {
        for group in &self.groups {
            store
                .create_group(&group.title, &group.slug, &group.description)
                .map_err(|e| anyhow::anyhow!("Group '{}': {}", group.slug, e))?;
        }
        info!("Seeded {} groups", self.groups.len());
        Ok(())
    }
}
