use std::path::PathBuf;
use std::sync::Arc;

use nr_core::{ArticleRepository, Result};
use tracing::info;

pub mod backends;
pub mod corpus;
pub mod generator;

pub use backends::*;
pub use corpus::Corpus;
pub use generator::GeneratorConfig;

/// Where the corpus for a repository comes from.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    Generated(GeneratorConfig),
    JsonFile(PathBuf),
}

impl CorpusSource {
    pub fn load(&self) -> Result<Corpus> {
        match self {
            CorpusSource::Generated(config) => generator::generate(config),
            CorpusSource::JsonFile(path) => Corpus::from_json_file(path),
        }
    }
}

impl Default for CorpusSource {
    fn default() -> Self {
        Self::Generated(GeneratorConfig::default())
    }
}

pub fn create_repository(
    source: &CorpusSource,
    config: MemoryConfig,
) -> Result<Arc<dyn ArticleRepository>> {
    let corpus = source.load()?;
    info!(
        "📚 Corpus loaded: {} articles from {} sources",
        corpus.articles().len(),
        corpus.sources().len()
    );
    Ok(Arc::new(InMemoryRepository::new(Arc::new(corpus), config)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_repository, Corpus, CorpusSource, GeneratorConfig};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_repository_from_generated_and_json() {
        let generated = CorpusSource::Generated(GeneratorConfig {
            count: 12,
            ..GeneratorConfig::default()
        });
        let corpus = generated.load().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        corpus.write_json_file(&path).unwrap();

        let repo =
            create_repository(&CorpusSource::JsonFile(path), MemoryConfig::instant()).unwrap();
        let first = &corpus.articles()[0];
        assert_eq!(repo.get_by_id(&first.id).await.unwrap().as_ref(), Some(first));
        assert_eq!(repo.list_sources().await.unwrap(), corpus.sources());
    }
}
