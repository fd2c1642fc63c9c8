//! Plugin registry + dispatch: a static table of plugins resolved by suffix,
//! with first-claim-wins precedence among plugins registered for the same
//! suffix.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::PreprocessConfig;
use crate::error::EngineError;
use crate::preprocess::Preprocessor;
use crate::tokenizer::ecmascript::EcmaScriptPlugin;
use crate::tokenizer::generic_code::GenericCodePlugin;
use crate::tokenizer::plaintext::PlaintextPlugin;
use crate::tokenizer::python::PythonPlugin;
use crate::tokenizer::{Field, TokenizerPlugin};

pub struct Analyzer {
    plugins: Vec<Arc<dyn TokenizerPlugin>>,
    registry: HashMap<String, usize>,
    preprocessor: Preprocessor,
    config: PreprocessConfig,
}

impl Analyzer {
    pub fn new(config: PreprocessConfig) -> Self {
        Self {
            plugins: Vec::new(),
            registry: HashMap::new(),
            preprocessor: Preprocessor::new(),
            config,
        }
    }

    /// Registers the four built-in plugins: plaintext, Python, ECMAScript,
    /// and the generic C-like/markup catch-all.
    pub fn with_default_plugins(config: PreprocessConfig) -> Self {
        let mut analyzer = Self::new(config);
        analyzer.register(Arc::new(PlaintextPlugin::default()));
        analyzer.register(Arc::new(PythonPlugin));
        analyzer.register(Arc::new(EcmaScriptPlugin));
        analyzer.register(Arc::new(GenericCodePlugin::default()));
        analyzer
    }

    /// First claim on a suffix wins; later plugins claiming the same suffix
    /// are logged and ignored for that suffix.
    pub fn register(&mut self, plugin: Arc<dyn TokenizerPlugin>) {
        let idx = self.plugins.len();
        for suffix in plugin.suffixes() {
            if self.registry.contains_key(*suffix) {
                tracing::warn!(suffix, "suffix already claimed by another plugin, ignoring");
                continue;
            }
            self.registry.insert((*suffix).to_string(), idx);
        }
        self.plugins.push(plugin);
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PreprocessConfig) {
        self.config = config;
    }

    pub fn analyze(
        &self,
        path: &Path,
    ) -> Result<HashMap<Field, HashMap<String, u32>>, EngineError> {
        let suffix = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let idx = *self
            .registry
            .get(&suffix)
            .ok_or_else(|| EngineError::NotAnalyzable(path.to_path_buf()))?;
        self.plugins[idx].tokenize(path, &self.preprocessor, &self.config)
    }

    /// Preprocesses query text through the same pipeline indexing uses, so
    /// the query and index vocabularies always agree.
    pub fn query(&self, field: Field, text: &str) -> Vec<String> {
        self.preprocessor.preprocess_text(self.config.field(field), text)
    }
}
