// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed project column schema: the discriminated union of column kinds and
//! the configuration a textual column carries into the topic-modeling
//! pipeline.

use serde::{Deserialize, Serialize};

/// Discriminant for [`SchemaColumn`]. Mirrors the `type` tag stored in
/// `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    Continuous,
    Categorical,
    OrderedCategorical,
    MultiCategorical,
    Temporal,
    Textual,
    Unique,
    Geospatial,
    Boolean,
    /// Internal-only: holds a cluster assignment produced by topic modeling.
    Topic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeospatialRole {
    Latitude,
    Longitude,
}

/// Fields shared by every column kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnCommon {
    pub name: String,
    /// Derived/companion columns (`(Preprocessed)`, `(Topic)`, `(Bins)`, ...)
    /// are marked internal and excluded from user-facing schema dumps.
    #[serde(default)]
    pub internal: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnCommon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            internal: false,
            active: true,
        }
    }

    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            internal: true,
            active: true,
        }
    }
}

/// A project's schema is a discriminated union of column kinds, one variant
/// per [`ColumnType`]. Each textual column additionally owns the companion
/// columns it needs (preprocessed text, assigned topic) — see
/// [`SchemaColumn::internal_columns`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SchemaColumn {
    Continuous {
        #[serde(flatten)]
        common: ColumnCommon,
        bins: Option<Vec<f64>>,
        #[serde(default = "default_bin_count")]
        bin_count: u32,
    },
    Categorical {
        #[serde(flatten)]
        common: ColumnCommon,
    },
    OrderedCategorical {
        #[serde(flatten)]
        common: ColumnCommon,
        category_order: Option<Vec<String>>,
    },
    MultiCategorical {
        #[serde(flatten)]
        common: ColumnCommon,
        #[serde(default = "default_delimiter")]
        delimiter: String,
    },
    Temporal {
        #[serde(flatten)]
        common: ColumnCommon,
        datetime_format: Option<String>,
    },
    Textual {
        #[serde(flatten)]
        common: ColumnCommon,
        preprocessing: TextPreprocessingConfig,
        topic_modeling: TopicModelingConfig,
    },
    Unique {
        #[serde(flatten)]
        common: ColumnCommon,
    },
    Geospatial {
        #[serde(flatten)]
        common: ColumnCommon,
        role: GeospatialRole,
    },
    Boolean {
        #[serde(flatten)]
        common: ColumnCommon,
    },
    Topic {
        #[serde(flatten)]
        common: ColumnCommon,
    },
}

impl SchemaColumn {
    pub fn common(&self) -> &ColumnCommon {
        match self {
            SchemaColumn::Continuous { common, .. }
            | SchemaColumn::Categorical { common }
            | SchemaColumn::OrderedCategorical { common, .. }
            | SchemaColumn::MultiCategorical { common, .. }
            | SchemaColumn::Temporal { common, .. }
            | SchemaColumn::Textual { common, .. }
            | SchemaColumn::Unique { common }
            | SchemaColumn::Geospatial { common, .. }
            | SchemaColumn::Boolean { common }
            | SchemaColumn::Topic { common } => common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            SchemaColumn::Continuous { .. } => ColumnType::Continuous,
            SchemaColumn::Categorical { .. } => ColumnType::Categorical,
            SchemaColumn::OrderedCategorical { .. } => ColumnType::OrderedCategorical,
            SchemaColumn::MultiCategorical { .. } => ColumnType::MultiCategorical,
            SchemaColumn::Temporal { .. } => ColumnType::Temporal,
            SchemaColumn::Textual { .. } => ColumnType::Textual,
            SchemaColumn::Unique { .. } => ColumnType::Unique,
            SchemaColumn::Geospatial { .. } => ColumnType::Geospatial,
            SchemaColumn::Boolean { .. } => ColumnType::Boolean,
            SchemaColumn::Topic { .. } => ColumnType::Topic,
        }
    }

    /// Companion columns this column implicitly contributes to the
    /// workspace, e.g. a textual column's `(Preprocessed)` and `(Topic)`
    /// siblings. Named and typed the way a user-visible column is, but
    /// always `internal: true`.
    pub fn internal_columns(&self) -> Vec<SchemaColumn> {
        match self {
            SchemaColumn::Textual { common, .. } => vec![
                SchemaColumn::Unique {
                    common: ColumnCommon::internal(format!("{} (Preprocessed)", common.name)),
                },
                SchemaColumn::Topic {
                    common: ColumnCommon::internal(format!("{} (Topic)", common.name)),
                },
            ],
            _ => Vec::new(),
        }
    }

    /// The `(Preprocessed)` companion column name for a textual column.
    pub fn preprocessed_column_name(&self) -> Option<String> {
        match self {
            SchemaColumn::Textual { common, .. } => Some(format!("{} (Preprocessed)", common.name)),
            _ => None,
        }
    }

    /// The `(Topic)` companion column name for a textual column.
    pub fn topic_column_name(&self) -> Option<String> {
        match self {
            SchemaColumn::Textual { common, .. } => Some(format!("{} (Topic)", common.name)),
            _ => None,
        }
    }

    /// Mutable access to a textual column's hyperparameters. `None` for
    /// every other column kind. The experiment driver is the only caller
    /// that mutates this in place — every other path treats the schema as
    /// read-only input to the pipeline.
    pub fn topic_modeling_mut(&mut self) -> Option<&mut TopicModelingConfig> {
        match self {
            SchemaColumn::Textual { topic_modeling, .. } => Some(topic_modeling),
            _ => None,
        }
    }
}

fn default_bin_count() -> u32 {
    3
}

fn default_delimiter() -> String {
    ",".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentEmbeddingMethod {
    Doc2Vec,
    #[serde(rename = "all-MiniLM-L6-v2")]
    AllMiniLmL6V2,
    Lsa,
}

impl Default for DocumentEmbeddingMethod {
    fn default() -> Self {
        Self::AllMiniLmL6V2
    }
}

/// Preprocessing knobs for a textual column. Read-only input to the
/// Preprocess stage; the tokenizer/lemmatizer itself is an external
/// collaborator (see `loom_pipeline::stages`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPreprocessingConfig {
    #[serde(default)]
    pub ignore_tokens: Vec<String>,
    #[serde(default)]
    pub stopwords: Vec<String>,
    #[serde(default = "default_true")]
    pub remove_email: bool,
    #[serde(default = "default_true")]
    pub remove_url: bool,
    #[serde(default = "default_true")]
    pub remove_number: bool,
    #[serde(default = "default_min_df")]
    pub min_df: u32,
    #[serde(default = "default_max_df")]
    pub max_df: f64,
    pub max_unique_words: Option<u32>,
    #[serde(default = "default_min_document_length")]
    pub min_document_length: u32,
    #[serde(default = "default_min_word_length")]
    pub min_word_length: u32,
}

fn default_min_df() -> u32 {
    5
}
fn default_max_df() -> f64 {
    0.5
}
fn default_min_document_length() -> u32 {
    5
}
fn default_min_word_length() -> u32 {
    3
}

impl Default for TextPreprocessingConfig {
    fn default() -> Self {
        Self {
            ignore_tokens: Vec::new(),
            stopwords: Vec::new(),
            remove_email: true,
            remove_url: true,
            remove_number: true,
            min_df: default_min_df(),
            max_df: default_max_df(),
            max_unique_words: None,
            min_document_length: default_min_document_length(),
            min_word_length: default_min_word_length(),
        }
    }
}

/// Hyperparameters controlling the topic-modeling stages (model builder,
/// embed, topic modeling, visualization). Mutated wholesale by the
/// experiment driver between trials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModelingConfig {
    #[serde(default)]
    pub low_memory: bool,
    #[serde(default = "default_min_topic_size")]
    pub min_topic_size: u32,
    #[serde(default = "default_max_topic_size")]
    pub max_topic_size: f64,
    #[serde(default = "default_clustering_conservativeness")]
    pub clustering_conservativeness: f64,
    pub globality_consideration: Option<u32>,
    pub max_topics: Option<u32>,
    #[serde(default = "default_n_gram_range")]
    pub n_gram_range: (u32, u32),
    #[serde(default)]
    pub embedding_method: DocumentEmbeddingMethod,
    #[serde(default = "default_super_topic_similarity")]
    pub super_topic_similarity: f64,
    #[serde(default = "default_top_n_words")]
    pub top_n_words: u32,
    #[serde(default)]
    pub no_outliers: bool,
    #[serde(default)]
    pub represent_outliers: bool,
}

fn default_min_topic_size() -> u32 {
    15
}
fn default_max_topic_size() -> f64 {
    0.2
}
fn default_clustering_conservativeness() -> f64 {
    1.0
}
fn default_n_gram_range() -> (u32, u32) {
    (1, 2)
}
fn default_super_topic_similarity() -> f64 {
    0.7
}
fn default_top_n_words() -> u32 {
    50
}

impl Default for TopicModelingConfig {
    fn default() -> Self {
        Self {
            low_memory: false,
            min_topic_size: default_min_topic_size(),
            max_topic_size: default_max_topic_size(),
            clustering_conservativeness: default_clustering_conservativeness(),
            globality_consideration: None,
            max_topics: None,
            n_gram_range: default_n_gram_range(),
            embedding_method: DocumentEmbeddingMethod::default(),
            super_topic_similarity: default_super_topic_similarity(),
            top_n_words: default_top_n_words(),
            no_outliers: false,
            represent_outliers: false,
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
