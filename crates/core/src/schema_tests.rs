use super::*;

fn textual_column(name: &str) -> SchemaColumn {
    SchemaColumn::Textual {
        common: ColumnCommon::new(name),
        preprocessing: TextPreprocessingConfig::default(),
        topic_modeling: TopicModelingConfig::default(),
    }
}

#[test]
fn textual_column_contributes_preprocessed_and_topic_companions() {
    let col = textual_column("review");
    let internal = col.internal_columns();
    assert_eq!(internal.len(), 2);
    assert!(internal.iter().all(|c| c.common().internal));
    assert_eq!(internal[0].name(), "review (Preprocessed)");
    assert_eq!(internal[1].name(), "review (Topic)");
    assert_eq!(internal[0].column_type(), ColumnType::Unique);
    assert_eq!(internal[1].column_type(), ColumnType::Topic);
}

#[test]
fn non_textual_columns_have_no_companions() {
    let col = SchemaColumn::Categorical {
        common: ColumnCommon::new("brand"),
    };
    assert!(col.internal_columns().is_empty());
    assert!(col.preprocessed_column_name().is_none());
}

#[test]
fn round_trips_through_json_with_type_tag() {
    let col = textual_column("review");
    let json = serde_json::to_value(&col).unwrap();
    assert_eq!(json["type"], "textual");
    assert_eq!(json["name"], "review");
    let back: SchemaColumn = serde_json::from_value(json).unwrap();
    assert_eq!(back.name(), "review");
}

#[test]
fn topic_modeling_config_defaults_match_recommended_values() {
    let cfg = TopicModelingConfig::default();
    assert_eq!(cfg.min_topic_size, 15);
    assert_eq!(cfg.n_gram_range, (1, 2));
    assert!(!cfg.no_outliers);
}
