use crate::model::StatsDocument;
use crate::normalize::normalize_value;
use crate::query::{MethodSet, QueryEngine};
use crate::validation::{FindingStorage, Rule, RuleData};
use serde_json::Value as JsonValue;

pub fn document(value: JsonValue) -> StatsDocument {
    normalize_value(value, "stats.json", Vec::new()).unwrap()
}

pub fn run_rule(rule: &dyn Rule, params: &JsonValue, input: &[StatsDocument], reference: Option<&StatsDocument>) -> FindingStorage {
    let engine = QueryEngine::new(input, MethodSet::new()).unwrap();
    let data = RuleData {
        input,
        reference,
        engine: &engine,
        compressor: None,
        network: None,
    };
    let mut storage = FindingStorage::new();
    rule.run(params, &data, &mut storage.api("test")).unwrap();
    storage
}

pub fn messages(storage: &FindingStorage) -> Vec<String> {
    storage.findings().map(|finding| finding.message.clone()).collect()
}
