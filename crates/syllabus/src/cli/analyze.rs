use std::path::Path;

use anyhow::Result;
use syllabus_core::SyllabusExtractor;

use super::{load_config, print_json, read_input};

pub fn run(path: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let text = read_input(path)?;
    let extractor = SyllabusExtractor::from_config(&config)?;

    let analysis = extractor.orchestrator().analyze_strategies(&text);
    print_json(&analysis, false)
}
