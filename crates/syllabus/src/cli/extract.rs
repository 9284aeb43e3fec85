use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use syllabus_core::normalize;
use syllabus_core::{Category, CourseOverview, SyllabusExtraction, SyllabusExtractor};

use super::{load_config, print_json, read_input};

pub struct ExtractOptions<'a> {
    pub path: Option<&'a Path>,
    pub only: &'a [Category],
    pub enrich: bool,
    pub overview: bool,
    pub config: Option<&'a Path>,
    pub compact: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    extraction: &'a SyllabusExtraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    overview: Option<CourseOverview>,
}

pub async fn run(options: ExtractOptions<'_>) -> Result<()> {
    let mut config = load_config(options.config)?;
    if options.enrich {
        config.enrich_difficulty = true;
    }

    let text = read_input(options.path)?;
    let extractor = SyllabusExtractor::from_config(&config)?.with_progress(|progress| {
        tracing::debug!(percent = progress.percent, stage = %progress.stage, "Progress");
    });

    let all = Category::ALL;
    let categories = if options.only.is_empty() {
        &all[..]
    } else {
        options.only
    };
    let extraction = extractor.extract_categories(&text, categories).await?;

    let overview = options
        .overview
        .then(|| CourseOverview::build(&extraction, normalize::now()));

    print_json(
        &Output {
            extraction: &extraction,
            overview,
        },
        options.compact,
    )
}
