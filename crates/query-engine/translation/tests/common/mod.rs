use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use query_engine_metadata::metadata;
use query_engine_translation::translation;
use query_engine_translation::translation::query::plan::Pagination;
use query_engine_translation::translation::query::RequestOptions;

/// A read request on an entity, as stored in a goldenfile directory.
#[derive(Debug, Deserialize)]
pub struct TranslationRequest {
    pub entity: String,
    #[serde(default)]
    pub options: RequestOptions,
}

/// Load the metadata and the pagination defaults shared by the goldenfiles.
pub async fn load_configuration() -> anyhow::Result<(metadata::Metadata, Pagination)> {
    let parsed_configuration =
        rest_store_configuration::parse_configuration(PathBuf::from("tests/goldenfiles")).await?;
    let configuration =
        rest_store_configuration::make_runtime_configuration(parsed_configuration)?;
    let pagination = Pagination {
        limit: configuration.pagination.limit,
        offset: configuration.pagination.offset,
    };
    Ok((configuration.metadata, pagination))
}

/// Read the request of a goldenfile directory, with the configured pagination defaults.
pub fn read_request(testname: &str, pagination: Pagination) -> anyhow::Result<TranslationRequest> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);
    let mut request: TranslationRequest =
        serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;
    request.options.pagination_defaults = pagination;
    Ok(request)
}

/// Translate the request of a goldenfile directory and compare the plan with the expected one.
pub async fn test_translation(testname: &str) -> anyhow::Result<()> {
    let (metadata, pagination) = load_configuration().await?;
    let request = read_request(testname, pagination)?;

    let plan = translation::query::translate(&metadata, &request.entity, &request.options)?;

    let expected: serde_json::Value = serde_json::from_str(&fs::read_to_string(
        PathBuf::from("tests/goldenfiles")
            .join(testname)
            .join("plan.json"),
    )?)?;
    similar_asserts::assert_eq!(serde_json::to_value(&plan)?, expected);
    Ok(())
}
