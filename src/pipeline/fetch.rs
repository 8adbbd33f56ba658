// src/pipeline/fetch.rs

//! Paged fetching of the `wanted/*` listing endpoints.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Record, SelectionSettings, SourcePool};
use crate::services::ArrApi;
use crate::utils::as_int;

/// One decoded listing page.
#[derive(Debug, Default)]
pub struct Page {
    pub records: Vec<Record>,
    pub total_records: Option<i64>,
}

/// Decode a listing payload, rejecting anything whose `records` is not a list.
pub fn parse_page(path: &str, payload: Value) -> Result<Page> {
    let Value::Object(mut body) = payload else {
        return Err(AppError::unexpected(path, "payload is not an object"));
    };

    let total_records = body.get("totalRecords").and_then(as_int);
    let records = match body.remove("records") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(records)) => records,
        Some(_) => return Err(AppError::unexpected(path, "records is not a list")),
    };

    Ok(Page {
        records,
        total_records,
    })
}

/// Fetch every page of a listing endpoint.
///
/// Stops on an empty page, once `totalRecords` is reached, or (without a
/// total) on a short page.
pub async fn fetch_all(
    api: &dyn ArrApi,
    path: &str,
    page_size: u32,
    extra_params: &[(&str, &str)],
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        let mut query = vec![
            ("page".to_string(), page_number.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
        ];
        query.extend(
            extra_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        log::debug!("Fetching {} params={:?}", path, query);
        let page = parse_page(path, api.get_json(path, &query).await?)?;
        let page_len = page.records.len();
        records.extend(page.records);

        if page_len == 0 {
            break;
        }
        match page.total_records {
            Some(total) if records.len() as i64 >= total => break,
            None if page_len < page_size as usize => break,
            _ => {}
        }

        page_number += 1;
    }

    log::debug!("Fetched {} total records from {}", records.len(), path);
    Ok(records)
}

/// Fetch both wanted pools, skipping any pool whose weight is zero.
pub async fn fetch_wanted(
    api: &dyn ArrApi,
    settings: &SelectionSettings,
) -> Result<(Vec<Record>, Vec<Record>)> {
    let extra = settings.flavor.wanted_params();

    let missing = if settings.missing_weight > 0.0 {
        fetch_all(api, SourcePool::Missing.path(), settings.page_size, extra).await?
    } else {
        Vec::new()
    };
    let cutoff = if settings.cutoff_weight > 0.0 {
        fetch_all(api, SourcePool::CutoffUnmet.path(), settings.page_size, extra).await?
    } else {
        Vec::new()
    };

    log::debug!(
        "Fetched candidates: missing={} cutoff_unmet={}",
        missing.len(),
        cutoff.len()
    );
    Ok((missing, cutoff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flavor;
    use crate::services::arr::fake::FakeArr;
    use serde_json::json;

    fn ids(n: std::ops::Range<i64>) -> Vec<Value> {
        n.map(|id| json!({"id": id})).collect()
    }

    #[test]
    fn test_parse_page_rejects_non_list_records() {
        let result = parse_page("wanted/missing", json!({"records": "oops"}));
        assert!(matches!(result, Err(AppError::UnexpectedResponse { .. })));
    }

    #[test]
    fn test_parse_page_null_records_is_empty() {
        let page = parse_page("wanted/missing", json!({"records": null, "totalRecords": "3"})).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total_records, Some(3));
    }

    #[test]
    fn test_parse_page_rejects_non_object() {
        assert!(parse_page("wanted/missing", json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_stops_at_total_records() {
        let api = FakeArr::new().with_pages(
            "wanted/missing",
            vec![
                json!({"records": ids(0..2), "totalRecords": 3}),
                json!({"records": ids(2..3), "totalRecords": 3}),
                json!({"records": ids(3..5), "totalRecords": 3}),
            ],
        );

        let records = fetch_all(&api, "wanted/missing", 2, &[]).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(api.request_count("wanted/missing"), 2);
    }

    #[tokio::test]
    async fn test_short_page_without_total_stops() {
        let api = FakeArr::new().with_pages(
            "wanted/cutoff",
            vec![json!({"records": ids(1..3)}), json!({"records": ids(3..4)})],
        );

        let records = fetch_all(&api, "wanted/cutoff", 2, &[]).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(api.request_count("wanted/cutoff"), 2);
    }

    #[tokio::test]
    async fn test_empty_page_stops() {
        let api = FakeArr::new().with_pages(
            "wanted/missing",
            vec![json!({"records": ids(1..3), "totalRecords": 10})],
        );

        let records = fetch_all(&api, "wanted/missing", 2, &[]).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(api.request_count("wanted/missing"), 2);
    }

    #[tokio::test]
    async fn test_query_carries_paging_and_extra_params() {
        let api = FakeArr::new();
        fetch_all(&api, "wanted/missing", 50, &[("includeSeries", "true")])
            .await
            .unwrap();

        let requests = api.requests.lock().unwrap();
        let (_, query) = &requests[0];
        assert!(query.contains(&("page".to_string(), "1".to_string())));
        assert!(query.contains(&("pageSize".to_string(), "50".to_string())));
        assert!(query.contains(&("includeSeries".to_string(), "true".to_string())));
    }

    #[tokio::test]
    async fn test_malformed_page_is_fatal() {
        let api = FakeArr::new().with_pages("wanted/missing", vec![json!({"records": "nope"})]);
        let result = fetch_all(&api, "wanted/missing", 10, &[]).await;
        assert!(matches!(result, Err(AppError::UnexpectedResponse { .. })));
    }

    #[tokio::test]
    async fn test_zero_weight_pool_is_not_fetched() {
        let api = FakeArr::new()
            .with_pages("wanted/missing", vec![json!({"records": ids(1..2)})])
            .with_pages("wanted/cutoff", vec![json!({"records": ids(5..6)})]);
        let settings = SelectionSettings::new(Flavor::Radarr, "http://m", 10, (1.0, 0.0), 0.0);

        let (missing, cutoff) = fetch_wanted(&api, &settings).await.unwrap();

        assert_eq!(missing.len(), 1);
        assert!(cutoff.is_empty());
        assert_eq!(api.request_count("wanted/cutoff"), 0);
    }
}
