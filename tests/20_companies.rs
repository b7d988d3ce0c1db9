mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_company(
    server: &common::TestServer,
    handle: &str,
    name: &str,
    num_employees: Option<i32>,
) -> Result<reqwest::Response> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/companies", server.base_url))
        .bearer_auth(common::admin_token())
        .json(&json!({
            "handle": handle,
            "name": name,
            "description": "test company",
            "numEmployees": num_employees,
        }))
        .send()
        .await?;
    Ok(res)
}

#[tokio::test]
async fn create_then_get_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let handle = common::unique("rt");
    let res = create_company(server, &handle, &handle, Some(42)).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["company"]["handle"], json!(handle));
    assert_eq!(created["company"]["numEmployees"], json!(42));

    let res = client
        .get(format!("{}/companies/{}", server.base_url, handle))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = res.json::<Value>().await?;
    assert_eq!(fetched["company"]["handle"], json!(handle));
    assert_eq!(fetched["company"]["numEmployees"], json!(42));
    assert_eq!(fetched["company"]["jobs"], json!([]));

    Ok(())
}

#[tokio::test]
async fn duplicate_handle_conflicts() -> Result<()> {
    let server = common::ensure_server().await?;

    let handle = common::unique("dup");
    let res = create_company(server, &handle, &handle, None).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = create_company(server, &handle, &common::unique("dup2"), None).await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["code"], "CONFLICT", "payload: {}", payload);

    Ok(())
}

#[tokio::test]
async fn missing_company_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/companies/{}", server.base_url, common::unique("ghost")))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn filters_compose_and_results_sort_by_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let prefix = common::unique("flt");
    for (suffix, size) in [("a", 1), ("b", 5), ("c", 10)] {
        let handle = format!("{prefix}-{suffix}");
        let res = create_company(server, &handle, &handle, Some(size)).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Substring match alone: all three, ordered by name
    let res = client
        .get(format!("{}/companies?name={}", server.base_url, prefix))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    let names: Vec<&str> = payload["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            format!("{prefix}-a").as_str(),
            format!("{prefix}-b").as_str(),
            format!("{prefix}-c").as_str(),
        ]
    );

    // Combined with an employee range: only the middle company
    let res = client
        .get(format!(
            "{}/companies?name={}&minEmployees=2&maxEmployees=9",
            server.base_url, prefix
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    let companies = payload["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 1, "payload: {}", payload);
    assert_eq!(companies[0]["numEmployees"], json!(5));

    Ok(())
}

#[tokio::test]
async fn inverted_employee_range_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/companies?minEmployees=3&maxEmployees=2",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["code"], "BAD_REQUEST", "payload: {}", payload);

    Ok(())
}

#[tokio::test]
async fn unknown_filter_key_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/companies?favoriteColor=blue", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn patch_changes_only_supplied_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let handle = common::unique("pat");
    create_company(server, &handle, &handle, Some(3)).await?;

    let res = client
        .patch(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .json(&json!({ "numEmployees": 7 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["company"]["numEmployees"], json!(7));
    assert_eq!(payload["company"]["name"], json!(handle));

    // Explicit null clears a nullable column
    let res = client
        .patch(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .json(&json!({ "numEmployees": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["company"]["numEmployees"], json!(null));

    Ok(())
}

#[tokio::test]
async fn empty_patch_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let handle = common::unique("emp");
    create_company(server, &handle, &handle, None).await?;

    let res = client
        .patch(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["message"], "no data supplied", "payload: {}", payload);

    Ok(())
}

#[tokio::test]
async fn patch_of_missing_company_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/companies/{}", server.base_url, common::unique("nil")))
        .bearer_auth(common::admin_token())
        .json(&json!({ "name": "renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_succeeds_once_then_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let handle = common::unique("del");
    create_company(server, &handle, &handle, None).await?;

    let res = client
        .delete(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["deleted"], json!(handle));

    let res = client
        .delete(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
