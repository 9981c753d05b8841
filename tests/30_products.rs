mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{expect_error, TestServer};

async fn seed(server: &TestServer, token: &str) -> Result<()> {
    let products = [
        ("Laptop", "Thin and light laptop", 1299.0, "Electronics"),
        ("Phone", "Smart phone with a big screen", 799.0, "Electronics"),
        ("Headphones", "Noise cancelling", 199.0, "Electronics"),
        ("Novel", "A gripping mystery", 15.0, "Books"),
        ("Cookbook", "Recipes for every day", 25.0, "Books"),
    ];
    for (name, description, price, category) in products {
        server
            .create_product(
                token,
                json!({ "name": name, "description": description, "price": price, "category": category }),
            )
            .await?;
    }
    Ok(())
}

async fn list(server: &TestServer, query: &str) -> Result<Value> {
    let res = server
        .client
        .get(server.url(&format!("/api/v1/products{}", query)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "query {}", query);
    Ok(res.json::<Value>().await?["data"].clone())
}

fn names(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn admin_can_create_and_fetch_product() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let created = server
        .create_product(
            &token,
            json!({ "name": "Desk", "description": "Standing desk", "price": 349.5, "category": "Furniture" }),
        )
        .await?;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["price"], 349.5);
    assert!(created["createdAt"].is_string());

    let res = server
        .client
        .get(server.url(&format!("/api/v1/products/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "Desk");
    Ok(())
}

#[tokio::test]
async fn user_role_cannot_mutate_products() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user_token("shopper@example.com").await?;

    let res = server
        .client
        .post(server.url("/api/v1/products"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Sneaky", "description": "x", "price": 1.0, "category": "Misc" }))
        .send()
        .await?;
    let body = expect_error(res, StatusCode::FORBIDDEN, "FORBIDDEN").await?;
    assert_eq!(body["message"], "Insufficient role");

    let res = server
        .client
        .delete(server.url("/api/v1/products/1"))
        .bearer_auth(&token)
        .send()
        .await?;
    expect_error(res, StatusCode::FORBIDDEN, "FORBIDDEN").await?;
    Ok(())
}

#[tokio::test]
async fn anonymous_write_is_unauthorized() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .patch(server.url("/api/v1/products/1"))
        .json(&json!({ "price": 0.5 }))
        .send()
        .await?;
    expect_error(res, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await?;
    Ok(())
}

#[tokio::test]
async fn listing_pages_and_counts() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    seed(&server, &token).await?;

    let page = list(&server, "?page=2&limit=2&sortField=price&sortOrder=asc").await?;
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(names(&page), vec!["Headphones", "Phone"]);

    let last = list(&server, "?page=3&limit=2&sortField=price&sortOrder=asc").await?;
    assert_eq!(names(&last), vec!["Laptop"]);
    Ok(())
}

#[tokio::test]
async fn listing_filters_by_category_and_search() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    seed(&server, &token).await?;

    let books = list(&server, "?category=Books&sortField=name&sortOrder=asc").await?;
    assert_eq!(books["total"], 2);
    assert_eq!(names(&books), vec!["Cookbook", "Novel"]);

    let search = list(&server, "?search=NOISE").await?;
    assert_eq!(names(&search), vec!["Headphones"]);

    let none = list(&server, "?category=Books&search=laptop").await?;
    assert_eq!(none["total"], 0);
    assert_eq!(none["totalPages"], 0);
    Ok(())
}

#[tokio::test]
async fn listing_rejects_bad_parameters() -> Result<()> {
    let server = TestServer::start().await?;

    for (query, field) in [
        ("?page=0", "page"),
        ("?limit=1000", "limit"),
        ("?sortField=password", "sortField"),
        ("?sortOrder=up", "sortOrder"),
    ] {
        let res = server
            .client
            .get(server.url(&format!("/api/v1/products{}", query)))
            .send()
            .await?;
        let body = expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
        assert!(body["field_errors"][field].is_string(), "{} -> {}", query, body);
    }
    Ok(())
}

#[tokio::test]
async fn update_and_delete_product() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    let created = server
        .create_product(
            &token,
            json!({ "name": "Mug", "description": "Ceramic mug", "price": 9.0, "category": "Kitchen" }),
        )
        .await?;
    let url = server.url(&format!("/api/v1/products/{}", created["id"]));

    let res = server
        .client
        .patch(&url)
        .bearer_auth(&token)
        .json(&json!({ "price": 11.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["data"]["price"], 11.0);
    assert_eq!(updated["data"]["name"], "Mug");

    let res = server.client.patch(&url).bearer_auth(&token).json(&json!({})).send().await?;
    expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;

    let res = server.client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.client.get(&url).send().await?;
    expect_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await?;
    Ok(())
}

#[tokio::test]
async fn create_validates_price_and_names() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let res = server
        .client
        .post(server.url("/api/v1/products"))
        .bearer_auth(&token)
        .json(&json!({ "name": " ", "description": "d", "price": -3.0, "category": "" }))
        .send()
        .await?;
    let body = expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
    for field in ["name", "price", "category"] {
        assert!(body["field_errors"][field].is_string(), "missing {} in {}", field, body);
    }
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.client.get(server.url("/api/v1/products/abc")).send().await?;
    expect_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await?;
    Ok(())
}
