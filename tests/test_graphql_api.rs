//! End-to-end flows over HTTP: accounts, catalog, inventory, reviews.

mod common;

use common::TestServer;
use serde_json::{json, Value};

const DECREASE: &str =
    "mutation($name: String!, $q: Int!) { decreaseQuantity(name: $name, quantity: $q) { quantity units_sold } }";
const INCREASE: &str =
    "mutation($name: String!, $q: Int!) { increaseQuantity(name: $name, quantity: $q) { quantity units_sold } }";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_and_explorer() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    let health = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(health.status(), 200);
    let body = health.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["store"], "memory");

    let explorer = server
        .client
        .get(format!("{}/graphql", server.base_url))
        .send()
        .await?;
    assert_eq!(explorer.status(), 200);
    assert!(explorer.text().await?.contains("graphiql"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_account_flow() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;

    // Mismatched confirmation.
    let mismatch = server
        .graphql(
            r#"mutation { createUser(username: "alice", password: "pw1", passwordConf: "pw2") { id } }"#,
            json!({}),
            None,
        )
        .await?;
    assert_eq!(mismatch["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(mismatch["errors"][0]["extensions"]["invalidArgs"]["username"], "alice");

    let token = server.signed_up("alice", "hunter22").await?;

    // Duplicate username.
    let duplicate = server
        .graphql(
            r#"mutation { createUser(username: "alice", password: "x", passwordConf: "x") { id } }"#,
            json!({}),
            None,
        )
        .await?;
    assert_eq!(duplicate["errors"][0]["message"], "Username is already taken");

    // Both login failures look the same.
    let login = "mutation($u: String!, $p: String!) { login(username: $u, password: $p) { value } }";
    let wrong_pw = server
        .graphql(login, json!({ "u": "alice", "p": "nope" }), None)
        .await?;
    let no_user = server
        .graphql(login, json!({ "u": "nobody", "p": "hunter22" }), None)
        .await?;
    assert_eq!(wrong_pw["errors"][0]["message"], "invalid credentials");
    assert_eq!(wrong_pw["errors"][0]["message"], no_user["errors"][0]["message"]);
    assert_eq!(wrong_pw["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    assert!(!wrong_pw.to_string().contains("nope"));

    // Identity per request.
    let me = server.graphql("{ me { username } }", json!({}), Some(&token)).await?;
    assert_eq!(me["data"]["me"]["username"], "alice");

    let anonymous = server.graphql("{ me { username } }", json!({}), None).await?;
    assert_eq!(anonymous["data"]["me"], Value::Null);
    assert!(anonymous["errors"].is_null());

    let forged = server
        .graphql("{ me { username } }", json!({}), Some("not-a-real-token"))
        .await?;
    assert_eq!(forged["data"]["me"], Value::Null);
    assert!(forged["errors"].is_null());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_catalog_and_inventory() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    server.add_product("Lamp", 10, 5, &["home", "lighting"]).await?;
    server.add_product("Rug", 3, 7, &["home"]).await?;
    server.add_product("Bulb", 40, 1, &["lighting"]).await?;

    let sold = server
        .graphql(DECREASE, json!({ "name": "Lamp", "q": 3 }), None)
        .await?;
    assert_eq!(sold["data"]["decreaseQuantity"], json!({ "quantity": 7, "units_sold": 8 }));

    let restocked = server
        .graphql(INCREASE, json!({ "name": "Lamp", "q": 2 }), None)
        .await?;
    assert_eq!(
        restocked["data"]["increaseQuantity"],
        json!({ "quantity": 9, "units_sold": 8 })
    );

    let too_many = server
        .graphql(DECREASE, json!({ "name": "Rug", "q": 4 }), None)
        .await?;
    assert_eq!(
        too_many["errors"][0]["message"],
        "Given value exceeds the quantity of the product"
    );
    let zero = server
        .graphql(INCREASE, json!({ "name": "Rug", "q": 0 }), None)
        .await?;
    assert_eq!(zero["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
    let missing = server
        .graphql(INCREASE, json!({ "name": "Sofa", "q": 1 }), None)
        .await?;
    assert_eq!(missing["errors"][0]["extensions"]["code"], "NOT_FOUND");

    let rug = server
        .graphql(r#"{ findProduct(name: "Rug") { quantity units_sold } }"#, json!({}), None)
        .await?;
    assert_eq!(rug["data"]["findProduct"], json!({ "quantity": 3, "units_sold": 7 }));

    let listing = server
        .graphql(
            "{ productCount allProducts { name } allCategories lighting: allProducts(category: \"lighting\") { name } }",
            json!({}),
            None,
        )
        .await?;
    assert_eq!(listing["data"]["productCount"], 3);
    assert_eq!(
        listing["data"]["allProducts"],
        json!([{ "name": "Lamp" }, { "name": "Rug" }, { "name": "Bulb" }])
    );
    assert_eq!(listing["data"]["allCategories"], json!(["home", "lighting"]));
    assert_eq!(
        listing["data"]["lighting"],
        json!([{ "name": "Lamp" }, { "name": "Bulb" }])
    );

    let absent = server
        .graphql(r#"{ findProduct(name: "Sofa") { name } }"#, json!({}), None)
        .await?;
    assert_eq!(absent["data"]["findProduct"], Value::Null);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reviews_are_linked() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let lamp = server.add_product("Lamp", 10, 0, &["home"]).await?;
    let lamp_id = lamp["id"].as_str().ok_or("missing id")?.to_string();
    let add_comment = "mutation($p: String!, $u: String!, $c: String!, $g: Int) {
        addComment(product: $p, user: $u, content: $c, grade: $g) { id user product content grade }
    }";

    let anonymous = server
        .graphql(add_comment, json!({ "p": lamp_id, "u": "zoe", "c": "Bright", "g": 5 }), None)
        .await?;
    assert_eq!(anonymous["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");

    let token = server.signed_up("zoe", "pw-zoe").await?;
    server.signed_up("yan", "pw-yan").await?;

    // A signed-in caller cannot post under someone else's name.
    let impersonated = server
        .graphql(
            add_comment,
            json!({ "p": lamp_id, "u": "yan", "c": "fake", "g": 1 }),
            Some(&token),
        )
        .await?;
    assert_eq!(impersonated["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    assert!(impersonated["data"].is_null());
    let created = server
        .graphql(
            add_comment,
            json!({ "p": lamp_id, "u": "zoe", "c": "Bright", "g": 5 }),
            Some(&token),
        )
        .await?;
    assert_eq!(created["data"]["addComment"]["product"], lamp_id.as_str());
    assert_eq!(created["data"]["addComment"]["grade"], 5);

    let bad_grade = server
        .graphql(
            add_comment,
            json!({ "p": lamp_id, "u": "zoe", "c": "Meh", "g": 0 }),
            Some(&token),
        )
        .await?;
    assert_eq!(bad_grade["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");

    let orphan = server
        .graphql(
            add_comment,
            json!({ "p": "00000000-0000-0000-0000-000000000000", "u": "zoe", "c": "Hm" }),
            Some(&token),
        )
        .await?;
    assert_eq!(orphan["errors"][0]["extensions"]["code"], "NOT_FOUND");

    // Every stored review is reachable from its product.
    let all = server
        .graphql("{ allComments { id content } }", json!({}), None)
        .await?;
    let linked = server
        .graphql(r#"{ findProduct(name: "Lamp") { comments { id content } } }"#, json!({}), None)
        .await?;
    assert_eq!(all["data"]["allComments"].as_array().map(Vec::len), Some(1));
    assert_eq!(all["data"]["allComments"], linked["data"]["findProduct"]["comments"]);

    let filtered = server
        .graphql(
            "query($p: String) { allComments(product: $p) { content } }",
            json!({ "p": lamp_id }),
            None,
        )
        .await?;
    assert_eq!(filtered["data"]["allComments"], json!([{ "content": "Bright" }]));
    Ok(())
}
