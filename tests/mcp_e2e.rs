//! MCP Server End-to-End Tests
//!
//! Drives the JSON-RPC surface against a mock Raindrop.io API:
//! - Session handshake and tool discovery
//! - Tool calls returning grouped collection trees
//! - Tool failures reported as `isError` results
//! - JSON-RPC error codes for malformed traffic
//! - The line-oriented stdio loop

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args
)]

use mockito::{Matcher, Server, ServerGuard};
use raindrop_mcp::config::RaindropConfig;
use raindrop_mcp::mcp::{McpServer, PROTOCOL_VERSION, ToolRegistry};
use serde_json::{Value, json};

fn server_for(api: &ServerGuard) -> McpServer {
    let config = RaindropConfig::default()
        .with_access_token("e2e-token")
        .with_api_url(api.url());
    McpServer::new(ToolRegistry::from_config(&config).unwrap())
}

fn call(server: &McpServer, request: &Value) -> Value {
    let response = server
        .handle_request(&request.to_string())
        .expect("request should produce a response");
    serde_json::from_str(&response).unwrap()
}

fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    call(
        server,
        &json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

// ============================================================================
// Protocol
// ============================================================================

mod protocol {
    use super::*;

    #[test]
    fn test_initialize_handshake() {
        let api = Server::new();
        let server = server_for(&api);

        let response = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}),
        );

        assert_eq!(response["id"], 0);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "raindrop-mcp");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[test]
    fn test_initialized_notification_has_no_response() {
        let api = Server::new();
        let server = server_for(&api);

        let response = server.handle_request(
            &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        );

        assert!(response.is_none());
    }

    #[test]
    fn test_tools_list_exposes_schemas() {
        let api = Server::new();
        let server = server_for(&api);

        let response = call(&server, &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
        let tools = response["result"]["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 25);
        for tool in tools {
            assert!(tool["name"].as_str().unwrap().starts_with("raindrop_"));
            assert_eq!(tool["inputSchema"]["type"], "object");
        }
        assert!(tools.iter().any(|t| t["name"] == "raindrop_get_collections"));
    }

    #[test]
    fn test_error_codes() {
        let api = Server::new();
        let server = server_for(&api);

        let parse_error: Value =
            serde_json::from_str(&server.handle_request("{not json").unwrap()).unwrap();
        assert_eq!(parse_error["error"]["code"], -32700);
        assert_eq!(parse_error["id"], Value::Null);

        let invalid: Value =
            serde_json::from_str(&server.handle_request(r#"{"id": 3}"#).unwrap()).unwrap();
        assert_eq!(invalid["error"]["code"], -32600);
        assert_eq!(invalid["id"], 3);

        let unknown = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"}),
        );
        assert_eq!(unknown["error"]["code"], -32601);
        assert_eq!(unknown["id"], 4);

        let missing_params = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"}),
        );
        assert_eq!(missing_params["error"]["code"], -32602);
    }

    #[test]
    fn test_oversized_request_is_rejected() {
        let api = Server::new();
        let server = server_for(&api);

        let huge = format!(
            r#"{{"jsonrpc":"2.0","id":1,"method":"ping","params":{{"pad":"{}"}}}}"#,
            "x".repeat(1024 * 1024)
        );
        let response: Value = serde_json::from_str(&server.handle_request(&huge).unwrap()).unwrap();

        assert_eq!(response["error"]["code"], -32600);
    }

    #[test]
    fn test_serve_loop_answers_each_line() {
        let api = Server::new();
        let server = server_for(&api);

        let input = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            String::new(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string(),
        ]
        .join("\n");

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[1]["result"], json!({}));
    }
}

// ============================================================================
// Tool calls
// ============================================================================

mod tool_calls {
    use super::*;

    fn mock_collections(api: &mut ServerGuard) {
        api.mock("GET", "/collections")
            .with_status(200)
            .with_body(
                json!({
                    "result": true,
                    "items": [
                        {"_id": 1, "title": "Reading"},
                        {"_id": 2, "title": "Recipes"},
                        {"_id": 3, "title": "Loose"}
                    ]
                })
                .to_string(),
            )
            .create();
        api.mock("GET", "/collections/childrens")
            .with_status(200)
            .with_body(
                json!({
                    "result": true,
                    "items": [
                        {"_id": 4, "title": "Papers", "parent": {"$id": 1}},
                        {"_id": 5, "title": "Orphan", "parent": {"$id": 404}}
                    ]
                })
                .to_string(),
            )
            .create();
        api.mock("GET", "/user")
            .with_status(200)
            .with_body(
                json!({
                    "result": true,
                    "user": {
                        "_id": 9,
                        "groups": [
                            {"title": "Study", "collections": [1]},
                            {"title": "Kitchen", "collections": [2]}
                        ]
                    }
                })
                .to_string(),
            )
            .create();
    }

    #[test]
    fn test_get_collections_returns_grouped_tree() {
        let mut api = Server::new();
        mock_collections(&mut api);
        let server = server_for(&api);

        let response = call_tool(&server, "raindrop_get_collections", json!({}));

        assert_eq!(response["result"]["isError"], false);
        let groups: Value = serde_json::from_str(tool_text(&response)).unwrap();
        assert_eq!(groups[0]["title"], "Study");
        assert_eq!(groups[0]["items"][0]["_id"], 1);
        assert_eq!(groups[0]["items"][0]["children"][0]["_id"], 4);

        // Ungrouped roots, the dangling child included, follow the first
        // group's own members.
        let study_ids: Vec<i64> = groups[0]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["_id"].as_i64().unwrap())
            .collect();
        assert_eq!(study_ids, vec![1, 3, 5]);

        assert_eq!(groups[1]["title"], "Kitchen");
        assert_eq!(groups[1]["items"][0]["_id"], 2);
    }

    #[test]
    fn test_get_root_collections_skips_children() {
        let mut api = Server::new();
        mock_collections(&mut api);
        let server = server_for(&api);

        let response = call_tool(&server, "raindrop_get_root_collections", json!({}));
        let groups: Value = serde_json::from_str(tool_text(&response)).unwrap();

        assert_eq!(groups[0]["items"].as_array().unwrap().len(), 2);
        assert!(groups[0]["items"][0].get("children").is_none());
    }

    #[test]
    fn test_get_group_by_name() {
        let mut api = Server::new();
        mock_collections(&mut api);
        let server = server_for(&api);

        let found = call_tool(&server, "raindrop_get_group", json!({"name": "Kitchen"}));
        assert_eq!(found["result"]["isError"], false);
        assert!(tool_text(&found).contains("Kitchen"));

        let missing = call_tool(&server, "raindrop_get_group", json!({"name": "Garage"}));
        assert_eq!(missing["result"]["isError"], true);
    }

    #[test]
    fn test_delete_tags_reports_count() {
        let mut api = Server::new();
        let mock = api
            .mock("DELETE", "/tags")
            .match_body(Matcher::Json(json!({"tags": ["a", "b"]})))
            .with_status(200)
            .with_body(json!({"result": true}).to_string())
            .create();
        let server = server_for(&api);

        let response = call_tool(&server, "raindrop_delete_tags", json!({"tags": ["a", "b"]}));

        mock.assert();
        assert_eq!(response["result"]["isError"], false);
        assert_eq!(tool_text(&response), "Deleted 2 tag(s)");
    }

    #[test]
    fn test_create_collection_omits_zero_parent() {
        let mut api = Server::new();
        let top_level = api
            .mock("POST", "/collection")
            .match_body(Matcher::Json(json!({"title": "Inbox"})))
            .with_status(200)
            .with_body(json!({"result": true, "item": {"_id": 60, "title": "Inbox"}}).to_string())
            .create();
        let nested = api
            .mock("POST", "/collection")
            .match_body(Matcher::Json(json!({"title": "Papers", "parentId": 60})))
            .with_status(200)
            .with_body(
                json!({"result": true, "item": {"_id": 61, "title": "Papers", "parent": {"$id": 60}}})
                    .to_string(),
            )
            .create();
        let server = server_for(&api);

        let created = call_tool(
            &server,
            "raindrop_create_collection",
            json!({"title": "Inbox", "parent_id": 0}),
        );
        assert_eq!(created["result"]["isError"], false);

        let child = call_tool(
            &server,
            "raindrop_create_collection",
            json!({"title": "Papers", "parent_id": 60}),
        );
        assert_eq!(child["result"]["isError"], false);

        top_level.assert();
        nested.assert();
    }

    #[test]
    fn test_api_failure_becomes_error_result() {
        let mut api = Server::new();
        api.mock("GET", "/collection/77")
            .with_status(404)
            .with_body(json!({"result": false, "errorMessage": "Not found"}).to_string())
            .create();
        let server = server_for(&api);

        let response = call_tool(&server, "raindrop_get_collection", json!({"collection_id": 77}));

        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        assert!(tool_text(&response).contains("Not found"));
    }

    #[test]
    fn test_invalid_arguments_become_error_result() {
        let api = Server::new();
        let server = server_for(&api);

        let response = call_tool(
            &server,
            "raindrop_get_collection",
            json!({"collection_id": "seven"}),
        );

        assert_eq!(response["result"]["isError"], true);
        assert!(tool_text(&response).contains("invalid input"));
    }

    #[test]
    fn test_unknown_tool_becomes_error_result() {
        let api = Server::new();
        let server = server_for(&api);

        let response = call_tool(&server, "raindrop_export_everything", json!({}));

        assert_eq!(response["result"]["isError"], true);
        assert!(tool_text(&response).contains("Unknown tool"));
    }
}
