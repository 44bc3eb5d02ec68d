//! MCP protocol round trips over in-memory pipes.

use rmcp::ServiceExt;
use rmcp::model::{ClientInfo, Implementation};
use rmcp::transport::async_rw::AsyncRwTransport;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use switchboard_mcp::BridgeServer;
use switchboard_testing::{EchoHandler, SleepingHandler};
use switchboard_tools::{Catalog, Dispatcher, ToolRegistry};

fn catalog_server() -> BridgeServer {
    let registry = Arc::new(ToolRegistry::new());
    Catalog::load().unwrap().register_placeholders(&registry);
    BridgeServer::new(Arc::new(Dispatcher::new(registry)))
}

#[tokio::test]
async fn client_discovers_the_full_catalog() {
    let (client_read, server_write) = tokio::io::duplex(64 * 1024);
    let (server_read, client_write) = tokio::io::duplex(64 * 1024);

    let server = catalog_server();
    let server_handle = tokio::spawn(async move {
        if let Ok(service) = server
            .serve(AsyncRwTransport::new(server_read, server_write))
            .await
        {
            let _ = service.waiting().await;
        }
    });

    let client_info = ClientInfo {
        client_info: Implementation {
            name: "switchboard-test-client".to_string(),
            version: "0.1.0".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let client = client_info
        .serve(AsyncRwTransport::new(client_read, client_write))
        .await
        .expect("client failed to connect");

    let tools = client.peer().list_all_tools().await.unwrap();
    assert_eq!(tools.len(), 37);
    assert_eq!(tools[0].name.as_ref(), "calendar_calendars");
    assert!(tools.iter().any(|tool| tool.name.as_ref() == "maps_directions"));

    let _ = client.cancel().await;
    server_handle.abort();
}

#[tokio::test]
async fn calls_route_through_the_dispatcher() {
    let registry = Arc::new(
        ToolRegistry::new()
            .with_tool("test_echo", json!({"type": "object"}), EchoHandler::shared())
            .with_tool(
                "test_sleep",
                json!({"type": "object"}),
                SleepingHandler::new(Duration::from_secs(2)).shared(),
            ),
    );
    let dispatcher = Dispatcher::new(registry).with_default_deadline(Duration::from_millis(100));
    let server = BridgeServer::new(Arc::new(dispatcher));

    let args = json!({"x": 1}).as_object().cloned();
    let echoed = server.call("test_echo", args).await;
    assert_eq!(echoed.is_error, Some(false));

    let timed_out = server.call("test_sleep", None).await;
    assert_eq!(timed_out.is_error, Some(true));
    let text = &timed_out.content[0].as_text().unwrap().text;
    assert_eq!(text, "TIMEOUT: Tool 'test_sleep' timed out after 0 seconds");

    let unknown = server.call("unknown_tool_xyz", None).await;
    let text = &unknown.content[0].as_text().unwrap().text;
    assert!(text.starts_with("UNKNOWN_TOOL:"));
}
