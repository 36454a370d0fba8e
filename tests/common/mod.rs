//! Shared test utilities

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::PathBuf;

/// Cached binary path for the cluster CLI to avoid repeated lookups
#[allow(deprecated)]
pub static CLUSTER_BIN: std::sync::LazyLock<PathBuf> =
    std::sync::LazyLock::new(|| assert_cmd::cargo::cargo_bin("cluster-cli"));

/// Test helper to create a command with the cached binary and a clean environment
pub fn cluster_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(&*CLUSTER_BIN);
    for var in [
        "CLUSTER_CLI_TARGET",
        "CLUSTER_CLI_USERNAME",
        "CLUSTER_CLI_PASSWORD",
        "CLUSTER_CLI_LOG",
        "CLUSTER_CLI_LOG_FILE",
        "CLUSTER_CLI_LOG_FORMAT",
        "CLUSTER_CLI_TABLE_WIDTH",
        "COLUMNS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// A small management API description with one operation per parameter location.
pub fn api_docs(token_auth: bool) -> Value {
    json!({
        "swagger": "2.0",
        "basePath": "/management",
        "authTokenEnabled": token_auth,
        "paths": {
            "/v1/members": {
                "get": {
                    "summary": "list members",
                    "operationId": "listMembers",
                    "parameters": [
                        {"name": "group", "in": "query", "required": false},
                        {"name": "id", "in": "query", "required": false}
                    ],
                    "x-jqFilter": ".result[] | {id, host, status}"
                }
            },
            "/v1/members/{id}": {
                "get": {
                    "summary": "describe member",
                    "parameters": [{"name": "id", "in": "path", "required": true}]
                }
            },
            "/v1/regions": {
                "post": {
                    "summary": "create region",
                    "parameters": [
                        {"name": "body", "in": "body", "required": true,
                         "schema": {"$ref": "#/definitions/RegionConfig"}}
                    ]
                }
            }
        },
        "definitions": {
            "RegionConfig": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "type": {"type": "string", "enum": ["PARTITION", "REPLICATE"]},
                    "redundantCopies": {"type": "integer"}
                }
            }
        }
    })
}

/// The members listing used across formatter and dispatch tests.
pub fn members_response() -> Value {
    json!({
        "statusCode": "OK",
        "result": [
            {"id": "server3", "host": "10.1.1.1", "status": "online", "pid": 63340}
        ]
    })
}
