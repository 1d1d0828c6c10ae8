//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Operation, Todo, TodoClient, TodoId};

const BASE_URL: &str = "http://localhost:8000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    match expected.get("body") {
        Some(expected_body) => {
            let expected_headers: Vec<(String, String)> = expected["headers"]
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Every error case must map onto the operation's own variant with the
/// simulated status preserved.
fn check_errors(vectors: &Value, op: Operation, parse: impl Fn(HttpResponse) -> Option<ApiError>) {
    for case in vectors["error_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = parse(simulated(case)).unwrap_or_else(|| panic!("{name}: expected error"));
        assert_eq!(err.operation(), op, "{name}: operation");
        assert_eq!(
            err.status(),
            Some(case["expected_status"].as_u64().unwrap() as u16),
            "{name}: status"
        );
        assert_eq!(err.body(), case["simulated_response"]["body"].as_str(), "{name}: body");
    }
}

#[test]
fn list_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/list.json")).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_list_todos(), &case["expected_request"]);

        let todos = c.parse_list_todos(simulated(case)).unwrap();
        let expected: Vec<Todo> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todos, expected, "{name}: parsed result");
    }
    check_errors(&vectors, Operation::List, |r| c.parse_list_todos(r).err());
}

#[test]
fn create_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/create.json")).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = c.build_create_todo(case["input_title"].as_str().unwrap()).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let todo = c.parse_create_todo(simulated(case)).unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
    check_errors(&vectors, Operation::Create, |r| c.parse_create_todo(r).err());
}

#[test]
fn update_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/update.json")).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c
            .build_update_todo(
                TodoId(input["id"].as_u64().unwrap()),
                input["title"].as_str().unwrap(),
                input["completed"].as_bool().unwrap(),
            )
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let todo = c.parse_update_todo(simulated(case)).unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
    check_errors(&vectors, Operation::Update, |r| c.parse_update_todo(r).err());
}

#[test]
fn delete_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/delete.json")).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = c.build_delete_todo(TodoId(case["input_id"].as_u64().unwrap()));
        check_request(name, &req, &case["expected_request"]);
        assert!(c.parse_delete_todo(simulated(case)).is_ok(), "{name}: parse");
    }
    check_errors(&vectors, Operation::Delete, |r| c.parse_delete_todo(r).err());
}
