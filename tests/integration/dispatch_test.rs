//! End-to-end tests for cell dispatch over the mock client.

use pretty_assertions::assert_eq;
use sqlcell::cell::{dispatch, Magic};
use sqlcell::db::{ColumnInfo, FailingClient, MockClient, QueryResult, Value};
use sqlcell::display::{CapturingSink, Rendered};
use sqlcell::error::CellError;
use sqlcell::session::Session;
use sqlcell::workspace::DEFAULT_RESULT_NAME;

/// Builds a session over shared-state handles to the mock client and sink.
fn mock_session() -> (Session, MockClient, CapturingSink) {
    let client = MockClient::new().with_tables(vec!["users".to_string()]);
    let sink = CapturingSink::new();
    let session = Session::new(Box::new(client.clone()), Box::new(sink.clone()));
    (session, client, sink)
}

/// A ten-row, single-column result.
fn ten_rows() -> QueryResult {
    QueryResult::with_data(
        vec![ColumnInfo::new("n", "int4")],
        (0..10).map(|i| vec![Value::Int(i)]).collect(),
    )
}

#[tokio::test]
async fn read_binds_default_name_and_displays_full_result() {
    let (mut session, client, sink) = mock_session();
    client.push_result(ten_rows());

    dispatch(&mut session, Magic::Read, "", "SELECT n FROM t")
        .await
        .unwrap();

    assert_eq!(client.fetched_sql(), vec!["SELECT n FROM t"]);
    let bound = session.workspace.result(DEFAULT_RESULT_NAME).unwrap();
    assert_eq!(bound.row_count(), 10);
    assert_eq!(
        sink.rendered(),
        vec![Rendered::Table {
            shown: 10,
            total: 10
        }]
    );
}

#[tokio::test]
async fn read_binds_named_target() {
    let (mut session, client, _sink) = mock_session();
    client.push_result(ten_rows());

    dispatch(&mut session, Magic::Read, "numbers", "SELECT n FROM t")
        .await
        .unwrap();

    assert!(session.workspace.result("numbers").is_some());
    assert!(session.workspace.result(DEFAULT_RESULT_NAME).is_none());
}

#[tokio::test]
async fn read_head_limits_displayed_rows() {
    let (mut session, client, sink) = mock_session();
    client.push_result(ten_rows());

    dispatch(&mut session, Magic::Read, "-h 3", "SELECT n FROM t")
        .await
        .unwrap();

    assert_eq!(
        sink.rendered(),
        vec![Rendered::Table {
            shown: 3,
            total: 10
        }]
    );
    // The binding still holds the full result
    assert_eq!(
        session
            .workspace
            .result(DEFAULT_RESULT_NAME)
            .unwrap()
            .row_count(),
        10
    );
}

#[tokio::test]
async fn read_head_zero_binds_without_display() {
    let (mut session, client, sink) = mock_session();
    client.push_result(ten_rows());

    dispatch(&mut session, Magic::Read, "-h 0 silent", "SELECT n FROM t")
        .await
        .unwrap();

    assert!(sink.rendered().is_empty());
    assert_eq!(session.workspace.result("silent").unwrap().row_count(), 10);
    // The registry refresh still happened
    assert_eq!(client.table_listing_count(), 1);
}

#[tokio::test]
async fn read_rejects_two_target_names() {
    let (mut session, client, sink) = mock_session();

    let err = dispatch(&mut session, Magic::Read, "one two", "SELECT 1")
        .await
        .unwrap_err();

    assert!(matches!(err, CellError::Usage(_)));
    // Nothing partial: no query, no display, no refresh
    assert!(client.fetched_sql().is_empty());
    assert!(sink.rendered().is_empty());
    assert_eq!(client.table_listing_count(), 0);
}

#[tokio::test]
async fn templating_substitutes_single_segment() {
    let (mut session, client, _sink) = mock_session();
    session.workspace.set_parameter("table", "users");
    session.workspace.set_parameter("limit", 5i64);

    dispatch(
        &mut session,
        Magic::Read,
        "",
        "SELECT * FROM {table} LIMIT {limit}",
    )
    .await
    .unwrap();

    assert_eq!(client.fetched_sql(), vec!["SELECT * FROM users LIMIT 5"]);
}

#[tokio::test]
async fn templating_leaves_interior_segments_alone() {
    let (mut session, client, _sink) = mock_session();
    session.workspace.set_parameter("name", "total");

    dispatch(
        &mut session,
        Magic::Exec,
        "",
        "CREATE FUNCTION {name}() RETURNS int AS $ SELECT {untouched}; $ LANGUAGE sql; -- {name}",
    )
    .await
    .unwrap();

    assert_eq!(
        client.executed_sql(),
        vec![
            "CREATE FUNCTION total() RETURNS int AS $ SELECT {untouched}; $ LANGUAGE sql; -- total"
        ]
    );
}

#[tokio::test]
async fn skip_template_flag_passes_body_verbatim() {
    let (mut session, client, _sink) = mock_session();

    // {missing} has no binding; -i means it is never looked at
    dispatch(&mut session, Magic::Read, "-i", "SELECT '{missing}'")
        .await
        .unwrap();

    assert_eq!(client.fetched_sql(), vec!["SELECT '{missing}'"]);
}

#[tokio::test]
async fn template_error_aborts_before_execution() {
    let (mut session, client, sink) = mock_session();

    let err = dispatch(&mut session, Magic::Read, "", "SELECT {missing}")
        .await
        .unwrap_err();

    assert!(matches!(err, CellError::Template(_)));
    assert!(client.fetched_sql().is_empty());
    assert!(sink.rendered().is_empty());
    assert_eq!(client.table_listing_count(), 0);
}

#[tokio::test]
async fn option_error_aborts_before_execution() {
    let (mut session, client, _sink) = mock_session();

    let err = dispatch(&mut session, Magic::Read, "-h lots", "SELECT 1")
        .await
        .unwrap_err();

    assert!(matches!(err, CellError::Options(_)));
    assert!(client.fetched_sql().is_empty());
}

#[tokio::test]
async fn exec_runs_statement_without_display() {
    let (mut session, client, sink) = mock_session();

    dispatch(&mut session, Magic::Exec, "", "DROP TABLE users")
        .await
        .unwrap();

    assert_eq!(client.executed_sql(), vec!["DROP TABLE users"]);
    assert!(client.fetched_sql().is_empty());
    assert!(sink.rendered().is_empty());
}

#[tokio::test]
async fn exec_ignores_positional_arguments() {
    let (mut session, client, _sink) = mock_session();

    // Two positionals would be a usage error for read; exec ignores them.
    dispatch(&mut session, Magic::Exec, "one two", "DELETE FROM t")
        .await
        .unwrap();

    assert_eq!(client.executed_sql(), vec!["DELETE FROM t"]);
    assert!(session.workspace.result("one").is_none());
}

#[tokio::test]
async fn every_read_and_exec_refreshes_registry_once() {
    let (mut session, client, _sink) = mock_session();

    dispatch(&mut session, Magic::Read, "", "SELECT 1")
        .await
        .unwrap();
    assert_eq!(client.table_listing_count(), 1);

    dispatch(&mut session, Magic::Exec, "", "CREATE TABLE t (n int)")
        .await
        .unwrap();
    assert_eq!(client.table_listing_count(), 2);

    assert_eq!(session.registry.generation(), 2);
    assert!(session.registry.contains("users"));
}

#[tokio::test]
async fn print_echoes_substituted_text_without_querying() {
    let (mut session, client, sink) = mock_session();
    session.workspace.set_parameter("table", "users");

    dispatch(&mut session, Magic::Print, "", "SELECT * FROM {table}")
        .await
        .unwrap();

    assert_eq!(
        sink.rendered(),
        vec![Rendered::Text("SELECT * FROM users".to_string())]
    );
    assert!(client.fetched_sql().is_empty());
    assert!(client.executed_sql().is_empty());
    // print never refreshes the registry
    assert_eq!(client.table_listing_count(), 0);
}

#[tokio::test]
async fn print_accepts_extra_positionals() {
    let (mut session, _client, sink) = mock_session();

    dispatch(&mut session, Magic::Print, "a b c", "SELECT 1")
        .await
        .unwrap();

    assert_eq!(sink.rendered(), vec![Rendered::Text("SELECT 1".to_string())]);
}

#[tokio::test]
async fn rebinding_a_name_shadows_the_previous_result() {
    let (mut session, client, _sink) = mock_session();
    client.push_result(ten_rows());

    dispatch(&mut session, Magic::Read, "t", "SELECT n FROM t")
        .await
        .unwrap();
    assert_eq!(session.workspace.result("t").unwrap().row_count(), 10);

    // Unscripted fetch falls back to the one-row echo result
    dispatch(&mut session, Magic::Read, "t", "SELECT n FROM t LIMIT 1")
        .await
        .unwrap();
    assert_eq!(session.workspace.result("t").unwrap().row_count(), 1);
}

#[tokio::test]
async fn query_failure_propagates_and_skips_refresh() {
    let sink = CapturingSink::new();
    let mut session = Session::new(Box::new(FailingClient), Box::new(sink.clone()));

    let err = dispatch(&mut session, Magic::Read, "", "SELECT 1")
        .await
        .unwrap_err();

    assert!(matches!(err, CellError::Query(_)));
    assert!(sink.rendered().is_empty());
    assert_eq!(session.registry.generation(), 0);
}
