//! End-to-end tests running whole cell scripts through the dispatcher.

use pretty_assertions::assert_eq;
use sqlcell::cell::{dispatch, parse_script};
use sqlcell::db::MockClient;
use sqlcell::display::{CapturingSink, Rendered};
use sqlcell::session::Session;
use sqlcell::workspace::DEFAULT_RESULT_NAME;

async fn run_script(script: &str) -> (Session, MockClient, CapturingSink) {
    let client = MockClient::new().with_tables(vec!["events".to_string()]);
    let sink = CapturingSink::new();
    let mut session = Session::new(Box::new(client.clone()), Box::new(sink.clone()));
    session.workspace.set_parameter("table", "events");

    for cell in parse_script(script).unwrap() {
        dispatch(&mut session, cell.magic, &cell.options_line, &cell.body)
            .await
            .unwrap();
    }

    (session, client, sink)
}

#[tokio::test]
async fn full_script_runs_in_order() {
    let script = "\
%%execsql
CREATE TABLE {table}_copy AS SELECT * FROM {table}

%%readsql -h 1 sample
SELECT * FROM {table}

%%printsql
-- done with {table}
";
    let (session, client, sink) = run_script(script).await;

    assert_eq!(
        client.executed_sql(),
        vec!["CREATE TABLE events_copy AS SELECT * FROM events"]
    );
    assert_eq!(client.fetched_sql(), vec!["SELECT * FROM events"]);

    // One refresh per exec/read, none for print
    assert_eq!(client.table_listing_count(), 2);
    assert_eq!(session.registry.generation(), 2);

    // The read bound its result under the requested name
    assert!(session.workspace.result("sample").is_some());
    assert!(session.workspace.result(DEFAULT_RESULT_NAME).is_none());

    assert_eq!(
        sink.rendered(),
        vec![
            Rendered::Table { shown: 1, total: 1 },
            Rendered::Text("-- done with events".to_string()),
        ]
    );
}

#[tokio::test]
async fn script_results_accumulate_across_cells() {
    let script = "\
%%readsql first
SELECT 1

%%readsql second
SELECT 2
";
    let (session, _client, _sink) = run_script(script).await;
    assert_eq!(session.workspace.result_names(), vec!["first", "second"]);
}

#[tokio::test]
async fn script_with_raw_cell_keeps_placeholders() {
    let script = "\
%%printsql -i
SELECT '{not_a_binding}'
";
    let (_session, _client, sink) = run_script(script).await;
    assert_eq!(
        sink.rendered(),
        vec![Rendered::Text("SELECT '{not_a_binding}'".to_string())]
    );
}
