use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;
use users_etl::{
    Converter, EtlEngine, EtlError, FailureReason, FileDelivery, HttpDelivery, LocalStorage,
    OutputUser, RunOutcome, UsersPipeline,
};

fn user_xml(id: &str, name: &str, email: &str, age: &str) -> String {
    format!(
        "    <user id=\"{}\">\n        <name>{}</name>\n        <email>{}</email>\n        <age>{}</age>\n    </user>\n",
        id, name, email, age
    )
}

fn document(users: &[String]) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<users>\n{}</users>",
        users.concat()
    )
    .into_bytes()
}

#[tokio::test]
async fn test_end_to_end_delivery_over_http() {
    let server = MockServer::start();
    let collector = server.mock(|when, then| {
        when.method(POST)
            .path("/users")
            .header("content-type", "application/json")
            .json_body(serde_json::json!([
                {"id": "1", "full_name": "Иван Иванов", "email": "ivan@example.com", "age_group": "от 25 до 35"},
                {"id": "3", "full_name": "Петр Сидоров", "email": "petr@example.com", "age_group": "старше 35"}
            ]));
        then.status(200).body(r#"{"status":"success"}"#);
    });

    let payload = document(&[
        user_xml("1", "  Иван Иванов ", "ivan@example.com", "30"),
        user_xml("2", "Мария Петрова", "maria@example.com", "0"),
        user_xml("3", "Петр Сидоров", " petr@example.com ", "40"),
    ]);

    let delivery = HttpDelivery::new(server.url("/users"), Duration::from_secs(5)).unwrap();
    let engine = EtlEngine::new(UsersPipeline::new(Converter::default(), delivery));

    let report = engine.run(payload).await.unwrap();

    collector.assert();
    assert_eq!(report.outcome, RunOutcome::Partial);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.receipt.status, Some(200));
    let dropped = report.dropped.unwrap();
    assert_eq!(dropped.indices(), vec![1]);
    assert_eq!(dropped.failures()[0].reason, FailureReason::InvalidAge);
}

#[tokio::test]
async fn test_complete_run_has_no_dropped_records() {
    let server = MockServer::start();
    let collector = server.mock(|when, then| {
        when.method(POST).path("/users");
        then.status(201);
    });

    let payload = document(&[user_xml("1", "A", "a@example.com", "25")]);
    let delivery = HttpDelivery::new(server.url("/users"), Duration::from_secs(5)).unwrap();
    let engine = EtlEngine::new(UsersPipeline::new(Converter::default(), delivery));

    let report = engine.run(payload).await.unwrap();

    collector.assert();
    assert_eq!(report.outcome, RunOutcome::Complete);
    assert!(report.dropped.is_none());
}

#[tokio::test]
async fn test_collector_error_is_a_delivery_failure() {
    let server = MockServer::start();
    let collector = server.mock(|when, then| {
        when.method(POST).path("/users");
        then.status(503).body("maintenance");
    });

    let payload = document(&[user_xml("1", "A", "a@example.com", "25")]);
    let delivery = HttpDelivery::new(server.url("/users"), Duration::from_secs(5)).unwrap();
    let engine = EtlEngine::new(UsersPipeline::new(Converter::default(), delivery));

    let err = engine.run(payload).await.unwrap_err();

    collector.assert();
    match err {
        EtlError::DeliveryStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_all_invalid_batch_never_reaches_collector() {
    let server = MockServer::start();
    let collector = server.mock(|when, then| {
        when.method(POST).path("/users");
        then.status(200);
    });

    let payload = document(&[
        user_xml("", "A", "a@example.com", "30"),
        user_xml("2", "", "b@example.com", "30"),
        user_xml("3", "C", "", "30"),
    ]);
    let delivery = HttpDelivery::new(server.url("/users"), Duration::from_secs(5)).unwrap();
    let engine = EtlEngine::new(UsersPipeline::new(Converter::default(), delivery));

    let err = engine.run(payload).await.unwrap_err();

    collector.assert_hits(0);
    match err {
        EtlError::AllRecordsInvalid(errors) => {
            assert_eq!(errors.len(), 3);
            assert_eq!(errors.indices(), vec![0, 1, 2]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_dry_run_writes_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let payload = document(&[
        user_xml("10", "Анна", "anna@example.com", "19"),
        user_xml("11", "Олег", "oleg@example.com", "35"),
    ]);

    let delivery = FileDelivery::new(LocalStorage::new(output_path));
    let engine = EtlEngine::new(UsersPipeline::new(
        Converter::default().with_max_workers(2),
        delivery,
    ));

    let report = engine.run(payload).await.unwrap();
    assert_eq!(report.delivered, 2);
    assert_eq!(report.receipt.destination, "users.json");

    let written = std::fs::read(temp_dir.path().join("users.json")).unwrap();
    let users: Vec<OutputUser> = serde_json::from_slice(&written).unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11"]);
    assert_eq!(users[0].age_group.label(), "до 25");
    assert_eq!(users[1].age_group.label(), "от 25 до 35");
}

#[tokio::test]
async fn test_large_batch_same_result_for_every_pool_size() {
    let users: Vec<String> = (0..150)
        .map(|i| {
            let id = if i % 13 == 0 { String::new() } else { i.to_string() };
            let age = if i % 9 == 0 { 120 } else { 18 + (i % 50) };
            user_xml(&id, &format!("User {}", i), &format!("u{}@example.com", i), &age.to_string())
        })
        .collect();
    let payload = document(&users);

    let temp_dir = TempDir::new().unwrap();
    let mut baseline: Option<(Vec<OutputUser>, Vec<usize>)> = None;

    for workers in [1, 2, 7, 150, 500] {
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let delivery = FileDelivery::new(storage).with_file_name(format!("users-{}.json", workers));
        let engine = EtlEngine::new(UsersPipeline::new(
            Converter::default().with_max_workers(workers),
            delivery,
        ));

        let report = engine.run(payload.clone()).await.unwrap();
        let dropped = report.dropped.expect("batch has invalid records");
        assert_eq!(report.delivered + dropped.len(), 150);

        let written =
            std::fs::read(temp_dir.path().join(format!("users-{}.json", workers))).unwrap();
        let delivered: Vec<OutputUser> = serde_json::from_slice(&written).unwrap();

        match &baseline {
            None => baseline = Some((delivered, dropped.indices())),
            Some((users, indices)) => {
                assert_eq!(&delivered, users, "workers {}", workers);
                assert_eq!(&dropped.indices(), indices, "workers {}", workers);
            }
        }
    }
}
