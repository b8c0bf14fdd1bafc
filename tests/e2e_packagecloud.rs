//! Packagecloud E2E tests

use mockito::{Matcher, Server};

use pkg_retention::action::run;
use pkg_retention::config::ActionConfig;
use pkg_retention::repository::PackagecloudRepository;

fn package(filename: &str, version: &str, created_at: &str) -> String {
    format!(
        r#"{{
            "name": "erlang",
            "distro_version": "el/8",
            "filename": "{filename}",
            "version": "{version}",
            "release": "1.el8",
            "created_at": "{created_at}",
            "destroy_url": "/api/v1/repos/rabbitmq/erlang/el/8/{filename}"
        }}"#
    )
}

fn config(do_delete: bool) -> ActionConfig {
    ActionConfig::from_lookup(|name: &str| {
        match name {
            "INPUT_USERNAME" => Some("rabbitmq"),
            "INPUT_REPOSITORY" => Some("erlang"),
            "INPUT_TOKEN" => Some("abcde"),
            "INPUT_TYPE" => Some("rpm"),
            "INPUT_KEEP_LAST_N" => Some("1"),
            "INPUT_DO_DELETE" => Some(if do_delete { "true" } else { "false" }),
            _ => None,
        }
        .map(str::to_string)
    })
    .unwrap()
}

#[tokio::test]
async fn paginated_listing_then_deletion() {
    let mut server = Server::new_async().await;
    let link = format!(
        r#"<{}/rabbitmq/erlang/packages.json?filter=rpm&page=2>; rel="next""#,
        server.url()
    );

    let first_page = server
        .mock("GET", "/rabbitmq/erlang/packages.json")
        .match_query(Matcher::Exact("filter=rpm".into()))
        .match_header("authorization", "Basic YWJjZGU6")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("link", &link)
        .with_body(format!(
            "[{}, {}]",
            package("erlang-25.0-1.el8.x86_64.rpm", "25.0", "2022-05-01T10:00:00.000Z"),
            package("erlang-25.1-1.el8.x86_64.rpm", "25.1", "2022-09-01T10:00:00.000Z"),
        ))
        .expect(1)
        .create_async()
        .await;
    let second_page = server
        .mock("GET", "/rabbitmq/erlang/packages.json")
        .match_query(Matcher::Exact("filter=rpm&page=2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            "[{}]",
            package("erlang-26.0-1.el8.x86_64.rpm", "26.0", "2023-05-01T10:00:00.000Z"),
        ))
        .expect(1)
        .create_async()
        .await;
    let delete_25_0 = server
        .mock("DELETE", "/api/v1/repos/rabbitmq/erlang/el/8/erlang-25.0-1.el8.x86_64.rpm")
        .match_header("authorization", "Basic YWJjZGU6")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let delete_25_1 = server
        .mock("DELETE", "/api/v1/repos/rabbitmq/erlang/el/8/erlang-25.1-1.el8.x86_64.rpm")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let config = config(true);
    let repository = PackagecloudRepository::new(&server.url(), "rabbitmq", "erlang", "abcde")
        .with_package_type(config.package_type.clone());
    let mut out = Vec::new();

    let summary = run(&config, &repository, &mut out).await.unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;
    delete_25_0.assert_async().await;
    delete_25_1.assert_async().await;
    assert_eq!(summary.execution.deleted(), 2);
    assert!(!summary.execution.has_failures());
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Version(s) to keep: 26.0 [2023-05-01T10:00Z]"));
    assert!(out.contains("Deleted 2 file(s)"));
}

#[tokio::test]
async fn dry_run_sends_no_delete_request() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rabbitmq/erlang/packages.json")
        .match_query(Matcher::UrlEncoded("filter".into(), "rpm".into()))
        .with_status(200)
        .with_body(format!(
            "[{}, {}]",
            package("erlang-25.0-1.el8.x86_64.rpm", "25.0", "2022-05-01T10:00:00.000Z"),
            package("erlang-25.1-1.el8.x86_64.rpm", "25.1", "2022-09-01T10:00:00.000Z"),
        ))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config(false);
    let repository = PackagecloudRepository::new(&server.url(), "rabbitmq", "erlang", "abcde")
        .with_package_type(config.package_type.clone());

    let summary = run(&config, &repository, &mut Vec::new()).await.unwrap();

    delete.assert_async().await;
    assert_eq!(summary.execution.planned(), 1);
    assert_eq!(summary.execution.deleted(), 0);
}

#[tokio::test]
async fn failed_page_aborts_before_any_deletion() {
    let mut server = Server::new_async().await;
    let link = format!(
        r#"<{}/rabbitmq/erlang/packages.json?filter=rpm&page=2>; rel="next""#,
        server.url()
    );

    server
        .mock("GET", "/rabbitmq/erlang/packages.json")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/rabbitmq/erlang/packages.json")
        .match_query(Matcher::Exact("filter=rpm".into()))
        .with_status(200)
        .with_header("link", &link)
        .with_body(format!(
            "[{}]",
            package("erlang-25.0-1.el8.x86_64.rpm", "25.0", "2022-05-01T10:00:00.000Z"),
        ))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config(true);
    let repository = PackagecloudRepository::new(&server.url(), "rabbitmq", "erlang", "abcde")
        .with_package_type(config.package_type.clone());

    let result = run(&config, &repository, &mut Vec::new()).await;

    delete.assert_async().await;
    assert!(result.is_err());
}
