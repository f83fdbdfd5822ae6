use std::sync::Arc;

use ghdir::{ChunkStream, DownloadError, FetchError, Mirror, MirrorError, Remote, Translator};
use ghdir_github::{GitHubClient, GitHubClientConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const README: &[u8] = b"# tesseract examples\n";
const MAIN_C: &[u8] = b"int main(void) { return 0; }\n";
const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

fn remote() -> Arc<dyn Remote> {
    Arc::new(GitHubClient::new(&GitHubClientConfig::default()).unwrap())
}

fn mirror_for(server: &MockServer, output: &std::path::Path) -> Mirror {
    Mirror::new(remote())
        .with_translator(Translator::new(&server.uri(), &server.uri()))
        .with_output_dir(output)
}

fn file_json(server: &MockServer, path: &str, size: usize) -> Value {
    let name = path.rsplit('/').next().unwrap();
    json!({
        "name": name,
        "path": path,
        "size": size,
        "type": "file",
        "url": format!("{}/repos/tesseract-ocr/tesseract/contents/{path}?ref=main", server.uri()),
        "download_url": format!("{}/raw/{path}", server.uri())
    })
}

fn dir_json(server: &MockServer, path: &str) -> Value {
    let name = path.rsplit('/').next().unwrap();
    json!({
        "name": name,
        "path": path,
        "size": 0,
        "type": "dir",
        "url": format!("{}/repos/tesseract-ocr/tesseract/contents/{path}?ref=main", server.uri()),
        "download_url": null
    })
}

async fn mount_json(server: &MockServer, api_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/tesseract-ocr/tesseract/contents/{api_path}")))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_raw(server: &MockServer, repo_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/raw/{repo_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// example/
///   README.md
///   cli/
///     main.c
///     images/
///       logo.png
async fn mount_example_tree(server: &MockServer) {
    mount_json(
        server,
        "example",
        json!([
            file_json(server, "example/README.md", README.len()),
            dir_json(server, "example/cli"),
        ]),
    )
    .await;
    mount_json(
        server,
        "example/cli",
        json!([
            file_json(server, "example/cli/main.c", MAIN_C.len()),
            dir_json(server, "example/cli/images"),
        ]),
    )
    .await;
    mount_json(
        server,
        "example/cli/images",
        json!([file_json(server, "example/cli/images/logo.png", IMAGE.len())]),
    )
    .await;

    mount_raw(server, "example/README.md", README).await;
    mount_raw(server, "example/cli/main.c", MAIN_C).await;
    mount_raw(server, "example/cli/images/logo.png", IMAGE).await;
}

fn browse_url(server: &MockServer) -> String {
    format!("{}/tesseract-ocr/tesseract/tree/main/example", server.uri())
}

#[tokio::test]
async fn mirrors_directory_tree_over_http() {
    let server = MockServer::start().await;
    mount_example_tree(&server).await;
    let out = tempfile::tempdir().unwrap();

    let report = mirror_for(&server, out.path())
        .run(&browse_url(&server))
        .await
        .unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(
        report.bytes,
        (README.len() + MAIN_C.len() + IMAGE.len()) as u64
    );
    assert_eq!(std::fs::read(out.path().join("example/README.md")).unwrap(), README);
    assert_eq!(std::fs::read(out.path().join("example/cli/main.c")).unwrap(), MAIN_C);
    assert_eq!(
        std::fs::read(out.path().join("example/cli/images/logo.png")).unwrap(),
        IMAGE
    );
}

#[tokio::test]
async fn failing_download_is_reported_after_siblings_finish() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "example",
        json!([
            file_json(&server, "example/README.md", README.len()),
            file_json(&server, "example/broken.txt", 10),
            file_json(&server, "example/main.c", MAIN_C.len()),
        ]),
    )
    .await;
    mount_raw(&server, "example/README.md", README).await;
    mount_raw(&server, "example/main.c", MAIN_C).await;
    Mock::given(method("GET"))
        .and(path("/raw/example/broken.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let result = mirror_for(&server, out.path())
        .run(&browse_url(&server))
        .await;

    match result {
        Err(MirrorError::Download { url, source, .. }) => {
            assert!(url.ends_with("/raw/example/broken.txt"));
            assert!(matches!(
                source,
                DownloadError::Fetch(FetchError::Status { status: 500, .. })
            ));
        }
        other => panic!("expected download failure, got {other:?}"),
    }

    assert_eq!(std::fs::read(out.path().join("example/README.md")).unwrap(), README);
    assert_eq!(std::fs::read(out.path().join("example/main.c")).unwrap(), MAIN_C);
    assert!(!out.path().join("example/broken.txt").exists());
}

#[tokio::test]
async fn size_mismatch_is_a_failure() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "example",
        json!([file_json(&server, "example/README.md", README.len() + 100)]),
    )
    .await;
    mount_raw(&server, "example/README.md", README).await;

    let out = tempfile::tempdir().unwrap();
    let result = mirror_for(&server, out.path())
        .run(&browse_url(&server))
        .await;

    assert!(matches!(
        result,
        Err(MirrorError::Download {
            source: DownloadError::SizeMismatch { .. },
            ..
        })
    ));
    assert!(!out.path().join("example/README.md").exists());
}

#[tokio::test]
async fn missing_directory_is_listing_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/tesseract-ocr/tesseract/contents/example"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let result = mirror_for(&server, out.path())
        .run(&browse_url(&server))
        .await;

    assert!(matches!(
        result,
        Err(MirrorError::ListingFetch {
            source: FetchError::Status { status: 404, .. },
            ..
        })
    ));
}

#[tokio::test]
async fn open_streams_raw_bytes() {
    let server = MockServer::start().await;
    mount_raw(&server, "example/cli/images/logo.png", IMAGE).await;

    let mut body: Box<dyn ChunkStream> = remote()
        .open(&format!("{}/raw/example/cli/images/logo.png", server.uri()))
        .await
        .unwrap();

    let mut received = Vec::new();
    while let Some(chunk) = body.next_chunk().await.unwrap() {
        received.extend(chunk);
    }
    assert_eq!(received, IMAGE);
}
