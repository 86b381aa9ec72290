//! Integration tests for [`meme_render_client::RenderClient`] against a mockito render service.

use bytes::Bytes;
use meme_catalog::{Catalog, ParamsType, TemplateDescriptor};
use meme_render_client::{MemeRequest, RenderClient, RenderError};
use mockito::Matcher;
use std::io::Write;
use std::time::Duration;

fn catalog() -> Catalog {
    Catalog::from_descriptors(vec![
        TemplateDescriptor {
            id: "happy".to_string(),
            keywords: vec!["开心".to_string()],
            params: ParamsType {
                min_texts: 1,
                max_texts: 2,
                ..ParamsType::default()
            },
        },
        TemplateDescriptor {
            id: "kiss".to_string(),
            keywords: vec!["亲".to_string()],
            params: ParamsType {
                min_images: 2,
                max_images: 2,
                ..ParamsType::default()
            },
        },
    ])
}

fn client(url: &str) -> RenderClient {
    RenderClient::new(url, Duration::from_secs(5)).unwrap()
}

/// **Test: texts are sent as repeated `texts` fields, args carries the empty user list, body is returned verbatim.**
#[tokio::test]
async fn test_render_sends_repeated_texts_and_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/memes/happy/")
        .match_header("accept", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(
                r#"name="texts"[\s\S]*hello[\s\S]*name="texts"[\s\S]*world"#.to_string()
            ),
            Matcher::Regex(r#"name="args"[\s\S]*\{"user_infos":\[\]\}"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(b"PNGDATA".to_vec())
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "happy".to_string(),
        texts: vec!["hello".to_string(), "world".to_string()],
        images: vec![],
    };
    let body = client(&server.url()).render(&catalog(), &request).await.unwrap();

    assert_eq!(body, Bytes::from_static(b"PNGDATA"));
    mock.assert_async().await;
}

/// **Test: images are attached as repeated `images` parts with synthetic file names when the template takes images.**
#[tokio::test]
async fn test_render_attaches_images_for_image_template() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/memes/kiss/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="images"; filename="image_0.png""#.to_string()),
            Matcher::Regex(r#"name="images"; filename="image_1.png""#.to_string()),
            Matcher::Regex("image/png".to_string()),
        ]))
        .with_status(200)
        .with_body("GIF")
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "kiss".to_string(),
        texts: vec![],
        images: vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")],
    };
    client(&server.url()).render(&catalog(), &request).await.unwrap();

    mock.assert_async().await;
}

/// **Test: images gathered for a template that takes none are not sent.**
#[tokio::test]
async fn test_render_drops_images_for_text_only_template() {
    let mut server = mockito::Server::new_async().await;
    let with_images = server
        .mock("POST", "/memes/happy/")
        .match_body(Matcher::Regex(r#"name="images""#.to_string()))
        .with_status(200)
        .expect(0)
        .create_async()
        .await;
    let without_images = server
        .mock("POST", "/memes/happy/")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "happy".to_string(),
        texts: vec!["hi".to_string()],
        images: vec![Bytes::from_static(b"stray")],
    };
    client(&server.url()).render(&catalog(), &request).await.unwrap();

    with_images.assert_async().await;
    without_images.assert_async().await;
}

/// **Test: 404 maps to NotFound and its user message names the template.**
#[tokio::test]
async fn test_render_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/memes/bogus/")
        .with_status(404)
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "bogus".to_string(),
        ..MemeRequest::default()
    };
    let err = client(&server.url()).render(&catalog(), &request).await.unwrap_err();

    assert!(matches!(err, RenderError::NotFound { ref template_id } if template_id == "bogus"));
    assert!(err.user_message().unwrap().contains("bogus"));
}

/// **Test: other non-success statuses map to Upstream with the status code.**
#[tokio::test]
async fn test_render_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/memes/happy/")
        .with_status(500)
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "happy".to_string(),
        texts: vec!["x".to_string()],
        images: vec![],
    };
    let err = client(&server.url()).render(&catalog(), &request).await.unwrap_err();

    assert!(matches!(err, RenderError::Upstream { status: 500 }));
    assert!(err.user_message().unwrap().contains("500"));
}

/// **Test: connection refused maps to Unknown, which has no user message.**
#[tokio::test]
async fn test_render_transport_failure_is_unknown() {
    let request = MemeRequest {
        template_id: "happy".to_string(),
        ..MemeRequest::default()
    };
    let err = client("http://127.0.0.1:1")
        .render(&catalog(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Unknown(_)));
    assert!(err.user_message().is_none());
}

/// **Test: a trailing slash on the base URL does not double up in the request path.**
#[tokio::test]
async fn test_render_base_url_trailing_slash() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/memes/happy/")
        .with_status(200)
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "happy".to_string(),
        ..MemeRequest::default()
    };
    client(&format!("{}/", server.url()))
        .render(&catalog(), &request)
        .await
        .unwrap();

    mock.assert_async().await;
}

/// **Test: a template id with `/` and `..` stays one encoded path segment and cannot reach another endpoint.**
#[tokio::test]
async fn test_render_template_id_is_one_path_segment() {
    let mut server = mockito::Server::new_async().await;
    let keys = server
        .mock("POST", "/memes/keys/")
        .with_status(200)
        .with_body("WRONG ENDPOINT")
        .expect(0)
        .create_async()
        .await;
    let encoded = server
        .mock("POST", "/memes/a%2F..%2Fkeys/")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "a/../keys".to_string(),
        ..MemeRequest::default()
    };
    let err = client(&server.url())
        .render(&catalog(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::NotFound { ref template_id } if template_id == "a/../keys"));
    keys.assert_async().await;
    encoded.assert_async().await;
}

/// **Test: `#` in a template id is encoded instead of cutting the path short.**
#[tokio::test]
async fn test_render_template_id_with_fragment_char() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/memes/%23tag/")
        .with_status(404)
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "#tag".to_string(),
        ..MemeRequest::default()
    };
    let err = client(&server.url())
        .render(&catalog(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::NotFound { ref template_id } if template_id == "#tag"));
    mock.assert_async().await;
}

/// **Test: a response slower than the client timeout maps to Unknown (no user message).**
#[tokio::test]
async fn test_render_timeout_is_unknown() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/memes/happy/")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1500));
            w.write_all(b"TOO LATE")
        })
        .create_async()
        .await;

    let request = MemeRequest {
        template_id: "happy".to_string(),
        texts: vec!["x".to_string()],
        images: vec![],
    };
    let err = RenderClient::new(server.url(), Duration::from_millis(200))
        .unwrap()
        .render(&catalog(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Unknown(_)));
    assert!(err.user_message().is_none());
}

#[test]
fn test_invalid_base_url_is_rejected() {
    assert!(RenderClient::new("not a url", Duration::from_secs(5)).is_err());
}
