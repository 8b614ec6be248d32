use crate::helpers::spawn_app;
use email_tracker::pixel::EMBEDDED_PIXEL;

fn html_email() -> serde_json::Value {
    serde_json::json!({
        "recipient_email": "ursula@example.com",
        "subject": "Spring catalogue",
        "project_name": "catalogue",
        "content": "<html><body><p>New books are in.</p></body></html>"
    })
}

#[tokio::test]
async fn sending_an_email_returns_200_and_records_one_send() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_emails(&html_email()).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let receipt: serde_json::Value = response.json().await.unwrap();
    assert_eq!(receipt["email_id"], "ursula@example.com");
    assert_eq!(receipt["project"], "catalogue");

    let rows = app.sent_email_rows("ursula@example.com");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].project, "catalogue");

    let messages = app.email_client.sent_emails.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].recipient, "ursula@example.com");
    assert_eq!(messages[0].subject, "Spring catalogue");
}

#[tokio::test]
async fn the_tracking_link_in_a_sent_email_registers_an_open() {
    // arrange
    let app = spawn_app().await;
    app.post_emails(&html_email()).await;
    let tracking_link = {
        let messages = app.email_client.sent_emails.lock().unwrap();
        app.get_tracking_link(&messages[0])
    };

    // act
    let response = reqwest::get(tracking_link).await.unwrap();

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(&response.bytes().await.unwrap()[..], EMBEDDED_PIXEL);
    let opens = app.open_rows("ursula@example.com");
    assert_eq!(opens.len(), 1);
    assert_eq!(opens[0].project, "catalogue");
}

#[tokio::test]
async fn templated_emails_are_rendered_with_escaped_variables() {
    // arrange
    let app = spawn_app().await;
    let body = serde_json::json!({
        "recipient_email": "ursula@example.com",
        "subject": "News",
        "project_name": "announcements",
        "template": "announcement.html",
        "variables": { "name": "Ursula", "message": "<b>Earthsea</b>" }
    });

    // act
    let response = app.post_emails(&body).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let messages = app.email_client.sent_emails.lock().unwrap();
    assert!(messages[0].html.contains("Hello Ursula,"));
    assert!(!messages[0].html.contains("<b>"));
    assert!(messages[0].html.contains("&lt;b&gt;Earthsea&lt;&#x2f;b&gt;"));
}

#[tokio::test]
async fn requests_missing_authorization_are_rejected() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = reqwest::Client::new()
        .post(&format!("{}/emails", &app.address))
        .json(&html_email())
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(401, response.status().as_u16());
    assert_eq!(
        r#"Basic realm="emails""#,
        response.headers()["WWW-Authenticate"]
    );
    assert!(app.sent_email_rows("ursula@example.com").is_empty());
}

#[tokio::test]
async fn a_wrong_password_is_rejected() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = reqwest::Client::new()
        .post(&format!("{}/emails", &app.address))
        .basic_auth(&app.api_username, Some("not the password"))
        .json(&html_email())
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(401, response.status().as_u16());
    assert!(app.email_client.sent_emails.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sending_returns_400_for_invalid_data() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({
                "recipient_email": "not-an-email",
                "subject": "Hi",
                "project_name": "demo",
                "content": "<p>hi</p>"
            }),
            "an invalid recipient",
        ),
        (
            serde_json::json!({
                "recipient_email": "ursula@example.com",
                "subject": "Hi",
                "project_name": "  ",
                "content": "<p>hi</p>"
            }),
            "a blank project name",
        ),
        (
            serde_json::json!({
                "recipient_email": "ursula@example.com",
                "project_name": "demo",
                "content": "<p>hi</p>"
            }),
            "a missing subject",
        ),
        (
            serde_json::json!({
                "recipient_email": "ursula@example.com",
                "subject": "Hi",
                "project_name": "demo"
            }),
            "no content",
        ),
        (
            serde_json::json!({
                "recipient_email": "ursula@example.com",
                "subject": "Hi",
                "project_name": "demo",
                "template": "missing.html"
            }),
            "an unknown template",
        ),
    ];

    for (body, description) in test_cases {
        // act
        let response = app.post_emails(&body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            description
        );
    }
    assert!(app.email_client.sent_emails.lock().unwrap().is_empty());
    assert!(app.sent_email_rows("ursula@example.com").is_empty());
}

#[tokio::test]
async fn a_rejected_transmission_returns_500_and_records_nothing() {
    // arrange
    let app = spawn_app().await;
    app.email_client.reject_everything();

    // act
    let response = app.post_emails(&html_email()).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    assert!(app.sent_email_rows("ursula@example.com").is_empty());
}
