use crate::helpers::{spawn_app, spawn_app_with};
use chrono::{Duration, Utc};
use email_tracker::pixel::EMBEDDED_PIXEL;

#[tokio::test]
async fn track_returns_the_pixel_for_a_sent_email() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());

    // act
    let response = app.get_track("ursula@example.com").await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some("image/gif"),
        response
            .headers()
            .get("Content-Type")
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!(&response.bytes().await.unwrap()[..], EMBEDDED_PIXEL);
}

#[tokio::test]
async fn track_appends_one_open_with_the_project_of_the_send() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now() - Duration::hours(1));
    let before = Utc::now();

    // act
    app.get_track("ursula@example.com").await;

    // assert
    let opens = app.open_rows("ursula@example.com");
    assert_eq!(opens.len(), 1);
    assert_eq!(opens[0].project, "newsletter");
    assert!(opens[0].date >= before - Duration::seconds(5));
}

#[tokio::test]
async fn every_request_is_counted_as_an_open() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());

    // act
    for _ in 0..3 {
        let response = app.get_track("ursula@example.com").await;
        assert_eq!(200, response.status().as_u16());
    }

    // assert
    assert_eq!(app.open_rows("ursula@example.com").len(), 3);
}

#[tokio::test]
async fn opens_are_attributed_to_the_most_recent_send() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "spring", Utc::now() - Duration::days(2));
    app.insert_sent_email("ursula@example.com", "summer", Utc::now() - Duration::minutes(1));

    // act
    app.get_track("ursula@example.com").await;

    // assert
    let opens = app.open_rows("ursula@example.com");
    assert_eq!(opens.len(), 1);
    assert_eq!(opens[0].project, "summer");
}

#[tokio::test]
async fn track_returns_400_for_an_address_that_was_never_sent_to() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());

    // act
    let response = app.get_track("le.guin@example.com").await;

    // assert
    assert_eq!(400, response.status().as_u16());
    assert_eq!(app.count_all_opens(), 0);
}

#[tokio::test]
async fn track_returns_400_for_malformed_identifiers() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("not-an-email", "no at sign"),
        ("ursula%40", "no domain"),
        ("%40example.com", "no local part"),
    ];

    for (email_id, description) in test_cases {
        // act
        let response = app.get_track(email_id).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the identifier had {}.",
            description
        );
    }
    assert_eq!(app.count_all_opens(), 0);
}

#[tokio::test]
async fn track_returns_500_when_the_pixel_file_is_missing() {
    // arrange
    let app = spawn_app_with(|c| {
        c.tracking.pixel_path = Some("static/does-not-exist.gif".into());
    })
    .await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());

    // act
    let response = app.get_track("ursula@example.com").await;

    // assert
    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn track_serves_the_configured_pixel_file() {
    // arrange
    let pixel_path = concat!(env!("CARGO_MANIFEST_DIR"), "/static/pixel.gif");
    let app = spawn_app_with(|c| {
        c.tracking.pixel_path = Some(pixel_path.into());
    })
    .await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());

    // act
    let response = app.get_track("ursula@example.com").await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let expected = std::fs::read(pixel_path).unwrap();
    assert_eq!(&response.bytes().await.unwrap()[..], &expected[..]);
}

#[tokio::test]
async fn track_returns_500_when_the_opens_table_is_missing() {
    // arrange
    let app = spawn_app().await;
    app.insert_sent_email("ursula@example.com", "newsletter", Utc::now());
    app.drop_table("opens");

    // act
    let response = app.get_track("ursula@example.com").await;

    // assert
    assert_eq!(500, response.status().as_u16());
}
