//! Integration tests against a fake profile site

use badgecard::icons::{fetch_icon, MemoryIconStore};
use badgecard::server::Server;
use badgecard::{CardConfig, CardGenerator, Error, ImageRef, OutputFormat, Tier};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tiny_http::{Response, Server as HttpServer};

static INIT: Once = Once::new();
const SITE: &str = "127.0.0.1:18090";

const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle cx="5" cy="5" r="4"/></svg>"#;

fn badge(title: &str, icon_path: &str, stars: usize) -> String {
    format!(
        r#"<div class="hacker-badge"><svg><image class="badge-icon" href="http://{SITE}{icon_path}"></image></svg>
           <text class="badge-title">{title}</text>{}</div>"#,
        r#"<svg class="badge-star"></svg>"#.repeat(stars)
    )
}

fn profile_page() -> String {
    format!(
        "<html><head><title>Jane Doe - HackerRank</title></head><body>{}{}{}</body></html>",
        badge("Python", "/icons/python.svg", 2),
        badge("Problem Solving", "/icons/missing.svg", 5),
        badge("SQL", "/icons/sql.svg", 3),
    )
}

fn slow_icon_page() -> String {
    format!(
        "<html><head><title>Tortoise - HackerRank</title></head><body>{}{}</body></html>",
        badge("Python", "/icons/python.svg", 4),
        badge("Patience", "/icons/slow.svg", 5),
    )
}

fn logo_png() -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(20, 12, image::Rgba([0, 171, 65, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// Observed User-Agent headers, in arrival order
static SEEN_AGENTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Start the fake profile/icon site once for the whole test binary
fn start_test_site() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = HttpServer::http(SITE).unwrap();
            for request in server.incoming_requests() {
                std::thread::spawn(move || respond(request));
            }
        });
        std::thread::sleep(Duration::from_millis(100));
    });

    format!("http://{}", SITE)
}

fn respond(request: tiny_http::Request) {
    if let Some(h) = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("User-Agent"))
    {
        SEEN_AGENTS.lock().unwrap().push(h.value.to_string());
    }
    let svg_header = "Content-Type: image/svg+xml".parse::<tiny_http::Header>().unwrap();
    let response = match request.url() {
        "/jane" => Response::from_string(profile_page()).with_header(
            "Content-Type: text/html; charset=utf-8"
                .parse::<tiny_http::Header>()
                .unwrap(),
        ),
        "/empty" => Response::from_string(
            "<html><head><title>Empty - HackerRank</title></head><body></body></html>",
        ),
        "/untitled" => Response::from_string("<html><body>no title here</body></html>"),
        "/slow" => {
            std::thread::sleep(Duration::from_millis(600));
            Response::from_string("<html><head><title>Slow</title></head></html>")
        }
        "/tortoise" => Response::from_string(slow_icon_page()),
        "/icons/python.svg" | "/icons/sql.svg" => {
            Response::from_string(ICON_SVG).with_header(svg_header)
        }
        "/icons/slow.svg" => {
            std::thread::sleep(Duration::from_millis(1_000));
            Response::from_string(ICON_SVG).with_header(svg_header)
        }
        "/logo.png" => Response::from_data(logo_png()),
        _ => Response::from_string("Not Found").with_status_code(404),
    };
    let _ = request.respond(response);
}

fn config() -> CardConfig {
    CardConfig {
        profile_base_url: start_test_site(),
        timeout_ms: 2_000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_extract_and_fetch_icons() {
    let store = Arc::new(MemoryIconStore::new());
    let generator = CardGenerator::new(config()).unwrap().with_icon_store(store.clone());

    let profile = generator.profile("jane").await.expect("profile");
    assert_eq!(profile.full_name, "Jane Doe");
    let titles: Vec<_> = profile.badges.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Problem Solving", "SQL", "Python"]);
    assert_eq!(profile.badges[0].gradient_tier, Tier::Unknown);

    // the 404 icon is skipped, the other two are loaded and cached
    assert!(profile.badges[0].icon_bytes.is_none());
    assert!(profile.badges[1].icon_bytes.is_some());
    assert!(profile.badges[2].icon_bytes.is_some());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_card_survives_failed_icon() {
    let generator = CardGenerator::new(config()).unwrap();
    let card = generator.generate("jane", OutputFormat::Svg).await.expect("card");
    assert_eq!(card.content_type(), "image/svg+xml");
    assert_eq!((card.width, card.height), (600, 350));

    let svg = String::from_utf8(card.data).unwrap();
    assert!(svg.contains("HackerRank User: jane"));
    assert!(svg.contains("Name: Jane Doe"));
    assert_eq!(svg.matches("<polygon").count(), 3);
    assert_eq!(svg.matches("data:image/svg+xml;base64,").count(), 2);
    // the badge whose icon 404'd still shows its title and stars
    assert!(svg.contains(">Problem Solving</text>") || svg.contains(">Problem</text>"));
    assert!(svg.contains(">★★★★★</text>"));
}

#[tokio::test]
async fn test_empty_profile_renders_header_only() {
    let generator = CardGenerator::new(config()).unwrap();
    let card = generator.generate("empty", OutputFormat::Svg).await.expect("card");
    assert_eq!(card.height, 350);
    let svg = String::from_utf8(card.data).unwrap();
    assert!(svg.contains("Name: Empty"));
    assert!(!svg.contains("<polygon"));
}

#[tokio::test]
async fn test_unknown_user_is_fetch_error() {
    let generator = CardGenerator::new(config()).unwrap();
    let err = generator.profile("nobody").await.unwrap_err();
    assert!(matches!(err, Error::FetchError(ref m) if m.contains("404")), "{}", err);
}

#[tokio::test]
async fn test_untitled_page_is_parse_error() {
    let generator = CardGenerator::new(config()).unwrap();
    let err = generator.profile("untitled").await.unwrap_err();
    assert!(matches!(err, Error::ParseError(_)), "{}", err);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let cfg = CardConfig {
        timeout_ms: 200,
        ..config()
    };
    let generator = CardGenerator::new(cfg).unwrap();
    let err = generator.profile("slow").await.unwrap_err();
    assert!(matches!(err, Error::FetchError(ref m) if m.contains("timed out")), "{}", err);
}

#[tokio::test]
async fn test_slow_icon_times_out_without_blocking_others() {
    let cfg = CardConfig {
        timeout_ms: 300,
        ..config()
    };
    let client = reqwest::Client::new();
    let err = fetch_icon(&client, &cfg, &format!("{}/icons/slow.svg", start_test_site()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IconLoadError(ref m) if m.contains("timed out")), "{}", err);
    assert!(!err.is_fatal());

    let generator = CardGenerator::new(cfg).unwrap();
    let profile = generator.profile("tortoise").await.expect("profile");
    assert_eq!(profile.badges[0].title, "Patience");
    assert!(profile.badges[0].icon_bytes.is_none());
    assert!(profile.badges[1].icon_bytes.is_some());

    let card = generator.generate("tortoise", OutputFormat::Svg).await.expect("card");
    let svg = String::from_utf8(card.data).unwrap();
    assert_eq!(svg.matches("<polygon").count(), 2);
    assert_eq!(svg.matches("data:image/svg+xml;base64,").count(), 1);
    assert!(svg.contains(">Patience</text>"));
}

#[tokio::test]
async fn test_remote_logo_is_downloaded() {
    let generator = CardGenerator::new(config()).unwrap();
    let url = format!("{}/logo.png", start_test_site());
    let logo = generator.load_logo(&url).await;
    assert_eq!(logo, Some(ImageRef::Bytes(logo_png())));

    let missing = format!("{}/missing-logo.png", start_test_site());
    assert_eq!(generator.load_logo(&missing).await, Some(ImageRef::Href(missing.clone())));
    assert_eq!(generator.load_logo("/definitely/not/here.png").await, None);

    let generator = generator.with_logo(logo);
    let card = generator.generate("empty", OutputFormat::Svg).await.expect("card");
    let svg = String::from_utf8(card.data).unwrap();
    assert!(svg.contains(r#"<image href="data:image/png;base64,"#));
}

#[cfg(feature = "raster")]
#[tokio::test]
async fn test_png_card_shows_downloaded_logo() {
    let plain = CardGenerator::new(config()).unwrap();
    let logo = plain
        .load_logo(&format!("{}/logo.png", start_test_site()))
        .await;
    let with_logo = CardGenerator::new(config()).unwrap().with_logo(logo);

    let a = plain.generate("empty", OutputFormat::Png).await.expect("card");
    let b = with_logo.generate("empty", OutputFormat::Png).await.expect("card");
    assert_ne!(a.data, b.data);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let cfg = CardConfig {
        user_agent: "BadgeCardTest/1.0".into(),
        ..config()
    };
    let generator = CardGenerator::new(cfg).unwrap().without_icons();
    generator.profile("empty").await.expect("profile");
    assert!(SEEN_AGENTS
        .lock()
        .unwrap()
        .iter()
        .any(|ua| ua == "BadgeCardTest/1.0"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_endpoint() {
    let generator = CardGenerator::new(config()).unwrap();
    let server = Server::bind("127.0.0.1:0", generator).unwrap();
    let addr = server.local_addr().unwrap();
    let runtime = tokio::runtime::Handle::current();
    std::thread::spawn(move || server.serve(runtime));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let resp = client
        .get(format!("{}/generate-card?username=jane", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.text().await.unwrap().starts_with("<svg"));

    let resp = client.get(format!("{}/generate-card", base)).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username is required");

    let resp = client.get(format!("{}/elsewhere", base)).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert_eq!(body["message"], "Route not found");

    let resp = client
        .get(format!("{}/generate-card?username=nobody", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Failed to generate card"));
}

#[cfg(feature = "raster")]
#[tokio::test]
async fn test_png_card() {
    let generator = CardGenerator::new(config()).unwrap();
    let card = generator.generate("jane", OutputFormat::Png).await.expect("card");
    assert_eq!(card.content_type(), "image/png");
    assert_eq!(&card.data[0..8], b"\x89PNG\r\n\x1a\n");
}
