//! Browser tests for the inline reveal and carousel script.
//!
//! Run with: `cargo test --test browser_reveal -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_textile-site");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }

        let status = Command::new(bin)
            .args([
                "build",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                output_dir.to_str().unwrap(),
                "--temp-dir",
                root.join(".textile-site-browser-temp").to_str().unwrap(),
            ])
            .status()
            .expect("failed to run textile-site");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load(rel: &str) -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join(rel);
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval(tab: &Tab, js: &str) -> serde_json::Value {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

/// Poll `js` until it returns `true` or `timeout` passes.
fn wait_for(tab: &Tab, js: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if eval(tab, js).as_bool().unwrap_or(false) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

fn is_visible(id: &str) -> String {
    format!(r#"document.querySelector('[data-reveal-id="{id}"]').classList.contains('visible')"#)
}

const ACTIVE_SLIDE: &str = r#"(function() {
    const items = Array.from(document.querySelectorAll('[data-carousel] .carousel-item'));
    return items.findIndex(i => i.classList.contains('active'));
})()"#;

fn active_slide_in(carousel: &str) -> String {
    format!(
        r#"(function() {{
    const items = Array.from(document.querySelectorAll('[data-carousel="{carousel}"] .carousel-item'));
    return items.findIndex(i => i.classList.contains('active'));
}})()"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn hero_revealed_on_load() {
    let tab = load("en/index.html");
    assert!(wait_for(&tab, &is_visible("hero"), Duration::from_secs(2)));
}

#[test]
#[ignore]
fn footer_revealed_only_after_scroll() {
    let tab = load("en/blog/index.html");
    assert!(!eval(&tab, &is_visible("footer")).as_bool().unwrap());

    eval(&tab, "window.scrollTo(0, document.body.scrollHeight); true");
    assert!(wait_for(&tab, &is_visible("footer"), Duration::from_secs(2)));
}

#[test]
#[ignore]
fn reveal_is_one_shot() {
    let tab = load("en/index.html");
    assert!(wait_for(&tab, &is_visible("hero"), Duration::from_secs(2)));

    eval(&tab, "window.scrollTo(0, document.body.scrollHeight); true");
    std::thread::sleep(Duration::from_millis(300));
    eval(&tab, "window.scrollTo(0, 0); true");
    std::thread::sleep(Duration::from_millis(300));

    assert!(eval(&tab, &is_visible("hero")).as_bool().unwrap());
    assert!(eval(&tab, &is_visible("footer")).as_bool().unwrap());
}

#[test]
#[ignore]
fn carousel_advances_on_interval() {
    let tab = load("en/index.html");
    assert_eq!(eval(&tab, ACTIVE_SLIDE).as_i64(), Some(0));
    assert!(wait_for(
        &tab,
        &format!("{} === 1", ACTIVE_SLIDE),
        Duration::from_secs(5)
    ));
}

#[test]
#[ignore]
fn carousel_prev_wraps_to_last() {
    let tab = load("en/index.html");
    eval(&tab, "document.querySelector('[data-carousel-prev]').click(); true");
    assert_eq!(eval(&tab, ACTIVE_SLIDE).as_i64(), Some(6));
}

#[test]
#[ignore]
fn workshop_galleries_move_independently() {
    let tab = load("en/production/index.html");
    eval(
        &tab,
        r#"document.querySelector('[data-carousel="dyeing"] [data-carousel-prev]').click(); true"#,
    );
    assert_eq!(eval(&tab, &active_slide_in("dyeing")).as_i64(), Some(2));
    assert_eq!(eval(&tab, &active_slide_in("knitting")).as_i64(), Some(0));
}

#[test]
#[ignore]
fn workshop_galleries_do_not_auto_advance() {
    let tab = load("en/production/index.html");
    std::thread::sleep(Duration::from_millis(3500));
    assert_eq!(eval(&tab, &active_slide_in("knitting")).as_i64(), Some(0));
}
