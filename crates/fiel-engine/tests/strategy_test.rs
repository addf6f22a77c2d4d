mod common;

use common::{Context, MockDriver, MockElement, visible};
use fiel_engine::frames::FrameTraverser;
use fiel_engine::locator::LocatorChain;
use fiel_engine::strategy::{ChainClick, FileUpload, click_by_text};
use std::path::Path;
use std::time::Duration;

fn needles() -> Vec<String> {
    ["e.firma", "efirma", "firma", "certificado"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn cer_chain() -> LocatorChain {
    LocatorChain::new("certificate input")
        .css("input[type='file'][accept*='.cer' i]")
        .id("fileCer")
}

fn upload<'a>(chain: &'a LocatorChain, path: &'a Path) -> FileUpload<'a> {
    FileUpload {
        chain,
        path,
        probe_timeout: Duration::ZERO,
        poll_interval: Duration::from_millis(250),
        pause_after: Duration::from_millis(300),
    }
}

#[tokio::test(start_paused = true)]
async fn test_click_by_text_never_clicks_display_none() {
    let driver = MockDriver::new();
    let mut hidden = visible(0, "e.firma efirma firma certificado");
    hidden.display = "none".into();
    driver.set_candidates(Context::Root, vec![hidden, visible(3, "Acceso con e.firma")]);

    assert!(click_by_text(&driver, &needles()).await.unwrap());
    assert_eq!(
        driver.with_state(|s| s.candidate_clicks.clone()),
        vec![(Context::Root, 3)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_by_text_only_hidden_match_is_false() {
    let driver = MockDriver::new();
    let mut hidden = visible(0, "e.firma");
    hidden.display = "none".into();
    driver.set_candidates(Context::Root, vec![hidden, visible(1, "Contraseña")]);

    assert!(!click_by_text(&driver, &needles()).await.unwrap());
    assert!(driver.with_state(|s| s.candidate_clicks.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_click_by_text_skips_candidate_whose_text_changed() {
    let driver = MockDriver::new();
    driver.set_candidates(
        Context::Root,
        vec![visible(0, "Acceso con e.firma"), visible(1, "Firma electrónica")],
    );
    // Index 0 now holds another element by the time the click runs.
    driver.rerender_after_scan(
        Context::Root,
        vec![visible(0, "Cerrar sesión"), visible(1, "Firma electrónica")],
    );

    assert!(click_by_text(&driver, &needles()).await.unwrap());
    assert_eq!(
        driver.with_state(|s| s.candidate_clicks.clone()),
        vec![(Context::Root, 1)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_upload_reveals_hidden_input_and_sends_path() {
    let driver = MockDriver::new();
    let input = driver.add_root(MockElement::id("fileCer").hidden());
    let chain = cer_chain();
    let path = Path::new("/home/user/fiel/cert.cer");
    let frames = FrameTraverser::new(&driver, Duration::from_secs(1), Duration::from_millis(250));

    assert!(upload(&chain, path).run(&driver, &frames).await.unwrap());
    driver.with_state(|s| {
        assert_eq!(s.revealed, vec![(Context::Root, input)]);
        assert_eq!(
            s.typed,
            vec![(Context::Root, input, "/home/user/fiel/cert.cer".to_string())]
        );
    });
}

#[tokio::test(start_paused = true)]
async fn test_upload_falls_back_to_frames() {
    let driver = MockDriver::new();
    driver.add_frame(vec![MockElement::id("unrelated")]);
    let frame = driver.add_frame(vec![]);
    let input = driver.add_frame_element(
        frame,
        MockElement::css("input[type='file'][accept*='.cer' i]").hidden(),
    );
    let chain = cer_chain();
    let frames = FrameTraverser::new(&driver, Duration::from_secs(1), Duration::from_millis(250));

    let ok = upload(&chain, Path::new("/tmp/a.cer"))
        .run(&driver, &frames)
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(
        driver.with_state(|s| s.revealed.clone()),
        vec![(Context::Frame(frame), input)]
    );
    assert_eq!(driver.context(), Context::Root);
}

#[tokio::test(start_paused = true)]
async fn test_upload_without_input_anywhere_is_false() {
    let driver = MockDriver::new();
    driver.add_frame(vec![MockElement::id("nothing")]);
    let chain = cer_chain();
    let frames = FrameTraverser::new(&driver, Duration::from_secs(1), Duration::from_millis(250));

    let ok = upload(&chain, Path::new("/tmp/a.cer"))
        .run(&driver, &frames)
        .await
        .unwrap();

    assert!(!ok);
    assert!(driver.with_state(|s| s.typed.is_empty()));
    assert_eq!(driver.context(), Context::Root);
}

#[tokio::test(start_paused = true)]
async fn test_chain_click_falls_back_to_script_click() {
    let driver = MockDriver::new();
    let button = driver.add_root(MockElement::id("generate").native_click_fails());
    let chain = LocatorChain::new("generate").id("generate");
    let click = ChainClick {
        chain: &chain,
        timeout: Duration::from_secs(1),
        poll_interval: Duration::from_millis(250),
        pause_before_click: Duration::from_millis(800),
    };

    assert!(click.click_in_current_context(&driver).await.unwrap());
    driver.with_state(|s| {
        assert!(s.clicks.is_empty());
        assert_eq!(s.script_clicks, vec![(Context::Root, button)]);
        assert!(s.scripts.contains(&"scroll_into_view"));
    });
}
