use super::jobs::{JobMessage, PredictionJobResult, PredictionOutcome};
use super::*;
use crate::prediction::{PredictionError, PredictionResponse};
use crate::test_support::{json_response, png_base64, png_bytes, serve_once};
use std::time::{Duration, Instant};

fn controller_for(url: &str) -> EguiController {
    EguiController::new(ServiceConfig::new(url).unwrap())
}

fn png_file(name: &str) -> ImageFile {
    ImageFile::from_bytes(name, Some("image/png"), png_bytes(4, 4)).unwrap()
}

fn wait_until(controller: &mut EguiController, mut done: impl FnMut(&EguiController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        controller.poll_background_jobs();
        if done(controller) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for background job");
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn wait_for_outcome(controller: &mut EguiController) {
    wait_until(controller, |c| !c.is_loading());
}

fn success_body() -> String {
    let heatmap = png_base64(2, 2);
    let original = png_base64(3, 3);
    format!(
        r#"{{"success":true,"predictions":{{"Pneumonia":0.82}},"all_predictions":{{"Effusion":0.31,"Pneumonia":0.82}},"gradcam_images":{{"Pneumonia":"data:image/png;base64,{heatmap}"}},"original_image":"{original}","threshold_used":0.5,"num_predictions":1}}"#
    )
}

#[test]
fn starts_idle_with_default_status() {
    let controller = controller_for("http://127.0.0.1:9");
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
    assert!(controller.can_submit());
    assert_eq!(controller.ui.status, StatusBarState::idle());
    assert_eq!(controller.display_disease(), None);
}

#[test]
fn non_image_bytes_are_rejected_without_leaving_idle() {
    let mut controller = controller_for("http://127.0.0.1:9");
    let sent = controller.submit_bytes("notes.txt", Some("text/plain"), b"hello");
    assert!(!sent);
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
    assert_eq!(controller.generation(), 0);
    assert_eq!(
        controller.ui.upload.rejection.as_deref(),
        Some(crate::image_file::INVALID_FILE_TYPE_MESSAGE)
    );
    assert_eq!(controller.ui.status.badge_label, "Warning");
}

#[test]
fn non_image_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();
    let mut controller = controller_for("http://127.0.0.1:9");
    assert!(!controller.submit_path(&path));
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
    assert!(controller.ui.upload.rejection.is_some());
}

#[test]
fn successful_upload_shows_results_with_default_disease() {
    let (url, requests) = serve_once(json_response("200 OK", &success_body()));
    let mut controller = controller_for(&url);
    assert!(controller.submit_file(png_file("chest.png")));
    assert!(controller.is_loading());
    assert_eq!(controller.ui.status.badge_label, "Busy");

    wait_for_outcome(&mut controller);
    let results = controller.phase().results().expect("results phase");
    assert_eq!(results.source_name, "chest.png");
    assert_eq!(results.response.predictions.get("Pneumonia"), Some(0.82));
    assert!(results.images.original.is_some());
    assert!(results.images.heatmaps.contains_key("Pneumonia"));
    assert_eq!(controller.display_disease(), Some("Pneumonia"));
    assert_eq!(controller.ui.status.text, "1 condition detected in chest.png");

    let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(request.request_line(), "POST /predict HTTP/1.1");
}

#[test]
fn second_submission_while_loading_is_ignored() {
    let (url, _requests) = serve_once(json_response("200 OK", &success_body()));
    let mut controller = controller_for(&url);
    assert!(controller.submit_file(png_file("first.png")));
    let generation = controller.generation();
    assert!(!controller.submit_file(png_file("second.png")));
    assert_eq!(controller.generation(), generation);
    wait_for_outcome(&mut controller);
    assert_eq!(
        controller.phase().results().map(|r| r.source_name.as_str()),
        Some("first.png")
    );
}

#[test]
fn server_detail_becomes_error_message() {
    let (url, _requests) = serve_once(json_response(
        "400 Bad Request",
        r#"{"detail":"bad image"}"#,
    ));
    let mut controller = controller_for(&url);
    controller.submit_file(png_file("chest.png"));
    wait_for_outcome(&mut controller);
    assert_eq!(controller.phase().error_message(), Some("bad image"));
    assert_eq!(controller.ui.status.badge_label, "Error");
    assert!(!controller.can_submit());
}

#[test]
fn missing_detail_uses_fallback_message() {
    let (url, _requests) = serve_once(json_response("500 Internal Server Error", "{}"));
    let mut controller = controller_for(&url);
    controller.submit_file(png_file("chest.png"));
    wait_for_outcome(&mut controller);
    assert_eq!(
        controller.phase().error_message(),
        Some(crate::prediction::FALLBACK_ERROR_MESSAGE)
    );
}

#[test]
fn unreachable_service_reports_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let mut controller = controller_for(&url);
    controller.submit_file(png_file("chest.png"));
    wait_for_outcome(&mut controller);
    assert!(
        controller
            .phase()
            .error_message()
            .is_some_and(|message| !message.is_empty())
    );
}

#[test]
fn stale_result_after_reset_is_discarded() {
    let mut controller = controller_for("http://127.0.0.1:9");
    let sender = controller.jobs.message_sender();
    controller.generation = 4;
    controller.ui.phase = AnalysisPhase::Loading;
    controller.reset();
    sender
        .send(JobMessage::PredictionFinished(PredictionJobResult {
            generation: 4,
            source_name: "old.png".into(),
            result: Ok(PredictionOutcome {
                response: PredictionResponse::default(),
                images: ResultImages::default(),
            }),
        }))
        .unwrap();
    controller.poll_background_jobs();
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
}

#[test]
fn stale_error_for_older_generation_is_discarded() {
    let mut controller = controller_for("http://127.0.0.1:9");
    let sender = controller.jobs.message_sender();
    controller.generation = 2;
    controller.ui.phase = AnalysisPhase::Loading;
    sender
        .send(JobMessage::PredictionFinished(PredictionJobResult {
            generation: 1,
            source_name: "old.png".into(),
            result: Err(PredictionError::Transport("gone".into())),
        }))
        .unwrap();
    controller.poll_background_jobs();
    assert!(controller.is_loading());
}

#[test]
fn preview_is_decoded_for_current_submission() {
    let (url, _requests) = serve_once(json_response("200 OK", &success_body()));
    let mut controller = controller_for(&url);
    controller.submit_file(png_file("chest.png"));
    let generation = controller.generation();
    wait_until(&mut controller, |c| {
        c.ui.upload.preview.is_some() && !c.is_loading()
    });
    let preview = controller.ui.upload.preview.as_ref().unwrap();
    assert_eq!(preview.generation, generation);
    assert_eq!(preview.name, "chest.png");
    assert_eq!(preview.image.size, [4, 4]);
}

#[test]
fn selection_and_toggle_persist_until_reset() {
    let mut controller = controller_for("http://127.0.0.1:9");
    let response: PredictionResponse = serde_json::from_str(
        r#"{"predictions":{"Mass":0.7,"Nodule":0.6},"all_predictions":{"Mass":0.7,"Nodule":0.6}}"#,
    )
    .unwrap();
    controller.ui.phase = AnalysisPhase::Results(Box::new(AnalysisResults {
        source_name: "chest.png".into(),
        response,
        images: ResultImages::default(),
    }));
    assert_eq!(controller.display_disease(), Some("Mass"));

    controller.select_disease("Nodule");
    assert_eq!(controller.display_disease(), Some("Nodule"));
    controller.select_disease("Cardiomegaly");
    assert_eq!(controller.display_disease(), Some("Nodule"));

    controller.toggle_all_predictions();
    assert!(controller.ui.results.show_all_predictions);
    controller.toggle_all_predictions();
    assert!(!controller.ui.results.show_all_predictions);
    controller.toggle_all_predictions();

    controller.reset();
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
    assert_eq!(controller.ui.results, ResultsViewState::default());
    assert_eq!(controller.display_disease(), None);
    assert!(controller.can_submit());
}

#[test]
fn selection_is_ignored_outside_results() {
    let mut controller = controller_for("http://127.0.0.1:9");
    controller.select_disease("Mass");
    controller.toggle_all_predictions();
    assert_eq!(controller.ui.results, ResultsViewState::default());
}

#[test]
fn reset_from_error_allows_new_upload() {
    let mut controller = controller_for("http://127.0.0.1:9");
    controller.ui.phase = AnalysisPhase::Error {
        message: "bad image".into(),
    };
    controller.ui.upload.rejection = Some("old".into());
    let before = controller.generation();
    controller.reset();
    assert!(matches!(controller.phase(), AnalysisPhase::Idle));
    assert!(controller.ui.upload.rejection.is_none());
    assert!(controller.ui.upload.preview.is_none());
    assert_eq!(controller.generation(), before + 1);
}

#[test]
fn health_check_updates_service_label() {
    let (url, _requests) = serve_once(json_response(
        "200 OK",
        r#"{"status":"healthy","model_loaded":true,"device":"cpu"}"#,
    ));
    let mut controller = controller_for(&url);
    controller.check_service_health();
    wait_until(&mut controller, |c| c.ui.service_label.is_some());
    assert_eq!(
        controller.ui.service_label.as_deref(),
        Some("Service ready (cpu)")
    );
    assert!(!controller.has_pending_jobs());
}

#[test]
fn corrupt_images_still_reach_results() {
    let heatmap = png_base64(2, 2);
    let body = format!(
        r#"{{"predictions":{{"Pneumonia":0.82,"Mass":0.61}},"gradcam_images":{{"Pneumonia":"***","Mass":"{heatmap}"}},"original_image":"***","threshold_used":0.5}}"#
    );
    let (url, _requests) = serve_once(json_response("200 OK", &body));
    let mut controller = controller_for(&url);
    assert!(controller.submit_file(png_file("chest.png")));
    wait_for_outcome(&mut controller);

    let results = controller.phase().results().expect("results phase");
    assert!(results.images.original.is_none());
    assert!(!results.images.heatmaps.contains_key("Pneumonia"));
    assert!(results.images.heatmaps.contains_key("Mass"));
    assert_eq!(controller.display_disease(), Some("Pneumonia"));
    assert_eq!(controller.ui.status.badge_label, "Info");
}

#[test]
fn undecodable_images_are_skipped() {
    let response: PredictionResponse = serde_json::from_str(
        r#"{"predictions":{"Pneumonia":0.82,"Edema":0.7},"gradcam_images":{"Pneumonia":"***","Edema":"  "},"original_image":"***"}"#,
    )
    .unwrap();
    let images = super::jobs::decode_result_images(&response);
    assert!(images.original.is_none());
    assert!(images.heatmaps.is_empty());
}
