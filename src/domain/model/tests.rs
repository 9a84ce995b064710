// Unit tests for domain models

use super::*;

fn sample_request() -> CropRequest {
    CropRequest::new("/movies/input.mp4", "/movies/output.mp4", CropRect::new(500, 500, 300, 100))
}

#[test]
fn test_crop_rect_filter_expression() {
    let crop = CropRect::new(640, 360, 10, 20);
    assert_eq!(crop.filter_expression(), "crop=640:360:10:20");
    assert_eq!(format!("{}", crop), "640x360+10+20");
}

#[test]
fn test_crop_rect_default_geometry() {
    assert_eq!(CropRect::default(), CropRect::new(500, 500, 300, 100));
}

#[test]
fn test_job_arguments_order() {
    let job = TranscodeJob::new(sample_request(), &TranscodeProfile::default());

    let expected: Vec<String> = [
        "-y",
        "-c:v",
        "libopenh264",
        "-i",
        "/movies/input.mp4",
        "-filter:v",
        "crop=500:500:300:100",
        "-max_muxing_queue_size",
        "512",
        "-c:v",
        "libopenh264",
        "-strict",
        "2",
        "/movies/output.mp4",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(job.arguments(), expected.as_slice());
}

#[test]
fn test_job_arguments_keep_paths_with_spaces_whole() {
    let request = CropRequest::new(
        "/home/me/My Movies/in put.mp4",
        "/home/me/My Movies/out put.mp4",
        CropRect::default(),
    );
    let job = TranscodeJob::new(request, &TranscodeProfile::default());

    assert!(job
        .arguments()
        .iter()
        .any(|arg| arg == "/home/me/My Movies/in put.mp4"));
    assert_eq!(
        job.arguments().last().map(String::as_str),
        Some("/home/me/My Movies/out put.mp4")
    );
    assert_eq!(job.arguments().len(), 14);
}

#[test]
fn test_job_arguments_follow_profile() {
    let profile = TranscodeProfile {
        overwrite: false,
        decoder: "h264".to_string(),
        encoder: "libx264".to_string(),
        strict: "experimental".to_string(),
        max_muxing_queue_size: 1024,
        ..TranscodeProfile::default()
    };
    let job = TranscodeJob::new(sample_request(), &profile);
    let args = job.arguments();

    assert_eq!(args[0], "-c:v");
    assert_eq!(args[1], "h264");
    assert!(!args.iter().any(|arg| arg == "-y"));
    assert!(args.windows(2).any(|w| w[0] == "-max_muxing_queue_size" && w[1] == "1024"));
    assert!(args.windows(2).any(|w| w[0] == "-strict" && w[1] == "experimental"));
    assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
}

#[test]
fn test_out_of_range_crop_passes_through() {
    let request = CropRequest::new("in.mp4", "out.mp4", CropRect::new(u32::MAX, 0, u32::MAX, 7));
    let job = TranscodeJob::new(request, &TranscodeProfile::default());
    let filter = format!("crop={}:0:{}:7", u32::MAX, u32::MAX);
    assert!(job.arguments().contains(&filter));
}

#[test]
fn test_job_duration_zero_is_unknown() {
    let job = TranscodeJob::new(sample_request(), &TranscodeProfile::default());
    assert_eq!(job.total_duration_ms(), None);
    assert_eq!(job.clone().with_duration_ms(0).total_duration_ms(), None);
    assert_eq!(job.with_duration_ms(60_000).total_duration_ms(), Some(60_000));
}

#[test]
fn test_profile_validation() {
    assert!(TranscodeProfile::default().validate().is_ok());

    let empty_encoder = TranscodeProfile {
        encoder: "  ".to_string(),
        ..TranscodeProfile::default()
    };
    assert!(matches!(
        empty_encoder.validate(),
        Err(DomainError::ConfigError(_))
    ));

    let zero_queue = TranscodeProfile {
        max_muxing_queue_size: 0,
        ..TranscodeProfile::default()
    };
    assert!(zero_queue.validate().is_err());
}

#[test]
fn test_progress_percent_clamps_both_ends() {
    assert_eq!(ProgressPercent::clamped(-5).value(), 0);
    assert_eq!(ProgressPercent::clamped(42).value(), 42);
    assert_eq!(ProgressPercent::clamped(1_000).value(), 100);
    assert_eq!(format!("{}", ProgressPercent::clamped(37)), "37%");
}

#[test]
fn test_job_state_terminality() {
    assert!(!JobState::Idle.is_terminal());
    assert!(!JobState::Running.is_terminal());
    assert!(JobState::Succeeded.is_terminal());
    assert!(JobState::Failed.is_terminal());
    assert!(JobState::Cancelled.is_terminal());
}

#[test]
fn test_outcome_maps_to_state() {
    assert_eq!(JobOutcome::Succeeded.state(), JobState::Succeeded);
    assert_eq!(JobOutcome::Cancelled.state(), JobState::Cancelled);
    let failed = JobOutcome::Failed {
        reason: "encoder not found".to_string(),
    };
    assert_eq!(failed.state(), JobState::Failed);
    assert_eq!(failed.to_string(), "failed: encoder not found");
    assert!(!failed.is_success());
}

#[test]
fn test_outcome_serializes_with_status_tag() {
    let json = serde_json::to_value(JobOutcome::Failed {
        reason: "boom".to_string(),
    })
    .unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["reason"], "boom");

    let json = serde_json::to_value(JobOutcome::Cancelled).unwrap();
    assert_eq!(json["status"], "cancelled");
}
