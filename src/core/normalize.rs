use crate::consts::DEFAULT_VIDEO_SECONDS;

use super::types::{Modality, NormalizedUsage};
use super::usage::{MediaKind, ModalityTokenCount, UsageReport};

fn sum_modality(details: &[ModalityTokenCount], modality: &Modality) -> u64 {
    details
        .iter()
        .filter(|d| &d.modality == modality)
        .map(|d| d.token_count.unwrap_or(0))
        .fold(0, u64::saturating_add)
}

/// Convert a raw report into totals the calculator can use without checks.
///
/// Reports without a per-modality input split get a single `default_modality`
/// line carrying the aggregate count, so input is never left unbilled.
pub(crate) fn normalize(report: &UsageReport, default_modality: Modality) -> NormalizedUsage {
    let prompt_details = report
        .prompt_tokens_details
        .as_deref()
        .filter(|d| !d.is_empty());

    let total_input_units = report.prompt_token_count.unwrap_or_else(|| {
        prompt_details
            .map(|d| {
                d.iter()
                    .map(|x| x.token_count.unwrap_or(0))
                    .fold(0, u64::saturating_add)
            })
            .unwrap_or(0)
    });

    let input_units = match prompt_details {
        Some(details) => details
            .iter()
            .map(|d| (d.modality.clone(), d.token_count.unwrap_or(0)))
            .collect(),
        None => vec![(default_modality, total_input_units)],
    };

    let candidates = report.candidates_token_count.unwrap_or(0);
    let output_details = report
        .candidates_tokens_details
        .as_deref()
        .filter(|d| !d.is_empty());
    let (image_output_units, detail_audio) = match output_details {
        Some(details) => (
            Some(sum_modality(details, &Modality::Image)),
            sum_modality(details, &Modality::Audio),
        ),
        None => (None, 0),
    };
    let text_output_units = candidates
        .saturating_sub(image_output_units.unwrap_or(0))
        .saturating_sub(detail_audio);
    let audio_output_units = report.audio_candidates_token_count.unwrap_or(detail_audio);

    let mut usage = NormalizedUsage {
        total_input_units,
        input_units,
        text_output_units,
        thinking_output_units: report.thoughts_token_count.unwrap_or(0),
        audio_output_units,
        image_output_units,
        generated_media_count: report.generated_media.len() as u64,
        ..Default::default()
    };

    let mut item_seconds: u64 = 0;
    for item in &report.generated_media {
        match item.media_kind() {
            Some(MediaKind::Image) => usage.generated_images += 1,
            Some(MediaKind::Video) => {
                usage.generated_videos += 1;
                match item.duration_seconds {
                    Some(secs) => item_seconds = item_seconds.saturating_add(secs),
                    None => {
                        usage.videos_without_duration += 1;
                        item_seconds = item_seconds.saturating_add(DEFAULT_VIDEO_SECONDS);
                    }
                }
            }
            Some(MediaKind::Audio) | None => {}
        }
    }

    match report.output_duration_seconds {
        Some(secs) => {
            usage.duration_seconds = secs;
            usage.videos_without_duration = 0;
        }
        None => usage.duration_seconds = item_seconds,
    }

    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::usage::GeneratedMedia;

    fn detail(modality: Modality, count: Option<u64>) -> ModalityTokenCount {
        ModalityTokenCount {
            modality,
            token_count: count,
        }
    }

    fn video(duration: Option<u64>) -> GeneratedMedia {
        GeneratedMedia {
            kind: Some(MediaKind::Video),
            mime_type: "video/mp4".to_string(),
            duration_seconds: duration,
        }
    }

    #[test]
    fn missing_breakdown_synthesizes_default_line() {
        let report = UsageReport {
            prompt_token_count: Some(1234),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.input_units, vec![(Modality::Text, 1234)]);
        assert_eq!(usage.total_input_units, 1234);
    }

    #[test]
    fn empty_breakdown_treated_as_missing() {
        let report = UsageReport {
            prompt_token_count: Some(10),
            prompt_tokens_details: Some(Vec::new()),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.input_units, vec![(Modality::Text, 10)]);
    }

    #[test]
    fn breakdown_order_and_labels_preserved() {
        let report = UsageReport {
            prompt_token_count: Some(600),
            prompt_tokens_details: Some(vec![
                detail(Modality::Audio, Some(400)),
                detail(Modality::Other("DOCUMENT".into()), Some(150)),
                detail(Modality::Text, None),
            ]),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(
            usage.input_units,
            vec![
                (Modality::Audio, 400),
                (Modality::Other("DOCUMENT".into()), 150),
                (Modality::Text, 0),
            ]
        );
    }

    #[test]
    fn total_falls_back_to_detail_sum() {
        let report = UsageReport {
            prompt_tokens_details: Some(vec![
                detail(Modality::Text, Some(100)),
                detail(Modality::Video, Some(900)),
            ]),
            ..Default::default()
        };
        assert_eq!(normalize(&report, Modality::Text).total_input_units, 1000);
    }

    #[test]
    fn missing_fields_are_zero() {
        let usage = normalize(&UsageReport::default(), Modality::Text);
        assert_eq!(usage.total_input_units, 0);
        assert_eq!(usage.input_units, vec![(Modality::Text, 0)]);
        assert_eq!(usage.text_output_units, 0);
        assert_eq!(usage.thinking_output_units, 0);
        assert_eq!(usage.audio_output_units, 0);
        assert_eq!(usage.image_output_units, None);
        assert_eq!(usage.duration_seconds, 0);
    }

    #[test]
    fn image_tokens_split_from_candidates() {
        let report = UsageReport {
            candidates_token_count: Some(1390),
            candidates_tokens_details: Some(vec![
                detail(Modality::Text, Some(100)),
                detail(Modality::Image, Some(1290)),
            ]),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.text_output_units, 100);
        assert_eq!(usage.image_output_units, Some(1290));
    }

    #[test]
    fn audio_counter_wins_over_details() {
        let report = UsageReport {
            candidates_token_count: Some(50),
            audio_candidates_token_count: Some(800),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.text_output_units, 50);
        assert_eq!(usage.audio_output_units, 800);

        let report = UsageReport {
            candidates_token_count: Some(850),
            candidates_tokens_details: Some(vec![detail(Modality::Audio, Some(800))]),
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.text_output_units, 50);
        assert_eq!(usage.audio_output_units, 800);
    }

    #[test]
    fn inconsistent_details_saturate() {
        let report = UsageReport {
            candidates_token_count: Some(10),
            candidates_tokens_details: Some(vec![detail(Modality::Image, Some(500))]),
            ..Default::default()
        };
        assert_eq!(normalize(&report, Modality::Text).text_output_units, 0);
    }

    #[test]
    fn video_duration_defaults_per_unreported_video() {
        let report = UsageReport {
            generated_media: vec![video(Some(8)), video(None)],
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.generated_videos, 2);
        assert_eq!(usage.duration_seconds, 8 + DEFAULT_VIDEO_SECONDS);
        assert_eq!(usage.videos_without_duration, 1);
    }

    #[test]
    fn explicit_duration_wins_even_when_zero() {
        let report = UsageReport {
            output_duration_seconds: Some(0),
            generated_media: vec![video(None)],
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.duration_seconds, 0);
        assert_eq!(usage.videos_without_duration, 0);
    }

    #[test]
    fn huge_counts_saturate() {
        let report = UsageReport {
            prompt_tokens_details: Some(vec![
                detail(Modality::Text, Some(u64::MAX)),
                detail(Modality::Image, Some(1)),
            ]),
            candidates_token_count: Some(u64::MAX),
            candidates_tokens_details: Some(vec![
                detail(Modality::Image, Some(u64::MAX)),
                detail(Modality::Image, Some(u64::MAX)),
            ]),
            generated_media: vec![video(Some(u64::MAX)), video(None)],
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.total_input_units, u64::MAX);
        assert_eq!(usage.image_output_units, Some(u64::MAX));
        assert_eq!(usage.text_output_units, 0);
        assert_eq!(usage.duration_seconds, u64::MAX);
    }

    #[test]
    fn media_counts() {
        let report = UsageReport {
            generated_media: vec![
                GeneratedMedia {
                    kind: Some(MediaKind::Image),
                    mime_type: "image/png".to_string(),
                    duration_seconds: None,
                },
                GeneratedMedia {
                    kind: Some(MediaKind::Audio),
                    mime_type: "audio/wav".to_string(),
                    duration_seconds: None,
                },
            ],
            ..Default::default()
        };
        let usage = normalize(&report, Modality::Text);
        assert_eq!(usage.generated_images, 1);
        assert_eq!(usage.generated_media_count, 2);
        assert_eq!(usage.duration_seconds, 0);
    }
}
