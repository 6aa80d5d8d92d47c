//! Voice registry and speak dispatcher tests
//!
//! Drives the registry and dispatcher directly against an in-memory engine.

mod common;

use common::{ana_and_tom, mock_engine, Notices};
use falar::dispatch::{self, Outcome, EMPTY_TEXT_NOTICE};
use falar::speech::{SpeakRequest, Voice};
use falar::voices::VoiceRegistry;

fn labels(registry: &VoiceRegistry) -> Vec<String> {
    registry
        .selector()
        .options()
        .iter()
        .map(|o| o.label.clone())
        .collect()
}

#[test]
fn test_refresh_renders_one_option_per_voice() {
    let voices = vec![
        Voice::new("a", "Alpha", "en-GB", false),
        Voice::new("b", "Beta", "fr-FR", true),
        Voice::new("c", "Gama", "pt-PT", false),
    ];
    let (mut engine, _) = mock_engine(voices.clone());
    let mut registry = VoiceRegistry::new();

    registry.refresh(&mut engine).unwrap();

    assert_eq!(registry.selector().len(), registry.snapshot().len());
    for (i, voice) in voices.iter().enumerate() {
        let option = &registry.selector().options()[i];
        let mut expected = format!("{} ({})", voice.name, voice.lang);
        if voice.is_default {
            expected.push_str(" [Padrão]");
        }
        assert_eq!(option.label, expected);
        assert_eq!(option.value.index, i);
        assert_eq!(option.value.id, voice.id);
        assert_eq!(&registry.snapshot()[i], voice);
    }
}

#[test]
fn test_refresh_keeps_engine_order_and_duplicates() {
    let voices = vec![
        Voice::new("z", "Zed", "en", false),
        Voice::new("a", "Ana", "pt-BR", false),
        Voice::new("z", "Zed", "en", false),
    ];
    let (mut engine, _) = mock_engine(voices);
    let mut registry = VoiceRegistry::new();

    registry.refresh(&mut engine).unwrap();

    assert_eq!(labels(&registry), ["Zed (en)", "Ana (pt-BR)", "Zed (en)"]);
}

#[test]
fn test_refresh_is_idempotent() {
    let (mut engine, _) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();

    registry.refresh(&mut engine).unwrap();
    let first = registry.selector().options().to_vec();
    registry.refresh(&mut engine).unwrap();

    assert_eq!(registry.selector().options(), first.as_slice());
    assert_eq!(registry.generation(), 2);
}

#[test]
fn test_refresh_replaces_instead_of_appending() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    registry.refresh(&mut engine).unwrap();

    handle.set_voices(vec![Voice::new("eva", "Eva", "de-DE", false)]);
    registry.refresh(&mut engine).unwrap();

    assert_eq!(labels(&registry), ["Eva (de-DE)"]);
    assert_eq!(registry.snapshot().len(), 1);
}

#[test]
fn test_refresh_with_no_voices() {
    let (mut engine, _) = mock_engine(Vec::new());
    let mut registry = VoiceRegistry::new();

    registry.refresh(&mut engine).unwrap();

    assert!(registry.selector().is_empty());
    assert_eq!(registry.selector().value(), None);
}

#[test]
fn test_failed_query_leaves_registry_untouched() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    registry.refresh(&mut engine).unwrap();

    handle.set_voices(Vec::new());
    handle.fail_voices(true);
    assert!(registry.refresh(&mut engine).is_err());

    assert_eq!(registry.snapshot(), ana_and_tom().as_slice());
    assert_eq!(registry.selector().len(), 2);
    assert_eq!(registry.generation(), 1);
}

#[test]
fn test_scenario_ana_and_tom() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    let mut notices = Notices::default();

    registry.refresh(&mut engine).unwrap();
    assert_eq!(labels(&registry), ["Ana (pt-BR)", "Tom (en-US) [Padrão]"]);

    assert!(registry.selector_mut().select(0));
    let outcome = dispatch::speak("Olá", &registry, &mut engine, &mut notices).unwrap();
    let expected = SpeakRequest::new("Olá", Some(Voice::new("ana", "Ana", "pt-BR", false)));
    assert_eq!(outcome, Outcome::Dispatched(expected.clone()));
    assert_eq!(handle.spoken(), [expected]);

    let outcome = dispatch::speak("", &registry, &mut engine, &mut notices).unwrap();
    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(handle.spoken().len(), 1);
    assert_eq!(notices.all(), [EMPTY_TEXT_NOTICE]);
}

#[test]
fn test_empty_text_never_reaches_engine() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    let mut notices = Notices::default();
    registry.refresh(&mut engine).unwrap();

    for selection in [None, Some(0), Some(1)] {
        match selection {
            Some(k) => assert!(registry.selector_mut().select(k)),
            None => registry.selector_mut().clear_selection(),
        }
        let outcome = dispatch::speak("", &registry, &mut engine, &mut notices).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
    }

    assert!(handle.spoken().is_empty());
    assert_eq!(notices.all().len(), 3);
}

#[test]
fn test_whitespace_is_not_empty() {
    let (mut engine, handle) = mock_engine(Vec::new());
    let registry = VoiceRegistry::new();
    let mut notices = Notices::default();

    dispatch::speak(" ", &registry, &mut engine, &mut notices).unwrap();

    assert_eq!(handle.spoken(), [SpeakRequest::new(" ", None)]);
    assert!(notices.all().is_empty());
}

#[test]
fn test_no_selection_means_no_voice() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    let mut notices = Notices::default();
    registry.refresh(&mut engine).unwrap();
    registry.selector_mut().clear_selection();

    dispatch::speak("hello", &registry, &mut engine, &mut notices).unwrap();

    assert_eq!(handle.spoken(), [SpeakRequest::new("hello", None)]);
}

#[test]
fn test_no_voices_reported_still_speaks() {
    let (mut engine, handle) = mock_engine(Vec::new());
    let registry = VoiceRegistry::new();
    let mut notices = Notices::default();

    dispatch::speak("hello", &registry, &mut engine, &mut notices).unwrap();

    assert_eq!(handle.spoken(), [SpeakRequest::new("hello", None)]);
}

#[test]
fn test_selection_k_speaks_with_snapshot_k() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    let mut notices = Notices::default();
    registry.refresh(&mut engine).unwrap();

    for k in 0..registry.snapshot().len() {
        assert!(registry.selector_mut().select(k));
        dispatch::speak("hi", &registry, &mut engine, &mut notices).unwrap();
    }

    let voices: Vec<_> = handle.spoken().into_iter().map(|r| r.voice).collect();
    assert_eq!(
        voices,
        ana_and_tom().into_iter().map(Some).collect::<Vec<_>>()
    );
}

#[test]
fn test_selection_follows_voice_across_refresh() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    let mut notices = Notices::default();
    registry.refresh(&mut engine).unwrap();
    assert!(registry.selector_mut().select(1));

    // Tom moves to the front
    handle.set_voices(vec![
        Voice::new("tom", "Tom", "en-US", true),
        Voice::new("eva", "Eva", "de-DE", false),
        Voice::new("ana", "Ana", "pt-BR", false),
    ]);
    registry.refresh(&mut engine).unwrap();
    assert_eq!(registry.selector().selected(), Some(0));

    dispatch::speak("hi", &registry, &mut engine, &mut notices).unwrap();
    assert_eq!(handle.spoken()[0].voice.as_ref().unwrap().id, "tom");
}

#[test]
fn test_selection_of_removed_voice_falls_back_to_first() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let mut registry = VoiceRegistry::new();
    registry.refresh(&mut engine).unwrap();
    assert!(registry.selector_mut().select(1));

    handle.set_voices(vec![Voice::new("eva", "Eva", "de-DE", false)]);
    registry.refresh(&mut engine).unwrap();

    assert_eq!(registry.selector().selected(), Some(0));
    assert_eq!(registry.selected_voice().unwrap().id, "eva");
}

#[test]
fn test_engine_failure_is_passed_through() {
    let (mut engine, handle) = mock_engine(ana_and_tom());
    let registry = VoiceRegistry::new();
    let mut notices = Notices::default();
    handle.fail_speak(true);

    let result = dispatch::speak("hello", &registry, &mut engine, &mut notices);

    assert!(matches!(result, Err(falar::FalarError::Speech(_))));
    assert!(notices.all().is_empty());
}
