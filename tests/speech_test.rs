//! Integration tests for speech synthesis
//!
//! These run against whatever engine the machine has. Headless CI boxes
//! often have none, so a missing engine is reported rather than failed.

use readaloud::speech::synth::create_synth;
use readaloud::SpeechController;

#[test]
fn test_create_synth() {
    match create_synth() {
        Ok(synth) => {
            println!("✓ Successfully created TTS backend");
            drop(synth);
        }
        Err(e) => {
            println!("⚠ TTS creation failed (may be expected): {}", e);
        }
    }
}

#[test]
fn test_speech_configuration() {
    if let Ok(mut synth) = create_synth() {
        for rate in [50, 170, 300] {
            assert!(synth.set_rate(rate).is_ok(), "Should set rate to {}", rate);
        }

        assert!(synth.set_volume(0.0).is_ok(), "Should set volume to 0.0");
        assert!(synth.set_volume(0.5).is_ok(), "Should set volume to 0.5");
        assert!(synth.set_volume(1.0).is_ok(), "Should set volume to 1.0");

        let voices = synth.voices();
        println!("Voice listing result: {:?}", voices.as_ref().map(Vec::len));
    } else {
        println!("⚠ Skipping configuration tests (TTS not available)");
    }
}

#[test]
fn test_speech_operations() {
    if let Ok(mut synth) = create_synth() {
        // Should not error even when no audio device is attached
        assert!(synth.speak("Integration test").is_ok());
        assert!(synth.speak("").is_ok(), "Should handle empty string");
        assert!(synth.speak("Accents: café naïve").is_ok());
        assert!(synth.stop().is_ok(), "Should stop without error");
    } else {
        println!("⚠ Skipping operation tests (TTS not available)");
    }
}

#[test]
fn test_controller_without_audio_is_fail_soft() {
    // Whatever the platform offers, none of this may panic
    let controller = SpeechController::new();
    controller.set_volume(7.0);
    controller.set_rate(200);
    let _ = controller.voices();

    controller.speak("   ");
    assert!(!controller.is_busy());

    controller.speak("short");
    controller.stop();
    assert!(!controller.is_busy());
}
