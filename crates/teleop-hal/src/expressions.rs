//! Speech markup, mood animations and LED colours.
//!
//! An [`Utterance`] renders to the backend's inline speech markup:
//!
//! ```text
//! {animation tag}\vol={volume}\\vct={pitch}\\rspd={speed}\{text}
//! ```
//!
//! where the optional animation tag is `^start(animations/Stand/<path>)`
//! with `<path>` drawn uniformly from the chosen [`Mood`]'s list.

use rand::Rng;
use rand::seq::IndexedRandom;

/// A family of body animations that can accompany speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Thinking,
    Angry,
    Sad,
    Fearful,
    Laughing,
    Happy,
    Bowing,
    Waving,
    ShowingTablet,
}

impl Mood {
    /// Animation paths, relative to `animations/Stand/`.
    pub fn animations(self) -> &'static [&'static str] {
        match self {
            Mood::Thinking => &[
                "BodyTalk/Thinking/Remember_4",
                "BodyTalk/Thinking/ThinkingLoop_1",
                "Thinking/ThinkingLoop_2",
            ],
            Mood::Angry => &["Emotions/Negative/Angry_1", "Emotions/Negative/Angry_4"],
            Mood::Sad => &[
                "Emotions/Negative/Bored_1",
                "Emotions/Negative/Disapointed_1",
                "Emotions/Negative/Exhausted_1",
                "Emotions/Negative/Sad_1",
            ],
            Mood::Fearful => &["Emotions/Negative/Fearful_1", "Reactions/TouchHead_3"],
            Mood::Laughing => &[
                "Emotions/Positive/Amused_1",
                "Emotions/Positive/Laugh_2",
                "Emotions/Positive/Laugh_3",
            ],
            Mood::Happy => &["Emotions/Positive/Happy_4"],
            Mood::Bowing => &[
                "Gestures/BowShort_1",
                "Gestures/BowShort_2",
                "Gestures/BowShort_3",
            ],
            Mood::Waving => &["Gestures/Hey_2"],
            Mood::ShowingTablet => &[
                "Gestures/ShowTablet_1",
                "Gestures/ShowTablet_2",
                "Gestures/ShowTablet_3",
            ],
        }
    }

    /// A `^start(...)` tag for one of this mood's animations.
    pub fn pick_tag<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        self.animations()
            .choose(rng)
            .map(|path| format!("^start(animations/Stand/{path})"))
            .unwrap_or_default()
    }
}

/// How an utterance is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechAnimation {
    /// Plain speech, no body motion.
    None,
    /// Animated speech with the backend's own gestures.
    Default,
    /// Animated speech opening with an animation from the mood.
    Mood(Mood),
}

/// One thing to say and how to say it.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub volume: u32,
    pub pitch: u32,
    pub speed: u32,
    pub animation: SpeechAnimation,
}

impl Utterance {
    /// Render the markup string; the flag is `true` when the animated speech
    /// service must be used.
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> (String, bool) {
        let (tag, animated) = match self.animation {
            SpeechAnimation::None => (String::new(), false),
            SpeechAnimation::Default => (String::new(), true),
            SpeechAnimation::Mood(mood) => (mood.pick_tag(rng), true),
        };
        let markup = format!(
            "{tag}\\vol={}\\\\vct={}\\\\rspd={}\\{}",
            self.volume, self.pitch, self.speed, self.text
        );
        (markup, animated)
    }
}

/// LED groups faded together by a colour mood.
pub const MOOD_LED_GROUPS: [&str; 2] = ["FaceLeds", "ChestLeds"];

/// Fade time of a colour mood, seconds.
pub const MOOD_FADE_SECONDS: f32 = 0.2;

/// Named LED colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedColour {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Neutral,
}

impl LedColour {
    /// `0x00RRGGBB` colour code.
    pub fn code(self) -> u32 {
        match self {
            LedColour::Red => 0x00FF_0000,
            LedColour::Orange => 0x00FF_7300,
            LedColour::Yellow => 0x00FF_FB00,
            LedColour::Green => 0x000D_FF00,
            LedColour::Blue => 0x000D_00FF,
            LedColour::Violet => 0x009D_00FF,
            LedColour::Neutral => 0x00FF_FFFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn utterance(animation: SpeechAnimation) -> Utterance {
        Utterance {
            text: "Hello".to_string(),
            volume: 200,
            pitch: 100,
            speed: 80,
            animation,
        }
    }

    #[test]
    fn plain_speech_has_no_tag() {
        let mut rng = StdRng::seed_from_u64(7);
        let (markup, animated) = utterance(SpeechAnimation::None).render(&mut rng);
        assert_eq!(markup, r"\vol=200\\vct=100\\rspd=80\Hello");
        assert!(!animated);
    }

    #[test]
    fn default_animation_uses_animated_speech_without_tag() {
        let mut rng = StdRng::seed_from_u64(7);
        let (markup, animated) = utterance(SpeechAnimation::Default).render(&mut rng);
        assert!(markup.starts_with(r"\vol="));
        assert!(animated);
    }

    #[test]
    fn mood_tag_is_drawn_from_the_mood_list() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let (markup, animated) =
                utterance(SpeechAnimation::Mood(Mood::Bowing)).render(&mut rng);
            assert!(animated);
            assert!(
                Mood::Bowing
                    .animations()
                    .iter()
                    .any(|path| markup.starts_with(&format!("^start(animations/Stand/{path})")))
            );
        }
    }

    #[test]
    fn every_mood_has_animations() {
        for mood in [
            Mood::Thinking,
            Mood::Angry,
            Mood::Sad,
            Mood::Fearful,
            Mood::Laughing,
            Mood::Happy,
            Mood::Bowing,
            Mood::Waving,
            Mood::ShowingTablet,
        ] {
            assert!(!mood.animations().is_empty(), "{mood:?}");
        }
    }

    #[test]
    fn colour_codes() {
        assert_eq!(LedColour::Red.code(), 0x00FF0000);
        assert_eq!(LedColour::Neutral.code(), 0x00FFFFFF);
    }
}
