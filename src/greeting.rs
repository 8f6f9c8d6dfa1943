//! The greeting catalog, the step-by-step form and the prompt it builds.
//!
//! The page walks through five steps: time of day, faith tradition, deity or
//! figure (only once a tradition is picked), message mood and an optional
//! personal message. [`GreetingForm`] tracks those choices and
//! [`build_prompt`] turns a complete [`GreetingSelection`] into the text sent
//! to the image service.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::api::PromptRequest;

/// Errors from picking options that don't exist or don't fit together
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Not `morning` or `night`
    #[error("Unknown time of day: {0}")]
    UnknownTimeOfDay(String),
    /// Not one of the four traditions
    #[error("Unknown faith tradition: {0}")]
    UnknownTradition(String),
    /// The deity id isn't part of the chosen tradition
    #[error("Unknown deity {deity} for tradition {tradition}")]
    UnknownDeity {
        /// Tradition id
        tradition: String,
        /// Deity id
        deity: String,
    },
    /// A deity was picked before a tradition
    #[error("Choose a faith tradition before a deity")]
    NoTradition,
    /// Not one of the moods
    #[error("Unknown message mood: {0}")]
    UnknownMood(String),
    /// One of the four required steps hasn't been done
    #[error("Please fill all required fields! Missing: {0}")]
    Incomplete(&'static str),
}

/// Step 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Sunrise greetings
    Morning,
    /// Moonlight greetings
    Night,
}

impl TimeOfDay {
    /// In display order
    pub const ALL: [TimeOfDay; 2] = [TimeOfDay::Morning, TimeOfDay::Night];

    /// Form value
    pub fn id(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Night => "night",
        }
    }

    /// The greeting itself, which also heads the image
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Good Morning",
            TimeOfDay::Night => "Good Night",
        }
    }

    /// Button decoration
    pub fn emoji(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "🌅",
            TimeOfDay::Night => "🌙",
        }
    }

    /// Scene vocabulary for the prompt
    pub fn scene(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "sunrise, dawn, morning light, fresh start, new beginning",
            TimeOfDay::Night => {
                "moonlight, starry sky, peaceful night, calm evening, serene darkness"
            }
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|time| time.id() == s)
            .ok_or_else(|| SelectionError::UnknownTimeOfDay(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A deity or figure the greeting is focused on
#[derive(Debug, PartialEq, Eq)]
pub struct Deity {
    /// Form value, unique within its tradition
    pub id: &'static str,
    /// Display name, used in the prompt
    pub label: &'static str,
    /// Button decoration
    pub emoji: &'static str,
    /// One-line description under the button
    pub description: &'static str,
}

const fn deity(
    id: &'static str,
    label: &'static str,
    emoji: &'static str,
    description: &'static str,
) -> Deity {
    Deity {
        id,
        label,
        emoji,
        description,
    }
}

const HINDU_DEITIES: [Deity; 8] = [
    deity("ganesha", "Lord Ganesha", "🐘", "Remover of obstacles"),
    deity("krishna", "Lord Krishna", "🦚", "Divine love & wisdom"),
    deity("shiva", "Lord Shiva", "🔱", "Destroyer of evil"),
    deity("lakshmi", "Goddess Lakshmi", "🪷", "Wealth & prosperity"),
    deity("durga", "Goddess Durga", "🦁", "Divine strength"),
    deity("rama", "Lord Rama", "🏹", "Righteousness & virtue"),
    deity("hanuman", "Lord Hanuman", "🙏", "Strength & devotion"),
    deity("saraswati", "Goddess Saraswati", "🎵", "Knowledge & wisdom"),
];

const MUSLIM_DEITIES: [Deity; 3] = [
    deity("allah", "Allah", "🌙", "The Most Merciful"),
    deity("prophet", "Prophet Muhammad", "🕌", "The Final Messenger"),
    deity("general", "Islamic Blessing", "☪️", "Peace & guidance"),
];

const CHRISTIAN_DEITIES: [Deity; 4] = [
    deity("jesus", "Jesus Christ", "✝️", "Our Lord & Savior"),
    deity("mary", "Virgin Mary", "👼", "Mother of Jesus"),
    deity("god", "Heavenly Father", "☁️", "Our Creator"),
    deity("trinity", "Holy Trinity", "🙏", "Father, Son, Holy Spirit"),
];

const SIKH_DEITIES: [Deity; 4] = [
    deity("waheguru", "Waheguru", "☬", "The Wonderful Lord"),
    deity("guru_nanak", "Guru Nanak", "🙏", "The First Guru"),
    deity("guru_gobind", "Guru Gobind Singh", "⚔️", "The Tenth Guru"),
    deity("golden_temple", "Golden Temple", "🏛️", "Sacred sanctuary"),
];

/// Step 2
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    /// Sanatan Dharma
    Hindu,
    /// Islam
    Muslim,
    /// Christian
    Christian,
    /// Sikh
    Sikh,
}

impl Tradition {
    /// In display order
    pub const ALL: [Tradition; 4] = [
        Tradition::Hindu,
        Tradition::Muslim,
        Tradition::Christian,
        Tradition::Sikh,
    ];

    /// Form value
    pub fn id(self) -> &'static str {
        match self {
            Tradition::Hindu => "hindu",
            Tradition::Muslim => "muslim",
            Tradition::Christian => "christian",
            Tradition::Sikh => "sikh",
        }
    }

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            Tradition::Hindu => "Sanatan Dharma",
            Tradition::Muslim => "Islam",
            Tradition::Christian => "Christian",
            Tradition::Sikh => "Sikh",
        }
    }

    /// Button decoration
    pub fn emoji(self) -> &'static str {
        match self {
            Tradition::Hindu => "🕉️",
            Tradition::Muslim => "☪️",
            Tradition::Christian => "✝️",
            Tradition::Sikh => "☬",
        }
    }

    /// Art style phrase
    pub fn art_style(self) -> &'static str {
        match self {
            Tradition::Hindu => "traditional Indian/Hindu art style with lotus flowers, om symbols",
            Tradition::Muslim => "elegant Islamic art style with geometric patterns, calligraphy",
            Tradition::Christian => "serene Christian art style with crosses, doves, light rays",
            Tradition::Sikh => "Sikh art style with Khanda symbol, Gurmukhi script",
        }
    }

    /// Palette phrase
    pub fn color_scheme(self) -> &'static str {
        match self {
            Tradition::Hindu => "warm saffron, deep red, golden yellow, and vibrant orange",
            Tradition::Muslim => "emerald green, gold, deep blue, and white",
            Tradition::Christian => "heavenly blue, pure white, gold, and soft pastels",
            Tradition::Sikh => "royal blue, saffron orange, white, and gold",
        }
    }

    /// Border decoration phrase
    pub fn symbols(self) -> &'static str {
        match self {
            Tradition::Hindu => "om symbols, lotus flowers, diyas (oil lamps), geometric mandalas",
            Tradition::Muslim => {
                "geometric Islamic patterns, crescents, stars, beautiful Arabic calligraphy"
            }
            Tradition::Christian => "crosses, doves, light rays, olive branches, sacred hearts",
            Tradition::Sikh => "Khanda symbol, Gurmukhi script, swords, lotus flowers",
        }
    }

    /// Everyone the deity step offers for this tradition
    pub fn deities(self) -> &'static [Deity] {
        match self {
            Tradition::Hindu => &HINDU_DEITIES,
            Tradition::Muslim => &MUSLIM_DEITIES,
            Tradition::Christian => &CHRISTIAN_DEITIES,
            Tradition::Sikh => &SIKH_DEITIES,
        }
    }

    /// Looks up a deity by id within this tradition
    pub fn deity(self, id: &str) -> Option<&'static Deity> {
        self.deities().iter().find(|deity| deity.id == id)
    }
}

impl FromStr for Tradition {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tradition| tradition.id() == s)
            .ok_or_else(|| SelectionError::UnknownTradition(s.to_string()))
    }
}

/// Step 4
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// 💪
    Motivational,
    /// 🧘
    Peaceful,
    /// 🙏
    Grateful,
    /// ⭐
    Hopeful,
}

impl Mood {
    /// In display order
    pub const ALL: [Mood; 4] = [Mood::Motivational, Mood::Peaceful, Mood::Grateful, Mood::Hopeful];

    /// Form value
    pub fn id(self) -> &'static str {
        match self {
            Mood::Motivational => "motivational",
            Mood::Peaceful => "peaceful",
            Mood::Grateful => "grateful",
            Mood::Hopeful => "hopeful",
        }
    }

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            Mood::Motivational => "Motivational",
            Mood::Peaceful => "Peaceful",
            Mood::Grateful => "Grateful",
            Mood::Hopeful => "Hopeful",
        }
    }

    /// Button decoration
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Motivational => "💪",
            Mood::Peaceful => "🧘‍♀️",
            Mood::Grateful => "🙏",
            Mood::Hopeful => "⭐",
        }
    }
}

impl FromStr for Mood {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.id() == s)
            .ok_or_else(|| SelectionError::UnknownMood(s.to_string()))
    }
}

/// A complete set of choices, ready to become a prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingSelection {
    /// Step 1
    pub time_of_day: TimeOfDay,
    /// Step 2
    pub tradition: Tradition,
    /// Step 3, always one of `tradition.deities()`
    pub deity: &'static Deity,
    /// Step 4
    pub mood: Mood,
    /// Step 5, `None` when left blank
    pub custom_message: Option<String>,
}

impl GreetingSelection {
    /// Builds a selection from raw form ids, rejecting anything unknown.
    pub fn from_ids(
        time_of_day: &str,
        tradition: &str,
        deity: &str,
        mood: &str,
        custom_message: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let mut form = GreetingForm::default();
        form.set_time_of_day(time_of_day.parse()?);
        form.set_tradition(tradition.parse()?);
        form.set_deity(deity)?;
        form.set_mood(mood.parse()?);
        form.set_custom_message(custom_message.unwrap_or_default());
        form.selection()
    }
}

/// The greeting builder's state as the user works through the steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GreetingForm {
    time_of_day: Option<TimeOfDay>,
    tradition: Option<Tradition>,
    deity: Option<&'static Deity>,
    mood: Option<Mood>,
    custom_message: String,
}

impl GreetingForm {
    /// Replays the page's raw choices in step order, skipping blank ones.
    pub fn from_choices(choices: &PromptRequest) -> Result<Self, SelectionError> {
        let mut form = Self::default();
        if !choices.time_of_day.is_empty() {
            form.set_time_of_day(choices.time_of_day.parse()?);
        }
        if !choices.religion.is_empty() {
            form.set_tradition(choices.religion.parse()?);
        }
        if !choices.deity.is_empty() {
            form.set_deity(&choices.deity)?;
        }
        if !choices.quote_type.is_empty() {
            form.set_mood(choices.quote_type.parse()?);
        }
        form.set_custom_message(&choices.custom_message);
        Ok(form)
    }

    /// Step 1
    pub fn set_time_of_day(&mut self, time_of_day: TimeOfDay) {
        self.time_of_day = Some(time_of_day);
    }

    /// Step 2, changing the tradition forgets the deity
    pub fn set_tradition(&mut self, tradition: Tradition) {
        if self.tradition != Some(tradition) {
            self.deity = None;
        }
        self.tradition = Some(tradition);
    }

    /// Step 3, only valid once a tradition is picked
    pub fn set_deity(&mut self, id: &str) -> Result<(), SelectionError> {
        let tradition = self.tradition.ok_or(SelectionError::NoTradition)?;
        let deity = tradition
            .deity(id)
            .ok_or_else(|| SelectionError::UnknownDeity {
                tradition: tradition.id().to_string(),
                deity: id.to_string(),
            })?;
        self.deity = Some(deity);
        Ok(())
    }

    /// Step 4
    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = Some(mood);
    }

    /// Step 5
    pub fn set_custom_message(&mut self, message: &str) {
        self.custom_message = message.to_string();
    }

    /// Current deity, if any
    pub fn deity(&self) -> Option<&'static Deity> {
        self.deity
    }

    /// The deity step only shows once a tradition is chosen
    pub fn deity_step_unlocked(&self) -> bool {
        self.tradition.is_some()
    }

    /// What the deity step offers right now
    pub fn available_deities(&self) -> &'static [Deity] {
        self.tradition.map(Tradition::deities).unwrap_or_default()
    }

    /// The generate button is enabled once every required step is done
    pub fn can_generate(&self) -> bool {
        self.selection().is_ok()
    }

    /// The complete selection, or which required step is missing
    pub fn selection(&self) -> Result<GreetingSelection, SelectionError> {
        let time_of_day = self
            .time_of_day
            .ok_or(SelectionError::Incomplete("time of day"))?;
        let tradition = self
            .tradition
            .ok_or(SelectionError::Incomplete("faith tradition"))?;
        let deity = self
            .deity
            .ok_or(SelectionError::Incomplete("divine focus"))?;
        let mood = self
            .mood
            .ok_or(SelectionError::Incomplete("message mood"))?;
        let custom_message = Some(self.custom_message.trim())
            .filter(|message| !message.is_empty())
            .map(str::to_string);

        Ok(GreetingSelection {
            time_of_day,
            tradition,
            deity,
            mood,
            custom_message,
        })
    }
}

/// Assembles the image prompt for a complete selection.
pub fn build_prompt(selection: &GreetingSelection) -> String {
    let greeting = selection.time_of_day.label();
    let scene = selection.time_of_day.scene();
    let tradition = selection.tradition.label();
    let art_style = selection.tradition.art_style();
    let colors = selection.tradition.color_scheme();
    let symbols = selection.tradition.symbols();
    let deity = selection.deity.label;
    let mood = selection.mood.label().to_lowercase();
    let custom = selection
        .custom_message
        .as_deref()
        .map(|message| format!(" Include this message: \"{message}\"."))
        .unwrap_or_default();

    format!(
        r#"Create a beautiful WhatsApp {greeting} greeting image with the following specifications:

RELIGIOUS CONTEXT: {tradition} tradition

VISUAL ELEMENTS:
- {scene} with warm, divine lighting
- Beautiful {deity} representation in {art_style}
- Elegant typography for "{greeting}" text
- Decorative borders with {symbols}
- Rich colors: {colors}
- Professional WhatsApp-friendly dimensions (square format)
- Respectful and authentic religious imagery

MOOD & ATMOSPHERE:
- {mood} and uplifting tone
- Spiritual and divine ambiance
- Family-friendly and heartwarming
- Perfect for sharing with loved ones
- Culturally respectful and authentic

TEXT ELEMENTS:
- "{greeting}" as main heading in beautiful calligraphy
- A {mood} quote/blessing related to {deity}
- Appropriate religious greeting (e.g., "Om Namah Shivaya", "Assalamu alaykum", "God Bless", "Waheguru")
{custom}

STYLE:
- Traditional {tradition} aesthetic meets modern design
- Instagram/WhatsApp optimized
- High quality, crisp details
- Warm and inviting color palette
- Professional yet personal feel
- Culturally authentic and respectful

Make it absolutely stunning, respectful, and shareable!"#
    )
}
