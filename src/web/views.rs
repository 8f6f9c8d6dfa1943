use super::prelude::*;
use crate::api::{PromptRequest, PromptResponse};
use crate::greeting::{GreetingForm, Mood, TimeOfDay, Tradition, build_prompt};

#[derive(Clone, Debug)]
pub(crate) struct ChoiceView {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) emoji: &'static str,
}

#[derive(Clone, Debug)]
pub(crate) struct DeityView {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) emoji: &'static str,
    pub(crate) description: &'static str,
}

#[derive(Clone, Debug)]
pub(crate) struct TraditionView {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) emoji: &'static str,
    pub(crate) deities: Vec<DeityView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "greetings.html")]
pub(crate) struct GreetingTemplate {
    pub(crate) times: Vec<ChoiceView>,
    pub(crate) traditions: Vec<TraditionView>,
    pub(crate) moods: Vec<ChoiceView>,
    pub(crate) template_path: String,
}

impl GreetingTemplate {
    fn new(template_path: &str) -> Self {
        let times = TimeOfDay::ALL
            .into_iter()
            .map(|time| ChoiceView {
                id: time.id(),
                label: time.label(),
                emoji: time.emoji(),
            })
            .collect();
        let traditions = Tradition::ALL
            .into_iter()
            .map(|tradition| TraditionView {
                id: tradition.id(),
                label: tradition.label(),
                emoji: tradition.emoji(),
                deities: tradition
                    .deities()
                    .iter()
                    .map(|deity| DeityView {
                        id: deity.id,
                        label: deity.label,
                        emoji: deity.emoji,
                        description: deity.description,
                    })
                    .collect(),
            })
            .collect();
        let moods = Mood::ALL
            .into_iter()
            .map(|mood| ChoiceView {
                id: mood.id(),
                label: mood.label(),
                emoji: mood.emoji(),
            })
            .collect();

        Self {
            times,
            traditions,
            moods,
            template_path: template_path.to_string(),
        }
    }
}

/// handles the / GET
pub(crate) async fn greeting_page(State(state): State<AppState>) -> GreetingTemplate {
    GreetingTemplate::new(&state.paths.template_path)
}

/// Turns the page's raw choices into the generation prompt.
pub(crate) async fn prompt_handler(body: Bytes) -> Result<Json<PromptResponse>, GreetingError> {
    let request: PromptRequest =
        serde_json::from_slice(&body).map_err(|_| GreetingError::InvalidJson)?;
    let selection = GreetingForm::from_choices(&request)?.selection()?;
    Ok(Json(PromptResponse {
        prompt: build_prompt(&selection),
    }))
}
