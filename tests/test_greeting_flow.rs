use divine_greetings::api::PromptRequest;
use divine_greetings::client::GreetingClient;
use divine_greetings::config::{
    APP_ENV, AppConfig, GEMINI_API_KEY, HUGGING_FACE_API_KEY, setup_logging,
};
use divine_greetings::greeting::{
    GreetingForm, Mood, SelectionError, TimeOfDay, Tradition, build_prompt,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_walk_through_the_steps() {
    let mut form = GreetingForm::default();
    assert!(!form.deity_step_unlocked());
    assert!(form.available_deities().is_empty());
    assert_eq!(form.set_deity("ganesha"), Err(SelectionError::NoTradition));

    form.set_time_of_day(TimeOfDay::Night);
    form.set_tradition(Tradition::Sikh);
    assert!(form.deity_step_unlocked());
    assert_eq!(form.available_deities().len(), 4);
    form.set_deity("waheguru").expect("sikh deity");

    // switching tradition drops the deity
    form.set_tradition(Tradition::Christian);
    assert!(form.deity().is_none());
    assert!(form.set_deity("waheguru").is_err());
    form.set_deity("trinity").expect("christian deity");

    assert!(!form.can_generate());
    assert_eq!(
        form.selection().expect_err("mood missing").to_string(),
        "Please fill all required fields! Missing: message mood"
    );

    form.set_mood(Mood::Grateful);
    form.set_custom_message("   ");
    assert!(form.can_generate());

    let selection = form.selection().expect("complete");
    assert!(selection.custom_message.is_none());

    let prompt = build_prompt(&selection);
    assert!(prompt.contains("Good Night"));
    assert!(prompt.contains("Holy Trinity"));
    assert!(prompt.contains("grateful"));
    assert!(!prompt.contains("Include this message"));
}

#[test]
fn test_page_choices_replay_in_order() {
    let choices = PromptRequest {
        time_of_day: "morning".to_string(),
        religion: "muslim".to_string(),
        deity: "general".to_string(),
        quote_type: "hopeful".to_string(),
        custom_message: " Eid Mubarak ".to_string(),
    };
    let selection = GreetingForm::from_choices(&choices)
        .and_then(|form| form.selection())
        .expect("complete");
    assert_eq!(selection.deity.label, "Islamic Blessing");
    assert_eq!(selection.custom_message.as_deref(), Some("Eid Mubarak"));
}

#[tokio::test]
async fn test_client_round_trip() {
    let _ = setup_logging(true);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Content generated successfully",
            "results": [
                {"type": "image", "content": "/generated/generated-1-abcdefghijkl.png", "base64": "aGVsbG8="}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = GreetingForm::default();
    form.set_time_of_day(TimeOfDay::Morning);
    form.set_tradition(Tradition::Hindu);
    form.set_deity("hanuman").expect("deity");
    form.set_mood(Mood::Motivational);
    let selection = form.selection().expect("complete");

    let client = GreetingClient::new(&server.uri()).expect("client");
    let outcome = client.generate(&selection).await.expect("generate");
    assert!(!outcome.shows_note());

    let dir = tempfile::tempdir().expect("tempdir");
    let saved = client
        .download(&outcome, selection.time_of_day, dir.path())
        .await
        .expect("download")
        .expect("saved");
    assert_eq!(std::fs::read(saved).expect("read"), b"hello");
}

#[test]
fn test_morning_ganesha_prompt() {
    let mut form = GreetingForm::default();
    form.set_time_of_day(TimeOfDay::Morning);
    form.set_tradition(Tradition::Hindu);
    form.set_mood(Mood::Motivational);
    assert!(!form.can_generate(), "no deity yet");

    form.set_deity("ganesha").expect("deity");
    assert!(form.can_generate());

    let prompt = build_prompt(&form.selection().expect("complete"));
    assert!(prompt.contains("Good Morning"));
    assert!(prompt.contains("Lord Ganesha"));
    assert!(prompt.contains("om symbols"));
    assert!(prompt.contains("motivational"));
}

#[test]
fn test_config_from_lookup() {
    let vars = [
        (GEMINI_API_KEY, "gem"),
        (HUGGING_FACE_API_KEY, "hf_token"),
        (APP_ENV, "production"),
    ];
    let lookup = |name: &str| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    };
    let config = AppConfig::from_lookup(lookup).expect("config");
    assert!(config.is_production());
    assert_eq!(config.gemini_api_key(), "gem");

    let err = AppConfig::from_lookup(|_| None).expect_err("nothing set");
    let message = err.to_string();
    assert!(message.contains(GEMINI_API_KEY));
    assert!(message.contains(HUGGING_FACE_API_KEY));
}
