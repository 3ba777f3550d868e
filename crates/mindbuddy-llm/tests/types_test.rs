use mindbuddy_llm::{
    GenerationOptions, GenerationRequest, HarmBlockThreshold, HarmCategory, SafetySetting,
};

#[test]
fn test_generation_request_creation() {
    let request = GenerationRequest::new("Hello");

    assert_eq!(request.prompt, "Hello");
    assert_eq!(request.options, GenerationOptions::default());
}

#[test]
fn test_generation_options_builder() {
    let options = GenerationOptions::new()
        .temperature(0.9)
        .top_k(40)
        .top_p(0.95)
        .max_output_tokens(200);

    assert_eq!(options.temperature, Some(0.9));
    assert_eq!(options.top_k, Some(40));
    assert_eq!(options.top_p, Some(0.95));
    assert_eq!(options.max_output_tokens, Some(200));
    assert!(options.safety_settings.is_empty());
}

#[test]
fn test_uniform_safety_settings() {
    let settings = SafetySetting::uniform(HarmBlockThreshold::BlockOnlyHigh);

    assert_eq!(settings.len(), HarmCategory::ALL.len());
    assert!(settings
        .iter()
        .all(|s| s.threshold == HarmBlockThreshold::BlockOnlyHigh));
}

#[test]
fn test_threshold_wire_names() {
    let value = serde_json::to_value(HarmBlockThreshold::BlockNone).unwrap();
    assert_eq!(value, "BLOCK_NONE");

    let parsed: HarmBlockThreshold = serde_json::from_str("\"BLOCK_LOW_AND_ABOVE\"").unwrap();
    assert_eq!(parsed, HarmBlockThreshold::BlockLowAndAbove);
}
