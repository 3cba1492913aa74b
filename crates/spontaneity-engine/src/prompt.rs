//! Prompt template for recommendation generation

/// Instructions placed before the user's request
const INSTRUCTIONS: &str = "\
You recommend one spontaneous, real-world activity based on the user's request.
Pick something that can be done within the stated time window near the stated location.
Never include personal contact details, private addresses or invitations to meet strangers.";

/// Expected output shape
const OUTPUT_FORMAT: &str = r#"Respond with a single JSON object and nothing else:
{
  "title": "short name of the activity",
  "description": "one or two sentences describing the activity",
  "location": "neighbourhood or venue name",
  "duration": "estimated time needed",
  "category": "outdoors | food | culture | nightlife | wellness | other",
  "ugc_sources": ["optional community sources that influenced the pick"],
  "activity_timestamp": "optional RFC 3339 time of the most recent known activity"
}"#;

/// Build the complete generation prompt around the raw user input
pub fn build_prompt(user_input: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");

    prompt.push_str("User request:\n");
    prompt.push_str("---\n");
    prompt.push_str(user_input.trim());
    prompt.push_str("\n---\n\n");

    prompt.push_str(OUTPUT_FORMAT);

    prompt
}
