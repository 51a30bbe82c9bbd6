//! Prompt and response schema for currency insights.

use serde_json::{json, Value};

use crate::insight::InsightRequest;

/// Render the prompt for a request. Only the primary quote is named.
pub fn render_prompt(request: &InsightRequest) -> String {
    let pair = request.primary_pair();
    format!(
        "You are an AI assistant providing insights and tips for currency exchange.\n\
         User is interested in the exchange between Base Currency: {base} and Quote Currency: {quote}.\n\
         \n\
         Provide general insights and tips for currency exchange between these currencies.\n\
         \n\
         Always include a disclaimer that the observations are probabilistic and not financial advice.\n\
         \n\
         Respond with a JSON object with the string fields \"insights\" and \"disclaimer\". \
         Do not include \"trendReasoning\" or \"predictedTrend\".",
        base = pair.base,
        quote = pair.quote,
    )
}

/// JSON schema the generator is asked to follow.
///
/// The two optional trend fields are declared so the generator's output still
/// validates if it emits them.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "insights": {
                "type": "STRING",
                "description": "General insights and tips regarding currency exchange for the given pair."
            },
            "trendReasoning": {
                "type": "STRING",
                "description": "Brief summary of key factors influencing the primary pair this week."
            },
            "predictedTrend": {
                "type": "STRING",
                "description": "Predicted general trend for the primary pair for the next month."
            },
            "disclaimer": {
                "type": "STRING",
                "description": "Disclaimer that the observations are probabilistic and not financial advice."
            }
        },
        "required": ["insights", "disclaimer"]
    })
}
