use agentloop::catalog::{ArgValue, ToolCatalog, CONVERT_CURRENCY_TOOL, HELLO_TOOL};
use agentloop::reasoner::{HeuristicReasoner, Reasoner, ToolChoice};
use std::time::{Duration, Instant};

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

#[test]
fn greeting_is_the_default_choice() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    assert_eq!(
        reasoner.decide("hello Polly", catalog.all(), deadline()),
        ToolChoice::Tool(HELLO_TOOL.to_string())
    );
    assert_eq!(
        reasoner.decide("good morning everyone", catalog.all(), deadline()),
        ToolChoice::Tool(HELLO_TOOL.to_string())
    );
}

#[test]
fn convert_keyword_selects_the_currency_tool() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    assert_eq!(
        reasoner.decide("convert 25 usd to eur", catalog.all(), deadline()),
        ToolChoice::Tool(CONVERT_CURRENCY_TOOL.to_string())
    );
    assert_eq!(
        reasoner.decide("CONVERT 9 gbp to jpy", catalog.all(), deadline()),
        ToolChoice::Tool(CONVERT_CURRENCY_TOOL.to_string())
    );
}

#[test]
fn currency_code_with_amount_selects_the_currency_tool() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    assert_eq!(
        reasoner.decide("100 usd in eur please", catalog.all(), deadline()),
        ToolChoice::Tool(CONVERT_CURRENCY_TOOL.to_string())
    );
    // A code-shaped token without any number stays a greeting.
    assert_eq!(
        reasoner.decide("hey you", catalog.all(), deadline()),
        ToolChoice::Tool(HELLO_TOOL.to_string())
    );
}

#[test]
fn decide_degrades_to_the_sentinel_when_the_tool_list_lacks_the_choice() {
    let reasoner = HeuristicReasoner;
    assert_eq!(
        reasoner.decide("hello Polly", &[], deadline()),
        ToolChoice::NoSuitableTool
    );
}

#[test]
fn greeting_name_is_the_last_token_stripped_of_punctuation() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    let hello = catalog.find(HELLO_TOOL).expect("hello");

    let args = reasoner.fill("hello Polly", hello, deadline());
    assert_eq!(args.get("name"), Some(&ArgValue::Text("Polly".to_string())));

    let args = reasoner.fill("say hi to Marta!", hello, deadline());
    assert_eq!(args.get("name"), Some(&ArgValue::Text("Marta".to_string())));

    let args = reasoner.fill("...", hello, deadline());
    assert_eq!(args.get("name"), Some(&ArgValue::Text("there".to_string())));
}

#[test]
fn currency_fill_extracts_amount_and_codes() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    let currency = catalog.find(CONVERT_CURRENCY_TOOL).expect("currency");

    let args = reasoner.fill("convert 25 usd to eur", currency, deadline());
    assert_eq!(args.get("amount"), Some(&ArgValue::Number(25.0)));
    assert_eq!(args.get("from"), Some(&ArgValue::Text("USD".to_string())));
    assert_eq!(args.get("to"), Some(&ArgValue::Text("EUR".to_string())));
}

#[test]
fn currency_fill_defaults_codes_and_may_omit_the_amount() {
    let catalog = ToolCatalog::builtin();
    let reasoner = HeuristicReasoner;
    let currency = catalog.find(CONVERT_CURRENCY_TOOL).expect("currency");

    // Best effort only: validation is the guardrail's job.
    let args = reasoner.fill("convert something", currency, deadline());
    assert!(args.get("amount").is_none());
    assert_eq!(args.get("from"), Some(&ArgValue::Text("USD".to_string())));
    assert_eq!(args.get("to"), Some(&ArgValue::Text("EUR".to_string())));
}
