use agentloop::catalog::{ArgValue, ArgumentMap, ToolCatalog, CONVERT_CURRENCY_TOOL, HELLO_TOOL};

#[test]
fn catalog_order_is_stable_and_read_only() {
    let catalog = ToolCatalog::builtin();
    let names: Vec<&str> = catalog.all().iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(names, vec![HELLO_TOOL, CONVERT_CURRENCY_TOOL]);

    let again = ToolCatalog::builtin();
    let names_again: Vec<&str> = again.all().iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(names, names_again);
}

#[test]
fn find_resolves_known_tools_and_rejects_unknown_names() {
    let catalog = ToolCatalog::builtin();
    assert_eq!(
        catalog.find(HELLO_TOOL).expect("hello").description,
        "Greets the given name quickly."
    );
    assert!(catalog.find("").is_none());
    assert!(catalog.find("HELLO").is_none());
    assert!(catalog.find("delete-everything").is_none());
}

#[test]
fn tool_parameters_keep_declared_order() {
    let catalog = ToolCatalog::builtin();
    let currency = catalog.find(CONVERT_CURRENCY_TOOL).expect("currency");
    let order: Vec<&str> = currency
        .parameters
        .iter()
        .map(|param| param.name.as_str())
        .collect();
    assert_eq!(order, vec!["from", "to", "amount"]);
    assert!(currency.parameter("amount").is_some());
    assert!(currency.parameter("rate").is_none());
}

#[test]
fn argument_map_round_trips_every_scalar_shape() {
    let mut args = ArgumentMap::new();
    args.insert("name".to_string(), ArgValue::Text("Polly".to_string()));
    args.insert("amount".to_string(), ArgValue::Number(25.0));
    args.insert("rate".to_string(), ArgValue::Number(0.925));
    args.insert("verbose".to_string(), ArgValue::Bool(true));
    args.insert("dry_run".to_string(), ArgValue::Bool(false));

    let wire = serde_json::to_string(&args).expect("encode");
    let decoded: ArgumentMap = serde_json::from_str(&wire).expect("decode");
    assert_eq!(decoded, args);
}

#[test]
fn numeric_text_round_trips_as_text_not_number() {
    let mut args = ArgumentMap::new();
    args.insert("code".to_string(), ArgValue::Text("007".to_string()));

    let wire = serde_json::to_string(&args).expect("encode");
    let decoded: ArgumentMap = serde_json::from_str(&wire).expect("decode");
    assert_eq!(
        decoded.get("code"),
        Some(&ArgValue::Text("007".to_string()))
    );
}
