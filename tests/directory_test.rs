use std::io::Write;

use modelgate::directory::{load_file, parse_csv, ModelDescriptor};
use modelgate::{ModelDirectory, ModelEntry, ProviderFamily};

#[test]
fn seed_entries_resolve_by_canonical_id() {
    let directory = ModelDirectory::with_embedded_seed();

    let sonnet = directory.resolve("anthropic.claude-3-sonnet-20240229-v1:0");
    assert_eq!(sonnet.max_input_tokens, 200_000);
    assert_eq!(sonnet.family, ProviderFamily::AnthropicMessages);

    let lite = directory.resolve("amazon.titan-text-lite-v1");
    assert_eq!(lite.max_input_tokens, 4_000);
    assert_eq!(lite.family, ProviderFamily::TitanText);
    assert_eq!(lite.invoke_target(), "amazon.titan-text-lite-v1");
}

#[test]
fn alias_and_canonical_resolve_to_the_same_entry() {
    let mut directory = ModelDirectory::new();
    directory.insert(
        ModelEntry::new("openai.gpt-oss-20b-1:0", ProviderFamily::OpenAiChat)
            .with_invoke_target("us.openai.gpt-oss-20b-1:0"),
    );

    assert_eq!(
        directory.resolve("openai.gpt-oss-20b-1:0"),
        directory.resolve("us.openai.gpt-oss-20b-1:0"),
    );
    assert_eq!(
        directory.resolve("openai.gpt-oss-20b-1:0").invoke_target(),
        "us.openai.gpt-oss-20b-1:0"
    );
}

#[test]
fn invoke_target_defaults_to_canonical_id_when_no_alias() {
    let entry = ModelEntry::new("cohere.command-text-v14", ProviderFamily::TextCompletion);
    assert_eq!(entry.invoke_target(), "cohere.command-text-v14");
}

#[test]
fn missing_model_synthesizes_an_entry_instead_of_failing() {
    let directory = ModelDirectory::new();
    let entry = directory.resolve("us.anthropic.claude-sonnet-4");
    assert_eq!(entry.family, ProviderFamily::AnthropicMessages);
    assert_eq!(entry.max_input_tokens, 200_000);
    assert_eq!(entry.invoke_target(), "us.anthropic.claude-sonnet-4");
}

#[test]
fn descriptor_file_round_trips_through_the_directory() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"modelId": "anthropic.claude-v2", "aliasId": "us.anthropic.claude-v2"}},
            {{"modelId": "mistral.mixtral-8x7b", "modelName": "Mixtral 8x7B"}}
        ]"#
    )
    .unwrap();

    let records = load_file(file.path()).unwrap();
    let directory = ModelDirectory::from_descriptors(records);

    // Seeded entry keeps its verified limit, gains the alias.
    let claude = directory.resolve("us.anthropic.claude-v2");
    assert_eq!(claude.canonical_id, "anthropic.claude-v2");
    assert_eq!(claude.max_input_tokens, 100_000);

    // Unseeded entry is synthesized from its id.
    let mixtral = directory.resolve("mistral.mixtral-8x7b");
    assert_eq!(mixtral.display_name, "Mixtral 8x7B");
    assert_eq!(mixtral.family, ProviderFamily::Unknown);
}

#[test]
fn unreadable_descriptor_file_is_an_error_for_the_caller_only() {
    // load_file surfaces the error; the gateway builder degrades it to a
    // warning and an empty descriptor list.
    assert!(load_file("/definitely/not/here.json").is_err());
    let gateway = modelgate::ModelGate::builder()
        .endpoint("http://localhost:1")
        .descriptor_path("/definitely/not/here.json")
        .build();
    assert!(gateway.is_ok());
    // The embedded seed still backs the directory.
    assert_eq!(gateway.unwrap().directory().len(), 5);
}

#[test]
fn csv_descriptors_build_a_directory() {
    let records = parse_csv("anthropic.claude-v2, openai.gpt-oss-20b-1:0");
    let directory = ModelDirectory::from_descriptors(records);
    assert_eq!(
        directory.resolve("openai.gpt-oss-20b-1:0").family,
        ProviderFamily::OpenAiChat
    );
}

#[test]
fn descriptor_ordering_is_last_writer_wins() {
    let directory = ModelDirectory::from_descriptors([
        ModelDescriptor {
            model_id: "foo.model".into(),
            alias_id: None,
            model_name: Some("First".into()),
            provider_name: None,
        },
        ModelDescriptor {
            model_id: "foo.model".into(),
            alias_id: None,
            model_name: Some("Second".into()),
            provider_name: None,
        },
    ]);
    assert_eq!(directory.resolve("foo.model").display_name, "Second");
}
