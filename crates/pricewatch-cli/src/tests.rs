use chrono::{TimeZone, Utc};

use pricewatch_core::{Competitor, Plan, PricingData, ScrapeOutcome, ScrapeResult};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pricewatch-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_list_command() {
    let cli = Cli::try_parse_from(["pricewatch-cli", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List)));
}

#[test]
fn scrape_defaults_to_all_competitors() {
    let cli = Cli::try_parse_from(["pricewatch-cli", "scrape"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            competitor: None,
            json: false
        })
    ));
}

#[test]
fn scrape_with_competitor_and_json() {
    let cli =
        Cli::try_parse_from(["pricewatch-cli", "scrape", "--competitor", "ledgy", "--json"]).unwrap();
    match cli.command {
        Some(Commands::Scrape { competitor, json }) => {
            assert_eq!(competitor.as_deref(), Some("ledgy"));
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn competitor_flag_requires_value() {
    assert!(Cli::try_parse_from(["pricewatch-cli", "scrape", "--competitor"]).is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["pricewatch-cli", "collect"]).is_err());
}

fn sample_data() -> PricingData {
    PricingData {
        plans: vec![
            Plan {
                name: "Growth".to_string(),
                price: "€75/month".to_string(),
                description: String::new(),
                features: Vec::new(),
            },
            Plan {
                name: "Scale".to_string(),
                price: "€250/month".to_string(),
                description: String::new(),
                features: Vec::new(),
            },
        ],
        currency: "EUR".to_string(),
        billing_period: "monthly".to_string(),
        raw_text_extract: String::new(),
        pricing_mentions: None,
    }
}

#[test]
fn outcome_line_lists_plan_names() {
    let line = scrape::outcome_line("ledgy", &ScrapeOutcome::success(sample_data()));
    assert!(line.starts_with("ok"), "got: {line}");
    assert!(line.ends_with("Growth, Scale"), "got: {line}");
}

#[test]
fn outcome_line_shows_error() {
    let outcome = ScrapeOutcome::failure("Unknown competitor: acme".to_string());
    let line = scrape::outcome_line("acme", &outcome);
    assert!(line.starts_with("failed"), "got: {line}");
    assert!(line.ends_with("Unknown competitor: acme"), "got: {line}");
}

#[test]
fn summary_counts_successes() {
    let outcomes = vec![
        ("ledgy".to_string(), ScrapeOutcome::success(sample_data())),
        ("nvr".to_string(), ScrapeOutcome::failure("boom".to_string())),
        ("carta".to_string(), ScrapeOutcome::success(sample_data())),
    ];
    assert_eq!(
        scrape::summary_line(&outcomes),
        "Updated 2 out of 3 competitors"
    );
}

#[test]
fn json_export_keeps_given_order() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let results = vec![
        ScrapeResult::succeeded(
            &Competitor::new("mantle", "Mantle", "https://mantle.test/pricing"),
            sample_data(),
            at,
        ),
        ScrapeResult::failed(
            &Competitor::new("carta", "Carta", "https://carta.test/pricing"),
            "boom".to_string(),
            at,
        ),
    ];

    let json = scrape::render_json(&results).unwrap();
    let mantle = json.find("\"mantle\": {").expect("mantle entry");
    let carta = json.find("\"carta\": {").expect("carta entry");
    assert!(mantle < carta, "got: {json}");

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["carta"]["error"], "boom");
    assert_eq!(parsed["mantle"]["pricing_data"]["currency"], "EUR");
}

#[test]
fn json_export_of_nothing_is_empty_object() {
    assert_eq!(scrape::render_json(&[]).unwrap(), "{}");
}
