use super::*;
use tablerank_core::Restaurant;
use tablerank_ranking::{RankInput, Ranker, WeightsConfig};

#[test]
fn parses_rank_command_with_weights() {
    let cli = Cli::try_parse_from([
        "tablerank",
        "rank",
        "--input",
        "field.json",
        "--weights",
        "weights.yaml",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Rank { ref input, weights: Some(ref w) })
            if input == &PathBuf::from("field.json") && w == &PathBuf::from("weights.yaml")
    ));
}

#[test]
fn rank_requires_input() {
    assert!(Cli::try_parse_from(["tablerank", "rank"]).is_err());
}

#[test]
fn search_limit_defaults_to_ten() {
    let cli = Cli::try_parse_from(["tablerank", "search", "pizza"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref query, limit: 10 }) if query == "pizza"
    ));
}

#[test]
fn search_limit_out_of_range_is_rejected() {
    assert!(Cli::try_parse_from(["tablerank", "search", "pizza", "--limit", "21"]).is_err());
    assert!(Cli::try_parse_from(["tablerank", "search", "pizza", "--limit", "0"]).is_err());
}

#[test]
fn parses_audit_command() {
    let cli = Cli::try_parse_from(["tablerank", "audit", "ChIJ123"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Audit { ref place_id }) if place_id == "ChIJ123"
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tablerank"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn rank_file_needs_subject() {
    assert!(rank::parse_rank_file(r#"{"competitors": []}"#).is_err());
    let file = rank::parse_rank_file(r#"{"subject": {"name": "Solo"}}"#).expect("valid file");
    assert!(file.competitors.is_empty());
    assert_eq!(file.previous_rank, None);
}

#[test]
fn rendered_outcome_marks_subject_and_change() {
    let subject = RankInput {
        name: Some("Trattoria".to_string()),
        tags: vec!["italian_restaurant".to_string()],
        rating: Some(4.6),
        total_reviews: Some(120.0),
        ..RankInput::default()
    };
    let rival = RankInput {
        name: Some("Pasta Bar".to_string()),
        tags: vec!["italian_restaurant".to_string()],
        rating: Some(4.0),
        total_reviews: Some(30.0),
        distance_km: Some(1.0),
        ..RankInput::default()
    };
    let outcome = Ranker::new(WeightsConfig::default()).rank(&subject, &[rival]);

    let text = rank::render_outcome(&outcome, Some(2));
    assert!(text.starts_with("Rank: 1 of 2\n"));
    assert!(text.contains("Change: Improved by 1 position"));
    let rows: Vec<&str> = text.lines().skip_while(|l| !l.starts_with('#')).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].ends_with("Trattoria *"));
    assert!(rows[2].ends_with("Pasta Bar"));
}

#[test]
fn rendered_search_lists_place_ids() {
    assert_eq!(live::render_search(&[]), "no restaurants found\n");

    let mut r = Restaurant::new("p1", "Trattoria");
    r.rating = 4.5;
    r.total_ratings = 80;
    let text = live::render_search(&[r]);
    assert!(text.contains("Trattoria"));
    assert!(text.contains("id: p1"));
}
