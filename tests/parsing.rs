use std::fs;
use std::path::PathBuf;

use ap_leaderboard::leaderboard_fetch::parse_leaderboard_json;
use ap_leaderboard::names::clean_display_name;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_leaderboard_fixture() {
    let raw = read_fixture("leaderboard_page.json");
    let rows = parse_leaderboard_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].ranking, 1);
    assert_eq!(rows[0].uuid, "uuid-steve");
    assert_eq!(rows[0].value, 41250.0);
    assert_eq!(rows[5].tagged_name, "§b[MVP§e+§b] Grumm");
}

#[test]
fn fixture_names_clean_up() {
    let raw = read_fixture("leaderboard_page.json");
    let names = parse_leaderboard_json(&raw)
        .expect("fixture should parse")
        .iter()
        .map(|p| clean_display_name(&p.tagged_name))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Steve", "Alex", "Notch", "jeb_", "Dinnerbone", "Grumm"]
    );
}

#[test]
fn empty_data_array() {
    let rows = parse_leaderboard_json(r#"{"count":0,"data":[]}"#).expect("should parse");
    assert!(rows.is_empty());
}

#[test]
fn malformed_body_is_an_error() {
    assert!(parse_leaderboard_json("<html>oops</html>").is_err());
    assert!(parse_leaderboard_json(r#"{"data":{"not":"a list"}}"#).is_err());
}
