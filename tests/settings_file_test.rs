// * File-level sanity checks for the shipped settings.cfg.

use quarry_settings::config::{IniDocument, Settings, DEFAULT_SECTION, RECOGNIZED_KEYS};

fn shipped_cfg() -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/settings.cfg");
    std::fs::read_to_string(path).expect("settings.cfg missing from repository root")
}

#[test]
fn test_shipped_file_parses() {
    let doc = IniDocument::parse(&shipped_cfg()).unwrap();
    assert!(doc.section(DEFAULT_SECTION).is_some());
}

#[test]
fn test_every_recognized_key_present() {
    let raw = shipped_cfg();
    let doc = IniDocument::parse(&raw).unwrap();
    let section = doc.default_section().unwrap();

    // * Parsing already rejects duplicates, so presence implies exactly once
    for key in RECOGNIZED_KEYS {
        assert!(section.get(key).is_some(), "missing key: {key}");
    }
    assert_eq!(section.entries().len(), RECOGNIZED_KEYS.len());
}

#[test]
fn test_shipped_file_loads_into_settings() {
    let settings = Settings::from_ini_str(&shipped_cfg()).unwrap();

    assert_eq!(settings.download.download_timeout, 30);
    assert_eq!(settings.download.max_file_size, 20_000_000);
    assert_eq!(settings.download.min_file_size, 10);
    assert_eq!(settings.download.max_redirects, 2);
    assert_eq!(settings.download.cookie, None);
    assert_eq!(settings.extraction.min_extracted_size, 250);
    assert_eq!(settings.extraction.max_tree_size, None);
    assert_eq!(settings.extraction.extraction_timeout, 30);
    assert!(settings.extraction.extensive_date_search);
    assert_eq!(settings.dedup.min_duplcheck_size, 100);
    assert_eq!(settings.dedup.max_repetitions, 2);
    assert!(!settings.urls.external_urls);
}

#[test]
fn test_shipped_user_agents_non_empty() {
    let settings = Settings::from_ini_str(&shipped_cfg()).unwrap();
    assert!(!settings.download.user_agents.is_empty());
    for agent in &settings.download.user_agents {
        assert!(!agent.trim().is_empty());
        assert!(agent.starts_with("Mozilla/5.0"), "unexpected agent: {agent}");
    }
}

#[test]
fn test_shipped_scalars_match_builtin_defaults() {
    // * Blank keys in the file resolve to the same values as Settings::default
    let settings = Settings::from_ini_str(&shipped_cfg()).unwrap();
    let defaults = Settings::default();

    assert_eq!(settings.extraction, defaults.extraction);
    assert_eq!(settings.dedup, defaults.dedup);
    assert_eq!(settings.urls, defaults.urls);
    assert_eq!(settings.download.cookie, defaults.download.cookie);
    assert_eq!(settings.download.sleep_time, defaults.download.sleep_time);
}
