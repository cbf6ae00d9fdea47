// tests/providers_feed.rs
use chrono::{TimeZone, Utc};
use morning_digest::ingest::providers::feed::parse_feed;

const RSS_XML: &str = include_str!("fixtures/markets_rss.xml");
const ATOM_XML: &str = include_str!("fixtures/markets_atom.xml");
const EURO_XML: &str = include_str!("fixtures/euro_desk_rss.xml");

#[test]
fn rss_fixture_parses_titles_links_and_dates() {
    let items = parse_feed(RSS_XML, "Markets Wire", 10).expect("rss parse ok");

    assert_eq!(items.len(), 3, "linkless item is dropped");
    assert!(items.iter().all(|e| e.source == "Markets Wire"));

    assert_eq!(items[0].title, "Fed holds rates steady, signals patience on cuts");
    assert_eq!(items[0].link, "https://wire.example.com/fed-holds");
    assert_eq!(
        items[0].published_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 10, 5, 30, 0).unwrap())
    );

    assert_eq!(items[1].title, "Oil slips as OPEC+ weighs output - traders cautious");
    assert_eq!(
        items[1].published_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 10, 4, 0, 0).unwrap()),
        "dc:date is used when pubDate is missing"
    );

    assert_eq!(items[2].published_at, None, "bad date fails open");
}

#[test]
fn rss_fixture_respects_per_feed_cap() {
    let items = parse_feed(RSS_XML, "Markets Wire", 1).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].link, "https://wire.example.com/fed-holds");
}

#[test]
fn atom_fixture_parses() {
    let items = parse_feed(ATOM_XML, "Macro Notes", 10).expect("atom parse ok");
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].title, "Treasury yields climb after jobs data");
    assert_eq!(items[0].link, "https://notes.example.com/yields");
    assert_eq!(
        items[0].published_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 10, 3, 15, 0).unwrap()),
        "updated is used when published is missing"
    );

    assert_eq!(items[1].title, "Dollar firmer vs yen");
    assert_eq!(items[1].link, "https://notes.example.com/dollar");
    assert_eq!(
        items[1].published_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 9, 21, 0, 0).unwrap()),
        "published wins over updated"
    );
}

#[test]
fn html_entities_in_one_item_keep_the_whole_feed() {
    let items = parse_feed(EURO_XML, "Euro Desk", 10).expect("entities tolerated");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Café chains lift CAC 40; €2bn buyback");
    assert_eq!(items[0].link, "https://eurodesk.example.com/cafe-chains");
    assert_eq!(items[1].title, "Gilts steady as £ edges higher");
    assert_eq!(
        items[1].published_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 10, 5, 0, 0).unwrap())
    );
}
