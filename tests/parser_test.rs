use property_alerts::*;

fn alert(count: u32, blocks: &[[&str; 4]]) -> Vec<String> {
    let mut lines = vec![
        "Return-Path: <alerts@example.com>".to_string(),
        "Date: Mon, 1 Jan 2024 09:30:00 +0000".to_string(),
        format!("Subject: Alert, {count} new matching properties"),
        String::new(),
    ];
    for block in blocks {
        lines.extend(block.iter().map(ToString::to_string));
        lines.push(String::new());
    }
    lines
}

fn parse(lines: &[String]) -> ParsedEmail {
    parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap()
}

#[test]
fn test_parse_single_listing() {
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 1 new matching property",
        "Property 1:",
        "  &pound;250,000",
        "2 bedroom flat for sale",
        "  Main Street, London",
    ];

    let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();

    assert_eq!(email.date.as_deref(), Some("1 Jan 2024"));
    assert_eq!(email.declared_count, Some(1));
    assert!(!email.terminated_early);
    assert_eq!(
        email.listings,
        vec![Listing {
            source: "alert.eml".into(),
            property_number: 1,
            date: "1 Jan 2024".into(),
            price: 250_000.0,
            bedrooms: 2,
            property_type: "flat".into(),
            contract_type: ContractType::ForSale,
            location: "  Main Street, London".into(),
        }]
    );
}

#[test]
fn test_fewer_blocks_than_declared() {
    let lines = alert(
        2,
        &[[
            "Property 1:",
            "&pound;1,100 pcm",
            "1 bedroom apartment to rent",
            "Canal Side, Manchester",
        ]],
    );

    let email = parse(&lines);

    assert_eq!(email.listings.len(), 1);
    assert!(!email.terminated_early);
    assert_eq!(email.listings[0].price, 1100.0);
    assert_eq!(email.listings[0].contract_type, ContractType::ToRent);
}

#[test]
fn test_stops_at_declared_count() {
    let lines = alert(
        1,
        &[
            [
                "Property 1:",
                "&pound;100,000",
                "1 bedroom flat for sale",
                "First Street",
            ],
            [
                "Property 2:",
                "&pound;200,000",
                "2 bedroom house for sale",
                "Second Street",
            ],
        ],
    );

    let email = parse(&lines);

    assert!(email.terminated_early);
    assert_eq!(email.listings.len(), 1);
    assert_eq!(email.listings[0].property_number, 1);
}

#[test]
fn test_never_exceeds_declared_count() {
    let blocks: Vec<[&str; 4]> = (0..5)
        .map(|_| [
            "Property 9:",
            "&pound;90,000",
            "3 bedroom bungalow for sale",
            "Somewhere",
        ])
        .collect();
    let mut lines = alert(3, &blocks);
    for (i, line) in lines.iter_mut().filter(|l| l.starts_with("Property")).enumerate() {
        *line = format!("Property {}:", i + 1);
    }

    let email = parse(&lines);

    assert_eq!(email.listings.len(), 3);
    assert!(email.terminated_early);
}

#[test]
fn test_skips_lines_until_price() {
    let lines = [
        "Date: Tue, 2 Jan 2024 10:00:00 +0000",
        "Subject: Alert, 1 new property",
        "Property 1:",
        "View details",
        "Price on application",
        "",
        "<b>Guide price</b> &pound;325,000",
        "2 bedroom terraced house for sale",
        "Mill Lane, York",
    ];

    let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();

    assert_eq!(email.listings.len(), 1);
    assert_eq!(email.listings[0].price, 325_000.0);
    assert_eq!(email.listings[0].property_type, "terraced house");
}

#[test]
fn test_empty_input() {
    let lines: [&str; 0] = [];
    let email = parse_lines("empty.eml", lines, &ParserConfig::default()).unwrap();

    assert!(email.listings.is_empty());
    assert!(email.date.is_none());
    assert!(email.declared_count.is_none());
    assert!(!email.terminated_early);
}

#[test]
fn test_no_subject_yields_nothing() {
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Your weekly newsletter",
        "Property 1:",
        "&pound;250,000",
        "2 bedroom flat for sale",
        "Main Street",
    ];

    let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();

    assert_eq!(email.date.as_deref(), Some("1 Jan 2024"));
    assert!(email.declared_count.is_none());
    assert!(email.listings.is_empty());
}

#[test]
fn test_parse_is_repeatable() {
    let lines = alert(
        2,
        &[
            ["Property 1:", "&pound;1", "1 bedroom flat for sale", "A"],
            ["Property 2:", "&pound;2", "2 bedroom flat to rent", "B"],
        ],
    );

    assert_eq!(parse(&lines), parse(&lines));
}

#[test]
fn test_preserves_source_order() {
    let lines = alert(
        9,
        &[
            ["Property 7:", "&pound;7", "1 bedroom flat for sale", "Seven"],
            ["Property 3:", "&pound;3", "1 bedroom flat for sale", "Three"],
            ["Property 5:", "&pound;5", "1 bedroom flat for sale", "Five"],
        ],
    );

    let numbers: Vec<u32> = parse(&lines)
        .listings
        .iter()
        .map(|l| l.property_number)
        .collect();

    assert_eq!(numbers, vec![7, 3, 5]);
}

#[test]
fn test_unmatched_line_leaves_state() {
    let config = ParserConfig::default();
    let mut parser = LineParser::new("alert.eml", &config);

    assert_eq!(parser.expecting(), Expect::Date);
    assert_eq!(parser.step("Subject: Alert, 1 new").unwrap(), Step::Skipped);
    assert_eq!(parser.expecting(), Expect::Date);

    assert_eq!(parser.step("Date: Mon, 1 Jan 2024").unwrap(), Step::Advanced);
    assert_eq!(parser.step("Subject: Alert, 1 new").unwrap(), Step::Advanced);
    assert_eq!(parser.step("Property 1:").unwrap(), Step::Advanced);
    assert_eq!(parser.expecting(), Expect::Price);

    assert_eq!(parser.step("no price here").unwrap(), Step::Skipped);
    assert_eq!(parser.step("2 bedroom flat for sale").unwrap(), Step::Skipped);
    assert_eq!(parser.expecting(), Expect::Price);
    assert!(parser.listings().is_empty());
}

#[test]
fn test_location_line_is_unconditional() {
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 2 new properties",
        "Property 1:",
        "&pound;100",
        "1 bedroom flat for sale",
        "Property 2:",
        "&pound;200",
        "2 bedroom flat for sale",
        "",
    ];

    let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();

    // The second `Property` line is consumed as the first block's location,
    // so the second block never starts.
    assert_eq!(email.listings.len(), 1);
    assert_eq!(email.listings[0].location, "Property 2:");
}

#[test]
fn test_blank_location() {
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 1 new property",
        "Property 1:",
        "&pound;100",
        "1 bedroom flat for sale",
        "",
        "Main Street",
    ];

    let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();

    assert_eq!(email.listings[0].location, "");
}

#[test]
fn test_bad_price_fails_by_default() {
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 1 new property",
        "Property 1:",
        "&pound;POA",
        "1 bedroom flat for sale",
        "Main Street",
    ];

    let err = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidPrice { ref source_id, property_number: 1, ref raw, .. }
            if source_id == "alert.eml" && raw == "POA"
    ));
}

#[test]
fn test_bad_price_skips_property() {
    let config = ParserConfig::default().with_price_policy(PricePolicy::SkipProperty);
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 2 new properties",
        "Property 1:",
        "&pound;POA",
        "1 bedroom flat for sale",
        "Main Street",
        "Property 2:",
        "&pound;150,000",
        "2 bedroom maisonette for sale",
        "High Street",
    ];

    let email = parse_lines("alert.eml", lines, &config).unwrap();

    assert_eq!(email.listings.len(), 1);
    assert_eq!(email.listings[0].property_number, 2);
    assert_eq!(email.listings[0].property_type, "maisonette");
    assert_eq!(email.listings[0].location, "High Street");
}

#[test]
fn test_price_uses_configured_locale() {
    let config = ParserConfig::default().with_locale(Locale::DE_DE);
    let lines = [
        "Date: Mon, 1 Jan 2024",
        "Subject: Alert, 1 new property",
        "Property 1:",
        "£1.250,50",
        "1 bedroom flat to rent",
        "Hauptstrasse",
    ];

    let email = parse_lines("alert.eml", lines, &config).unwrap();

    assert_eq!(email.listings[0].price, 1250.5);
}

// --- matchers ---

#[test]
fn test_match_date() {
    assert_eq!(
        match_date("Date: Fri, 15 Mar 2024 08:12:45 +0000").as_deref(),
        Some("15 Mar 2024")
    );
    assert!(match_date("Sent: Fri, 15 Mar 2024").is_none());
    assert!(match_date("  Date: Fri, 15 Mar 2024").is_none());
}

#[test]
fn test_match_subject() {
    assert_eq!(match_subject("Subject: Alert, 12 new properties"), Some(12));
    assert_eq!(match_subject("Subject: Rightmove, 3 new matches"), Some(3));
    assert!(match_subject("Subject: Alert 3 new").is_none());
    assert!(match_subject("Subject: Alert, new properties").is_none());
}

#[test]
fn test_match_property() {
    assert_eq!(match_property("Property 4: see below"), Some(4));
    assert!(match_property("Property four:").is_none());
    assert!(match_property(" Property 4:").is_none());
    assert!(match_property("Property 99999999999:").is_none());
}

#[test]
fn test_match_price() {
    assert_eq!(match_price("Offers over &pound;450,000 "), Some("450,000"));
    assert_eq!(match_price("£1,200 pcm"), Some("1,200"));
    assert!(match_price("$450,000").is_none());
}

#[test]
fn test_match_price_prefers_entity() {
    assert_eq!(
        match_price("Reduced from £300,000 to &pound;250,000"),
        Some("250,000")
    );
    assert_eq!(
        match_price("Reduced from &pound;300,000 to £250,000"),
        Some("300,000")
    );
}

#[test]
fn test_match_description() {
    let description = match_description("4 bedroom detached house for sale").unwrap();
    assert_eq!(description.bedrooms, 4);
    assert_eq!(description.property_type, "detached house");
    assert_eq!(description.contract_type, ContractType::ForSale);

    let description = match_description("Studio: 1 bedroom flat to rent now").unwrap();
    assert_eq!(description.bedrooms, 1);
    assert_eq!(description.property_type, "flat");
    assert_eq!(description.contract_type, ContractType::ToRent);

    assert!(match_description("2 bedroom flat for auction").is_none());
    assert!(match_description("two bedroom flat for sale").is_none());
}

#[test]
fn test_transition_table() {
    assert_eq!(Expect::Date.next(), Expect::Subject);
    assert_eq!(Expect::Subject.next(), Expect::Property);
    assert_eq!(Expect::Property.next(), Expect::Price);
    assert_eq!(Expect::Price.next(), Expect::Description);
    assert_eq!(Expect::Description.next(), Expect::Location);
    assert_eq!(Expect::Location.next(), Expect::Property);
}
