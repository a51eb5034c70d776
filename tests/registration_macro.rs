#![cfg(feature = "macros")]

use tonewheel::{Registration, registration};

#[test]
fn test_registration_macro_grouped() {
    let jazz = registration!("88 8000 000");
    assert_eq!(jazz.levels(), [8, 8, 8, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_registration_macro_matches_parse() {
    let parsed: Registration = "68 8600 012".parse().unwrap();
    assert_eq!(registration!("68 8600 012"), parsed);
}

#[test]
fn test_registration_macro_full() {
    assert_eq!(registration!("888888888"), Registration::FULL);
    assert_eq!(registration!("00-0000-000"), Registration::SILENT);
}

#[test]
fn test_registration_macro_trims_like_parse() {
    let parsed: Registration = " 888000000\t".parse().unwrap();
    assert_eq!(registration!(" 888000000\t"), parsed);
}
