use modlink_protocol::{ScannedReference, Scanner};
use modlink_scanner::RequireScanner;
use pretty_assertions::assert_eq;

fn scan(code: &str) -> Vec<ScannedReference> {
    RequireScanner::new().find_all(code).expect("scan failed")
}

fn names(refs: &[ScannedReference]) -> Vec<&str> {
    refs.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn require_literal_offset_points_inside_quotes() {
    let refs = scan("require('./foo')");
    assert_eq!(refs, vec![ScannedReference::new(9, "./foo")]);
}

#[test]
fn finds_every_reference_form_in_document_order() {
    let code = r#"
import def from "./default";
import './side-effect';
export { thing } from '../shared/thing';
const fs = require('fs');
async function load() {
    return import('lazy-mod');
}
"#;

    let refs = scan(code);
    assert_eq!(
        names(&refs),
        vec!["./default", "./side-effect", "../shared/thing", "fs", "lazy-mod"]
    );
    for r in &refs {
        assert_eq!(&code[r.start..r.start + r.name.len()], r.name);
    }
}

#[test]
fn references_are_sorted_and_disjoint() {
    let code = "const a = require('a'), b = require('b');\nrequire('c').run(require('d'));";
    let refs = scan(code);

    assert_eq!(names(&refs), vec!["a", "b", "c", "d"]);
    for pair in refs.windows(2) {
        assert!(pair[0].start + pair[0].name.len() <= pair[1].start);
    }
}

#[test]
fn ignores_non_literal_and_unrelated_calls() {
    let code = r#"
const name = './dyn';
require(name);
require(`./template`);
require('');
notRequire('./nope');
obj.require('./member');
"#;
    assert!(scan(code).is_empty());
}

#[test]
fn rescanning_identical_text_is_stable() {
    let code = "require('./a');\nrequire('b');";
    assert_eq!(scan(code), scan(code));
}
