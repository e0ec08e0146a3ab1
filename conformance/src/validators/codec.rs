//! Codec validators.
//!
//! For each script given as XML text and JSON text:
//! - the XML is well-formed and both texts decode
//! - the decoded XML re-encodes to exactly the given JSON tree
//! - the XML-decoded and JSON-decoded scripts are equal and write the same XML
//! - re-encoding each decoded script and decoding it again is lossless

use qworum_script::Script;
use serde_json::Value;
use tracing::debug;

use crate::fixtures;
use crate::report::{ConformanceReport, Severity, TestResult};

const WELL_FORMED: &str = "codec/well-formed";
const XML_DECODE: &str = "codec/xml-decode";
const JSON_DECODE: &str = "codec/json-decode";
const CANONICAL: &str = "codec/canonical";
const AGREEMENT: &str = "codec/agreement";
const STABILITY: &str = "codec/stability";

/// Checks every golden fixture. A fixture's JSON must match the canonical
/// encoding exactly.
#[must_use]
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for fixture in fixtures::ALL {
        report.extend(check_pair(fixture.name, fixture.xml, fixture.json, Severity::Failure));
    }
    report
}

/// Checks one XML/JSON pair describing the same script. `non_canonical`
/// is the severity given to a JSON text that decodes correctly but is not
/// the tree this implementation would write.
pub(crate) fn check_pair(
    subject: &str,
    xml: &str,
    json: &str,
    non_canonical: Severity,
) -> ConformanceReport {
    debug!(subject, "checking script pair");
    let mut report = ConformanceReport::new();

    let via_xml = decode_xml(subject, xml, &mut report);
    let tree = match serde_json::from_str::<Value>(json) {
        Ok(tree) => Some(tree),
        Err(e) => {
            report.push(TestResult::fail_with_details(
                JSON_DECODE,
                format!("{subject}: JSON text does not parse"),
                vec![e.to_string()],
            ));
            None
        }
    };
    let via_json = tree.as_ref().and_then(|tree| match Script::from_jsonable(tree) {
        Ok(script) => {
            report.push(TestResult::pass(JSON_DECODE, format!("{subject}: decodes")));
            Some(script)
        }
        Err(e) => {
            report.push(TestResult::fail_with_details(
                JSON_DECODE,
                format!("{subject}: rejected"),
                vec![e.to_string()],
            ));
            None
        }
    });

    if let (Some(script), Some(tree)) = (&via_xml, &tree) {
        let written = script.to_jsonable();
        if &written == tree {
            report.push(TestResult::pass(CANONICAL, format!("{subject}: JSON is canonical")));
        } else {
            let mut result = TestResult::fail(
                CANONICAL,
                format!("{subject}: JSON differs from the canonical encoding"),
            )
            .with_details(vec![format!("expected: {written}"), format!("given:    {tree}")]);
            result.severity = non_canonical;
            report.push(result);
        }
    }

    if let (Some(a), Some(b)) = (&via_xml, &via_json) {
        report.push(agreement(subject, a, b));
    }
    for script in via_xml.iter().chain(&via_json) {
        report.push(stability(subject, script));
    }
    report
}

fn decode_xml(subject: &str, xml: &str, report: &mut ConformanceReport) -> Option<Script> {
    if let Err(e) = qworum_xml::parse(xml) {
        report.push(TestResult::fail_with_details(
            WELL_FORMED,
            format!("{subject}: XML is not well-formed"),
            vec![e.to_string()],
        ));
        return None;
    }
    match Script::from_xml(xml) {
        Ok(script) => {
            report.push(TestResult::pass(XML_DECODE, format!("{subject}: decodes")));
            Some(script)
        }
        Err(e) => {
            report.push(TestResult::fail_with_details(
                XML_DECODE,
                format!("{subject}: rejected"),
                vec![e.to_string()],
            ));
            None
        }
    }
}

fn agreement(subject: &str, via_xml: &Script, via_json: &Script) -> TestResult {
    if via_xml != via_json {
        return TestResult::fail_with_details(
            AGREEMENT,
            format!("{subject}: XML and JSON describe different scripts"),
            vec![format!("xml:  {via_xml}"), format!("json: {via_json}")],
        );
    }
    match (via_xml.to_xml(), via_json.to_xml()) {
        (Ok(a), Ok(b)) if a == b => {
            TestResult::pass(AGREEMENT, format!("{subject}: formats agree"))
        }
        (Ok(a), Ok(b)) => TestResult::fail_with_details(
            AGREEMENT,
            format!("{subject}: equal scripts write different XML"),
            vec![format!("xml:  {a}"), format!("json: {b}")],
        ),
        (Err(e), _) | (_, Err(e)) => TestResult::fail_with_details(
            AGREEMENT,
            format!("{subject}: cannot write XML"),
            vec![e.to_string()],
        ),
    }
}

fn stability(subject: &str, script: &Script) -> TestResult {
    let xml = match script.to_xml() {
        Ok(xml) => xml,
        Err(e) => {
            return TestResult::fail_with_details(
                STABILITY,
                format!("{subject}: cannot write XML"),
                vec![e.to_string()],
            )
        }
    };
    let mut issues = Vec::new();
    match Script::from_xml(&xml) {
        Ok(back) if &back == script => {
            if back.to_xml().ok().as_deref() != Some(xml.as_str()) {
                issues.push(format!("XML is not a fixed point: {xml}"));
            }
        }
        Ok(back) => issues.push(format!("XML round trip changed the script to {back}")),
        Err(e) => issues.push(format!("own XML rejected: {e}")),
    }
    match Script::from_jsonable(&script.to_jsonable()) {
        Ok(back) if &back == script => {}
        Ok(back) => issues.push(format!("JSON round trip changed the script to {back}")),
        Err(e) => issues.push(format!("own JSON rejected: {e}")),
    }
    if issues.is_empty() {
        TestResult::pass(STABILITY, format!("{subject}: re-encodes losslessly"))
    } else {
        TestResult::fail_with_details(STABILITY, format!("{subject}: unstable encoding"), issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_fixtures_pass() {
        let report = validate();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "fixture failures: {failures:#?}");
        assert_eq!(report.count(Severity::Pass), fixtures::ALL.len() * 6);
    }

    #[test]
    fn mismatched_pair_is_reported() {
        let report = check_pair(
            "goto",
            r#"<goto xmlns="https://qworum.net/ns/v1/instruction/" href="a/"/>"#,
            r#"{"type": "goto", "value": {"href": "b/"}}"#,
            Severity::Failure,
        );
        let failed: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.validator.as_str())
            .collect();
        assert_eq!(failed, [CANONICAL, AGREEMENT]);
    }

    #[test]
    fn non_canonical_json_can_be_a_warning() {
        let report = check_pair(
            "goto",
            r#"<goto xmlns="https://qworum.net/ns/v1/instruction/"/>"#,
            r#"{"type": "goto", "value": {}}"#,
            Severity::Warning,
        );
        assert!(report.all_passed());
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn malformed_xml_stops_at_well_formedness() {
        let report = check_pair(
            "broken",
            "<goto>",
            r#"{"type": "goto", "value": {"href": null}}"#,
            Severity::Failure,
        );
        let validators: Vec<_> = report.results.iter().map(|r| r.validator.as_str()).collect();
        assert_eq!(validators, [WELL_FORMED, JSON_DECODE, STABILITY]);
        assert_eq!(report.failure_count(), 1);
    }
}
