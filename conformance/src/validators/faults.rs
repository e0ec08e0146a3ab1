//! Fault taxonomy validator.
//!
//! Decodes every platform type and a sample of service-specific types
//! from both wire formats and checks that each lands in the right
//! instruction, that the two kinds never overlap, and that category
//! sentinels catch what they name.

use qworum_script::fault::{self, ENTITLEMENT_TYPES, SERVICE_TYPES, USER_AGENT_TYPES};
use qworum_script::{
    CatchClause, DecodeError, FaultTypeError, Goto, Instruction, Script, Statement, ValidationError,
    INSTRUCTION_NAMESPACE,
};
use serde_json::json;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "faults";

const SERVICE_SPECIFIC_SAMPLES: &[&str] = &[
    "service-specific",
    "*",
    "* out of stock",
    "*no-space",
    "*\tsplit\nacross lines",
];
const UNKNOWN_SAMPLES: &[&str] = &["teapot", "", " * leading space", "Service"];

/// Runs the taxonomy checks.
#[must_use]
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let platform: Vec<&str> = ENTITLEMENT_TYPES
        .iter()
        .chain(SERVICE_TYPES)
        .chain(USER_AGENT_TYPES)
        .copied()
        .collect();

    let is_platform = |i: &Instruction| matches!(i, Instruction::PlatformFault(_));
    let is_service = |i: &Instruction| matches!(i, Instruction::Fault(_));
    for fault_type in &platform {
        report.push(expect_decoded(fault_type, is_platform, "a platform fault"));
    }
    for fault_type in SERVICE_SPECIFIC_SAMPLES {
        report.push(expect_decoded(fault_type, is_service, "a service fault"));
    }
    for fault_type in UNKNOWN_SAMPLES {
        report.push(expect_rejected(fault_type));
    }

    let overlap: Vec<String> = platform
        .iter()
        .chain(SERVICE_SPECIFIC_SAMPLES)
        .filter(|t| fault::is_platform(t) && fault::is_service_specific(t))
        .map(|t| format!("{t:?}"))
        .collect();
    report.push(if overlap.is_empty() {
        TestResult::pass(VALIDATOR, "platform and service-specific types are disjoint")
    } else {
        TestResult::fail_with_details(VALIDATOR, "types classified both ways", overlap)
    });

    report.extend(sentinels());
    report
}

fn decode_both(fault_type: &str) -> [Result<Instruction, DecodeError>; 2] {
    let from_json =
        Instruction::from_jsonable(&json!({"type": "fault", "value": {"type": fault_type}}));
    let xml = format!(
        r#"<fault xmlns="{INSTRUCTION_NAMESPACE}" type="{}"/>"#,
        qworum_xml::escape_attribute(fault_type)
    );
    let from_xml = Script::from_xml(&xml).map(Script::into_instruction);
    [from_xml, from_json]
}

fn expect_decoded(
    fault_type: &str,
    is_expected: fn(&Instruction) -> bool,
    kind: &str,
) -> TestResult {
    let problems: Vec<String> = ["xml", "json"]
        .into_iter()
        .zip(decode_both(fault_type))
        .filter_map(|(format, decoded)| match decoded {
            Ok(i) if is_expected(&i) => None,
            Ok(i) => Some(format!("{format}: decoded as {i}")),
            Err(e) => Some(format!("{format}: {e}")),
        })
        .collect();
    if problems.is_empty() {
        TestResult::pass(VALIDATOR, format!("{fault_type:?} decodes as {kind}"))
    } else {
        TestResult::fail_with_details(VALIDATOR, format!("{fault_type:?} is not {kind}"), problems)
    }
}

fn expect_rejected(fault_type: &str) -> TestResult {
    let accepted: Vec<String> = ["xml", "json"]
        .into_iter()
        .zip(decode_both(fault_type))
        .filter_map(|(format, decoded)| match decoded {
            Err(DecodeError::Validation(ValidationError::FaultType(
                FaultTypeError::NotServiceSpecific(_),
            ))) => None,
            Ok(i) => Some(format!("{format}: accepted as {i}")),
            Err(e) => Some(format!("{format}: rejected for another reason: {e}")),
        })
        .collect();
    if accepted.is_empty() {
        TestResult::pass(VALIDATOR, format!("unknown type {fault_type:?} is rejected"))
    } else {
        TestResult::fail_with_details(VALIDATOR, format!("unknown type {fault_type:?}"), accepted)
    }
}

fn sentinels() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let cases: &[(&str, &[&str], bool)] = &[
        ("* empty cart", &["service-specific"], true),
        ("* empty cart", &["service"], true),
        ("* empty cart", &["entitlement"], false),
        ("* empty cart", &["user-agent"], false),
        ("entitlement", &["service"], true),
        ("origin", &["service-specific"], false),
        ("runtime", &["* other", "user-agent"], true),
        ("runtime", &[], true),
        ("data", &["script"], false),
    ];
    for (fault_type, requested, expected) in cases {
        if fault::matches(fault_type, requested) == *expected {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{fault_type:?} against {requested:?}: {expected}"),
            ));
        } else {
            report.push(TestResult::fail(
                VALIDATOR,
                format!("{fault_type:?} against {requested:?} should be {expected}"),
            ));
        }
    }

    let handler: Vec<Statement> = vec![Goto::build(None).into()];
    report.push(match CatchClause::build(&["teapot"], handler) {
        Err(ValidationError::FaultType(FaultTypeError::InvalidCatchType(_))) => {
            TestResult::pass(VALIDATOR, "catch clauses reject unknown types")
        }
        Err(e) => TestResult::fail(
            VALIDATOR,
            format!("catch clause rejected for another reason: {e}"),
        ),
        Ok(_) => TestResult::fail(VALIDATOR, "a catch clause accepted \"teapot\""),
    });
    report
}
