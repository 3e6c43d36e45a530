// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Build-time entitlements audit.
//!
//! Cross-checks marketing copy (pricing bullets, onboarding claims,
//! chat-limit mentions) against the entitlement tables and exits
//! non-zero on any divergence. Wire into CI before the deploy step.

use lunary_api::services::run_audit;

fn main() {
    let findings = run_audit();

    if findings.is_empty() {
        println!("entitlements audit: OK");
        return;
    }

    eprintln!("entitlements audit: {} finding(s)", findings.len());
    for finding in &findings {
        eprintln!("  [{} / {}] {}", finding.source, finding.plan, finding.message);
    }
    std::process::exit(1);
}
