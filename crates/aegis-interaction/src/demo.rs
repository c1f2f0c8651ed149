//! DemoResponder - local rule-based simulator for degraded sessions.
//!
//! When the session runs in demo mode the dispatcher never touches the
//! network; it classifies the operator's input against an ordered keyword
//! rule set and renders a canned template over the current (possibly
//! synthetic) metrics. The rule list is data, not control flow, so it can
//! be tested and extended independently.

use std::time::Duration;

use aegis_core::telemetry::MetricSample;

/// Template selected by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoTemplate {
    /// Markdown table of the current gauge set.
    StatusTable,
    /// Markdown table of simulated pods.
    PodTable,
    /// Acknowledgment interpolating the raw input.
    Generic,
}

/// One classification rule: any keyword hit selects the template.
struct DemoRule {
    keywords: &'static [&'static str],
    template: DemoTemplate,
}

/// Ordered rule set, evaluated first-match-wins.
const RULES: &[DemoRule] = &[
    DemoRule {
        keywords: &["status", "health"],
        template: DemoTemplate::StatusTable,
    },
    DemoRule {
        keywords: &["pod"],
        template: DemoTemplate::PodTable,
    },
];

/// Classifies operator input against the rule set.
///
/// Matching is case-insensitive substring containment; the first rule with
/// any keyword hit wins, and input matching no rule falls through to
/// [`DemoTemplate::Generic`].
pub fn classify(input: &str) -> DemoTemplate {
    let lowered = input.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|k| lowered.contains(k)) {
            return rule.template;
        }
    }
    DemoTemplate::Generic
}

/// Renders a template over the raw input and the current sample.
pub fn render(template: DemoTemplate, input: &str, sample: &MetricSample) -> String {
    match template {
        DemoTemplate::StatusTable => format!(
            "### System Status\n\n\
             | Metric | Value | Status |\n\
             |--------|-------|--------|\n\
             | CPU | {}% | OK |\n\
             | Memory | {}% | OK |\n\
             | Disk | {}% | OK |",
            sample.cpu.display(),
            sample.memory.display(),
            sample.disk.display(),
        ),
        DemoTemplate::PodTable => "### Kubernetes Pods\n\n\
             | Pod | Status |\n\
             |-----|--------|\n\
             | aegis-core | Running |\n\
             | aegis-worker | Running |"
            .to_string(),
        DemoTemplate::Generic => format!(
            "I processed your request: \"{input}\"\n\n\
             No issues found. All systems operational \
             (CPU {}%, memory {}%).",
            sample.cpu.display(),
            sample.memory.display(),
        ),
    }
}

/// Produces templated replies with an artificial latency.
pub struct DemoResponder {
    delay: Duration,
}

impl DemoResponder {
    /// Creates a responder with the given artificial delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Classifies `input`, waits the fixed artificial delay to emulate a
    /// round trip, and returns the rendered template.
    pub async fn respond(&self, input: &str, sample: &MetricSample) -> String {
        let template = classify(input);
        tokio::time::sleep(self.delay).await;
        render(template, input, sample)
    }
}
