use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::health::{self, CampaignScore, HealthLabel, SignalKind, SignalStatus};
use crate::models::{CampaignSnapshot, ProjectPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSummary {
    pub label: HealthLabel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalHotspot {
    pub kind: SignalKind,
    pub warning: usize,
    pub critical: usize,
}

/// Campaign counts per label, in band order. Empty bands are kept.
pub fn summarize_by_label(scores: &[CampaignScore]) -> Vec<LabelSummary> {
    HealthLabel::ALL
        .into_iter()
        .map(|label| LabelSummary {
            label,
            count: scores
                .iter()
                .filter(|score| score.health.label == label)
                .count(),
        })
        .collect()
}

/// Signals that are struggling somewhere in the portfolio, most critical first.
pub fn signal_hotspots(scores: &[CampaignScore]) -> Vec<SignalHotspot> {
    let mut hotspots: Vec<SignalHotspot> = SignalKind::ALL
        .into_iter()
        .map(|kind| {
            let mut hotspot = SignalHotspot {
                kind,
                warning: 0,
                critical: 0,
            };
            for signal in scores.iter().filter_map(|score| score.health.signal(kind)) {
                match signal.status {
                    SignalStatus::Warning => hotspot.warning += 1,
                    SignalStatus::Critical => hotspot.critical += 1,
                    SignalStatus::Good => {}
                }
            }
            hotspot
        })
        .filter(|hotspot| hotspot.warning + hotspot.critical > 0)
        .collect();

    // Stable sort keeps scorecard order among equals.
    hotspots.sort_by(|a, b| {
        b.critical
            .cmp(&a.critical)
            .then_with(|| b.warning.cmp(&a.warning))
    });
    hotspots
}

fn marker(label: HealthLabel) -> &'static str {
    match label {
        HealthLabel::Healthy => "🟢",
        HealthLabel::NeedsAttention => "🟡",
        HealthLabel::AtRisk => "🟠",
        HealthLabel::Critical => "🔴",
    }
}

pub fn build_report(
    scope: Option<&str>,
    as_of: DateTime<Utc>,
    snapshots: &[CampaignSnapshot],
) -> String {
    let scores = health::score_snapshots(snapshots, as_of);
    let summaries = summarize_by_label(&scores);
    let hotspots = signal_hotspots(&scores);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all clients");

    let _ = writeln!(output, "# Campaign Health Report");
    let _ = writeln!(
        output,
        "Generated for {} as of {}",
        scope_label,
        as_of.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Portfolio Mix");

    if scores.is_empty() {
        let _ = writeln!(output, "No campaigns found for this scope.");
        return output;
    }

    for summary in summaries.iter() {
        let _ = writeln!(
            output,
            "- {} {}: {}",
            marker(summary.label),
            summary.label.as_str(),
            health::plural(summary.count as i64, "campaign", "campaigns")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Campaigns Needing Attention");

    let attention: Vec<&CampaignScore> = scores
        .iter()
        .filter(|score| score.health.label != HealthLabel::Healthy)
        .collect();

    if attention.is_empty() {
        let _ = writeln!(output, "Every campaign is healthy.");
    } else {
        for score in attention {
            let _ = writeln!(
                output,
                "- {} ({}, {} phase) score {} ({})",
                score.campaign.name,
                score.campaign.company,
                score.campaign.phase,
                score.health.score,
                score.health.label.as_str()
            );
            for signal in score
                .health
                .signals
                .iter()
                .filter(|signal| signal.status != SignalStatus::Good)
            {
                let _ = writeln!(
                    output,
                    "  - {} {}/{}: {}",
                    signal.name(),
                    signal.score,
                    signal.max_score,
                    signal.detail
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Signal Hotspots");

    if hotspots.is_empty() {
        let _ = writeln!(output, "No signals below target.");
    } else {
        for hotspot in hotspots.iter() {
            let _ = writeln!(
                output,
                "- {}: {} critical, {} warning",
                hotspot.kind.name(),
                hotspot.critical,
                hotspot.warning
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Full Scorecards");

    for score in scores.iter() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {} {} ({}/100)",
            marker(score.health.label),
            score.campaign.name,
            score.health.score
        );
        let phase = score.campaign.phase;
        let next = phase
            .next()
            .map(|next| next.to_string())
            .unwrap_or_else(|| "complete".to_string());
        let _ = writeln!(
            output,
            "Phase {} ({}/{}), next: {}",
            phase,
            phase.position(),
            ProjectPhase::ALL.len(),
            next
        );
        let _ = writeln!(output);
        let _ = writeln!(output, "| Signal | Score | Status | Detail |");
        let _ = writeln!(output, "| --- | --- | --- | --- |");
        for signal in score.health.signals.iter() {
            let status = match signal.status {
                SignalStatus::Good => "good",
                SignalStatus::Warning => "warning",
                SignalStatus::Critical => "critical",
            };
            let _ = writeln!(
                output,
                "| {} | {}/{} | {} | {} |",
                signal.name(),
                signal.score,
                signal.max_score,
                status,
                signal.detail
            );
        }
    }

    output
}
