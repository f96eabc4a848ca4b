//! Campaign health scorecard.
//!
//! Seven independent signals are scored against fixed ceilings that add up
//! to 100 and summed into one composite. Everything here is a pure function
//! of the snapshot and the reference time passed in by the caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{ApprovalState, Campaign, CampaignSnapshot, StatusUpdate, Task, TaskStatus};

pub const UPDATE_RECENCY_MAX: u32 = 25;
pub const DEADLINE_STATUS_MAX: u32 = 20;
pub const REVISION_RATE_MAX: u32 = 15;
pub const TASK_COMPLETION_MAX: u32 = 20;
pub const BLOCKED_STATUS_MAX: u32 = 10;
pub const HAS_ASSIGNEE_MAX: u32 = 5;
pub const PENDING_REVIEW_MAX: u32 = 5;

const FRESH_UPDATE_DAYS: i64 = 3;
const STALE_UPDATE_DAYS: i64 = 14;
const DEADLINE_SOON_DAYS: i64 = 3;
const PENDING_REVIEW_LIMIT_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    #[serde(rename = "Update Recency")]
    UpdateRecency,
    #[serde(rename = "Deadline Status")]
    DeadlineStatus,
    #[serde(rename = "Revision Rate")]
    RevisionRate,
    #[serde(rename = "Task Completion")]
    TaskCompletion,
    #[serde(rename = "Blocked Status")]
    BlockedStatus,
    #[serde(rename = "Has Assignee")]
    HasAssignee,
    #[serde(rename = "Pending Review")]
    PendingReview,
}

impl SignalKind {
    /// Scorecard order.
    pub const ALL: [SignalKind; 7] = [
        SignalKind::UpdateRecency,
        SignalKind::DeadlineStatus,
        SignalKind::RevisionRate,
        SignalKind::TaskCompletion,
        SignalKind::BlockedStatus,
        SignalKind::HasAssignee,
        SignalKind::PendingReview,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::UpdateRecency => "Update Recency",
            Self::DeadlineStatus => "Deadline Status",
            Self::RevisionRate => "Revision Rate",
            Self::TaskCompletion => "Task Completion",
            Self::BlockedStatus => "Blocked Status",
            Self::HasAssignee => "Has Assignee",
            Self::PendingReview => "Pending Review",
        }
    }

    pub fn max_score(self) -> u32 {
        match self {
            Self::UpdateRecency => UPDATE_RECENCY_MAX,
            Self::DeadlineStatus => DEADLINE_STATUS_MAX,
            Self::RevisionRate => REVISION_RATE_MAX,
            Self::TaskCompletion => TASK_COMPLETION_MAX,
            Self::BlockedStatus => BLOCKED_STATUS_MAX,
            Self::HasAssignee => HAS_ASSIGNEE_MAX,
            Self::PendingReview => PENDING_REVIEW_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Good,
    Warning,
    Critical,
}

impl SignalStatus {
    pub fn classify(score: u32, max_score: u32) -> Self {
        if max_score == 0 {
            return Self::Good;
        }
        let ratio = score as f64 / max_score as f64;
        if ratio >= 0.7 {
            Self::Good
        } else if ratio >= 0.4 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HealthLabel {
    Healthy,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    #[serde(rename = "At Risk")]
    AtRisk,
    Critical,
}

impl HealthLabel {
    pub const ALL: [HealthLabel; 4] = [
        HealthLabel::Healthy,
        HealthLabel::NeedsAttention,
        HealthLabel::AtRisk,
        HealthLabel::Critical,
    ];

    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Healthy,
            60..=79 => Self::NeedsAttention,
            40..=59 => Self::AtRisk,
            _ => Self::Critical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::NeedsAttention => "Needs Attention",
            Self::AtRisk => "At Risk",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthSignal {
    #[serde(rename = "name")]
    pub kind: SignalKind,
    pub score: u32,
    pub max_score: u32,
    pub status: SignalStatus,
    pub detail: String,
}

impl HealthSignal {
    fn new(kind: SignalKind, score: u32, detail: impl Into<String>) -> Self {
        let max_score = kind.max_score();
        let score = score.min(max_score);
        Self {
            kind,
            score,
            max_score,
            status: SignalStatus::classify(score, max_score),
            detail: detail.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthScoreResult {
    pub score: u32,
    pub label: HealthLabel,
    pub signals: Vec<HealthSignal>,
}

impl HealthScoreResult {
    pub fn signal(&self, kind: SignalKind) -> Option<&HealthSignal> {
        self.signals.iter().find(|signal| signal.kind == kind)
    }
}

pub fn compute_health_score(
    campaign: &Campaign,
    updates: &[StatusUpdate],
    tasks: &[Task],
    now: DateTime<Utc>,
) -> HealthScoreResult {
    let signals = vec![
        update_recency(updates, now),
        deadline_status(campaign, now.date_naive()),
        revision_rate(updates),
        task_completion(tasks),
        blocked_status(campaign, tasks),
        has_assignee(campaign),
        pending_review(updates, now),
    ];

    let score = signals.iter().map(|signal| signal.score).sum();

    HealthScoreResult {
        score,
        label: HealthLabel::from_score(score),
        signals,
    }
}

/// A scored campaign as listed by `score` and the report.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignScore {
    pub campaign: Campaign,
    pub health: HealthScoreResult,
}

/// Scores every snapshot and orders the portfolio worst first. Ties keep
/// alphabetical campaign order.
pub fn score_snapshots(snapshots: &[CampaignSnapshot], now: DateTime<Utc>) -> Vec<CampaignScore> {
    let mut scores: Vec<CampaignScore> = snapshots
        .iter()
        .map(|snapshot| {
            let health =
                compute_health_score(&snapshot.campaign, &snapshot.updates, &snapshot.tasks, now);
            tracing::debug!(
                campaign = %snapshot.campaign.name,
                score = health.score,
                label = health.label.as_str(),
                "scored campaign"
            );
            CampaignScore {
                campaign: snapshot.campaign.clone(),
                health,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        a.health
            .score
            .cmp(&b.health.score)
            .then_with(|| a.campaign.name.cmp(&b.campaign.name))
    });
    scores
}

/// Whole days elapsed since `then`; timestamps ahead of `now` count as zero.
fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_days().max(0)
}

pub(crate) fn plural(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn update_recency(updates: &[StatusUpdate], now: DateTime<Utc>) -> HealthSignal {
    let kind = SignalKind::UpdateRecency;
    let Some(latest) = updates.iter().map(|update| update.created_at).max() else {
        return HealthSignal::new(kind, kind.max_score(), "No updates posted yet");
    };

    let days = days_since(latest, now);
    let score = match days {
        d if d <= FRESH_UPDATE_DAYS => UPDATE_RECENCY_MAX,
        d if d <= STALE_UPDATE_DAYS => {
            let window = (STALE_UPDATE_DAYS - FRESH_UPDATE_DAYS) as f64;
            let decay = 1.0 - (d - FRESH_UPDATE_DAYS) as f64 / window;
            (UPDATE_RECENCY_MAX as f64 * decay).round() as u32
        }
        _ => 0,
    };

    let detail = if days == 0 {
        "Last update today".to_string()
    } else {
        format!("Last update {} ago", plural(days, "day", "days"))
    };
    HealthSignal::new(kind, score, detail)
}

fn deadline_status(campaign: &Campaign, today: NaiveDate) -> HealthSignal {
    let kind = SignalKind::DeadlineStatus;

    if let Some(target) = campaign.target_date.filter(|date| *date < today) {
        let overdue = (today - target).num_days();
        return HealthSignal::new(
            kind,
            0,
            format!("Overdue by {}", plural(overdue, "day", "days")),
        );
    }

    if let Some(phase_due) = campaign.phase_due_date.filter(|date| *date < today) {
        let overdue = (today - phase_due).num_days();
        return HealthSignal::new(
            kind,
            DEADLINE_STATUS_MAX / 2,
            format!("Phase overdue by {}", plural(overdue, "day", "days")),
        );
    }

    let detail = match (campaign.target_date, campaign.phase_due_date) {
        (Some(target), _) => {
            let remaining = (target - today).num_days();
            if remaining <= DEADLINE_SOON_DAYS {
                format!("Due in {}", plural(remaining, "day", "days"))
            } else {
                format!("On track — {} remaining", plural(remaining, "day", "days"))
            }
        }
        (None, Some(phase_due)) => {
            let remaining = (phase_due - today).num_days();
            format!("Phase due in {}", plural(remaining, "day", "days"))
        }
        (None, None) => "No deadline set".to_string(),
    };
    HealthSignal::new(kind, DEADLINE_STATUS_MAX, detail)
}

fn revision_rate(updates: &[StatusUpdate]) -> HealthSignal {
    let revisions = updates
        .iter()
        .filter(|update| update.is_deliverable && update.approval == ApprovalState::Rejected)
        .count();

    let score = match revisions {
        0 | 1 => REVISION_RATE_MAX,
        2 => 10,
        3 => 5,
        _ => 0,
    };

    HealthSignal::new(
        SignalKind::RevisionRate,
        score,
        plural(revisions as i64, "revision request", "revision requests"),
    )
}

fn task_completion(tasks: &[Task]) -> HealthSignal {
    let kind = SignalKind::TaskCompletion;
    if tasks.is_empty() {
        return HealthSignal::new(kind, kind.max_score(), "No tasks created");
    }

    let total = tasks.len();
    let done = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Done)
        .count();
    let ratio = done as f64 / total as f64;
    let score = (TASK_COMPLETION_MAX as f64 * ratio).round() as u32;
    let percentage = (ratio * 100.0).round() as u32;

    HealthSignal::new(
        kind,
        score,
        format!("{done}/{total} tasks complete ({percentage}%)"),
    )
}

fn blocked_status(campaign: &Campaign, tasks: &[Task]) -> HealthSignal {
    let kind = SignalKind::BlockedStatus;
    if campaign.is_blocked {
        return HealthSignal::new(kind, 0, "Project is blocked");
    }

    let blocked = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Blocked)
        .count() as u32;
    if blocked == 0 {
        return HealthSignal::new(kind, BLOCKED_STATUS_MAX, "No blockers");
    }

    let score = BLOCKED_STATUS_MAX.saturating_sub(blocked.saturating_mul(5));
    HealthSignal::new(
        kind,
        score,
        plural(blocked as i64, "blocked task", "blocked tasks"),
    )
}

fn has_assignee(campaign: &Campaign) -> HealthSignal {
    match &campaign.assigned_to {
        Some(member) => HealthSignal::new(
            SignalKind::HasAssignee,
            HAS_ASSIGNEE_MAX,
            format!("Assigned to {member}"),
        ),
        None => HealthSignal::new(SignalKind::HasAssignee, 0, "No team member assigned"),
    }
}

fn pending_review(updates: &[StatusUpdate], now: DateTime<Utc>) -> HealthSignal {
    let kind = SignalKind::PendingReview;
    let oldest_pending = updates
        .iter()
        .filter(|update| update.is_deliverable && update.approval == ApprovalState::Pending)
        .map(|update| update.created_at)
        .min();

    let Some(oldest) = oldest_pending else {
        return HealthSignal::new(kind, kind.max_score(), "No pending deliverables");
    };

    // Full marks until the limit, then nothing. No gradual decay here.
    let days = days_since(oldest, now);
    let waited = plural(days, "day", "days");
    if days > PENDING_REVIEW_LIMIT_DAYS {
        HealthSignal::new(kind, 0, format!("Deliverable pending review for {waited}"))
    } else {
        HealthSignal::new(
            kind,
            PENDING_REVIEW_MAX,
            format!("Deliverable awaiting review for {waited}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectPhase;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap()
    }

    fn campaign() -> Campaign {
        Campaign {
            id: Uuid::nil(),
            name: "Spring Launch".to_string(),
            company: "Northwind".to_string(),
            phase: ProjectPhase::Production,
            target_date: None,
            phase_due_date: None,
            is_blocked: false,
            assigned_to: None,
        }
    }

    fn update(days_ago: i64, is_deliverable: bool, approval: ApprovalState) -> StatusUpdate {
        StatusUpdate {
            created_at: now() - Duration::days(days_ago),
            is_deliverable,
            approval,
        }
    }

    fn task(status: TaskStatus) -> Task {
        Task { status }
    }

    fn score_of(result: &HealthScoreResult, kind: SignalKind) -> u32 {
        result.signal(kind).map(|signal| signal.score).unwrap()
    }

    fn detail_of(result: &HealthScoreResult, kind: SignalKind) -> &str {
        &result.signal(kind).unwrap().detail
    }

    #[test]
    fn ceilings_sum_to_one_hundred() {
        let total: u32 = SignalKind::ALL.iter().map(|kind| kind.max_score()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn empty_campaign_is_healthy() {
        let result = compute_health_score(&campaign(), &[], &[], now());
        assert_eq!(result.score, 95);
        assert_eq!(result.label, HealthLabel::Healthy);
        let kinds: Vec<SignalKind> = result.signals.iter().map(|signal| signal.kind).collect();
        assert_eq!(kinds, SignalKind::ALL.to_vec());
        assert_eq!(score_of(&result, SignalKind::HasAssignee), 0);
        assert_eq!(detail_of(&result, SignalKind::DeadlineStatus), "No deadline set");
        assert_eq!(
            result.signal(SignalKind::HasAssignee).unwrap().status,
            SignalStatus::Critical
        );
    }

    #[test]
    fn blocked_campaign_overrides_task_blockers() {
        let mut blocked = campaign();
        blocked.is_blocked = true;
        let result = compute_health_score(&blocked, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::BlockedStatus), 0);
        assert_eq!(detail_of(&result, SignalKind::BlockedStatus), "Project is blocked");
        assert_eq!(result.score, 85);

        let tasks = vec![task(TaskStatus::Todo)];
        let with_tasks = compute_health_score(&blocked, &[], &tasks, now());
        assert_eq!(score_of(&with_tasks, SignalKind::BlockedStatus), 0);
    }

    #[test]
    fn blocked_tasks_cost_five_each() {
        let one = vec![task(TaskStatus::Blocked), task(TaskStatus::Done)];
        let result = compute_health_score(&campaign(), &[], &one, now());
        assert_eq!(score_of(&result, SignalKind::BlockedStatus), 5);
        assert_eq!(detail_of(&result, SignalKind::BlockedStatus), "1 blocked task");

        let three = vec![task(TaskStatus::Blocked); 3];
        let result = compute_health_score(&campaign(), &[], &three, now());
        assert_eq!(score_of(&result, SignalKind::BlockedStatus), 0);
        assert_eq!(detail_of(&result, SignalKind::BlockedStatus), "3 blocked tasks");
    }

    #[test]
    fn overdue_target_zeroes_deadline() {
        let mut late = campaign();
        late.target_date = Some(now().date_naive() - Duration::days(5));
        late.phase_due_date = Some(now().date_naive() - Duration::days(1));
        let result = compute_health_score(&late, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::DeadlineStatus), 0);
        assert!(detail_of(&result, SignalKind::DeadlineStatus).contains("Overdue by 5 days"));
    }

    #[test]
    fn overdue_phase_halves_deadline() {
        let mut late = campaign();
        late.target_date = Some(now().date_naive() + Duration::days(30));
        late.phase_due_date = Some(now().date_naive() - Duration::days(2));
        let result = compute_health_score(&late, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::DeadlineStatus), 10);
        assert_eq!(
            detail_of(&result, SignalKind::DeadlineStatus),
            "Phase overdue by 2 days"
        );
    }

    #[test]
    fn upcoming_phase_without_target_keeps_full_marks() {
        let mut phased = campaign();
        phased.phase_due_date = Some(now().date_naive() + Duration::days(4));
        let result = compute_health_score(&phased, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::DeadlineStatus), 20);
        assert_eq!(
            detail_of(&result, SignalKind::DeadlineStatus),
            "Phase due in 4 days"
        );
    }

    #[test]
    fn upcoming_target_keeps_full_marks() {
        let mut soon = campaign();
        soon.target_date = Some(now().date_naive() + Duration::days(2));
        let result = compute_health_score(&soon, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::DeadlineStatus), 20);
        assert_eq!(detail_of(&result, SignalKind::DeadlineStatus), "Due in 2 days");

        soon.target_date = Some(now().date_naive() + Duration::days(21));
        let result = compute_health_score(&soon, &[], &[], now());
        assert_eq!(
            detail_of(&result, SignalKind::DeadlineStatus),
            "On track — 21 days remaining"
        );

        soon.target_date = Some(now().date_naive());
        let result = compute_health_score(&soon, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::DeadlineStatus), 20);
        assert_eq!(detail_of(&result, SignalKind::DeadlineStatus), "Due in 0 days");
    }

    #[test]
    fn recency_decays_linearly() {
        let updates = vec![
            update(30, false, ApprovalState::Pending),
            update(10, false, ApprovalState::Pending),
        ];
        let result = compute_health_score(&campaign(), &updates, &[], now());
        assert_eq!(score_of(&result, SignalKind::UpdateRecency), 9);
        assert_eq!(detail_of(&result, SignalKind::UpdateRecency), "Last update 10 days ago");
    }

    #[test]
    fn recency_window_edges() {
        let at = |days| {
            let updates = vec![update(days, false, ApprovalState::Pending)];
            score_of(
                &compute_health_score(&campaign(), &updates, &[], now()),
                SignalKind::UpdateRecency,
            )
        };
        assert_eq!(at(0), 25);
        assert_eq!(at(3), 25);
        assert_eq!(at(4), 23);
        assert_eq!(at(14), 0);
        assert_eq!(at(15), 0);
    }

    #[test]
    fn future_update_counts_as_fresh() {
        let updates = vec![update(-2, false, ApprovalState::Pending)];
        let result = compute_health_score(&campaign(), &updates, &[], now());
        assert_eq!(score_of(&result, SignalKind::UpdateRecency), 25);
        assert_eq!(detail_of(&result, SignalKind::UpdateRecency), "Last update today");
    }

    #[test]
    fn task_completion_is_proportional() {
        let tasks = vec![
            task(TaskStatus::Done),
            task(TaskStatus::Done),
            task(TaskStatus::InProgress),
            task(TaskStatus::Todo),
        ];
        let result = compute_health_score(&campaign(), &[], &tasks, now());
        assert_eq!(score_of(&result, SignalKind::TaskCompletion), 10);
        assert_eq!(
            detail_of(&result, SignalKind::TaskCompletion),
            "2/4 tasks complete (50%)"
        );
        assert_eq!(
            result.signal(SignalKind::TaskCompletion).unwrap().status,
            SignalStatus::Warning
        );
    }

    #[test]
    fn revision_tiers() {
        let rejected = |count: usize| {
            let updates = vec![update(1, true, ApprovalState::Rejected); count];
            compute_health_score(&campaign(), &updates, &[], now())
        };
        assert_eq!(score_of(&rejected(0), SignalKind::RevisionRate), 15);
        assert_eq!(score_of(&rejected(1), SignalKind::RevisionRate), 15);
        assert_eq!(detail_of(&rejected(1), SignalKind::RevisionRate), "1 revision request");
        assert_eq!(score_of(&rejected(2), SignalKind::RevisionRate), 10);
        let three = rejected(3);
        assert_eq!(score_of(&three, SignalKind::RevisionRate), 5);
        assert_eq!(detail_of(&three, SignalKind::RevisionRate), "3 revision requests");
        assert_eq!(score_of(&rejected(4), SignalKind::RevisionRate), 0);
    }

    #[test]
    fn rejected_non_deliverables_are_not_revisions() {
        let updates = vec![update(1, false, ApprovalState::Rejected); 4];
        let result = compute_health_score(&campaign(), &updates, &[], now());
        assert_eq!(score_of(&result, SignalKind::RevisionRate), 15);
    }

    #[test]
    fn pending_review_drops_after_five_days() {
        let fresh = vec![update(5, true, ApprovalState::Pending)];
        let result = compute_health_score(&campaign(), &fresh, &[], now());
        assert_eq!(score_of(&result, SignalKind::PendingReview), 5);
        assert!(detail_of(&result, SignalKind::PendingReview).contains("5 days"));

        let stale = vec![
            update(1, true, ApprovalState::Pending),
            update(6, true, ApprovalState::Pending),
            update(9, true, ApprovalState::Approved),
        ];
        let result = compute_health_score(&campaign(), &stale, &[], now());
        assert_eq!(score_of(&result, SignalKind::PendingReview), 0);
        assert_eq!(
            detail_of(&result, SignalKind::PendingReview),
            "Deliverable pending review for 6 days"
        );
    }

    #[test]
    fn assignee_is_binary() {
        let mut staffed = campaign();
        staffed.assigned_to = Some("Priya".to_string());
        let result = compute_health_score(&staffed, &[], &[], now());
        assert_eq!(score_of(&result, SignalKind::HasAssignee), 5);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(SignalStatus::classify(7, 10), SignalStatus::Good);
        assert_eq!(SignalStatus::classify(4, 10), SignalStatus::Warning);
        assert_eq!(SignalStatus::classify(3, 10), SignalStatus::Critical);
        assert_eq!(SignalStatus::classify(14, 20), SignalStatus::Good);
        assert_eq!(SignalStatus::classify(0, 5), SignalStatus::Critical);
    }

    #[test]
    fn label_bands() {
        assert_eq!(HealthLabel::from_score(100), HealthLabel::Healthy);
        assert_eq!(HealthLabel::from_score(80), HealthLabel::Healthy);
        assert_eq!(HealthLabel::from_score(79), HealthLabel::NeedsAttention);
        assert_eq!(HealthLabel::from_score(60), HealthLabel::NeedsAttention);
        assert_eq!(HealthLabel::from_score(59), HealthLabel::AtRisk);
        assert_eq!(HealthLabel::from_score(40), HealthLabel::AtRisk);
        assert_eq!(HealthLabel::from_score(39), HealthLabel::Critical);
        assert_eq!(HealthLabel::from_score(0), HealthLabel::Critical);
    }

    #[test]
    fn serializes_with_display_names() {
        let result = compute_health_score(&campaign(), &[], &[], now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "Healthy");
        assert_eq!(json["signals"][0]["name"], "Update Recency");
        assert_eq!(json["signals"][5]["status"], "critical");
    }

    #[test]
    fn portfolio_sorts_worst_first() {
        let mut stalled = campaign();
        stalled.name = "Holiday Push".to_string();
        stalled.is_blocked = true;
        let mut steady = campaign();
        steady.name = "Brand Refresh".to_string();
        steady.assigned_to = Some("Priya".to_string());

        let snapshots = vec![
            CampaignSnapshot {
                campaign: steady,
                updates: vec![],
                tasks: vec![],
            },
            CampaignSnapshot {
                campaign: stalled,
                updates: vec![update(20, false, ApprovalState::Pending)],
                tasks: vec![],
            },
            CampaignSnapshot {
                campaign: campaign(),
                updates: vec![],
                tasks: vec![],
            },
        ];

        let scores = score_snapshots(&snapshots, now());
        let names: Vec<&str> = scores.iter().map(|s| s.campaign.name.as_str()).collect();
        assert_eq!(names, vec!["Holiday Push", "Spring Launch", "Brand Refresh"]);
        assert_eq!(scores[0].health.score, 60);
    }

    fn approval_strategy() -> impl Strategy<Value = ApprovalState> {
        prop_oneof![
            Just(ApprovalState::Approved),
            Just(ApprovalState::Rejected),
            Just(ApprovalState::Pending),
        ]
    }

    fn status_strategy() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Todo),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Review),
            Just(TaskStatus::Done),
            Just(TaskStatus::Blocked),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_sum(
            updates in prop::collection::vec((-5i64..60, any::<bool>(), approval_strategy()), 0..20),
            statuses in prop::collection::vec(status_strategy(), 0..20),
            target_offset in prop::option::of(-40i64..40),
            phase_offset in prop::option::of(-40i64..40),
            is_blocked in any::<bool>(),
            assigned in any::<bool>(),
        ) {
            let mut subject = campaign();
            subject.target_date = target_offset.map(|d| now().date_naive() + Duration::days(d));
            subject.phase_due_date = phase_offset.map(|d| now().date_naive() + Duration::days(d));
            subject.is_blocked = is_blocked;
            subject.assigned_to = assigned.then(|| "Sam".to_string());
            let updates: Vec<StatusUpdate> = updates
                .into_iter()
                .map(|(days, deliverable, approval)| update(days, deliverable, approval))
                .collect();
            let tasks: Vec<Task> = statuses.into_iter().map(task).collect();

            let result = compute_health_score(&subject, &updates, &tasks, now());
            let sum: u32 = result.signals.iter().map(|signal| signal.score).sum();

            prop_assert!(result.score <= 100);
            prop_assert_eq!(result.score, sum);
            prop_assert_eq!(result.signals.len(), 7);
            for (signal, kind) in result.signals.iter().zip(SignalKind::ALL) {
                prop_assert_eq!(signal.kind, kind);
                prop_assert!(signal.score <= signal.max_score);
                prop_assert_eq!(signal.status, SignalStatus::classify(signal.score, signal.max_score));
            }
            prop_assert_eq!(result.label, HealthLabel::from_score(result.score));

            let again = compute_health_score(&subject, &updates, &tasks, now());
            prop_assert_eq!(again, result);
        }
    }
}
