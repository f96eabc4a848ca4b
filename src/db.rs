use std::collections::HashMap;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::ModelError;
use crate::models::{
    ApprovalState, Campaign, CampaignSnapshot, ProjectPhase, StatusUpdate, Task, TaskStatus,
};

/// Which table a CSV import feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportKind {
    Campaigns,
    Updates,
    Tasks,
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_company(pool: &PgPool, name: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO campaign_health.companies (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
async fn upsert_campaign(
    pool: &PgPool,
    company_id: Uuid,
    name: &str,
    phase: ProjectPhase,
    target_date: Option<NaiveDate>,
    phase_due_date: Option<NaiveDate>,
    is_blocked: bool,
    assigned_to: Option<&str>,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO campaign_health.campaigns
        (id, company_id, name, phase, target_date, phase_due_date, is_blocked, assigned_to)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (name) DO UPDATE
        SET company_id = EXCLUDED.company_id,
            phase = EXCLUDED.phase,
            target_date = EXCLUDED.target_date,
            phase_due_date = EXCLUDED.phase_due_date,
            is_blocked = EXCLUDED.is_blocked,
            assigned_to = EXCLUDED.assigned_to
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(name)
    .bind(phase.as_str())
    .bind(target_date)
    .bind(phase_due_date)
    .bind(is_blocked)
    .bind(assigned_to)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

async fn campaign_id(pool: &PgPool, name: &str) -> anyhow::Result<Uuid> {
    let row = sqlx::query("SELECT id FROM campaign_health.campaigns WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("unknown campaign: {name}"))?;
    Ok(row.get("id"))
}

async fn insert_update(
    pool: &PgPool,
    campaign_id: Uuid,
    body: &str,
    created_at: DateTime<Utc>,
    is_deliverable: bool,
    approval: ApprovalState,
    source_key: &str,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO campaign_health.status_updates
        (id, campaign_id, body, is_deliverable, is_approved, created_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(campaign_id)
    .bind(body)
    .bind(is_deliverable)
    .bind(approval.is_approved())
    .bind(created_at)
    .bind(source_key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn upsert_task(
    pool: &PgPool,
    campaign_id: Uuid,
    title: &str,
    status: TaskStatus,
    source_key: &str,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO campaign_health.tasks (id, campaign_id, title, status, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO UPDATE
        SET title = EXCLUDED.title, status = EXCLUDED.status
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(campaign_id)
    .bind(title)
    .bind(status.as_str())
    .bind(source_key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let campaigns = vec![
        (
            "Northwind Outfitters",
            "Spring Collection Launch",
            ProjectPhase::Production,
            Some(today + Duration::days(21)),
            Some(today + Duration::days(4)),
            false,
            Some("Priya Raman"),
        ),
        (
            "Northwind Outfitters",
            "Loyalty Email Revamp",
            ProjectPhase::Review,
            Some(today - Duration::days(2)),
            Some(today - Duration::days(5)),
            false,
            None,
        ),
        (
            "Bluebird Dental",
            "Patient Referral Drive",
            ProjectPhase::Strategy,
            None,
            Some(today + Duration::days(9)),
            true,
            Some("Marcus Webb"),
        ),
    ];

    for (company, name, phase, target_date, phase_due_date, is_blocked, assigned_to) in campaigns {
        let company_id = upsert_company(pool, company).await?;
        upsert_campaign(
            pool,
            company_id,
            name,
            phase,
            target_date,
            phase_due_date,
            is_blocked,
            assigned_to,
        )
        .await?;
    }

    let now = Utc::now();
    let updates = vec![
        (
            "seed-update-001",
            "Spring Collection Launch",
            "Lookbook photography wrapped",
            1,
            false,
            ApprovalState::Pending,
        ),
        (
            "seed-update-002",
            "Spring Collection Launch",
            "Hero banner concepts for review",
            2,
            true,
            ApprovalState::Approved,
        ),
        (
            "seed-update-003",
            "Loyalty Email Revamp",
            "Welcome series draft v1",
            16,
            true,
            ApprovalState::Rejected,
        ),
        (
            "seed-update-004",
            "Loyalty Email Revamp",
            "Welcome series draft v2",
            11,
            true,
            ApprovalState::Rejected,
        ),
        (
            "seed-update-005",
            "Loyalty Email Revamp",
            "Welcome series draft v3",
            8,
            true,
            ApprovalState::Pending,
        ),
        (
            "seed-update-006",
            "Patient Referral Drive",
            "Waiting on referral incentive sign-off",
            6,
            false,
            ApprovalState::Pending,
        ),
    ];

    for (source_key, campaign, body, days_ago, is_deliverable, approval) in updates {
        let campaign_id = campaign_id(pool, campaign).await?;
        insert_update(
            pool,
            campaign_id,
            body,
            now - Duration::days(days_ago),
            is_deliverable,
            approval,
            source_key,
        )
        .await?;
    }

    let tasks = vec![
        ("seed-task-001", "Spring Collection Launch", "Shoot lookbook", TaskStatus::Done),
        ("seed-task-002", "Spring Collection Launch", "Write product copy", TaskStatus::Done),
        ("seed-task-003", "Spring Collection Launch", "Build landing page", TaskStatus::InProgress),
        ("seed-task-004", "Loyalty Email Revamp", "Segment audience", TaskStatus::Done),
        ("seed-task-005", "Loyalty Email Revamp", "Revise welcome copy", TaskStatus::Review),
        ("seed-task-006", "Loyalty Email Revamp", "Set up ESP automation", TaskStatus::Blocked),
        ("seed-task-007", "Patient Referral Drive", "Draft referral offer", TaskStatus::Todo),
    ];

    for (source_key, campaign, title, status) in tasks {
        let campaign_id = campaign_id(pool, campaign).await?;
        upsert_task(pool, campaign_id, title, status, source_key).await?;
    }

    Ok(())
}

pub async fn fetch_snapshots(
    pool: &PgPool,
    company: Option<&str>,
    campaign: Option<&str>,
) -> anyhow::Result<Vec<CampaignSnapshot>> {
    let mut query = String::from(
        "SELECT c.id, c.name, co.name AS company, c.phase, c.target_date, \
         c.phase_due_date, c.is_blocked, c.assigned_to \
         FROM campaign_health.campaigns c \
         JOIN campaign_health.companies co ON co.id = c.company_id",
    );

    if company.is_some() {
        query.push_str(" WHERE co.name = $1");
    } else if campaign.is_some() {
        query.push_str(" WHERE c.name = $1");
    }
    query.push_str(" ORDER BY c.name");

    let mut rows = sqlx::query(&query);

    if let Some(value) = company {
        rows = rows.bind(value);
    } else if let Some(value) = campaign {
        rows = rows.bind(value);
    }

    let mut campaigns = Vec::new();
    for row in rows.fetch_all(pool).await? {
        let phase: String = row.get("phase");
        campaigns.push(Campaign {
            id: row.get("id"),
            name: row.get("name"),
            company: row.get("company"),
            phase: phase.parse()?,
            target_date: row.get("target_date"),
            phase_due_date: row.get("phase_due_date"),
            is_blocked: row.get("is_blocked"),
            assigned_to: row.get("assigned_to"),
        });
    }

    if campaigns.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = campaigns.iter().map(|campaign| campaign.id).collect();

    let mut updates: HashMap<Uuid, Vec<StatusUpdate>> = HashMap::new();
    let update_rows = sqlx::query(
        "SELECT campaign_id, created_at, is_deliverable, is_approved \
         FROM campaign_health.status_updates WHERE campaign_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    for row in update_rows {
        let is_approved: Option<bool> = row.get("is_approved");
        updates
            .entry(row.get("campaign_id"))
            .or_default()
            .push(StatusUpdate {
                created_at: row.get("created_at"),
                is_deliverable: row.get("is_deliverable"),
                approval: ApprovalState::from(is_approved),
            });
    }

    let mut tasks: HashMap<Uuid, Vec<Task>> = HashMap::new();
    let task_rows = sqlx::query(
        "SELECT campaign_id, status \
         FROM campaign_health.tasks WHERE campaign_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    for row in task_rows {
        let status: String = row.get("status");
        tasks.entry(row.get("campaign_id")).or_default().push(Task {
            status: status.parse()?,
        });
    }

    tracing::info!(
        campaigns = campaigns.len(),
        updates = updates.values().map(Vec::len).sum::<usize>(),
        tasks = tasks.values().map(Vec::len).sum::<usize>(),
        "loaded campaign snapshots"
    );

    Ok(campaigns
        .into_iter()
        .map(|campaign| CampaignSnapshot {
            updates: updates.remove(&campaign.id).unwrap_or_default(),
            tasks: tasks.remove(&campaign.id).unwrap_or_default(),
            campaign,
        })
        .collect())
}

pub async fn import_csv(
    pool: &PgPool,
    kind: ImportKind,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;

    let written = match kind {
        ImportKind::Campaigns => import_campaigns(pool, &mut reader).await?,
        ImportKind::Updates => import_updates(pool, &mut reader).await?,
        ImportKind::Tasks => import_tasks(pool, &mut reader).await?,
    };

    tracing::info!(kind = ?kind, path = %csv_path.display(), written, "csv import finished");
    Ok(written)
}

#[derive(Debug, serde::Deserialize)]
struct CampaignCsvRow {
    company: String,
    name: String,
    phase: String,
    target_date: Option<NaiveDate>,
    phase_due_date: Option<NaiveDate>,
    is_blocked: bool,
    assigned_to: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct UpdateCsvRow {
    campaign: String,
    body: String,
    created_at: DateTime<Utc>,
    is_deliverable: bool,
    is_approved: Option<bool>,
    source_key: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct TaskCsvRow {
    campaign: String,
    title: String,
    status: String,
    source_key: Option<String>,
}

#[derive(Debug)]
struct CampaignImport {
    company: String,
    name: String,
    phase: ProjectPhase,
    target_date: Option<NaiveDate>,
    phase_due_date: Option<NaiveDate>,
    is_blocked: bool,
    assigned_to: Option<String>,
}

#[derive(Debug)]
struct UpdateImport {
    campaign: String,
    body: String,
    created_at: DateTime<Utc>,
    is_deliverable: bool,
    approval: ApprovalState,
    source_key: String,
}

#[derive(Debug)]
struct TaskImport {
    campaign: String,
    title: String,
    status: TaskStatus,
    source_key: String,
}

fn generated_source_key(source_key: Option<String>) -> String {
    source_key
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()))
}

impl TryFrom<CampaignCsvRow> for CampaignImport {
    type Error = ModelError;

    fn try_from(row: CampaignCsvRow) -> Result<Self, Self::Error> {
        Ok(Self {
            phase: row.phase.parse()?,
            company: row.company,
            name: row.name,
            target_date: row.target_date,
            phase_due_date: row.phase_due_date,
            is_blocked: row.is_blocked,
            assigned_to: row.assigned_to.filter(|name| !name.trim().is_empty()),
        })
    }
}

impl From<UpdateCsvRow> for UpdateImport {
    fn from(row: UpdateCsvRow) -> Self {
        Self {
            campaign: row.campaign,
            body: row.body,
            created_at: row.created_at,
            is_deliverable: row.is_deliverable,
            approval: ApprovalState::from(row.is_approved),
            source_key: generated_source_key(row.source_key),
        }
    }
}

impl TryFrom<TaskCsvRow> for TaskImport {
    type Error = ModelError;

    fn try_from(row: TaskCsvRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            campaign: row.campaign,
            title: row.title,
            source_key: generated_source_key(row.source_key),
        })
    }
}

async fn import_campaigns<R: std::io::Read>(
    pool: &PgPool,
    reader: &mut csv::Reader<R>,
) -> anyhow::Result<usize> {
    let mut written = 0usize;
    for result in reader.deserialize::<CampaignCsvRow>() {
        let row = CampaignImport::try_from(result?)?;
        let company_id = upsert_company(pool, &row.company).await?;
        upsert_campaign(
            pool,
            company_id,
            &row.name,
            row.phase,
            row.target_date,
            row.phase_due_date,
            row.is_blocked,
            row.assigned_to.as_deref(),
        )
        .await?;
        written += 1;
    }
    Ok(written)
}

async fn import_updates<R: std::io::Read>(
    pool: &PgPool,
    reader: &mut csv::Reader<R>,
) -> anyhow::Result<usize> {
    let mut written = 0usize;
    for result in reader.deserialize::<UpdateCsvRow>() {
        let row = UpdateImport::from(result?);
        let campaign_id = campaign_id(pool, &row.campaign).await?;
        let inserted = insert_update(
            pool,
            campaign_id,
            &row.body,
            row.created_at,
            row.is_deliverable,
            row.approval,
            &row.source_key,
        )
        .await?;
        if inserted > 0 {
            written += 1;
        }
    }
    Ok(written)
}

async fn import_tasks<R: std::io::Read>(
    pool: &PgPool,
    reader: &mut csv::Reader<R>,
) -> anyhow::Result<usize> {
    let mut written = 0usize;
    for result in reader.deserialize::<TaskCsvRow>() {
        let row = TaskImport::try_from(result?)?;
        let campaign_id = campaign_id(pool, &row.campaign).await?;
        let affected =
            upsert_task(pool, campaign_id, &row.title, row.status, &row.source_key).await?;
        if affected > 0 {
            written += 1;
        }
    }
    Ok(written)
}
