use serde::Serialize;
use sqlx::PgPool;

use super::migrate::clear;
use crate::model::Timestamp;
use crate::store::StoreSnapshot;

/// Replace the stored state with a snapshot using COPY FROM STDIN (text format).
///
/// Order respects FK constraints: entities first, then every table that
/// references them.
pub async fn save_snapshot(pool: &PgPool, snapshot: &StoreSnapshot) -> Result<(), sqlx::Error> {
    clear(pool).await?;

    // Entities
    {
        let mut buf = String::new();
        for e in &snapshot.entities {
            let personality = e.npc.as_ref().map(|npc| npc.personality.as_str());
            let npc_state = e.npc.as_ref().map(json).transpose()?;
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                e.id,
                e.kind.as_str(),
                escape(&e.name),
                e.troops,
                e.max_troops,
                e.spies,
                e.population,
                e.max_population,
                escape(&json(&e.resources)?),
                escape(&json(&e.buildings)?),
                e.battles_won,
                e.prestige,
                e.last_active.as_secs(),
                opt_text(personality),
                opt_text(npc_state.as_deref()),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_entities.sql"), &buf).await?;
    }

    // Jobs
    {
        let mut buf = String::new();
        for j in &snapshot.jobs {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                j.id,
                j.owner,
                j.kind().as_str(),
                escape(&json(&j.payload)?),
                j.start.as_secs(),
                j.status.as_str(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_jobs.sql"), &buf).await?;
    }

    // Attacks
    {
        let mut buf = String::new();
        for a in &snapshot.attacks {
            let outcome = a.outcome.as_ref().map(json).transpose()?;
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                a.id,
                a.attacker,
                a.defender,
                a.troops,
                a.start.as_secs(),
                a.status.as_str(),
                opt_text(outcome.as_deref()),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_attacks.sql"), &buf).await?;
    }

    // Wars
    {
        let mut buf = String::new();
        for w in &snapshot.wars {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                w.id,
                w.attacker,
                w.defender,
                w.status.as_str(),
                w.start.as_secs(),
                opt_secs(w.end),
                w.forced_peace,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_wars.sql"), &buf).await?;
    }

    // Relations
    {
        let mut buf = String::new();
        for r in &snapshot.relations {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                r.pair.low,
                r.pair.high,
                r.relation.trust,
                opt_secs(r.relation.war_cooldown_until),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_relations.sql"), &buf).await?;
    }

    // Market supply
    {
        let mut buf = String::new();
        for s in &snapshot.market {
            buf.push_str(&format!("{}\t{}\n", escape(&s.resource), s.supply));
        }
        copy_in(pool, include_str!("../../sql/copy_market_supply.sql"), &buf).await?;
    }

    // Intel reports
    {
        let mut buf = String::new();
        for i in &snapshot.intel {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                i.owner,
                i.target,
                i.troops,
                i.population,
                escape(&json(&i.resources)?),
                escape(&json(&i.buildings)?),
                i.gathered_at.as_secs(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_intel_reports.sql"), &buf).await?;
    }

    // Trades
    {
        let mut buf = String::new();
        for t in &snapshot.trades {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                t.entity,
                escape(&t.resource),
                t.side.as_str(),
                t.quantity,
                t.unit_price,
                t.profit,
                t.at.as_secs(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_trades.sql"), &buf).await?;
    }

    Ok(())
}

/// Execute a COPY FROM STDIN with the given text-format payload.
async fn copy_in(pool: &PgPool, statement: &str, data: &str) -> Result<(), sqlx::Error> {
    if data.is_empty() {
        return Ok(());
    }
    let mut conn = pool.acquire().await?;
    let mut copy = conn.copy_in_raw(statement).await?;
    copy.send(data.as_bytes()).await?;
    copy.finish().await?;
    Ok(())
}

fn json<T: Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Escape a string for Postgres COPY text format.
/// Backslash must be escaped first, then the special whitespace characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Render optional text as a COPY value (`\N` for NULL).
fn opt_text(v: Option<&str>) -> String {
    match v {
        Some(s) => escape(s),
        None => "\\N".to_string(),
    }
}

fn opt_secs(v: Option<Timestamp>) -> String {
    match v {
        Some(t) => t.as_secs().to_string(),
        None => "\\N".to_string(),
    }
}
